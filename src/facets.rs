//! Facet index, filtering and search-term ranking over a loaded manifest.
//!
//! Everything here is a pure function of the asset list. Nothing is cached
//! or updated incrementally; callers recompute whenever the list changes.
//!
//! ## Facets
//!
//! | Facet | Source | Filter matches when |
//! |-------|--------|---------------------|
//! | `folder` | second path segment (`assets/<folder>/...`) | path contains `/<value>/` |
//! | `category` | `category` | `category` contains the value |
//! | `person` | `person` | `person` contains the value |
//! | `tag` | `tags` | `tags` contains the value |
//! | `product` | `product` | `product` contains the value |
//!
//! ## Filter encoding
//!
//! A filter is written `"<facet>:<value>"` in memory and
//! `/<facet>/<url-encoded value>` as a URL path. Anything that does not
//! decode to a known facet and a non-empty value means "no filter".

use crate::types::AssetRecord;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FacetType {
    Folder,
    Category,
    Person,
    Tag,
    Product,
}

impl FacetType {
    pub const ALL: [FacetType; 5] = [
        FacetType::Folder,
        FacetType::Category,
        FacetType::Person,
        FacetType::Tag,
        FacetType::Product,
    ];

    /// Facets drawn from embedded metadata (everything but folders), in the
    /// order they are visited when ranking search terms.
    pub const METADATA: [FacetType; 4] = [
        FacetType::Category,
        FacetType::Person,
        FacetType::Tag,
        FacetType::Product,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FacetType::Folder => "folder",
            FacetType::Category => "category",
            FacetType::Person => "person",
            FacetType::Tag => "tag",
            FacetType::Product => "product",
        }
    }

    /// Capitalized name used in search-term labels.
    pub fn label(self) -> &'static str {
        match self {
            FacetType::Folder => "Folder",
            FacetType::Category => "Category",
            FacetType::Person => "Person",
            FacetType::Tag => "Tag",
            FacetType::Product => "Product",
        }
    }

    /// Plural heading used when listing a whole facet group.
    pub fn heading(self) -> &'static str {
        match self {
            FacetType::Folder => "Folders",
            FacetType::Category => "Categories",
            FacetType::Person => "People",
            FacetType::Tag => "Tags",
            FacetType::Product => "Products",
        }
    }

    /// The values `asset` carries for this facet.
    pub fn values(self, asset: &AssetRecord) -> &[String] {
        let field = match self {
            FacetType::Folder => return &[],
            FacetType::Category => &asset.category,
            FacetType::Person => &asset.person,
            FacetType::Tag => &asset.tags,
            FacetType::Product => &asset.product,
        };
        field.as_deref().unwrap_or(&[])
    }
}

impl fmt::Display for FacetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown facet '{0}'")]
pub struct UnknownFacet(pub String);

impl FromStr for FacetType {
    type Err = UnknownFacet;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FacetType::ALL
            .into_iter()
            .find(|facet| facet.as_str() == s)
            .ok_or_else(|| UnknownFacet(s.to_string()))
    }
}

// =============================================================================
// Filters
// =============================================================================

/// A single active `(facet, value)` selection.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Filter {
    pub facet: FacetType,
    pub value: String,
}

impl Filter {
    pub fn new(facet: FacetType, value: impl Into<String>) -> Self {
        Self {
            facet,
            value: value.into(),
        }
    }

    /// Parse `"<facet>:<value>"`. The value may itself contain `:`.
    ///
    /// Returns `None` for unknown facets and empty values.
    pub fn parse(s: &str) -> Option<Self> {
        let (facet, value) = s.split_once(':')?;
        let facet = facet.parse().ok()?;
        if value.is_empty() {
            return None;
        }
        Some(Self::new(facet, value))
    }

    pub fn matches(&self, asset: &AssetRecord) -> bool {
        match self.facet {
            FacetType::Folder => asset.path.contains(&format!("/{}/", self.value)),
            facet => facet.values(asset).iter().any(|v| *v == self.value),
        }
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.facet, self.value)
    }
}

/// Assets matching `filter`, in their original order. `None` keeps all.
pub fn apply_filter<'a>(assets: &'a [AssetRecord], filter: Option<&Filter>) -> Vec<&'a AssetRecord> {
    match filter {
        None => assets.iter().collect(),
        Some(filter) => assets.iter().filter(|a| filter.matches(a)).collect(),
    }
}

/// `/` for no filter, otherwise `/<facet>/<url-encoded value>`.
pub fn filter_to_url(filter: Option<&Filter>) -> String {
    match filter {
        None => "/".to_string(),
        Some(f) => format!("/{}/{}", f.facet, urlencoding::encode(&f.value)),
    }
}

/// Decode a URL path back into a filter.
///
/// `/`, the empty path and `/library` mean no filter, as does any path that
/// isn't exactly two segments naming a known facet and a non-empty value.
pub fn url_to_filter(path: &str) -> Option<Filter> {
    let trimmed = path.strip_prefix('/').unwrap_or(path);
    let parts: Vec<&str> = trimmed.split('/').collect();
    let [facet, encoded] = parts.as_slice() else {
        return None;
    };
    let facet: FacetType = facet.parse().ok()?;
    if encoded.is_empty() {
        return None;
    }
    let value = urlencoding::decode(encoded).ok()?;
    if value.is_empty() {
        return None;
    }
    Some(Filter::new(facet, value.into_owned()))
}

// =============================================================================
// Facet index
// =============================================================================

/// Occurrence counts per facet value, with values in lexicographic order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetIndex {
    groups: BTreeMap<FacetType, BTreeMap<String, usize>>,
}

impl FacetIndex {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Facet types that have at least one value, in [`FacetType::ALL`] order.
    pub fn facets(&self) -> impl Iterator<Item = FacetType> + '_ {
        self.groups.keys().copied()
    }

    /// `(value, count)` pairs for `facet`, sorted by value.
    pub fn values(&self, facet: FacetType) -> impl Iterator<Item = (&str, usize)> + '_ {
        self.groups
            .get(&facet)
            .into_iter()
            .flat_map(|values| values.iter().map(|(v, c)| (v.as_str(), *c)))
    }

    pub fn count(&self, facet: FacetType, value: &str) -> usize {
        self.groups
            .get(&facet)
            .and_then(|values| values.get(value))
            .copied()
            .unwrap_or(0)
    }

    /// Number of distinct values for `facet`.
    pub fn len(&self, facet: FacetType) -> usize {
        self.groups.get(&facet).map_or(0, BTreeMap::len)
    }

    fn add(&mut self, facet: FacetType, value: &str) {
        *self
            .groups
            .entry(facet)
            .or_default()
            .entry(value.to_string())
            .or_insert(0) += 1;
    }
}

/// Count every folder and metadata value across `assets`.
///
/// Accepts a whole manifest (`&records`) or the output of [`apply_filter`].
pub fn build_facets<'a>(assets: impl IntoIterator<Item = &'a AssetRecord>) -> FacetIndex {
    let mut index = FacetIndex::default();
    for asset in assets {
        if let Some(folder) = asset.folder() {
            index.add(FacetType::Folder, folder);
        }
        for facet in FacetType::METADATA {
            for value in facet.values(asset) {
                index.add(facet, value);
            }
        }
    }
    index
}

// =============================================================================
// Search terms
// =============================================================================

/// A facet value with how many times it occurs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    pub facet: FacetType,
    pub value: String,
    pub count: usize,
}

impl SearchTerm {
    /// Display label, e.g. `Tag: sale`.
    pub fn label(&self) -> String {
        format!("{}: {}", self.facet.label(), self.value)
    }

    pub fn filter(&self) -> Filter {
        Filter::new(self.facet, self.value.clone())
    }
}

/// All metadata terms, most frequent first; ties keep first-seen order.
fn count_terms<'a>(assets: impl IntoIterator<Item = &'a AssetRecord>) -> Vec<SearchTerm> {
    let mut terms: Vec<SearchTerm> = Vec::new();
    let mut positions: HashMap<(FacetType, &'a str), usize> = HashMap::new();

    for asset in assets {
        for facet in FacetType::METADATA {
            for value in facet.values(asset) {
                match positions.get(&(facet, value.as_str())) {
                    Some(&i) => terms[i].count += 1,
                    None => {
                        positions.insert((facet, value.as_str()), terms.len());
                        terms.push(SearchTerm {
                            facet,
                            value: value.clone(),
                            count: 1,
                        });
                    }
                }
            }
        }
    }

    // Stable sort keeps first-encountered order among equal counts.
    terms.sort_by(|a, b| b.count.cmp(&a.count));
    terms
}

/// The `limit` most frequent metadata terms.
pub fn rank_search_terms<'a>(
    assets: impl IntoIterator<Item = &'a AssetRecord>,
    limit: usize,
) -> Vec<SearchTerm> {
    let mut terms = count_terms(assets);
    terms.truncate(limit);
    terms
}

/// Ranked terms whose label contains every word of `query`, ignoring case.
///
/// An empty or blank query is the same as [`rank_search_terms`].
pub fn suggest<'a>(
    assets: impl IntoIterator<Item = &'a AssetRecord>,
    query: &str,
    limit: usize,
) -> Vec<SearchTerm> {
    let tokens: Vec<String> = query.split_whitespace().map(str::to_lowercase).collect();
    count_terms(assets)
        .into_iter()
        .filter(|term| {
            let label = term.label().to_lowercase();
            tokens.iter().all(|t| label.contains(t.as_str()))
        })
        .take(limit)
        .collect()
}
