//! CLI output formatting.
//!
//! Each command has a `format_*` function that returns lines (pure, no I/O)
//! and a `print_*` wrapper that writes them to stdout. Diagnostics go through
//! `tracing` on stderr instead, so stdout stays scriptable.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Manifest
//!     12 files scanned
//!     11 indexed, 1 skipped
//! Skipped
//!     assets/shoes/broken.jpg: exiftool exited with exit status: 1: ...
//! Written: data/manifest.json
//! ```
//!
//! ## Facets
//!
//! ```text
//! All Images (4)
//!
//! Folders
//!     bags (1)
//!     shoes (2)
//!
//! Tags (3)
//!     new (1)
//!     red (1)
//!     sale (2)
//! ```
//!
//! ## Search
//!
//! ```text
//! 001 Tag: sale (5) → /tag/sale
//! 002 Person: Ana Lima (2) → /person/Ana%20Lima
//! ```
//!
//! ## Filter
//!
//! ```text
//! tag:sale → /tag/sale (2 of 4)
//!     assets/shoes/red.jpg
//!     assets/shoes/blue.jpg
//! ```

use crate::facets::{FacetIndex, FacetType, Filter, SearchTerm, filter_to_url};
use crate::manifest::BuildReport;
use crate::types::AssetRecord;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn plural(n: usize, one: &str, many: &str) -> String {
    if n == 1 {
        format!("{n} {one}")
    } else {
        format!("{n} {many}")
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(report: &BuildReport) -> Vec<String> {
    let mut lines = vec![
        "Manifest".to_string(),
        format!("    {} scanned", plural(report.scanned, "file", "files")),
        format!(
            "    {} indexed, {} skipped",
            report.indexed(),
            report.skipped.len()
        ),
    ];

    if !report.skipped.is_empty() {
        lines.push("Skipped".to_string());
        for skipped in &report.skipped {
            lines.push(format!("    {}: {}", skipped.path, skipped.error));
        }
    }

    if let Some(ref output) = report.output {
        lines.push(format!("Written: {}", output.display()));
    }
    lines
}

pub fn print_build_output(report: &BuildReport) {
    for line in format_build_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Facets
// ============================================================================

/// Folders are listed flat; metadata groups show how many distinct values
/// they hold next to the heading.
pub fn format_facets(index: &FacetIndex, total: usize) -> Vec<String> {
    let mut lines = vec![format!("All Images ({})", total)];

    for facet in index.facets() {
        lines.push(String::new());
        if facet == FacetType::Folder {
            lines.push(facet.heading().to_string());
        } else {
            lines.push(format!("{} ({})", facet.heading(), index.len(facet)));
        }
        for (value, count) in index.values(facet) {
            lines.push(format!("    {} ({})", value, count));
        }
    }
    lines
}

pub fn print_facets(index: &FacetIndex, total: usize) {
    for line in format_facets(index, total) {
        println!("{}", line);
    }
}

// ============================================================================
// Search
// ============================================================================

pub fn format_search_terms(terms: &[SearchTerm]) -> Vec<String> {
    if terms.is_empty() {
        return vec!["No results found.".to_string()];
    }
    terms
        .iter()
        .enumerate()
        .map(|(i, term)| {
            format!(
                "{} {} ({}) \u{2192} {}",
                format_index(i + 1),
                term.label(),
                term.count,
                filter_to_url(Some(&term.filter()))
            )
        })
        .collect()
}

pub fn print_search_terms(terms: &[SearchTerm]) {
    for line in format_search_terms(terms) {
        println!("{}", line);
    }
}

// ============================================================================
// Filter
// ============================================================================

pub fn format_filter_results(
    filter: Option<&Filter>,
    matches: &[&AssetRecord],
    total: usize,
) -> Vec<String> {
    let name = match filter {
        Some(f) => f.to_string(),
        None => "All Images".to_string(),
    };
    let mut lines = vec![format!(
        "{} \u{2192} {} ({} of {})",
        name,
        filter_to_url(filter),
        matches.len(),
        total
    )];
    lines.extend(matches.iter().map(|asset| format!("    {}", asset.path)));
    lines
}

pub fn print_filter_results(filter: Option<&Filter>, matches: &[&AssetRecord], total: usize) {
    for line in format_filter_results(filter, matches, total) {
        println!("{}", line);
    }
}
