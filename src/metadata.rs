//! Metadata normalization: raw exiftool tags → [`AssetRecord`].
//!
//! Cameras, editors and export tools disagree about where they put things.
//! The same width can arrive as `EXIF:ImageWidth`, `PNG:ImageWidth` or
//! `QuickTime:SourceImageWidth`; keywords as a comma-separated string in one
//! file and an array of comma-separated strings in the next. This module
//! flattens all of that into one schema.
//!
//! ## Resolution priority
//!
//! Every target field has an explicit, ordered key chain. The first key that
//! is present *and* usable wins; later keys are only consulted when every
//! earlier one is absent or empty:
//!
//! | Field | Keys, in order | Usable when |
//! |-------|----------------|-------------|
//! | width | [`WIDTH_KEYS`] | positive number |
//! | height | [`HEIGHT_KEYS`] | positive number |
//! | byte size | [`BYTE_SIZE_KEYS`] | positive number |
//! | date taken | [`DATE_TAKEN_KEYS`] | parses as an exiftool timestamp |
//! | camera make / model | [`MAKE_KEYS`] / [`MODEL_KEYS`] | non-blank text |
//! | category | [`CATEGORY_KEYS`] | yields at least one value |
//! | tags | [`TAG_KEYS`] | yields at least one value |
//! | person | [`PERSON_KEYS`] | yields at least one value |
//! | product | [`PRODUCT_KEYS`] | yields at least one value |
//! | hierarchical | [`HIERARCHICAL_KEYS`] | yields at least one value |
//! | duration (video only) | [`DURATION_KEYS`] | positive finite number |
//!
//! Dedicated IPTC/XMP fields come first; legacy or alternate locations are
//! fallbacks. A field that resolves to nothing is simply left out of the
//! record. Nothing in here is an error.
//!
//! ## Multi-valued fields
//!
//! [`normalize_multi_value`] is applied to every facet source regardless of
//! shape: strings are split on commas, arrays have each element split on
//! commas, every piece is trimmed and empty pieces are dropped.

use crate::exiftool::TagMap;
use crate::types::{AssetRecord, Camera};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use std::borrow::Cow;

pub const WIDTH_KEYS: &[&str] = &[
    "EXIF:ImageWidth",
    "File:ImageWidth",
    "PNG:ImageWidth",
    "EXIF:ExifImageWidth",
    "QuickTime:ImageWidth",
    "QuickTime:SourceImageWidth",
    "Composite:ImageWidth",
];

pub const HEIGHT_KEYS: &[&str] = &[
    "EXIF:ImageHeight",
    "File:ImageHeight",
    "PNG:ImageHeight",
    "EXIF:ExifImageHeight",
    "QuickTime:ImageHeight",
    "QuickTime:SourceImageHeight",
    "Composite:ImageHeight",
];

pub const BYTE_SIZE_KEYS: &[&str] = &["File:FileSize", "System:FileSize"];

/// `EXIF:*` is what older exiftool builds report under `-G1`; current ones
/// use `ExifIFD:*`. Videos only carry the QuickTime date.
pub const DATE_TAKEN_KEYS: &[&str] = &[
    "EXIF:DateTimeOriginal",
    "EXIF:CreateDate",
    "ExifIFD:DateTimeOriginal",
    "ExifIFD:CreateDate",
    "QuickTime:CreateDate",
];

pub const MAKE_KEYS: &[&str] = &["EXIF:Make", "IFD0:Make"];
pub const MODEL_KEYS: &[&str] = &["EXIF:Model", "IFD0:Model"];

pub const CATEGORY_KEYS: &[&str] = &[
    "IPTC:SupplementalCategories",
    "XMP-photoshop:SupplementalCategories",
];

pub const TAG_KEYS: &[&str] = &["IPTC:Keywords", "XMP-dc:Keywords", "XMP-dc:Subject"];

pub const PERSON_KEYS: &[&str] = &["XMP-iptcExt:PersonInImage", "IPTC:PersonInImage"];

/// Products are read from Lightroom's hierarchical subject, used flat.
pub const PRODUCT_KEYS: &[&str] = &["XMP-lr:HierarchicalSubject"];

pub const HIERARCHICAL_KEYS: &[&str] = &["XMP:HierarchicalSubject"];

pub const DURATION_KEYS: &[&str] = &[
    "QuickTime:Duration",
    "Composite:Duration",
    "Matroska:Duration",
];

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "tif", "tiff", "png", "webp", "heic"];
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "webm", "avi"];

/// Build a normalized record for `path` from its raw tags.
pub fn normalize(path: &str, tags: &TagMap) -> AssetRecord {
    let is_video = is_video_path(path);
    AssetRecord {
        path: path.to_string(),
        width: resolve_number(tags, WIDTH_KEYS).unwrap_or(0),
        height: resolve_number(tags, HEIGHT_KEYS).unwrap_or(0),
        byte_size: resolve_number(tags, BYTE_SIZE_KEYS).unwrap_or(0),
        date_taken: resolve_date_taken(tags),
        camera: resolve_camera(tags),
        category: resolve_multi_value(tags, CATEGORY_KEYS),
        tags: resolve_multi_value(tags, TAG_KEYS),
        person: resolve_multi_value(tags, PERSON_KEYS),
        product: resolve_multi_value(tags, PRODUCT_KEYS),
        hierarchical: resolve_hierarchical(tags),
        is_video: is_video.then_some(true),
        duration: if is_video {
            resolve_duration(tags)
        } else {
            None
        },
    }
}

// =============================================================================
// Multi-valued fields
// =============================================================================

/// Flatten a string-or-array value into trimmed, non-empty, comma-split parts.
///
/// ```text
/// "red, blue ,green"          → ["red", "blue", "green"]
/// ["red, blue", "green", ""]  → ["red", "blue", "green"]
/// ```
///
/// Numbers and booleans are stringified; nulls, objects and nested arrays
/// contribute nothing.
pub fn normalize_multi_value(raw: &Value) -> Vec<String> {
    match raw {
        Value::Array(items) => items.iter().flat_map(split_scalar).collect(),
        other => split_scalar(other),
    }
}

fn split_scalar(value: &Value) -> Vec<String> {
    scalar_text(value)
        .map(|text| split_list(&text))
        .unwrap_or_default()
}

fn split_list(text: &str) -> Vec<String> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(n.to_string())),
        Value::Bool(b) => Some(Cow::Owned(b.to_string())),
        _ => None,
    }
}

/// First key in `keys` whose value normalizes to a non-empty list.
pub fn resolve_multi_value(tags: &TagMap, keys: &[&str]) -> Option<Vec<String>> {
    keys.iter()
        .filter_map(|key| tags.get(*key))
        .map(normalize_multi_value)
        .find(|values| !values.is_empty())
}

/// Hierarchical subjects like `Products|Shoes` are kept whole: trimmed and
/// de-blanked, but never split on commas.
pub fn resolve_hierarchical(tags: &TagMap) -> Option<Vec<String>> {
    HIERARCHICAL_KEYS
        .iter()
        .filter_map(|key| tags.get(*key))
        .map(|raw| {
            let items: Vec<&Value> = match raw {
                Value::Array(items) => items.iter().collect(),
                other => vec![other],
            };
            items
                .into_iter()
                .filter_map(scalar_text)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
        })
        .find(|values| !values.is_empty())
}

// =============================================================================
// Scalar fields
// =============================================================================

/// First positive integer among `keys`. Floats are rounded, numeric strings
/// are parsed; zero, negatives and junk are skipped.
pub fn resolve_number(tags: &TagMap, keys: &[&str]) -> Option<u64> {
    keys.iter()
        .filter_map(|key| tags.get(*key))
        .find_map(positive_integer)
}

fn positive_integer(value: &Value) -> Option<u64> {
    if let Some(n) = value.as_u64() {
        return (n > 0).then_some(n);
    }
    let f = as_float(value)?;
    (f.is_finite() && f >= 0.5).then(|| f.round() as u64)
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// First non-blank text among `keys`, trimmed.
pub fn resolve_text(tags: &TagMap, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|key| tags.get(*key))
        .filter_map(scalar_text)
        .map(|s| s.trim().to_string())
        .find(|s| !s.is_empty())
}

pub fn resolve_camera(tags: &TagMap) -> Option<Camera> {
    let make = resolve_text(tags, MAKE_KEYS);
    let model = resolve_text(tags, MODEL_KEYS);
    if make.is_none() && model.is_none() {
        return None;
    }
    Some(Camera { make, model })
}

pub fn resolve_date_taken(tags: &TagMap) -> Option<String> {
    DATE_TAKEN_KEYS
        .iter()
        .filter_map(|key| tags.get(*key)?.as_str())
        .find_map(parse_exif_datetime)
}

/// Convert an exiftool timestamp to `YYYY-MM-DDTHH:MM:SSZ`.
///
/// Accepts `YYYY:MM:DD HH:MM:SS` with optional fractional seconds and an
/// optional `±HH:MM` or `Z` suffix. Offsets are applied; times without one
/// are taken as UTC. Returns `None` for anything else, including the
/// `0000:00:00 00:00:00` placeholder some cameras write.
pub fn parse_exif_datetime(raw: &str) -> Option<String> {
    let raw = raw.trim();
    let utc = if let Ok(dt) = DateTime::parse_from_str(raw, "%Y:%m:%d %H:%M:%S%.f%:z") {
        dt.with_timezone(&Utc)
    } else {
        let naive = raw.strip_suffix('Z').unwrap_or(raw);
        NaiveDateTime::parse_from_str(naive, "%Y:%m:%d %H:%M:%S%.f")
            .ok()?
            .and_utc()
    };
    Some(utc.format("%Y-%m-%dT%H:%M:%SZ").to_string())
}

/// Duration in seconds; first positive finite value among [`DURATION_KEYS`].
pub fn resolve_duration(tags: &TagMap) -> Option<f64> {
    DURATION_KEYS
        .iter()
        .filter_map(|key| tags.get(*key))
        .filter_map(as_float)
        .find(|d| d.is_finite() && *d > 0.0)
}

fn extension(path: &str) -> Option<String> {
    let name = path.rsplit('/').next()?;
    let (stem, ext) = name.rsplit_once('.')?;
    (!stem.is_empty()).then(|| ext.to_ascii_lowercase())
}

pub fn is_video_path(path: &str) -> bool {
    extension(path).is_some_and(|ext| VIDEO_EXTENSIONS.contains(&ext.as_str()))
}

/// Whether `path` has one of the indexed image or video extensions.
pub fn is_supported_path(path: &str) -> bool {
    extension(path).is_some_and(|ext| {
        IMAGE_EXTENSIONS.contains(&ext.as_str()) || VIDEO_EXTENSIONS.contains(&ext.as_str())
    })
}
