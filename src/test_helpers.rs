//! Shared test utilities for the static-dam test suite.
//!
//! Record builders for index tests, a [`MockExtractor`] that stands in for
//! exiftool, and filesystem helpers for builder tests.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let extractor = MockExtractor::new()
//!     .with_tags("assets/a.jpg", json!({"IPTC:Keywords": "red"}));
//! let (records, report) = build_manifest(&extractor, &asset_files(&["assets/a.jpg"]));
//! assert_eq!(record_paths(&records), vec!["assets/a.jpg"]);
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde_json::Value;

use crate::exiftool::{ExtractError, MetadataExtractor, TagMap};
use crate::scan::AssetFile;
use crate::types::AssetRecord;

// =========================================================================
// Record builders
// =========================================================================

/// A record with only a path.
pub fn record(path: &str) -> AssetRecord {
    AssetRecord {
        path: path.to_string(),
        ..AssetRecord::default()
    }
}

/// A record with a `dateTaken`.
pub fn dated(path: &str, date_taken: &str) -> AssetRecord {
    AssetRecord {
        date_taken: Some(date_taken.to_string()),
        ..record(path)
    }
}

/// A record with the given tags.
pub fn tagged(path: &str, tags: &[&str]) -> AssetRecord {
    AssetRecord {
        tags: Some(tags.iter().map(|t| t.to_string()).collect()),
        ..record(path)
    }
}

// =========================================================================
// Bulk extractors
// =========================================================================

pub fn record_paths(records: &[AssetRecord]) -> Vec<&str> {
    records.iter().map(|r| r.path.as_str()).collect()
}

pub fn ref_paths<'a>(records: &[&'a AssetRecord]) -> Vec<&'a str> {
    records.iter().map(|r| r.path.as_str()).collect()
}

// =========================================================================
// Filesystem
// =========================================================================

/// Files whose on-disk source is the manifest path itself.
pub fn asset_files(paths: &[&str]) -> Vec<AssetFile> {
    paths
        .iter()
        .map(|p| AssetFile {
            source: PathBuf::from(p),
            path: p.to_string(),
        })
        .collect()
}

/// Create placeholder files under `<root>/assets/`.
pub fn touch_assets(root: &Path, names: &[&str]) {
    for name in names {
        let path = root.join("assets").join(name);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, "fake").unwrap();
    }
}

// =========================================================================
// Mock extractor
// =========================================================================

/// Returns canned tags for known manifest paths and fails for everything
/// else. Records every call in order.
///
/// A source path matches a key when it ends with the key's components, so
/// `/tmp/x/assets/a.jpg` matches `assets/a.jpg`.
#[derive(Default)]
pub struct MockExtractor {
    tags: HashMap<String, TagMap>,
    calls: Mutex<Vec<String>>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tags(mut self, path: &str, tags: Value) -> Self {
        let Value::Object(map) = tags else {
            panic!("mock tags for '{path}' must be a JSON object");
        };
        self.tags.insert(path.to_string(), map);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl MetadataExtractor for MockExtractor {
    fn extract(&self, path: &Path) -> Result<TagMap, ExtractError> {
        self.calls
            .lock()
            .unwrap()
            .push(path.to_string_lossy().to_string());

        self.tags
            .iter()
            .find(|(key, _)| path.ends_with(key.as_str()))
            .map(|(_, tags)| tags.clone())
            .ok_or_else(|| ExtractError::Empty(path.to_path_buf()))
    }
}
