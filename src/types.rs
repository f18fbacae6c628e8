//! Shared types serialized into the manifest.
//!
//! The manifest is read by the front end as-is, so the JSON field names here
//! are part of an external contract: `w`, `h` and `bytes` for the size
//! fields, camelCase for everything else. Optional fields are omitted rather
//! than written as `null`.

use serde::{Deserialize, Serialize};

/// Normalized metadata for a single asset file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    /// Repository-relative path, always starting with `assets/`.
    pub path: String,
    #[serde(rename = "w", alias = "width", default)]
    pub width: u64,
    #[serde(rename = "h", alias = "height", default)]
    pub height: u64,
    #[serde(rename = "bytes", alias = "byteSize", default)]
    pub byte_size: u64,
    /// Capture time as `YYYY-MM-DDTHH:MM:SSZ`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_taken: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<Camera>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub person: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchical: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_video: Option<bool>,
    /// Length in seconds; only ever set for videos.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camera {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub make: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

impl AssetRecord {
    /// The folder an asset lives in: the segment after `assets/`.
    ///
    /// Files directly under `assets/` have no folder.
    pub fn folder(&self) -> Option<&str> {
        let mut parts = self.path.split('/');
        let _root = parts.next()?;
        let folder = parts.next()?;
        // At least one more segment must follow, otherwise `folder` is the file.
        parts.next()?;
        Some(folder)
    }
}
