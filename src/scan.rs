//! Asset discovery.
//!
//! Walks the assets tree and returns every file with an indexed extension
//! (see [`metadata::IMAGE_EXTENSIONS`] and [`metadata::VIDEO_EXTENSIONS`]),
//! matched case-insensitively:
//!
//! ```text
//! assets/
//! ├── shoes/
//! │   ├── red.jpg          → assets/shoes/red.jpg
//! │   ├── RED-BACK.JPEG    → assets/shoes/RED-BACK.JPEG
//! │   └── notes.txt        (ignored: extension)
//! ├── campaign/
//! │   └── teaser.mov       → assets/campaign/teaser.mov
//! ├── .thumbs/             (ignored: hidden)
//! └── logo.png             → assets/logo.png
//! ```
//!
//! Paths are repository-relative, `/`-separated and always start with
//! `assets/`, whatever the scanned directory is called on disk.

use crate::metadata;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Prefix every manifest path starts with.
pub const ASSETS_PREFIX: &str = "assets";

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("Assets directory not found: {0}")]
    NotFound(PathBuf),
}

/// A file found under the assets directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetFile {
    /// Location on disk, handed to the metadata tool.
    pub source: PathBuf,
    /// Manifest path, `assets/...`.
    pub path: String,
}

/// List all indexable files under `assets_dir`, sorted by manifest path.
pub fn scan(assets_dir: &Path) -> Result<Vec<AssetFile>, ScanError> {
    if !assets_dir.is_dir() {
        return Err(ScanError::NotFound(assets_dir.to_path_buf()));
    }

    let mut files = Vec::new();
    let walker = WalkDir::new(assets_dir)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some(path) = manifest_path(assets_dir, entry.path()) else {
            continue;
        };
        if metadata::is_supported_path(&path) {
            files.push(AssetFile {
                source: entry.into_path(),
                path,
            });
        }
    }

    files.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(files)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

/// `<assets_dir>/shoes/red.jpg` → `assets/shoes/red.jpg`.
fn manifest_path(assets_dir: &Path, file: &Path) -> Option<String> {
    let rel = file.strip_prefix(assets_dir).ok()?;
    let mut path = String::from(ASSETS_PREFIX);
    for component in rel.components() {
        path.push('/');
        path.push_str(&component.as_os_str().to_string_lossy());
    }
    Some(path)
}
