//! Manifest building, ordering, and persistence.
//!
//! ```text
//! scan assets/  →  exiftool per file  →  normalize  →  sort  →  data/manifest.json
//! ```
//!
//! Every run is a full rebuild: the manifest is recomputed from the files on
//! disk and replaces the previous one wholesale. Files are processed one at
//! a time. A file whose metadata cannot be extracted is logged and left out;
//! only failing to write the manifest itself aborts the run.
//!
//! ## Ordering
//!
//! Dated records come first, newest first. Records without a date follow,
//! and path order breaks every remaining tie, so the output is fully
//! deterministic:
//!
//! ```text
//! B  2024-06-01T00:00:00Z
//! A  2024-01-01T00:00:00Z
//! C  (no date)
//! ```
//!
//! Dates are compared as strings; that is sound because every `dateTaken`
//! is produced in the fixed `YYYY-MM-DDTHH:MM:SSZ` form.

use crate::config::DamConfig;
use crate::exiftool::{ExifTool, ExtractError, MetadataExtractor};
use crate::metadata;
use crate::scan::{self, AssetFile, ScanError};
use crate::types::AssetRecord;
use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),
    #[error("Failed to write manifest {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A file left out of the manifest and why.
#[derive(Debug)]
pub struct SkippedFile {
    pub path: String,
    pub error: ExtractError,
}

/// What happened during a build, for reporting.
#[derive(Debug, Default)]
pub struct BuildReport {
    pub scanned: usize,
    pub skipped: Vec<SkippedFile>,
    /// Where the manifest was written; `None` until it has been.
    pub output: Option<PathBuf>,
}

impl BuildReport {
    pub fn indexed(&self) -> usize {
        self.scanned - self.skipped.len()
    }
}

/// Scan, extract, normalize, sort and write, using the configured exiftool.
pub fn build(
    root: &Path,
    config: &DamConfig,
) -> Result<(Vec<AssetRecord>, BuildReport), ManifestError> {
    let extractor = ExifTool::new(&config.exiftool.binary);
    tracing::debug!(binary = %extractor.binary().display(), "using exiftool");
    build_with_extractor(&extractor, root, config)
}

/// [`build`] with a specific extractor (allows testing with a mock).
pub fn build_with_extractor(
    extractor: &impl MetadataExtractor,
    root: &Path,
    config: &DamConfig,
) -> Result<(Vec<AssetRecord>, BuildReport), ManifestError> {
    let files = scan::scan(&config.assets_path(root))?;
    tracing::info!(count = files.len(), "found asset files");

    let (mut records, mut report) = build_manifest(extractor, &files);
    sort_manifest(&mut records);

    let output = config.output_path(root);
    write_manifest(&output, &records)?;
    tracing::info!(path = %output.display(), records = records.len(), "manifest written");
    report.output = Some(output);

    Ok((records, report))
}

/// Extract and normalize each file in turn. Failures are recorded in the
/// report and the file is dropped; the run continues.
pub fn build_manifest(
    extractor: &impl MetadataExtractor,
    files: &[AssetFile],
) -> (Vec<AssetRecord>, BuildReport) {
    let mut records = Vec::with_capacity(files.len());
    let mut report = BuildReport {
        scanned: files.len(),
        ..BuildReport::default()
    };

    for file in files {
        match extract_record(extractor, file) {
            Ok(record) => records.push(record),
            Err(error) => {
                tracing::warn!(path = %file.path, %error, "skipping file");
                report.skipped.push(SkippedFile {
                    path: file.path.clone(),
                    error,
                });
            }
        }
    }

    (records, report)
}

#[tracing::instrument(skip(extractor, file), fields(path = %file.path))]
fn extract_record(
    extractor: &impl MetadataExtractor,
    file: &AssetFile,
) -> Result<AssetRecord, ExtractError> {
    let tags = extractor.extract(&file.source)?;
    tracing::debug!(tags = tags.len(), "extracted metadata");
    Ok(metadata::normalize(&file.path, &tags))
}

/// Order records newest first; undated records last; path breaks ties.
pub fn sort_manifest(records: &mut [AssetRecord]) {
    records.sort_by(compare_records);
}

pub fn compare_records(a: &AssetRecord, b: &AssetRecord) -> Ordering {
    match (&a.date_taken, &b.date_taken) {
        (Some(da), Some(db)) => db.cmp(da).then_with(|| a.path.cmp(&b.path)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.path.cmp(&b.path),
    }
}

/// Write `records` as a pretty-printed JSON array, creating the parent
/// directory if needed and replacing any existing file.
pub fn write_manifest(path: &Path, records: &[AssetRecord]) -> Result<(), ManifestError> {
    let json = serde_json::to_string_pretty(records)?;
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, json)
    };
    write().map_err(|source| ManifestError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Read a manifest previously written by [`write_manifest`].
pub fn load_manifest(path: &Path) -> Result<Vec<AssetRecord>, ManifestError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}
