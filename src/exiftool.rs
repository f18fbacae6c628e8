//! External metadata extraction.
//!
//! The [`MetadataExtractor`] trait is the seam between the manifest builder
//! and whatever produces raw tags for a file. The production implementation,
//! [`ExifTool`], shells out to `exiftool -json -G1 -n` once per file:
//!
//! - `-json` prints a one-element array with an object per file
//! - `-G1` qualifies every tag with its specific group (`IPTC:Keywords`,
//!   `XMP-dc:Subject`, `QuickTime:Duration`)
//! - `-n` prints numeric values as numbers rather than formatted strings
//!
//! The call blocks until the process exits. There is no timeout: a hung
//! exiftool hangs the build.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use thiserror::Error;

/// Group-qualified tags for one file, e.g. `"EXIF:Make" -> "Canon"`.
pub type TagMap = Map<String, Value>;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("failed to run {binary}: {source}")]
    Spawn {
        binary: String,
        source: std::io::Error,
    },
    #[error("{binary} exited with {status}: {stderr}")]
    Failed {
        binary: String,
        status: std::process::ExitStatus,
        stderr: String,
    },
    #[error("could not parse metadata output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("no metadata returned for {0}")]
    Empty(PathBuf),
}

/// Source of raw metadata tags for a single file.
pub trait MetadataExtractor {
    fn extract(&self, path: &Path) -> Result<TagMap, ExtractError>;
}

/// Runs the `exiftool` binary.
#[derive(Debug, Clone)]
pub struct ExifTool {
    binary: PathBuf,
}

impl ExifTool {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }
}

impl Default for ExifTool {
    fn default() -> Self {
        Self::new("exiftool")
    }
}

impl MetadataExtractor for ExifTool {
    fn extract(&self, path: &Path) -> Result<TagMap, ExtractError> {
        let binary = self.binary().display().to_string();
        let output = Command::new(&self.binary)
            .args(["-json", "-G1", "-n"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| ExtractError::Spawn {
                binary: binary.clone(),
                source,
            })?;
        if !output.status.success() {
            return Err(ExtractError::Failed {
                binary,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        parse_output(&output.stdout, path)
    }
}

/// Parse exiftool's JSON output and take the first (only) object.
pub fn parse_output(stdout: &[u8], path: &Path) -> Result<TagMap, ExtractError> {
    let entries: Vec<TagMap> = serde_json::from_slice(stdout)?;
    entries
        .into_iter()
        .next()
        .ok_or_else(|| ExtractError::Empty(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_output_takes_first_object() {
        let out = br#"[{"SourceFile":"a.jpg","IPTC:Keywords":"red"}]"#;
        let tags = parse_output(out, Path::new("a.jpg")).unwrap();
        assert_eq!(tags["IPTC:Keywords"], "red");
    }

    #[test]
    fn parse_output_empty_array_is_error() {
        let result = parse_output(b"[]", Path::new("a.jpg"));
        assert!(matches!(result, Err(ExtractError::Empty(p)) if p == Path::new("a.jpg")));
    }

    #[test]
    fn parse_output_garbage_is_json_error() {
        let result = parse_output(b"Error: File not found", Path::new("a.jpg"));
        assert!(matches!(result, Err(ExtractError::Json(_))));
    }

    #[test]
    fn parse_output_fixture() {
        let out = include_bytes!("../fixtures/exiftool/photo.json");
        let tags = parse_output(out, Path::new("assets/shoes/red.jpg")).unwrap();
        assert_eq!(tags["EXIF:Make"], "Canon");
    }

    #[test]
    fn missing_binary_is_spawn_error() {
        let tool = ExifTool::new("/nonexistent/definitely-not-exiftool");
        let result = tool.extract(Path::new("a.jpg"));
        assert!(matches!(result, Err(ExtractError::Spawn { .. })));
    }

    #[test]
    fn default_binary_is_exiftool_on_path() {
        assert_eq!(ExifTool::default().binary(), Path::new("exiftool"));
    }
}
