//! # Static DAM
//!
//! A static digital asset manager for a git-hosted image library. The
//! filesystem and the metadata embedded in each file are the only data
//! sources: there is no database and no upload flow.
//!
//! # Architecture: Build Once, Filter Anywhere
//!
//! ```text
//! 1. Build    assets/   →  data/manifest.json   (exiftool → normalized records)
//! 2. Index    manifest  →  facets, filters, search terms (pure, in memory)
//! ```
//!
//! The build is the only stage that touches the filesystem or spawns
//! processes. Everything downstream is a pure function over the manifest, so
//! the same logic serves the CLI and any static front end that loads the JSON.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`scan`] | Walks the assets directory and lists indexable files |
//! | [`exiftool`] | Runs exiftool per file behind the [`exiftool::MetadataExtractor`] seam |
//! | [`metadata`] | Normalizes raw exiftool tags into an [`types::AssetRecord`] |
//! | [`manifest`] | Build orchestration, ordering, reading and writing the manifest |
//! | [`facets`] | Facet counts, filters, filter URLs and search term ranking |
//! | [`config`] | `dam.toml` loading, merging over stock defaults, validation |
//! | [`types`] | The manifest record type shared by every stage |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## exiftool as the Only Metadata Reader
//!
//! Camera makers, Lightroom, Photo Mechanic and phone apps all write
//! keywords, people and dates into different groups (IPTC, XMP-dc,
//! XMP-iptcExt, QuickTime). exiftool reads all of them, for images and
//! videos alike, and reports each tag under its group name (`-G1`). The
//! [`metadata`] module then picks from ordered fallback chains, so a file
//! tagged by any of those tools lands in the same record shape.
//!
//! ## Full Rebuilds
//!
//! Each build regenerates the whole manifest. The output is sorted with a
//! total order (newest first, path as tiebreak), so rebuilding an unchanged
//! library produces a byte-identical file and a clean git diff.
//!
//! ## Skip, Don't Abort
//!
//! A corrupt or unreadable file is logged and left out of the manifest.
//! Only an unreadable assets directory or a failed manifest write ends the
//! build with an error.

pub mod config;
pub mod exiftool;
pub mod facets;
pub mod manifest;
pub mod metadata;
pub mod output;
pub mod scan;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
