//! End-to-end manifest builds through the public API.
//!
//! The Unix tests stand in a small shell script for exiftool that prints the
//! JSON fixtures under `fixtures/exiftool/` and fails for files named
//! `broken.*`, so the whole pipeline runs without exiftool installed.

use static_dam::config::DamConfig;
use static_dam::facets::{self, FacetType, Filter};
use static_dam::manifest;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn touch(root: &Path, rel: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, "fake").unwrap();
}

fn paths(records: &[static_dam::types::AssetRecord]) -> Vec<&str> {
    records.iter().map(|r| r.path.as_str()).collect()
}

#[test]
fn missing_exiftool_skips_every_file_but_writes_manifest() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "assets/shoes/red.jpg");
    touch(tmp.path(), "assets/logo.png");

    let mut config = DamConfig::default();
    config.exiftool.binary = tmp.path().join("no-such-exiftool").display().to_string();

    let (records, report) = manifest::build(tmp.path(), &config).unwrap();

    assert!(records.is_empty());
    assert_eq!(report.scanned, 2);
    assert_eq!(report.skipped.len(), 2);
    let written = fs::read_to_string(tmp.path().join("data/manifest.json")).unwrap();
    assert_eq!(written.trim(), "[]");
}

#[test]
fn custom_output_path_from_config_file() {
    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), "media/a.jpg");
    fs::write(
        tmp.path().join("dam.toml"),
        r#"
assets_dir = "media"
output = "public/index.json"

[exiftool]
binary = "/nonexistent/exiftool"
"#,
    )
    .unwrap();

    let config = static_dam::config::load_config(tmp.path()).unwrap();
    let (_, report) = manifest::build(tmp.path(), &config).unwrap();

    let output = tmp.path().join("public/index.json");
    assert_eq!(report.output.as_deref(), Some(output.as_path()));
    assert!(output.exists());
}

#[cfg(unix)]
mod with_fake_exiftool {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    /// Write an executable script that answers like `exiftool -json -G1 -n`.
    fn fake_exiftool(dir: &Path) -> String {
        let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).join("fixtures/exiftool");
        let script = format!(
            r#"#!/bin/sh
for last; do :; done
case "$(basename "$last")" in
  broken.*) echo "Error: File format error - $last" >&2; exit 1 ;;
  red.jpg) cat "{dir}/photo.json" ;;
  teaser.mov) cat "{dir}/video.json" ;;
  scan.tif) cat "{dir}/legacy.json" ;;
  *) echo '[{{}}]' ;;
esac
"#,
            dir = fixtures.display()
        );
        let path = dir.join("fake-exiftool");
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    fn library() -> (TempDir, DamConfig) {
        let tmp = TempDir::new().unwrap();
        touch(tmp.path(), "assets/shoes/red.jpg");
        touch(tmp.path(), "assets/shoes/broken.jpg");
        touch(tmp.path(), "assets/campaign/teaser.mov");
        touch(tmp.path(), "assets/archive/scan.tif");
        touch(tmp.path(), "assets/logo.png");
        touch(tmp.path(), "assets/README.txt");

        let mut config = DamConfig::default();
        config.exiftool.binary = fake_exiftool(tmp.path());
        (tmp, config)
    }

    #[test]
    fn builds_sorted_manifest_and_skips_failures() {
        let (tmp, config) = library();

        let (records, report) = manifest::build(tmp.path(), &config).unwrap();

        assert_eq!(
            paths(&records),
            vec![
                "assets/shoes/red.jpg",
                "assets/campaign/teaser.mov",
                "assets/archive/scan.tif",
                "assets/logo.png",
            ]
        );
        assert_eq!(report.scanned, 5);
        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].path, "assets/shoes/broken.jpg");

        let loaded = manifest::load_manifest(&tmp.path().join("data/manifest.json")).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn normalizes_fixture_metadata() {
        let (tmp, config) = library();
        let (records, _) = manifest::build(tmp.path(), &config).unwrap();

        let photo = &records[0];
        assert_eq!((photo.width, photo.height), (4000, 6000));
        assert_eq!(photo.date_taken.as_deref(), Some("2024-03-15T14:30:00Z"));
        assert_eq!(
            photo.tags.as_deref(),
            Some(&["red".to_string(), "leather".into(), "summer".into()][..])
        );
        assert_eq!(
            photo.person.as_deref(),
            Some(&["Ana Lima".to_string(), "Ben Ortiz".into()][..])
        );

        let video = &records[1];
        assert_eq!(video.is_video, Some(true));
        assert_eq!(video.duration, Some(12.5));

        let legacy = &records[2];
        assert_eq!(legacy.date_taken.as_deref(), Some("2019-07-04T16:00:00Z"));
        assert_eq!(legacy.width, 2400);

        let bare = &records[3];
        assert_eq!((bare.width, bare.height, bare.byte_size), (0, 0, 0));
        assert!(bare.tags.is_none());
    }

    #[test]
    fn manifest_json_uses_wire_names() {
        let (tmp, config) = library();
        manifest::build(tmp.path(), &config).unwrap();

        let raw: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(tmp.path().join("data/manifest.json")).unwrap(),
        )
        .unwrap();
        let photo = &raw[0];
        assert_eq!(photo["w"], 4000);
        assert_eq!(photo["h"], 6000);
        assert_eq!(photo["bytes"], 2481536);
        assert_eq!(photo["dateTaken"], "2024-03-15T14:30:00Z");
        assert_eq!(photo["camera"]["make"], "Canon");
        assert!(photo.get("isVideo").is_none());
        assert_eq!(raw[1]["isVideo"], true);
    }

    #[test]
    fn built_manifest_feeds_the_index() {
        let (tmp, config) = library();
        let (records, _) = manifest::build(tmp.path(), &config).unwrap();

        let index = facets::build_facets(&records);
        assert_eq!(index.count(FacetType::Folder, "shoes"), 1);
        assert_eq!(index.count(FacetType::Folder, "campaign"), 1);
        assert_eq!(index.count(FacetType::Person, "Carla Diaz"), 1);

        let filter = Filter::parse("tag:summer").unwrap();
        let matches = facets::apply_filter(&records, Some(&filter));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path, "assets/shoes/red.jpg");

        let from_url = facets::url_to_filter(&facets::filter_to_url(Some(&filter)));
        assert_eq!(from_url, Some(filter));

        let shoes = Filter::new(FacetType::Folder, "shoes");
        let ranked = facets::rank_search_terms(facets::apply_filter(&records, Some(&shoes)), 20);
        assert!(ranked.iter().all(|t| t.value != "launch" && t.value != "Carla Diaz"));
        assert!(ranked.iter().any(|t| t.label() == "Tag: summer"));

        let terms = facets::suggest(&records, "ana", 6);
        assert_eq!(terms.len(), 1);
        assert_eq!(terms[0].label(), "Person: Ana Lima");
    }

    #[test]
    fn rebuild_is_byte_identical() {
        let (tmp, config) = library();
        let output = tmp.path().join("data/manifest.json");

        manifest::build(tmp.path(), &config).unwrap();
        let first = fs::read(&output).unwrap();
        manifest::build(tmp.path(), &config).unwrap();
        assert_eq!(fs::read(&output).unwrap(), first);
    }
}
