use clap::{Parser, Subcommand};
use static_dam::facets::{self, Filter};
use static_dam::{config, manifest, output};
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, prelude::*};

/// Environment variable holding the log filter directives.
const LOG_ENV: &str = "STATIC_DAM_LOG";

#[derive(Parser)]
#[command(name = "static-dam")]
#[command(about = "Static asset manager for git-hosted image libraries")]
#[command(long_about = "\
Static asset manager for git-hosted image libraries

Your repository is the database. Images and videos live under assets/,
their keywords, people and dates live in the files' own metadata, and a
build turns both into data/manifest.json for a static front end.

Repository structure:

  .
  ├── dam.toml                     # Optional config (see gen-config)
  ├── assets/
  │   ├── shoes/                   # First-level directory = folder facet
  │   │   ├── red.jpg
  │   │   └── teaser.mp4
  │   └── logo.png                 # Top-level files have no folder
  └── data/
      └── manifest.json            # Written by build

Metadata resolution (first non-empty wins):
  Tags:      IPTC:Keywords → XMP-dc:Keywords → XMP-dc:Subject
  People:    XMP-iptcExt:PersonInImage → IPTC:PersonInImage
  Taken:     EXIF:DateTimeOriginal → EXIF:CreateDate → QuickTime:CreateDate

Filters are written facet:value (tag:sale) or as a URL path (/tag/sale).
Facets: folder, category, person, tag, product.

Requires exiftool on PATH (or [exiftool] binary in dam.toml).
Set STATIC_DAM_LOG=debug to trace each file.")]
#[command(version)]
struct Cli {
    /// Repository root containing dam.toml and the assets directory
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Scan assets and write the manifest
    Build,
    /// Show facet groups and value counts from the manifest
    Facets,
    /// Show the most frequent search terms, optionally narrowed by a query
    Search {
        /// Words every suggested term must contain
        query: Option<String>,
        /// Maximum number of terms (defaults to [search] limit)
        #[arg(long)]
        limit: Option<usize>,
        /// Only count terms on assets matching this filter
        #[arg(long)]
        filter: Option<String>,
    },
    /// List assets matching a filter (tag:sale or /tag/sale)
    Filter {
        filter: String,
    },
    /// Print a stock dam.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();
    let root = cli.root;

    match cli.command {
        Command::Build => {
            let config = config::load_config(&root)?;
            let (_, report) = manifest::build(&root, &config)?;
            output::print_build_output(&report);
        }
        Command::Facets => {
            let config = config::load_config(&root)?;
            let assets = load_assets(&root, &config)?;
            let index = facets::build_facets(&assets);
            output::print_facets(&index, assets.len());
        }
        Command::Search {
            query,
            limit,
            filter,
        } => {
            let filter = filter.as_deref().map(parse_filter_arg).transpose()?.flatten();
            let config = config::load_config(&root)?;
            let assets = load_assets(&root, &config)?;
            let limit = limit.unwrap_or(config.search.limit);
            let scope = facets::apply_filter(&assets, filter.as_ref());
            let terms = match query {
                Some(q) => facets::suggest(scope, &q, limit),
                None => facets::rank_search_terms(scope, limit),
            };
            output::print_search_terms(&terms);
        }
        Command::Filter { filter } => {
            let filter = parse_filter_arg(&filter)?;
            let config = config::load_config(&root)?;
            let assets = load_assets(&root, &config)?;
            let matches = facets::apply_filter(&assets, filter.as_ref());
            output::print_filter_results(filter.as_ref(), &matches, assets.len());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}

/// Stderr logging, filtered by `STATIC_DAM_LOG` (default `warn`).
fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_assets(
    root: &Path,
    config: &config::DamConfig,
) -> Result<Vec<static_dam::types::AssetRecord>, manifest::ManifestError> {
    let path = config.output_path(root);
    tracing::debug!(path = %path.display(), "loading manifest");
    manifest::load_manifest(&path)
}

/// URL paths decode leniently (unknown paths mean "all"); `facet:value`
/// arguments must name a known facet and a value.
fn parse_filter_arg(arg: &str) -> Result<Option<Filter>, String> {
    if arg.starts_with('/') {
        return Ok(facets::url_to_filter(arg));
    }
    Filter::parse(arg)
        .map(Some)
        .ok_or_else(|| format!("invalid filter '{arg}': expected <facet>:<value> or /<facet>/<value>"))
}
