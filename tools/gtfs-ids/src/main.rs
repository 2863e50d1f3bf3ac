use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use gtfs_structures::Gtfs;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn, Level};
use transit_ids::prelude::*;

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Snapshot {
    /// Earlier tables (single suffix group, narrower bands)
    Baseline,
    /// Current tables
    Extended,
}

#[derive(Parser, Debug)]
#[command(
    name = "gtfs-ids",
    author,
    version,
    about = "Derive schedule database identifiers from a GTFS feed",
    long_about = "Reads a GTFS feed and derives a numeric ID for every stop and a \
                  normalized key for every route, then writes the mapping as JSON.\n\n\
                  Any stop that cannot be resolved aborts the run without output. \
                  The error names the offending record so the band or special-case \
                  table can be extended."
)]
struct Args {
    /// GTFS feed (directory or zip archive)
    #[arg(short, long)]
    feed: PathBuf,

    /// JSON configuration file; replaces the compiled-in snapshot
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Compiled-in tables to use when no configuration file is given
    #[arg(long, value_enum, default_value = "extended")]
    snapshot: Snapshot,

    /// Write the identifier map here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbose output (show debug messages)
    #[arg(short, long)]
    verbose: bool,
}

fn load_config(args: &Args) -> Result<AgencyConfig> {
    if let Some(path) = &args.config {
        info!("Configuration: {}", path.display());
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read configuration {}", path.display()))?;
        return AgencyConfig::from_json_str(&json).context("Invalid configuration");
    }

    info!("Configuration: {:?} snapshot", args.snapshot);
    let config = match args.snapshot {
        Snapshot::Baseline => AgencyConfig::baseline(),
        Snapshot::Extended => AgencyConfig::extended(),
    };
    config.context("Invalid compiled-in configuration")
}

fn write_output(converted: &ConvertedFeed, output: Option<&Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(converted).context("Failed to serialize identifiers")?;
    match output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("=== GTFS Identifier Conversion ===");
    info!("Feed: {}", args.feed.display());

    if !args.feed.exists() {
        bail!("Feed does not exist: {}", args.feed.display());
    }

    let config = load_config(&args)?;
    let table = config.stops().table();
    info!(
        "  {} stop ID bands, {} special cases",
        table.bands().len(),
        table.special_case_count()
    );
    for (shorter, longer) in table.nested_prefixes() {
        warn!(
            "  Prefix {:?} nests inside {:?}; {:?} is matched first",
            shorter.prefix, longer.prefix, longer.prefix
        );
    }

    let gtfs = Gtfs::from_path(&args.feed).context("Failed to read GTFS feed")?;
    info!(
        "  Read {} stops, {} routes, {} trips",
        gtfs.stops.len(),
        gtfs.routes.len(),
        gtfs.trips.len()
    );

    let converter = FeedConverter::new(Arc::new(config));
    let converted = converter
        .convert_gtfs(&gtfs)
        .context("Identifier conversion aborted; no output written")?;

    for (id, raws) in converted.merged_routes() {
        debug!("  Route {} merges {}", id, raws.join(", "));
    }

    write_output(&converted, args.output.as_deref())
}
