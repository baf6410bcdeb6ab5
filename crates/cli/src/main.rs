//! Cluster Composition CLI - atlas region breakdown of MNI coordinate clusters
//!
//! Reports, for each requested atlas, how many coordinates of a cluster fall
//! into each anatomical region.

use anyhow::{bail, Context as _, Result};
use clap::{Parser, Subcommand};
use cluster_composition_cli::config::{default_config_path, load_config, Config};
use rayon::ThreadPoolBuilder;
use std::path::PathBuf;
use tracing::{warn, Level};
use tracing_subscriber::FmtSubscriber;

mod commands;

use commands::atlases::AtlasesCommand;
use commands::compose::ComposeCommand;
use commands::example::ExampleCommand;
use commands::GlobalOptions;

#[derive(Parser)]
#[command(
    name = "cluster-composition",
    version,
    about = "Anatomical composition of MNI coordinate clusters",
    long_about = "Resolve every coordinate of a cluster against labeled brain atlases and\n\
                  report how many coordinates fall in each region, sorted by count.\n\
                  Coordinates outside every labeled region are reported as NULL.",
    after_help = "EXAMPLES:\n  \
                  # List loaded atlases\n  \
                  cluster-composition --atlas-dir ./atlases atlases\n\n  \
                  # Composition of a coordinate file against every atlas\n  \
                  cluster-composition --atlas-dir ./atlases compose peaks.csv\n\n  \
                  # Selected atlases, inline coordinates, JSON output\n  \
                  cluster-composition compose --atlas aal --atlas ba \\\n      \
                  --coord -22,8,56 --coord -20,10,54 --format json\n\n  \
                  # Write an example cluster and analyse it\n  \
                  cluster-composition example --count 50 --center -40,20,30 -o example.csv\n  \
                  cluster-composition compose example.csv"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Directory containing atlas manifests (*.yaml)
    #[arg(long, global = true, env = "CLUSTER_ATLAS_DIR", value_name = "DIR")]
    atlas_dir: Option<PathBuf>,

    /// Configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Region composition of a cluster for one or more atlases
    Compose(ComposeCommand),

    /// List loaded atlases
    Atlases(AtlasesCommand),

    /// Write a reproducible example cluster as CSV
    Example(ExampleCommand),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Keep listing output quiet; logs go to stderr so stdout stays parseable
    let log_level = if cli.verbose {
        Level::DEBUG
    } else {
        match &cli.command {
            Commands::Atlases(_) => Level::WARN,
            _ => Level::INFO,
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set tracing subscriber")?;

    let config = resolve_config(cli.config.as_deref())?;
    configure_thread_pool(&config);

    let globals = GlobalOptions {
        atlas_dir: cli.atlas_dir.or_else(|| config.atlas_dir()),
        config,
    };

    match cli.command {
        Commands::Compose(cmd) => cmd.execute(&globals),
        Commands::Atlases(cmd) => cmd.execute(&globals),
        Commands::Example(cmd) => cmd.execute(),
    }
}

/// An explicit config path must exist; the default location is optional
fn resolve_config(explicit: Option<&std::path::Path>) -> Result<Config> {
    match explicit {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            load_config(path)
        }
        None => match default_config_path() {
            Ok(path) => load_config(&path),
            Err(e) => {
                warn!("Using default configuration: {e:#}");
                Ok(Config::default())
            }
        },
    }
}

/// Size the global rayon pool from CLUSTER_COMPOSITION_THREADS or the config
fn configure_thread_pool(config: &Config) {
    let threads = std::env::var("CLUSTER_COMPOSITION_THREADS")
        .ok()
        .and_then(|value| value.parse::<usize>().ok())
        .or_else(|| config.threads());

    if let Some(num_threads) = threads {
        ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build_global()
            .ok(); // Ignore error if already initialized
    }
}
