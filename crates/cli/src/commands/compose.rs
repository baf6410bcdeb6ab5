//! Composition command implementation

use super::registry_helper::load_registry;
use super::GlobalOptions;
use anyhow::{Context as _, Result};
use clap::Args;
use cluster_composition::{Cluster, CompositionEngine, Coordinate};
use cluster_composition_cli::{parse_coordinate, read_coordinates, render, OutputFormat};
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;

#[derive(Args)]
pub struct ComposeCommand {
    /// Coordinate file with x, y, z columns (CSV, or TSV by extension; `-` for stdin)
    #[arg(value_name = "FILE", required_unless_present = "coords")]
    input: Option<PathBuf>,

    /// Inline coordinate, repeatable
    #[arg(
        long = "coord",
        value_name = "X,Y,Z",
        value_parser = parse_coordinate,
        allow_hyphen_values = true
    )]
    coords: Vec<Coordinate>,

    /// Atlas to report, repeatable (default: configured default, else all loaded)
    #[arg(short, long = "atlas", value_name = "NAME")]
    atlases: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl ComposeCommand {
    pub fn execute(self, globals: &GlobalOptions) -> Result<()> {
        let mut coordinates = match &self.input {
            Some(path) => read_coordinates(path)?,
            None => Vec::new(),
        };
        coordinates.extend(self.coords.iter().copied());
        let cluster = Cluster::new(coordinates).context("No coordinates to analyse")?;

        let registry = load_registry(globals)?;

        let requested = if self.atlases.is_empty() {
            globals.config.default_atlases()
        } else {
            self.atlases.clone()
        };
        let names: Vec<&str> = requested.iter().map(String::as_str).collect();

        let engine = CompositionEngine::new(&registry, globals.config.composition_config());
        let start = Instant::now();
        let result = engine.compute(&cluster, Some(names.as_slice()))?;
        info!(
            "Resolved {} coordinates against {} atlas(es) in {:.2?}",
            cluster.len(),
            result.len(),
            start.elapsed()
        );

        let rendered = render(&result, self.format)?;
        match &self.output {
            Some(path) => {
                std::fs::write(path, &rendered)
                    .with_context(|| format!("Failed to write report: {}", path.display()))?;
                info!("Report written to {}", path.display());
            }
            None => {
                print!("{rendered}");
                if self.format == OutputFormat::Json {
                    println!();
                }
            }
        }

        Ok(())
    }
}
