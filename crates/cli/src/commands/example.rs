//! Example cluster command

use anyhow::{Context as _, Result};
use clap::Args;
use cluster_composition::Coordinate;
use cluster_composition_cli::{generate_example, parse_coordinate, write_csv, ExampleOptions};
use std::path::PathBuf;
use tracing::info;

#[derive(Args)]
pub struct ExampleCommand {
    /// Number of coordinates
    #[arg(short = 'n', long, default_value = "20")]
    count: usize,

    /// Random seed
    #[arg(long, default_value = "42")]
    seed: u64,

    /// Sample within a sphere around this point instead of the MNI bounding box
    #[arg(
        long,
        value_name = "X,Y,Z",
        value_parser = parse_coordinate,
        allow_hyphen_values = true
    )]
    center: Option<Coordinate>,

    /// Sphere radius in millimetres (with --center)
    #[arg(long, default_value = "10.0")]
    radius: f64,

    /// Output file (default: stdout)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,
}

impl ExampleCommand {
    pub fn execute(self) -> Result<()> {
        let options = ExampleOptions {
            count: self.count,
            seed: self.seed,
            center: self.center,
            radius: self.radius,
        };
        let coordinates = generate_example(&options)?;

        match &self.output {
            Some(path) => {
                let file = std::fs::File::create(path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                write_csv(&coordinates, file)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                info!("Wrote {} coordinates to {}", coordinates.len(), path.display());
            }
            None => write_csv(&coordinates, std::io::stdout().lock())
                .context("Failed to write coordinates")?,
        }

        Ok(())
    }
}
