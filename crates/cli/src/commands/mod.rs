//! Subcommand implementations

pub mod atlases;
pub mod compose;
pub mod example;
pub mod registry_helper;

use cluster_composition_cli::Config;
use std::path::PathBuf;

/// Options shared by every subcommand, after merging flags and config
pub struct GlobalOptions {
    pub atlas_dir: Option<PathBuf>,
    pub config: Config,
}
