//! Configuration loading for cluster-composition.

use anyhow::{Context, Result};
use cluster_composition::CompositionConfig;
use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Default, Clone)]
pub struct Config {
    pub atlas: Option<AtlasConfig>,
    pub compute: Option<ComputeConfig>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct AtlasConfig {
    /// Directory of atlas manifests
    pub dir: Option<PathBuf>,
    /// Atlases used when none are requested explicitly
    pub default: Option<Vec<String>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ComputeConfig {
    pub parallel: Option<bool>,
    pub parallel_threshold: Option<usize>,
    pub threads: Option<usize>,
}

impl Config {
    pub fn atlas_dir(&self) -> Option<PathBuf> {
        self.atlas.as_ref().and_then(|atlas| atlas.dir.clone())
    }

    /// Configured default atlas selection; empty means every loaded atlas
    pub fn default_atlases(&self) -> Vec<String> {
        self.atlas
            .as_ref()
            .and_then(|atlas| atlas.default.clone())
            .unwrap_or_default()
    }

    pub fn threads(&self) -> Option<usize> {
        self.compute.as_ref().and_then(|compute| compute.threads)
    }

    /// Composition settings, falling back to [`CompositionConfig::default`]
    pub fn composition_config(&self) -> CompositionConfig {
        let defaults = CompositionConfig::default();
        let compute = self.compute.as_ref();
        CompositionConfig {
            parallel: compute
                .and_then(|c| c.parallel)
                .unwrap_or(defaults.parallel),
            parallel_threshold: compute
                .and_then(|c| c.parallel_threshold)
                .unwrap_or(defaults.parallel_threshold),
        }
    }
}

pub fn default_config_path() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("", "", "cluster-composition")
        .context("Could not determine config directory")?;
    Ok(dirs.config_dir().join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
    let config: Config =
        toml::from_str(&contents).context("Failed to parse config file as TOML")?;
    Ok(config)
}
