//! Shared atlas registry loading for subcommands

use super::GlobalOptions;
use anyhow::{Context as _, Result};
use cluster_atlas::AtlasRegistry;
use tracing::warn;

pub fn load_registry(globals: &GlobalOptions) -> Result<AtlasRegistry> {
    let dir = globals.atlas_dir.as_ref().context(
        "No atlas directory configured: pass --atlas-dir, set CLUSTER_ATLAS_DIR, \
         or set `dir` under [atlas] in the config file",
    )?;

    let registry = AtlasRegistry::load_dir(dir)
        .with_context(|| format!("Failed to load atlases from {}", dir.display()))?;

    if registry.is_empty() {
        warn!("No atlas manifests found in {}", dir.display());
    }
    Ok(registry)
}
