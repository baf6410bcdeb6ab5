//! Atlas registry and lookup

use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info};

use crate::affine::{Affine, VoxelIndex};
use crate::atlas::Atlas;
use crate::error::{AtlasError, Result};
use crate::loader::{load_atlas, MANIFEST_EXTENSIONS};
use crate::volume::LabelId;

/// Read-only view over a set of named atlases.
///
/// Implementations must be safe for unsynchronized concurrent reads.
pub trait AtlasCatalog: Send + Sync {
    /// Atlas names in registration order
    fn supported_atlases(&self) -> Vec<String>;

    fn atlas(&self, name: &str) -> Option<&Atlas>;

    fn contains(&self, name: &str) -> bool {
        self.atlas(name).is_some()
    }

    /// World to voxel transform for `name`
    fn resolve_affine(&self, name: &str) -> Option<&Affine> {
        self.atlas(name).map(Atlas::affine)
    }

    /// Label id at `voxel`; `None` for unknown atlases and out-of-volume voxels
    fn label_at(&self, name: &str, voxel: VoxelIndex) -> Option<LabelId> {
        self.atlas(name)?.label_at(voxel)
    }

    /// Region name for `id`; `None` when unmapped
    fn region_name(&self, name: &str, id: LabelId) -> Option<&str> {
        self.atlas(name)?.region_name(id)
    }
}

/// Registry of atlases, built once and then shared immutably
#[derive(Debug, Clone, Default)]
pub struct AtlasRegistry {
    atlases: HashMap<String, Atlas>,
    order: Vec<String>,
}

impl AtlasRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an atlas under its own name.
    ///
    /// # Errors
    /// Returns [`AtlasError::DuplicateAtlas`] if the name is taken.
    pub fn register(&mut self, atlas: Atlas) -> Result<()> {
        let name = atlas.name().to_string();
        if self.atlases.contains_key(&name) {
            return Err(AtlasError::DuplicateAtlas(name));
        }

        debug!(
            "Registering atlas '{}' ({:?} voxels, {} regions)",
            name,
            atlas.volume().shape(),
            atlas.region_count()
        );

        self.order.push(name.clone());
        self.atlases.insert(name, atlas);
        Ok(())
    }

    /// Load every atlas manifest in `dir`, in file name order.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir).map_err(|source| AtlasError::Io {
            path: dir.to_path_buf(),
            source,
        })?;

        let mut manifests = Vec::new();
        for entry in entries {
            let path = entry
                .map_err(|source| AtlasError::Io {
                    path: dir.to_path_buf(),
                    source,
                })?
                .path();
            let is_manifest = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext));
            if is_manifest && path.is_file() {
                manifests.push(path);
            }
        }
        manifests.sort();

        let mut registry = Self::new();
        for manifest in &manifests {
            registry.register(load_atlas(manifest)?)?;
        }

        info!(
            "Loaded {} atlas(es) from {}: {}",
            registry.len(),
            dir.display(),
            registry.order.join(", ")
        );
        Ok(registry)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Atlases in registration order
    pub fn iter(&self) -> impl Iterator<Item = &Atlas> {
        self.order
            .iter()
            .filter_map(|name| self.atlases.get(name))
    }
}

impl AtlasCatalog for AtlasRegistry {
    fn supported_atlases(&self) -> Vec<String> {
        self.order.clone()
    }

    fn atlas(&self, name: &str) -> Option<&Atlas> {
        self.atlases.get(name)
    }
}
