//! Loading atlases from YAML manifests
//!
//! A manifest points at a raw label volume and a CSV label table, both
//! resolved relative to the manifest's directory:
//!
//! ```yaml
//! name: aal
//! description: Automated Anatomical Labeling
//! volume:
//!   file: aal.raw
//!   shape: [91, 109, 91]
//!   dtype: i16
//!   order: fortran
//! affine:
//!   - [-2.0, 0.0, 0.0, 90.0]
//!   - [0.0, 2.0, 0.0, -126.0]
//!   - [0.0, 0.0, 2.0, -72.0]
//! labels: aal.csv
//! background: 0
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::affine::Affine;
use crate::atlas::{Atlas, DEFAULT_BACKGROUND_LABEL};
use crate::error::{AtlasError, Result};
use crate::volume::{LabelId, LabelVolume, VoxelOrder, VoxelType};

/// File extensions recognised as atlas manifests
pub const MANIFEST_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Which direction the manifest affine maps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AffineDirection {
    #[default]
    VoxelToWorld,
    WorldToVoxel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeSection {
    pub file: PathBuf,
    pub shape: [usize; 3],
    pub dtype: VoxelType,
    #[serde(default)]
    pub order: VoxelOrder,
}

/// On-disk description of one atlas
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AtlasManifest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub volume: VolumeSection,
    pub affine: Vec<Vec<f64>>,
    #[serde(default)]
    pub affine_direction: AffineDirection,
    pub labels: PathBuf,
    #[serde(default = "default_background")]
    pub background: LabelId,
}

fn default_background() -> LabelId {
    DEFAULT_BACKGROUND_LABEL
}

impl AtlasManifest {
    /// Parse a manifest file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| AtlasError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let manifest: AtlasManifest =
            serde_yaml::from_str(&contents).map_err(|source| AtlasError::Manifest {
                path: path.to_path_buf(),
                source,
            })?;

        if manifest.name.trim().is_empty() {
            return Err(AtlasError::InvalidManifest(format!(
                "{}: atlas name must not be empty",
                path.display()
            )));
        }
        Ok(manifest)
    }

    /// World to voxel transform described by the manifest
    pub fn world_to_voxel(&self) -> Result<Affine> {
        let rows = Affine::rows_from_slice(&self.affine)?;
        match self.affine_direction {
            AffineDirection::VoxelToWorld => Affine::from_voxel_to_world(rows),
            AffineDirection::WorldToVoxel => Ok(Affine::world_to_voxel(rows)),
        }
    }
}

/// Load the atlas described by the manifest at `manifest_path`
pub fn load_atlas(manifest_path: impl AsRef<Path>) -> Result<Atlas> {
    let manifest_path = manifest_path.as_ref();
    let manifest = AtlasManifest::from_path(manifest_path)?;
    let base = manifest_path.parent().unwrap_or_else(|| Path::new("."));

    let affine = manifest.world_to_voxel()?;

    let volume_path = base.join(&manifest.volume.file);
    let bytes = std::fs::read(&volume_path).map_err(|source| AtlasError::Io {
        path: volume_path.clone(),
        source,
    })?;
    let volume = LabelVolume::from_raw(
        &bytes,
        manifest.volume.shape,
        manifest.volume.dtype,
        manifest.volume.order,
    )?;
    debug!(
        "Read {} volume {:?} from {}",
        manifest.name,
        manifest.volume.shape,
        volume_path.display()
    );

    let regions = read_label_table(base.join(&manifest.labels))?;

    info!(
        "Loaded atlas '{}' ({} regions)",
        manifest.name,
        regions.len()
    );

    let mut atlas = Atlas::new(manifest.name, volume, affine, regions)
        .with_background(manifest.background);
    if let Some(description) = manifest.description {
        atlas = atlas.with_description(description);
    }
    Ok(atlas)
}

#[derive(Debug, Deserialize)]
struct LabelRecord {
    id: LabelId,
    name: String,
}

/// Read a CSV label table with header `id,name`.
///
/// # Errors
/// Duplicate ids and blank names are rejected.
pub fn read_label_table(path: impl AsRef<Path>) -> Result<HashMap<LabelId, String>> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_path(path)
        .map_err(|source| AtlasError::LabelTable {
            path: path.to_path_buf(),
            source,
        })?;

    let mut regions = HashMap::new();
    for record in reader.deserialize::<LabelRecord>() {
        let record = record.map_err(|source| AtlasError::LabelTable {
            path: path.to_path_buf(),
            source,
        })?;

        if record.name.is_empty() {
            return Err(AtlasError::EmptyRegionName { id: record.id });
        }
        if regions.insert(record.id, record.name).is_some() {
            return Err(AtlasError::DuplicateLabel { id: record.id });
        }
    }

    Ok(regions)
}
