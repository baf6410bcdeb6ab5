//! Labeled brain atlases in MNI space
//!
//! An [`Atlas`] is a 3D volume of integer region ids, an affine mapping MNI
//! millimetre coordinates to voxel indices, and a table naming each region
//! id. Atlases are loaded once into an [`AtlasRegistry`] and shared read-only.
//!
//! # Example
//! ```no_run
//! use cluster_atlas::{AtlasCatalog, AtlasRegistry};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = AtlasRegistry::load_dir("atlases")?;
//! for name in registry.supported_atlases() {
//!     println!("{name}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod affine;
pub mod atlas;
pub mod error;
pub mod loader;
pub mod registry;
pub mod volume;

pub use affine::{Affine, VoxelIndex};
pub use atlas::{Atlas, DEFAULT_BACKGROUND_LABEL};
pub use error::{AtlasError, Result};
pub use loader::{load_atlas, read_label_table, AffineDirection, AtlasManifest, VolumeSection};
pub use registry::{AtlasCatalog, AtlasRegistry};
pub use volume::{LabelId, LabelVolume, VoxelOrder, VoxelType};
