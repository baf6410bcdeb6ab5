//! Cluster composition against labeled MNI atlases
//!
//! Maps every coordinate of a cluster onto the voxel grid of each requested
//! atlas, names the region it lands in (or `NULL`), and reports how many
//! coordinates fall in each region, sorted by count.
//!
//! # Example
//! ```no_run
//! use cluster_atlas::AtlasRegistry;
//! use cluster_composition::{compute_composition, Cluster};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = AtlasRegistry::load_dir("atlases")?;
//! let cluster = Cluster::from_points([[-22.0, 8.0, 56.0], [-20.0, 10.0, 54.0]])?;
//!
//! let result = compute_composition(&registry, &cluster, Some(&["aal"][..]))?;
//! for row in result.get("aal.cluster.composition").into_iter().flatten() {
//!     println!("{}: {} ({}%)", row.label, row.count, row.percentage);
//! }
//! # Ok(())
//! # }
//! ```

pub mod aggregator;
pub mod coordinate;
pub mod label;
pub mod resolver;
pub mod table;

pub use aggregator::{
    composition_key, compute_composition, AtlasComposition, CompositionConfig, CompositionEngine,
    CompositionResult, UnknownAtlasError, COMPOSITION_KEY_SUFFIX,
};
pub use coordinate::{Cluster, ClusterError, Coordinate};
pub use label::{RegionLabel, NULL_LABEL};
pub use resolver::{resolve_coordinate, CoordinateResolver};
pub use table::{
    composition_percentage, FrequencyRow, FrequencyTable, COUNT_COLUMN, PERCENTAGE_COLUMN,
};
