//! Cluster composition across one or more atlases

use cluster_atlas::{Atlas, AtlasCatalog, LabelId};
use rayon::prelude::*;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use thiserror::Error;
use tracing::debug;

use crate::coordinate::{Cluster, Coordinate};
use crate::label::RegionLabel;
use crate::resolver::CoordinateResolver;
use crate::table::FrequencyTable;

/// Suffix appended to the atlas name to form a result key
pub const COMPOSITION_KEY_SUFFIX: &str = ".cluster.composition";

/// Result key for `atlas`, e.g. `aal.cluster.composition`
pub fn composition_key(atlas: &str) -> String {
    format!("{atlas}{COMPOSITION_KEY_SUFFIX}")
}

/// One or more requested atlases are not registered
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Unknown atlas name(s): {} (supported: {})",
    .requested_unknown_names.join(", "),
    .supported.join(", ")
)]
pub struct UnknownAtlasError {
    /// Every unrecognised name, in request order
    pub requested_unknown_names: Vec<String>,
    pub supported: Vec<String>,
}

/// Composition configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompositionConfig {
    /// Resolve atlases and coordinates on the rayon pool (default: true)
    pub parallel: bool,
    /// Minimum cluster size before coordinates are split across threads (default: 256)
    pub parallel_threshold: usize,
}

impl Default for CompositionConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 256,
        }
    }
}

/// Frequency table for one atlas
#[derive(Debug, Clone, PartialEq)]
pub struct AtlasComposition {
    pub atlas: String,
    pub table: FrequencyTable,
}

impl AtlasComposition {
    pub fn key(&self) -> String {
        composition_key(&self.atlas)
    }
}

/// Tables for every requested atlas, in request order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompositionResult {
    entries: Vec<AtlasComposition>,
}

impl CompositionResult {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AtlasComposition> {
        self.entries.iter()
    }

    /// Table by result key (`<atlas>.cluster.composition`)
    pub fn get(&self, key: &str) -> Option<&FrequencyTable> {
        let atlas = key.strip_suffix(COMPOSITION_KEY_SUFFIX)?;
        self.for_atlas(atlas)
    }

    /// Table by atlas name
    pub fn for_atlas(&self, atlas: &str) -> Option<&FrequencyTable> {
        self.entries
            .iter()
            .find(|entry| entry.atlas == atlas)
            .map(|entry| &entry.table)
    }

    /// Result keys in request order
    pub fn keys(&self) -> Vec<String> {
        self.entries.iter().map(AtlasComposition::key).collect()
    }

    pub fn into_entries(self) -> Vec<AtlasComposition> {
        self.entries
    }
}

impl<'a> IntoIterator for &'a CompositionResult {
    type Item = &'a AtlasComposition;
    type IntoIter = std::slice::Iter<'a, AtlasComposition>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Serialized as an ordered map `key -> table`
impl Serialize for CompositionResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for entry in &self.entries {
            map.serialize_entry(&entry.key(), &entry.table)?;
        }
        map.end()
    }
}

/// Computes cluster compositions against a catalog of atlases
pub struct CompositionEngine<'a, C: AtlasCatalog + ?Sized> {
    catalog: &'a C,
    config: CompositionConfig,
}

impl<'a, C: AtlasCatalog + ?Sized> CompositionEngine<'a, C> {
    pub fn new(catalog: &'a C, config: CompositionConfig) -> Self {
        Self { catalog, config }
    }

    pub fn config(&self) -> &CompositionConfig {
        &self.config
    }

    /// Resolve requested names to atlases.
    ///
    /// `None` or an empty selection means every supported atlas. Repeated
    /// names are kept once, at their first position.
    ///
    /// # Errors
    /// Fails with every unknown name when any name is not registered.
    pub fn select_atlases(
        &self,
        atlas_names: Option<&[&str]>,
    ) -> Result<Vec<&'a Atlas>, UnknownAtlasError> {
        let supported = self.catalog.supported_atlases();
        let requested: Vec<&str> = match atlas_names {
            Some(names) if !names.is_empty() => names.to_vec(),
            _ => supported.iter().map(String::as_str).collect(),
        };

        let mut seen = Vec::with_capacity(requested.len());
        let mut unknown = Vec::new();
        for name in requested {
            if seen.contains(&name) || unknown.iter().any(|u: &String| u == name) {
                continue;
            }
            if self.catalog.contains(name) {
                seen.push(name);
            } else {
                unknown.push(name.to_string());
            }
        }

        if !unknown.is_empty() {
            return Err(UnknownAtlasError {
                requested_unknown_names: unknown,
                supported: supported.clone(),
            });
        }

        let catalog: &'a C = self.catalog;
        Ok(seen
            .into_iter()
            .filter_map(|name| catalog.atlas(name))
            .collect())
    }

    /// Composition of `cluster` for each requested atlas.
    ///
    /// # Errors
    /// [`UnknownAtlasError`] when any requested name is unregistered; no atlas
    /// is processed in that case.
    pub fn compute(
        &self,
        cluster: &Cluster,
        atlas_names: Option<&[&str]>,
    ) -> Result<CompositionResult, UnknownAtlasError> {
        let atlases = self.select_atlases(atlas_names)?;

        debug!(
            "Computing composition of {} coordinates over {} atlas(es)",
            cluster.len(),
            atlases.len()
        );

        let entries: Vec<AtlasComposition> = if self.config.parallel && atlases.len() > 1 {
            atlases
                .par_iter()
                .map(|atlas| self.compose_atlas(cluster, atlas))
                .collect()
        } else {
            atlases
                .iter()
                .map(|atlas| self.compose_atlas(cluster, atlas))
                .collect()
        };

        Ok(CompositionResult { entries })
    }

    /// Frequency table of `cluster` against a single atlas
    pub fn tabulate(&self, cluster: &Cluster, atlas: &Atlas) -> FrequencyTable {
        let resolver = CoordinateResolver::new(atlas);
        let coordinates = cluster.coordinates();

        let id_counts = if self.config.parallel && coordinates.len() >= self.config.parallel_threshold
        {
            coordinates
                .par_iter()
                .fold(HashMap::new, |counts, coordinate| {
                    tally(counts, &resolver, coordinate)
                })
                .reduce(HashMap::new, merge_counts)
        } else {
            coordinates
                .iter()
                .fold(HashMap::new(), |counts, coordinate| {
                    tally(counts, &resolver, coordinate)
                })
        };

        // Distinct ids may share a region name; tally by label
        let mut label_counts: HashMap<RegionLabel, usize> = HashMap::with_capacity(id_counts.len());
        for (id, count) in id_counts {
            let label = id
                .and_then(|id| atlas.region_name(id))
                .map_or(RegionLabel::Null, RegionLabel::region);
            *label_counts.entry(label).or_insert(0) += count;
        }

        FrequencyTable::from_counts(label_counts, cluster.len())
    }

    fn compose_atlas(&self, cluster: &Cluster, atlas: &Atlas) -> AtlasComposition {
        let table = self.tabulate(cluster, atlas);
        debug!(
            "Atlas '{}': {} distinct label(s), {} unlabeled",
            atlas.name(),
            table.len(),
            table.count_of(&RegionLabel::Null)
        );
        AtlasComposition {
            atlas: atlas.name().to_string(),
            table,
        }
    }
}

fn tally(
    mut counts: HashMap<Option<LabelId>, usize>,
    resolver: &CoordinateResolver<'_>,
    coordinate: &Coordinate,
) -> HashMap<Option<LabelId>, usize> {
    *counts.entry(resolver.resolve_id(coordinate)).or_insert(0) += 1;
    counts
}

fn merge_counts(
    mut left: HashMap<Option<LabelId>, usize>,
    right: HashMap<Option<LabelId>, usize>,
) -> HashMap<Option<LabelId>, usize> {
    for (id, count) in right {
        *left.entry(id).or_insert(0) += count;
    }
    left
}

/// Composition of `cluster` with the default [`CompositionConfig`].
///
/// `atlas_names` of `None` selects every atlas in the catalog.
pub fn compute_composition<C: AtlasCatalog + ?Sized>(
    catalog: &C,
    cluster: &Cluster,
    atlas_names: Option<&[&str]>,
) -> Result<CompositionResult, UnknownAtlasError> {
    CompositionEngine::new(catalog, CompositionConfig::default()).compute(cluster, atlas_names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cluster_atlas::{Affine, AtlasRegistry, LabelVolume};

    fn registry() -> AtlasRegistry {
        let mut volume = LabelVolume::filled([4, 4, 4], 0).unwrap();
        *volume.get_mut([1, 1, 1]).unwrap() = 1;
        *volume.get_mut([2, 2, 2]).unwrap() = 2;
        // Two ids sharing one name
        *volume.get_mut([3, 3, 3]).unwrap() = 3;
        let regions = HashMap::from([
            (1, "Region_A".to_string()),
            (2, "Region_B".to_string()),
            (3, "Region_A".to_string()),
        ]);

        let mut registry = AtlasRegistry::new();
        registry
            .register(Atlas::new("aal", volume, Affine::identity(), regions))
            .unwrap();
        registry
    }

    #[test]
    fn test_composition_key() {
        assert_eq!(composition_key("ba"), "ba.cluster.composition");
    }

    #[test]
    fn test_shared_region_names_merge() {
        let registry = registry();
        let cluster = Cluster::from_points([[1.0, 1.0, 1.0], [3.0, 3.0, 3.0], [2.0, 2.0, 2.0]]).unwrap();
        let result = compute_composition(&registry, &cluster, Some(&["aal"][..])).unwrap();
        let table = result.get("aal.cluster.composition").unwrap();
        assert_eq!(table.count_of(&RegionLabel::region("Region_A")), 2);
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_duplicate_names_processed_once() {
        let registry = registry();
        let cluster = Cluster::from_points([[1.0, 1.0, 1.0]]).unwrap();
        let result = compute_composition(&registry, &cluster, Some(&["aal", "aal"][..])).unwrap();
        assert_eq!(result.keys(), vec!["aal.cluster.composition"]);
    }

    #[test]
    fn test_empty_selection_means_all() {
        let registry = registry();
        let cluster = Cluster::from_points([[1.0, 1.0, 1.0]]).unwrap();
        let result = compute_composition(&registry, &cluster, Some(&[][..])).unwrap();
        assert_eq!(result.keys(), vec!["aal.cluster.composition"]);
    }

    #[test]
    fn test_unknown_error_message() {
        let registry = registry();
        let cluster = Cluster::from_points([[1.0, 1.0, 1.0]]).unwrap();
        let err = compute_composition(&registry, &cluster, Some(&["xyz", "aal", "foo", "xyz"][..]))
            .unwrap_err();
        assert_eq!(err.requested_unknown_names, vec!["xyz", "foo"]);
        assert_eq!(
            err.to_string(),
            "Unknown atlas name(s): xyz, foo (supported: aal)"
        );
    }
}
