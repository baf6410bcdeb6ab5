//! A single labeled atlas

use std::collections::HashMap;

use crate::affine::{Affine, VoxelIndex};
use crate::volume::{LabelId, LabelVolume};

/// Label id conventionally used for background / unlabeled voxels
pub const DEFAULT_BACKGROUND_LABEL: LabelId = 0;

/// Immutable labeled volume plus the metadata needed to resolve world
/// coordinates against it.
#[derive(Debug, Clone)]
pub struct Atlas {
    name: String,
    description: Option<String>,
    volume: LabelVolume,
    affine: Affine,
    regions: HashMap<LabelId, String>,
    background: LabelId,
}

impl Atlas {
    pub fn new(
        name: impl Into<String>,
        volume: LabelVolume,
        affine: Affine,
        regions: HashMap<LabelId, String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: None,
            volume,
            affine,
            regions,
            background: DEFAULT_BACKGROUND_LABEL,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn with_background(mut self, background: LabelId) -> Self {
        self.background = background;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn volume(&self) -> &LabelVolume {
        &self.volume
    }

    /// World to voxel transform
    pub fn affine(&self) -> &Affine {
        &self.affine
    }

    /// Label id meaning "no region"
    pub fn background(&self) -> LabelId {
        self.background
    }

    /// Number of named regions in the label table
    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Label id stored at `voxel`, `None` outside the volume
    #[inline]
    pub fn label_at(&self, voxel: VoxelIndex) -> Option<LabelId> {
        self.volume.get(voxel)
    }

    /// Name for `id` from the label table, `None` when unmapped
    #[inline]
    pub fn region_name(&self, id: LabelId) -> Option<&str> {
        self.regions.get(&id).map(String::as_str)
    }

    /// Label table entries sorted by id
    pub fn regions(&self) -> Vec<(LabelId, &str)> {
        let mut regions: Vec<(LabelId, &str)> = self
            .regions
            .iter()
            .map(|(&id, name)| (id, name.as_str()))
            .collect();
        regions.sort_unstable_by_key(|&(id, _)| id);
        regions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        let mut volume = LabelVolume::filled([3, 3, 3], 0).unwrap();
        *volume.get_mut([1, 1, 1]).unwrap() = 4;
        let regions = HashMap::from([(4, "Precuneus_L".to_string()), (2, "Cuneus_R".to_string())]);
        let atlas = Atlas::new("aal", volume, Affine::identity(), regions)
            .with_description("Automated Anatomical Labeling");

        assert_eq!(atlas.name(), "aal");
        assert_eq!(atlas.description(), Some("Automated Anatomical Labeling"));
        assert_eq!(atlas.background(), DEFAULT_BACKGROUND_LABEL);
        assert_eq!(atlas.label_at([1, 1, 1]), Some(4));
        assert_eq!(atlas.label_at([3, 1, 1]), None);
        assert_eq!(atlas.region_name(4), Some("Precuneus_L"));
        assert_eq!(atlas.region_name(99), None);
        assert_eq!(atlas.regions(), vec![(2, "Cuneus_R"), (4, "Precuneus_L")]);
    }
}
