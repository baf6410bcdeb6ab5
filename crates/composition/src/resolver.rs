//! Coordinate to region resolution

use cluster_atlas::{Atlas, LabelId};

use crate::coordinate::Coordinate;
use crate::label::RegionLabel;

/// Resolves world coordinates against a single atlas
#[derive(Debug, Clone, Copy)]
pub struct CoordinateResolver<'a> {
    atlas: &'a Atlas,
}

impl<'a> CoordinateResolver<'a> {
    pub fn new(atlas: &'a Atlas) -> Self {
        Self { atlas }
    }

    pub fn atlas(&self) -> &'a Atlas {
        self.atlas
    }

    /// Label id of the named region containing `coordinate`.
    ///
    /// `None` when the coordinate maps outside the volume, lands on the
    /// background label, or lands on an id missing from the label table.
    #[inline]
    pub fn resolve_id(&self, coordinate: &Coordinate) -> Option<LabelId> {
        let voxel = self.atlas.affine().voxel_index(coordinate.to_array())?;
        let id = self.atlas.label_at(voxel)?;
        if id == self.atlas.background() {
            return None;
        }
        self.atlas.region_name(id).map(|_| id)
    }

    /// Region containing `coordinate`, or [`RegionLabel::Null`]
    pub fn resolve(&self, coordinate: &Coordinate) -> RegionLabel {
        self.resolve_id(coordinate)
            .and_then(|id| self.atlas.region_name(id))
            .map_or(RegionLabel::Null, RegionLabel::region)
    }
}

/// Resolve a single coordinate against `atlas`
pub fn resolve_coordinate(atlas: &Atlas, coordinate: &Coordinate) -> RegionLabel {
    CoordinateResolver::new(atlas).resolve(coordinate)
}
