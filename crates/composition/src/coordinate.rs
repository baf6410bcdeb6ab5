//! MNI coordinates and clusters

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A point in MNI space, in millimetres
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Coordinate {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<[f64; 3]> for Coordinate {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self { x, y, z }
    }
}

impl From<(f64, f64, f64)> for Coordinate {
    fn from((x, y, z): (f64, f64, f64)) -> Self {
        Self { x, y, z }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    #[error("A cluster must contain at least one coordinate")]
    Empty,
}

/// Non-empty set of coordinates analysed together.
///
/// The coordinate count is the denominator of every percentage.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cluster {
    coordinates: Vec<Coordinate>,
}

impl Cluster {
    /// # Errors
    /// Returns [`ClusterError::Empty`] for an empty coordinate list.
    pub fn new(coordinates: Vec<Coordinate>) -> Result<Self, ClusterError> {
        if coordinates.is_empty() {
            return Err(ClusterError::Empty);
        }
        Ok(Self { coordinates })
    }

    pub fn from_points<P: Into<Coordinate>>(
        points: impl IntoIterator<Item = P>,
    ) -> Result<Self, ClusterError> {
        Self::new(points.into_iter().map(Into::into).collect())
    }

    /// Number of coordinates (always at least one)
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }

    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coordinate> {
        self.coordinates.iter()
    }
}

impl TryFrom<Vec<Coordinate>> for Cluster {
    type Error = ClusterError;

    fn try_from(coordinates: Vec<Coordinate>) -> Result<Self, Self::Error> {
        Self::new(coordinates)
    }
}

impl<'a> IntoIterator for &'a Cluster {
    type Item = &'a Coordinate;
    type IntoIter = std::slice::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.coordinates.iter()
    }
}
