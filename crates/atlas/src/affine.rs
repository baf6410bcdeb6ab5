//! World (MNI millimetre) to voxel index mapping

use serde::{Deserialize, Serialize};

use crate::error::{AtlasError, Result};

/// Integer voxel index (i, j, k). Signed so that out-of-volume coordinates
/// stay representable until the bounds check.
pub type VoxelIndex = [i64; 3];

/// Smallest determinant accepted when inverting a voxel-to-world matrix
const SINGULAR_EPSILON: f64 = 1e-12;

/// Linear affine transform mapping world coordinates to fractional voxel
/// coordinates.
///
/// Stored as the top three rows of a homogeneous 4x4 matrix; the implicit
/// last row is `[0, 0, 0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Affine {
    rows: [[f64; 4]; 3],
}

impl Affine {
    /// Build from a matrix that already maps world to voxel space.
    pub const fn world_to_voxel(rows: [[f64; 4]; 3]) -> Self {
        Self { rows }
    }

    /// Build from a voxel-to-world matrix (the NIfTI `sform` convention) by
    /// inverting it.
    ///
    /// # Errors
    /// Returns [`AtlasError::SingularAffine`] when the linear part cannot be
    /// inverted.
    pub fn from_voxel_to_world(rows: [[f64; 4]; 3]) -> Result<Self> {
        let m = [
            [rows[0][0], rows[0][1], rows[0][2]],
            [rows[1][0], rows[1][1], rows[1][2]],
            [rows[2][0], rows[2][1], rows[2][2]],
        ];
        let t = [rows[0][3], rows[1][3], rows[2][3]];

        let det = m[0][0] * (m[1][1] * m[2][2] - m[1][2] * m[2][1])
            - m[0][1] * (m[1][0] * m[2][2] - m[1][2] * m[2][0])
            + m[0][2] * (m[1][0] * m[2][1] - m[1][1] * m[2][0]);

        if !det.is_finite() || det.abs() < SINGULAR_EPSILON {
            return Err(AtlasError::SingularAffine);
        }

        let inv_det = 1.0 / det;
        let inv = [
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) * inv_det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) * inv_det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) * inv_det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) * inv_det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) * inv_det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) * inv_det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) * inv_det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) * inv_det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) * inv_det,
            ],
        ];

        let mut out = [[0.0; 4]; 3];
        for (i, row) in inv.iter().enumerate() {
            out[i][..3].copy_from_slice(row);
            out[i][3] = -(row[0] * t[0] + row[1] * t[1] + row[2] * t[2]);
        }

        Ok(Self { rows: out })
    }

    /// Parse a 3x4 or 4x4 row list. A 4x4 matrix must have `[0, 0, 0, 1]`
    /// as its last row.
    pub fn rows_from_slice(rows: &[Vec<f64>]) -> Result<[[f64; 4]; 3]> {
        if rows.len() != 3 && rows.len() != 4 {
            return Err(AtlasError::InvalidAffine(format!(
                "expected 3 or 4 rows, got {}",
                rows.len()
            )));
        }

        let mut out = [[0.0; 4]; 3];
        for (i, row) in rows.iter().enumerate() {
            if row.len() != 4 {
                return Err(AtlasError::InvalidAffine(format!(
                    "row {} has {} columns, expected 4",
                    i,
                    row.len()
                )));
            }
            if row.iter().any(|v| !v.is_finite()) {
                return Err(AtlasError::InvalidAffine(format!(
                    "row {} contains a non-finite value",
                    i
                )));
            }
            if i < 3 {
                out[i].copy_from_slice(row);
            } else if row[..] != [0.0, 0.0, 0.0, 1.0] {
                return Err(AtlasError::InvalidAffine(format!(
                    "last row must be [0, 0, 0, 1], got {:?}",
                    row
                )));
            }
        }

        Ok(out)
    }

    /// Identity mapping (world millimetres are voxel indices).
    pub const fn identity() -> Self {
        Self {
            rows: [
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
            ],
        }
    }

    pub fn rows(&self) -> &[[f64; 4]; 3] {
        &self.rows
    }

    /// Map a world coordinate to fractional voxel coordinates.
    #[inline]
    pub fn apply(&self, point: [f64; 3]) -> [f64; 3] {
        let mut out = [0.0; 3];
        for (o, row) in out.iter_mut().zip(self.rows.iter()) {
            *o = row[0] * point[0] + row[1] * point[1] + row[2] * point[2] + row[3];
        }
        out
    }

    /// Map a world coordinate to the nearest voxel index, rounding half away
    /// from zero. Returns `None` when any component is not finite.
    #[inline]
    pub fn voxel_index(&self, point: [f64; 3]) -> Option<VoxelIndex> {
        let v = self.apply(point);
        let mut index = [0i64; 3];
        for (i, c) in v.iter().enumerate() {
            let rounded = c.round();
            if !rounded.is_finite() {
                return None;
            }
            // Saturating cast; anything this large is outside every volume anyway
            index[i] = rounded as i64;
        }
        Some(index)
    }
}

impl Default for Affine {
    fn default() -> Self {
        Self::identity()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// MNI152 2mm template sform
    const MNI_2MM: [[f64; 4]; 3] = [
        [-2.0, 0.0, 0.0, 90.0],
        [0.0, 2.0, 0.0, -126.0],
        [0.0, 0.0, 2.0, -72.0],
    ];

    #[test]
    fn test_identity_rounding() {
        let affine = Affine::identity();
        assert_eq!(affine.voxel_index([1.4, 1.5, -1.5]), Some([1, 2, -2]));
        assert_eq!(affine.voxel_index([2.5, -0.4, 0.0]), Some([3, 0, 0]));
    }

    #[test]
    fn test_mni_origin_maps_to_center_voxel() {
        let affine = Affine::from_voxel_to_world(MNI_2MM).unwrap();
        assert_eq!(affine.voxel_index([0.0, 0.0, 0.0]), Some([45, 63, 36]));
        assert_eq!(affine.voxel_index([90.0, -126.0, -72.0]), Some([0, 0, 0]));
    }

    #[test]
    fn test_inverse_round_trip() {
        let affine = Affine::from_voxel_to_world(MNI_2MM).unwrap();
        let v = affine.apply([-10.0, 20.0, 30.0]);
        assert!((v[0] - 50.0).abs() < 1e-9);
        assert!((v[1] - 73.0).abs() < 1e-9);
        assert!((v[2] - 51.0).abs() < 1e-9);
    }

    #[test]
    fn test_singular_matrix_rejected() {
        let rows = [
            [1.0, 0.0, 0.0, 0.0],
            [2.0, 0.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
        ];
        assert!(matches!(
            Affine::from_voxel_to_world(rows),
            Err(AtlasError::SingularAffine)
        ));
    }

    #[test]
    fn test_non_finite_point_has_no_voxel() {
        let affine = Affine::identity();
        assert_eq!(affine.voxel_index([f64::NAN, 0.0, 0.0]), None);
        assert_eq!(affine.voxel_index([0.0, f64::INFINITY, 0.0]), None);
    }

    #[test]
    fn test_rows_from_slice() {
        let rows = vec![
            vec![1.0, 0.0, 0.0, 5.0],
            vec![0.0, 1.0, 0.0, 6.0],
            vec![0.0, 0.0, 1.0, 7.0],
            vec![0.0, 0.0, 0.0, 1.0],
        ];
        let parsed = Affine::rows_from_slice(&rows).unwrap();
        assert_eq!(parsed[2], [0.0, 0.0, 1.0, 7.0]);

        let bad_last = vec![
            vec![1.0, 0.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0, 0.0],
            vec![0.0, 0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0, 1.0],
        ];
        assert!(Affine::rows_from_slice(&bad_last).is_err());
        assert!(Affine::rows_from_slice(&rows[..2]).is_err());
    }
}
