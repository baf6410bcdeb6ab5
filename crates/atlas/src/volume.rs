//! Labeled voxel volumes

use ndarray::{Array3, ShapeBuilder};
use serde::{Deserialize, Serialize};

use crate::affine::VoxelIndex;
use crate::error::{AtlasError, Result};

/// Integer region id stored in a label volume
pub type LabelId = i32;

/// On-disk voxel encoding (always little-endian)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoxelType {
    U8,
    U16,
    I16,
    I32,
}

impl VoxelType {
    /// Bytes per voxel
    pub const fn size(self) -> usize {
        match self {
            VoxelType::U8 => 1,
            VoxelType::U16 | VoxelType::I16 => 2,
            VoxelType::I32 => 4,
        }
    }

    fn decode(self, bytes: &[u8]) -> Vec<LabelId> {
        match self {
            VoxelType::U8 => bytes.iter().map(|&b| LabelId::from(b)).collect(),
            VoxelType::U16 => bytes
                .chunks_exact(2)
                .map(|c| LabelId::from(u16::from_le_bytes([c[0], c[1]])))
                .collect(),
            VoxelType::I16 => bytes
                .chunks_exact(2)
                .map(|c| LabelId::from(i16::from_le_bytes([c[0], c[1]])))
                .collect(),
            VoxelType::I32 => bytes
                .chunks_exact(4)
                .map(|c| i32::from_le_bytes([c[0], c[1], c[2], c[3]]))
                .collect(),
        }
    }
}

/// Axis ordering of raw voxel data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoxelOrder {
    /// First axis varies fastest (NIfTI layout)
    #[default]
    Fortran,
    /// Last axis varies fastest
    C,
}

/// A 3D grid of region ids indexed by (i, j, k)
#[derive(Debug, Clone, PartialEq)]
pub struct LabelVolume {
    data: Array3<LabelId>,
}

impl LabelVolume {
    /// Wrap an existing array. Every axis must be non-empty.
    pub fn new(data: Array3<LabelId>) -> Result<Self> {
        if data.shape().iter().any(|&d| d == 0) {
            return Err(AtlasError::InvalidShape(format!(
                "every axis must be non-empty, got {:?}",
                data.shape()
            )));
        }
        Ok(Self { data })
    }

    /// Volume of the given shape filled with one label
    pub fn filled(shape: [usize; 3], label: LabelId) -> Result<Self> {
        Self::new(Array3::from_elem((shape[0], shape[1], shape[2]), label))
    }

    /// Decode raw little-endian voxel bytes.
    ///
    /// # Errors
    /// Fails when the byte length does not match `shape` and `dtype`.
    pub fn from_raw(
        bytes: &[u8],
        shape: [usize; 3],
        dtype: VoxelType,
        order: VoxelOrder,
    ) -> Result<Self> {
        let expected = shape
            .iter()
            .try_fold(dtype.size(), |acc, &d| acc.checked_mul(d))
            .ok_or_else(|| AtlasError::InvalidShape(format!("{:?} overflows", shape)))?;

        if bytes.len() != expected {
            return Err(AtlasError::VolumeSizeMismatch {
                expected,
                actual: bytes.len(),
            });
        }

        let labels = dtype.decode(bytes);
        let dims = (shape[0], shape[1], shape[2]);
        let data = match order {
            VoxelOrder::Fortran => Array3::from_shape_vec(dims.f(), labels),
            VoxelOrder::C => Array3::from_shape_vec(dims, labels),
        }
        .map_err(|e| AtlasError::InvalidShape(e.to_string()))?;

        Self::new(data)
    }

    pub fn shape(&self) -> [usize; 3] {
        let s = self.data.shape();
        [s[0], s[1], s[2]]
    }

    /// Whether `voxel` lies inside `[0, dim)` on every axis
    #[inline]
    pub fn contains(&self, voxel: VoxelIndex) -> bool {
        self.index(voxel).is_some()
    }

    /// Label id at `voxel`, or `None` when it lies outside the volume
    #[inline]
    pub fn get(&self, voxel: VoxelIndex) -> Option<LabelId> {
        self.index(voxel).map(|idx| self.data[idx])
    }

    /// Mutable access for building synthetic volumes
    pub fn get_mut(&mut self, voxel: VoxelIndex) -> Option<&mut LabelId> {
        let idx = self.index(voxel)?;
        Some(&mut self.data[idx])
    }

    pub fn data(&self) -> &Array3<LabelId> {
        &self.data
    }

    fn index(&self, voxel: VoxelIndex) -> Option<(usize, usize, usize)> {
        let shape = self.data.shape();
        let mut idx = [0usize; 3];
        for axis in 0..3 {
            let v = usize::try_from(voxel[axis]).ok()?;
            if v >= shape[axis] {
                return None;
            }
            idx[axis] = v;
        }
        Some((idx[0], idx[1], idx[2]))
    }
}
