use std::fmt::Display;

use itertools::Itertools;
use ndarray::{
    IxDyn,
    ShapeBuilder,
    StrideShape,
};
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::region::RegionTable;
use crate::error::{
    SlabError,
    SlabResult,
};

/// Shape of the dense output buffer, one extent per axis in caller axis
/// order (`count_sum_0, …, count_sum_{R-1}`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OutputShape(Vec<u64>);

impl OutputShape {
    pub fn new(dims: Vec<u64>) -> Self {
        Self(dims)
    }

    pub fn from_table(table: &RegionTable) -> Self {
        Self(table.count_sums())
    }

    pub fn dims(&self) -> &[u64] {
        &self.0
    }

    /// Extents in storage axis order, as the destination space is declared
    /// to the store.
    pub fn storage_dims(&self) -> Vec<u64> {
        self.0.iter().rev().copied().collect_vec()
    }

    /// Extents as `usize`, failing if one does not fit the platform.
    pub fn to_usize(&self) -> SlabResult<Vec<usize>> {
        self.0
            .iter()
            .map(|d| {
                usize::try_from(*d).map_err(|_| {
                    SlabError::overflow(format!(
                        "output extent {} does not fit the platform's address space",
                        d
                    ))
                })
            })
            .collect()
    }

    /// Column-major ndarray shape: axis 0 varies fastest in memory, which is
    /// the element order a reversed (storage-order) destination space
    /// produces.
    pub fn to_ndarray_shape(&self) -> SlabResult<StrideShape<IxDyn>> {
        Ok(IxDyn(&self.to_usize()?).f().into())
    }
}

impl Display for OutputShape {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "({})", self.0.iter().join(" x "))
    }
}

impl From<OutputShape> for Vec<u64> {
    fn from(value: OutputShape) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_dims_reversed() {
        let shape = OutputShape::new(vec![3, 1, 7]);
        assert_eq!(shape.storage_dims(), vec![7, 1, 3]);
        assert_eq!(shape.to_string(), "(3 x 1 x 7)");
    }

    #[test]
    fn test_ndarray_shape_is_fortran() {
        let shape = OutputShape::new(vec![2, 3]);
        let arr = ndarray::ArrayD::from_shape_vec(
            shape.to_ndarray_shape().unwrap(),
            (0..6).collect(),
        )
        .unwrap();
        assert_eq!(arr.shape(), &[2, 3]);
        assert_eq!(arr[[1, 0]], 1);
        assert_eq!(arr[[0, 1]], 2);
    }
}
