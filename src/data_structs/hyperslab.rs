use std::fmt::Display;

use itertools::Itertools;

use crate::data_structs::odometer::AxisVec;
use crate::data_structs::region::RegionTable;

/// One axis-aligned box of the array, in storage axis order: zero-based
/// `offset` and `extent` per axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Hyperslab {
    offset: AxisVec<u64>,
    extent: AxisVec<u64>,
}

impl Hyperslab {
    pub fn new(
        offset: &[u64],
        extent: &[u64],
    ) -> Self {
        assert_eq!(
            offset.len(),
            extent.len(),
            "Hyperslab offset and extent must have the same rank"
        );
        Self {
            offset: AxisVec::from_slice(offset),
            extent: AxisVec::from_slice(extent),
        }
    }

    /// A zeroed hyperslab of the given rank, to be filled with
    /// [`Hyperslab::set_from_table`].
    pub fn scratch(rank: usize) -> Self {
        Self {
            offset: smallvec::smallvec![0; rank],
            extent: smallvec::smallvec![1; rank],
        }
    }

    /// Overwrites this hyperslab with the box selected by `region_idx`.
    ///
    /// Caller axis `d` lands on storage axis `R - 1 - d`: callers name axes
    /// outermost first, the store indexes them innermost last.
    pub fn set_from_table(
        &mut self,
        table: &RegionTable,
        region_idx: &[usize],
    ) {
        let rank = table.rank();
        debug_assert_eq!(region_idx.len(), rank);
        debug_assert_eq!(self.offset.len(), rank);

        for (along, (axis, &i)) in table.axes().iter().zip(region_idx).enumerate() {
            let interval = axis.intervals()[i];
            self.offset[rank - 1 - along] = interval.offset();
            self.extent[rank - 1 - along] = interval.count();
        }
    }

    /// Builds the hyperslab selected by `region_idx`.
    pub fn from_table(
        table: &RegionTable,
        region_idx: &[usize],
    ) -> Self {
        let mut slab = Self::scratch(table.rank());
        slab.set_from_table(table, region_idx);
        slab
    }

    pub fn offset(&self) -> &[u64] {
        &self.offset
    }

    pub fn extent(&self) -> &[u64] {
        &self.extent
    }

    /// Number of elements in the box.
    pub fn len(&self) -> u64 {
        self.extent.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.extent.iter().any(|e| *e == 0)
    }
}

impl Display for Hyperslab {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(
            f,
            "offset=({}) extent=({})",
            self.offset.iter().join(", "),
            self.extent.iter().join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structs::region::{
        AxisRegions,
        Interval,
    };

    #[test]
    fn test_axis_reversal() {
        let table = RegionTable::new(
            vec![
                AxisRegions::new(vec![Interval::new(2, 1), Interval::new(5, 3)], 4),
                AxisRegions::new(vec![Interval::new(1, 2)], 2),
                AxisRegions::new(vec![Interval::new(7, 1)], 1),
            ],
            8,
        );
        let slab = Hyperslab::from_table(&table, &[1, 0, 0]);
        assert_eq!(slab.offset(), &[6, 0, 4]);
        assert_eq!(slab.extent(), &[1, 2, 3]);
        assert_eq!(slab.len(), 6);
        assert_eq!(slab.to_string(), "offset=(6, 0, 4) extent=(1, 2, 3)");
    }
}
