use std::fmt::Display;

use itertools::Itertools;
use serde::{
    Deserialize,
    Serialize,
};

use crate::data_structs::shape::OutputShape;

/// A closed interval along one axis, with a 1-based `start` and a `count`
/// of at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Interval {
    start: u64,
    count: u64,
}

impl Interval {
    /// Creates a new `Interval`.
    pub fn new(
        start: u64,
        count: u64,
    ) -> Self {
        assert!(start >= 1, "Interval start is 1-based");
        assert!(count >= 1, "Interval count must be positive");
        Self { start, count }
    }

    pub fn start(&self) -> u64 {
        self.start
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// Last index covered by the interval (1-based, inclusive).
    pub fn end(&self) -> u64 {
        self.start + self.count - 1
    }

    /// Zero-based offset of the interval, as the store indexes it.
    pub fn offset(&self) -> u64 {
        self.start - 1
    }
}

impl Display for Interval {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end())
    }
}

/// Validated intervals of a single axis, together with the number of
/// elements they select.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AxisRegions {
    intervals: Vec<Interval>,
    count_sum: u64,
}

impl AxisRegions {
    pub(crate) fn new(
        intervals: Vec<Interval>,
        count_sum: u64,
    ) -> Self {
        debug_assert_eq!(intervals.iter().map(Interval::count).sum::<u64>(), count_sum);
        Self {
            intervals,
            count_sum,
        }
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Number of intervals on this axis.
    pub fn n_regions(&self) -> usize {
        self.intervals.len()
    }

    /// Extent of the output along this axis.
    pub fn count_sum(&self) -> u64 {
        self.count_sum
    }
}

/// Per-axis interval lists derived from a
/// [`SelectionSpec`](crate::data_structs::SelectionSpec), in caller axis
/// order.
///
/// A `RegionTable` is obtained through
/// [`build_region_table`](crate::select::build_region_table), which
/// guarantees that intervals are ascending, non-overlapping, inside the
/// array extent and that `ans_len` is within the configured bound.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionTable {
    axes:    Vec<AxisRegions>,
    ans_len: u64,
}

impl RegionTable {
    pub(crate) fn new(
        axes: Vec<AxisRegions>,
        ans_len: u64,
    ) -> Self {
        Self { axes, ans_len }
    }

    pub fn rank(&self) -> usize {
        self.axes.len()
    }

    pub fn axes(&self) -> &[AxisRegions] {
        &self.axes
    }

    pub fn axis(
        &self,
        along: usize,
    ) -> &AxisRegions {
        &self.axes[along]
    }

    /// Interval count per axis (`n_d`).
    pub fn n_regions(&self) -> Vec<usize> {
        self.axes.iter().map(AxisRegions::n_regions).collect_vec()
    }

    /// Count sum per axis (`count_sum_d`).
    pub fn count_sums(&self) -> Vec<u64> {
        self.axes.iter().map(AxisRegions::count_sum).collect_vec()
    }

    /// Total number of elements the selection covers.
    pub fn ans_len(&self) -> u64 {
        self.ans_len
    }

    /// Whether some axis has no interval, i.e. nothing will be read.
    pub fn is_empty(&self) -> bool {
        self.axes.iter().any(|a| a.n_regions() == 0)
    }

    /// Number of hyperslabs the selection is built from (`Π n_d`).
    ///
    /// Saturates at `u64::MAX`; a rank-0 table describes one (scalar)
    /// hyperslab.
    pub fn num_hyperslabs(&self) -> u64 {
        self.axes
            .iter()
            .map(|a| a.n_regions() as u64)
            .fold(1u64, |acc, n| acc.saturating_mul(n))
    }

    /// Shape of the dense output, in caller axis order.
    pub fn output_shape(&self) -> OutputShape {
        OutputShape::from_table(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(axes: Vec<Vec<(u64, u64)>>) -> RegionTable {
        let axes = axes
            .into_iter()
            .map(|a| {
                let intervals = a
                    .into_iter()
                    .map(|(s, c)| Interval::new(s, c))
                    .collect_vec();
                let sum = intervals.iter().map(Interval::count).sum();
                AxisRegions::new(intervals, sum)
            })
            .collect_vec();
        let ans_len = axes.iter().map(AxisRegions::count_sum).product();
        RegionTable::new(axes, ans_len)
    }

    #[test]
    fn test_interval_bounds() {
        let i = Interval::new(8, 3);
        assert_eq!(i.end(), 10);
        assert_eq!(i.offset(), 7);
        assert_eq!(i.to_string(), "[8, 10]");
    }

    #[test]
    #[should_panic(expected = "Interval count must be positive")]
    fn test_interval_zero_count() {
        let _ = Interval::new(1, 0);
    }

    #[test]
    fn test_table_accessors() {
        let t = table(vec![vec![(1, 2), (5, 3)], vec![(2, 1)], vec![(1, 1), (3, 1), (9, 2)]]);
        assert_eq!(t.n_regions(), vec![2, 1, 3]);
        assert_eq!(t.count_sums(), vec![5, 1, 4]);
        assert_eq!(t.ans_len(), 20);
        assert_eq!(t.num_hyperslabs(), 6);
        assert!(!t.is_empty());
    }

    #[test]
    fn test_table_empty_axis() {
        let t = table(vec![vec![(1, 2)], vec![]]);
        assert!(t.is_empty());
        assert_eq!(t.ans_len(), 0);
        assert_eq!(t.num_hyperslabs(), 0);
    }
}
