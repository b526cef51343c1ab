use itertools::Itertools;
use log::{
    debug,
    trace,
};

use super::validate::check_spec_shape;
use crate::config::ReadConfig;
use crate::data_structs::{
    AxisRegions,
    Interval,
    RawVector,
    RegionTable,
    SelectionSpec,
};
use crate::error::{
    SlabError,
    SlabResult,
    SpecPart,
};

/// Reads element `i` of a numeric vector as an exact `i64`.
///
/// Doubles are truncated toward zero. Missing values, NaN, infinities and
/// doubles outside the `i64` range are rejected.
fn element_as_i64(
    values: &RawVector,
    i: usize,
    part: SpecPart,
    along: usize,
) -> SlabResult<i64> {
    match values {
        RawVector::Integer(v) => {
            v[i].map(i64::from)
                .ok_or_else(|| SlabError::element(part, along, i, "is NA"))
        },
        RawVector::Long(v) => {
            v[i].ok_or_else(|| SlabError::element(part, along, i, "is NA"))
        },
        RawVector::Double(v) => {
            let x = v[i];
            if !x.is_finite() {
                return Err(SlabError::element(
                    part,
                    along,
                    i,
                    "is NA or NaN or not a finite number",
                ));
            }
            // i64::MAX as f64 rounds up to 2^63, which is already out of range.
            if x >= i64::MAX as f64 || x < i64::MIN as f64 {
                return Err(SlabError::element(
                    part,
                    along,
                    i,
                    format!("is too large (= {:e})", x),
                ));
            }
            Ok(x as i64)
        },
        other => {
            Err(SlabError::shape(format!(
                "'{}[[{}]]' must be an integer vector (got {})",
                part,
                along + 1,
                other.type_name()
            )))
        },
    }
}

/// Builds the intervals of caller axis `along` in a single ordered pass,
/// checking ordering, overlap, bounds and the count-sum bound as it goes.
fn build_axis(
    spec: &SelectionSpec,
    along: usize,
    extent: u64,
    config: &ReadConfig,
) -> SlabResult<AxisRegions> {
    let starts = &spec.starts()[along];
    let counts = spec.counts().map(|c| &c[along]);
    let n = starts.len();

    let mut intervals = Vec::new();
    intervals.try_reserve_exact(n).map_err(|_| {
        SlabError::exhausted(format!(
            "failed to allocate memory for {} intervals along axis {}",
            n,
            along + 1
        ))
    })?;

    let mut previous_end = 0u64;
    let mut count_sum = 0u64;
    for i in 0..n {
        let start = element_as_i64(starts, i, SpecPart::Starts, along)?;
        // Also rejects non-positive starts, since previous_end starts at 0.
        let start = u64::try_from(start)
            .ok()
            .filter(|s| *s > previous_end)
            .ok_or(SlabError::NonMonotonicOrOverlapping { axis: along, pos: i })?;

        let count = match counts {
            Some(counts) => {
                let c = element_as_i64(counts, i, SpecPart::Counts, along)?;
                if c <= 0 {
                    return Err(SlabError::NonPositiveCount { axis: along, pos: i });
                }
                c as u64
            },
            None => 1,
        };

        // Both operands are below 2^63, so the sum fits a u64.
        let end = start + (count - 1);
        if end > extent {
            return Err(SlabError::OutOfBounds {
                axis: along,
                pos: i,
                extent,
            });
        }

        count_sum = count_sum
            .checked_add(count)
            .filter(|sum| *sum <= config.max_axis_len())
            .ok_or_else(|| {
                SlabError::overflow(format!(
                    "sum(counts[[{}]]) is too big! (> {})",
                    along + 1,
                    config.max_axis_len()
                ))
            })?;

        intervals.push(Interval::new(start, count));
        previous_end = end;
    }

    trace!(
        "Axis {}: intervals {}",
        along + 1,
        intervals.iter().join(" ")
    );
    Ok(AxisRegions::new(intervals, count_sum))
}

/// Total output length `Π count_sums`, computed in `u128` and checked
/// against `max_total_len`. Any zero count sum makes the product zero.
fn total_len(
    count_sums: &[u64],
    config: &ReadConfig,
) -> SlabResult<u64> {
    if count_sums.contains(&0) {
        return Ok(0);
    }
    count_sums
        .iter()
        .try_fold(1u128, |acc, c| acc.checked_mul(*c as u128))
        .filter(|len| *len <= config.max_total_len() as u128)
        .map(|len| len as u64)
        .ok_or_else(|| {
            SlabError::overflow(format!(
                "the selection is too big! prod(sum(counts)) exceeds {} elements \
                 (per-axis sums: {})",
                config.max_total_len(),
                count_sums.iter().join(", ")
            ))
        })
}

/// Validates `spec` against an array whose extents are `dims` (storage axis
/// order) and builds its [`RegionTable`].
///
/// Caller axis `d` is checked against `dims[R - 1 - d]`. Nothing in the
/// store is touched, so a failure here leaves no store-side state behind.
pub fn build_region_table(
    spec: &SelectionSpec,
    dims: &[u64],
    config: &ReadConfig,
) -> SlabResult<RegionTable> {
    let rank = dims.len();
    check_spec_shape(spec, rank)?;

    let axes = (0..rank)
        .map(|along| build_axis(spec, along, dims[rank - 1 - along], config))
        .collect::<SlabResult<Vec<_>>>()?;

    let count_sums = axes.iter().map(AxisRegions::count_sum).collect_vec();
    let ans_len = total_len(&count_sums, config)?;

    debug!(
        "Region table: regions per axis ({}), count sums ({}), {} elements",
        axes.iter().map(AxisRegions::n_regions).join(", "),
        count_sums.iter().join(", "),
        ans_len
    );
    Ok(RegionTable::new(axes, ans_len))
}
