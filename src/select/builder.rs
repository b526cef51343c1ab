use log::{
    debug,
    trace,
    warn,
};

use crate::config::ReadConfig;
use crate::data_structs::{
    Hyperslab,
    Odometer,
    RegionTable,
};
use crate::error::{
    SlabError,
    SlabResult,
};
use crate::io::Dataspace;

/// Fails with [`SlabError::ResourceExhausted`] when the table would expand
/// into more hyperslabs than `config` allows.
pub fn check_hyperslab_limit(
    table: &RegionTable,
    config: &ReadConfig,
) -> SlabResult<()> {
    let n = table.num_hyperslabs();
    match config.max_hyperslabs() {
        Some(max) if n > max => {
            Err(SlabError::exhausted(format!(
                "selection would need {} hyperslabs (regions per axis: {:?}), \
                 limit is {}",
                n,
                table.n_regions(),
                max
            )))
        },
        _ => Ok(()),
    }
}

/// Replaces the selection of `space` with the union of every
/// one-interval-per-axis box described by `table`, and returns how many
/// hyperslabs were added (`Π n_d`).
///
/// The selection is cleared first. If some axis has no interval the
/// selection stays empty and 0 is returned. When a union fails the error is
/// returned as is; the caller owns `space` and releases it by dropping it.
pub fn build_selection<D: Dataspace>(
    space: &mut D,
    table: &RegionTable,
    config: &ReadConfig,
) -> SlabResult<u64> {
    check_hyperslab_limit(table, config)?;

    space
        .select_none()
        .map_err(SlabError::SelectionConstructionFailed)?;
    if table.is_empty() {
        debug!("No region to select");
        return Ok(0);
    }

    let mut odometer = Odometer::new(&table.n_regions());
    let mut slab = Hyperslab::scratch(table.rank());
    let mut n = 0u64;
    loop {
        slab.set_from_table(table, odometer.current());
        trace!("Adding hyperslab {}: {}", n + 1, slab);
        space
            .select_hyperslab_or(slab.offset(), slab.extent())
            .map_err(|e| {
                SlabError::SelectionConstructionFailed(
                    e.context(format!("adding hyperslab {} ({})", n + 1, slab)),
                )
            })?;
        n += 1;
        if !odometer.advance() {
            break;
        }
    }

    if n > config.warn_hyperslabs() {
        warn!(
            "Selection is a union of {} hyperslabs (regions per axis: {:?}); \
             consider merging adjacent regions",
            n,
            table.n_regions()
        );
    }
    debug!("Built selection from {} hyperslabs", n);
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_structs::SelectionSpec;
    use crate::error::ErrorKind;
    use crate::io::SlabSpace;
    use crate::select::build_region_table;

    fn table(
        starts: &str,
        counts: Option<&str>,
        dims: &[u64],
    ) -> RegionTable {
        let spec = SelectionSpec::parse(starts, counts).unwrap();
        build_region_table(&spec, dims, &ReadConfig::default()).unwrap()
    }

    #[test]
    fn test_hyperslab_count_and_union() {
        let dims = [5, 6];
        let t = table("1,4;2,5", Some("2,1;1,1"), &dims);
        let mut space = SlabSpace::new(&dims);
        space.select_all().unwrap();

        let n = build_selection(&mut space, &t, &ReadConfig::default()).unwrap();
        assert_eq!(n, 4);
        assert_eq!(space.selected_len(), t.ans_len());
        assert_eq!(space.hyperslabs().len(), 4);
        // Storage axis 0 is caller axis 1.
        assert_eq!(space.hyperslabs()[0].offset(), &[1, 0]);
        assert_eq!(space.hyperslabs()[0].extent(), &[1, 2]);
    }

    #[test]
    fn test_empty_axis_clears_selection() {
        let dims = [5, 6];
        let t = table("1;", None, &dims);
        let mut space = SlabSpace::new(&dims);
        space.select_all().unwrap();

        let n = build_selection(&mut space, &t, &ReadConfig::default()).unwrap();
        assert_eq!(n, 0);
        assert_eq!(space.selected_len(), 0);
    }

    #[test]
    fn test_hyperslab_limit() {
        let dims = [10, 10];
        let t = table("1,3,5;1,3,5", None, &dims);
        let config = ReadConfig::default().with_max_hyperslabs(Some(8));
        let mut space = SlabSpace::new(&dims);
        space.select_all().unwrap();

        let err = build_selection(&mut space, &t, &config).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceExhausted);
        // Rejected before the selection was touched.
        assert_eq!(space.selected_len(), 100);
    }

    #[test]
    fn test_union_failure_is_reported() {
        let t = table("1,3", None, &[3]);
        // A space of the wrong extent rejects the second hyperslab.
        let mut space = SlabSpace::new(&[2]);
        let err = build_selection(&mut space, &t, &ReadConfig::default()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::SelectionConstructionFailed);
        assert!(err.to_string().contains("adding hyperslab 2"));
    }
}
