use std::fmt::Display;

use itertools::Itertools;
use log::{
    debug,
    info,
};
use ndarray::ArrayD;
use serde::Serialize;

use super::store::ArrayStore;
use crate::config::ReadConfig;
use crate::data_structs::{
    Element,
    OutputShape,
    RegionTable,
    SelectionSpec,
};
use crate::error::{
    SlabError,
    SlabResult,
};
use crate::select::{
    build_region_table,
    build_selection,
    check_hyperslab_limit,
};

/// Everything known about a request before any selection state exists.
#[derive(Debug, Clone, Serialize)]
pub struct ReadPlan {
    table:          RegionTable,
    shape:          OutputShape,
    num_hyperslabs: u64,
}

impl ReadPlan {
    pub fn table(&self) -> &RegionTable {
        &self.table
    }

    pub fn shape(&self) -> &OutputShape {
        &self.shape
    }

    /// Number of output elements.
    pub fn ans_len(&self) -> u64 {
        self.table.ans_len()
    }

    /// Number of hyperslabs the selection will be built from (`Π n_d`).
    pub fn num_hyperslabs(&self) -> u64 {
        self.num_hyperslabs
    }
}

impl Display for ReadPlan {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        writeln!(f, "regions per axis: ({})", self.table.n_regions().iter().join(", "))?;
        writeln!(f, "output shape:     {}", self.shape)?;
        writeln!(f, "elements:         {}", self.ans_len())?;
        write!(f, "hyperslabs:       {}", self.num_hyperslabs)
    }
}

/// Result of a region read.
#[derive(Debug, Clone)]
pub struct RegionRead<T> {
    data:           ArrayD<T>,
    num_hyperslabs: u64,
}

impl<T> RegionRead<T> {
    /// The values, shaped in caller axis order. Memory is column-major:
    /// caller axis 0 varies fastest.
    pub fn data(&self) -> &ArrayD<T> {
        &self.data
    }

    pub fn into_data(self) -> ArrayD<T> {
        self.data
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn num_hyperslabs(&self) -> u64 {
        self.num_hyperslabs
    }
}

/// Reads unions of per-axis intervals from an [`ArrayStore`].
///
/// Each call to [`RegionReader::read`] is independent: it validates the
/// request, builds its own selection and releases every space it opened
/// before returning, whether it succeeds or not.
///
/// # Example
///
/// ```
/// use slabread::prelude::*;
///
/// // A 3 x 4 array as the store sees it (storage order).
/// let store = MemStore::from_vec(&[3, 4], (0i32..12).collect()).unwrap();
/// let reader = RegionReader::new(&store);
///
/// // Caller axis 0 is storage axis 1: columns 1-2 and 4, row 3.
/// let spec = SelectionSpec::parse("1,4;3", Some("2,1;1")).unwrap();
/// let read = reader.read::<i32>(&spec).unwrap();
/// assert_eq!(read.shape(), &[3, 1]);
/// assert_eq!(read.data().iter().copied().collect::<Vec<_>>(), vec![8, 9, 11]);
/// ```
#[derive(Debug, Clone)]
pub struct RegionReader<S: ArrayStore> {
    store:  S,
    config: ReadConfig,
}

impl<S: ArrayStore> RegionReader<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            config: ReadConfig::default(),
        }
    }

    pub fn with_config(
        mut self,
        config: ReadConfig,
    ) -> Self {
        self.config = config;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ReadConfig {
        &self.config
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Validates `spec` against the store's extents and computes the region
    /// table, output shape and hyperslab count.
    ///
    /// # Errors
    ///
    /// Any validation error, [`SlabError::ResourceExhausted`] if the
    /// hyperslab limit is exceeded, and
    /// [`SlabError::SelectionConstructionFailed`] if the store cannot report
    /// its extents.
    pub fn plan(
        &self,
        spec: &SelectionSpec,
    ) -> SlabResult<ReadPlan> {
        let dims = self
            .store
            .dims()
            .map_err(SlabError::SelectionConstructionFailed)?;
        let table = build_region_table(spec, &dims, &self.config)?;
        check_hyperslab_limit(&table, &self.config)?;

        Ok(ReadPlan {
            shape: table.output_shape(),
            num_hyperslabs: table.num_hyperslabs(),
            table,
        })
    }

    /// Reads the elements selected by `spec`, converted to `T`.
    ///
    /// An empty selection returns a correctly shaped empty array without
    /// calling the store's read.
    pub fn read<T: Element>(
        &self,
        spec: &SelectionSpec,
    ) -> SlabResult<RegionRead<T>> {
        let plan = self.plan(spec)?;
        let layout = plan.shape().to_ndarray_shape()?;

        if plan.ans_len() == 0 {
            debug!("Empty selection, shape {}", plan.shape());
            let data = ArrayD::from_shape_vec(layout, Vec::new())
                .map_err(|e| SlabError::ReadFailed(e.into()))?;
            return Ok(RegionRead {
                data,
                num_hyperslabs: 0,
            });
        }

        let len = usize::try_from(plan.ans_len()).map_err(|_| {
            SlabError::overflow(format!(
                "{} elements do not fit the platform's address space",
                plan.ans_len()
            ))
        })?;
        let mut buf: Vec<T> = Vec::new();
        buf.try_reserve_exact(len).map_err(|_| {
            SlabError::exhausted(format!(
                "failed to allocate memory for {} elements of {}",
                len,
                T::TYPE
            ))
        })?;
        buf.resize(len, T::default());

        let num_hyperslabs = self.read_into(&plan, &mut buf)?;

        let data = ArrayD::from_shape_vec(layout, buf)
            .map_err(|e| SlabError::ReadFailed(e.into()))?;
        info!(
            "Read {} elements, shape {}, from {} hyperslabs",
            len,
            plan.shape(),
            num_hyperslabs
        );
        Ok(RegionRead {
            data,
            num_hyperslabs,
        })
    }

    /// Builds the source and destination spaces and runs the batched read.
    /// Both spaces are dropped when this returns.
    fn read_into<T: Element>(
        &self,
        plan: &ReadPlan,
        buf: &mut [T],
    ) -> SlabResult<u64> {
        let mut file = self
            .store
            .file_space()
            .map_err(SlabError::SelectionConstructionFailed)?;
        let num_hyperslabs = build_selection(&mut file, plan.table(), &self.config)?;

        let mem = self
            .store
            .mem_space(&plan.shape().storage_dims())
            .map_err(SlabError::SelectionConstructionFailed)?;
        self.store
            .read_into(&mem, &file, buf)
            .map_err(SlabError::ReadFailed)?;
        Ok(num_hyperslabs)
    }
}

/// Reads the elements of `store` selected by `spec` with the default
/// [`ReadConfig`].
pub fn read_regions<S: ArrayStore, T: Element>(
    store: &S,
    spec: &SelectionSpec,
) -> SlabResult<RegionRead<T>> {
    RegionReader::new(store).read(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::io::MemStore;

    fn store() -> MemStore {
        MemStore::from_vec(&[3, 4], (0i32..12).collect()).unwrap()
    }

    #[test]
    fn test_plan_does_not_touch_store() {
        let store = store();
        let reader = RegionReader::new(&store);
        let plan = reader
            .plan(&SelectionSpec::parse("1,3;1,2,3", None).unwrap())
            .unwrap();
        assert_eq!(plan.num_hyperslabs(), 6);
        assert_eq!(plan.shape().dims(), &[2, 3]);
        assert_eq!(plan.ans_len(), 6);
        assert_eq!(store.open_spaces(), 0);
        assert_eq!(store.read_calls(), 0);
    }

    #[test]
    fn test_column_major_layout() {
        let store = store();
        let spec = SelectionSpec::parse("1,2;1,3", None).unwrap();
        let read = read_regions::<_, i64>(&store, &spec).unwrap();
        assert_eq!(read.shape(), &[2, 2]);
        // data[[c, r]] is row r, column c of the stored array.
        assert_eq!(read.data()[[0, 0]], 0);
        assert_eq!(read.data()[[1, 0]], 1);
        assert_eq!(read.data()[[0, 1]], 8);
        assert_eq!(read.data()[[1, 1]], 9);
        assert!(read.data().t().is_standard_layout());
    }

    #[test]
    fn test_read_failure_releases_spaces() {
        let store = store().with_failing_read();
        let spec = SelectionSpec::parse("1;1", None).unwrap();
        let err = read_regions::<_, i32>(&store, &spec).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReadFailed);
        assert_eq!(store.open_spaces(), 0);
    }

    #[test]
    fn test_unrepresentable_values() {
        let store = MemStore::from_vec(&[2], vec![1i32, 300]).unwrap();
        let spec = SelectionSpec::parse("1", Some("2")).unwrap();
        let err = read_regions::<_, u8>(&store, &spec).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ReadFailed);
        assert!(read_regions::<_, u8>(&store, &SelectionSpec::parse("1", None).unwrap()).is_ok());
    }
}
