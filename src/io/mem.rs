use std::sync::atomic::{
    AtomicUsize,
    Ordering,
};
use std::sync::Arc;

use anyhow::{
    bail,
    ensure,
};

use super::space::{
    gather,
    SlabSpace,
};
use super::store::{
    ArrayStore,
    Dataspace,
};
use crate::data_structs::{
    Element,
    ElementType,
};

/// An [`ArrayStore`] over a dense row-major array held in memory.
///
/// Besides serving reads, it keeps count of read calls and of spaces that are
/// still open, and can be told to fail a given hyperslab union or the read
/// itself. Tests use this to check what a failed read leaves behind.
#[derive(Debug)]
pub struct MemStore {
    dims:          Vec<u64>,
    dtype:         ElementType,
    bytes:         Vec<u8>,
    reads:         AtomicUsize,
    open_spaces:   Arc<AtomicUsize>,
    fail_union_at: Option<usize>,
    fail_read:     bool,
}

impl MemStore {
    /// Stores `values` (row-major over `dims`) with the element type of `T`.
    pub fn from_vec<T: Element>(
        dims: &[u64],
        values: Vec<T>,
    ) -> anyhow::Result<Self> {
        let expected = dims
            .iter()
            .try_fold(1u64, |acc, d| acc.checked_mul(*d));
        ensure!(
            expected == Some(values.len() as u64),
            "array of extents {:?} cannot hold {} values",
            dims,
            values.len()
        );

        let mut bytes = Vec::with_capacity(values.len() * T::TYPE.size());
        for value in values.iter() {
            value.write_le(&mut bytes);
        }
        Ok(Self {
            dims: dims.to_vec(),
            dtype: T::TYPE,
            bytes,
            reads: AtomicUsize::new(0),
            open_spaces: Arc::new(AtomicUsize::new(0)),
            fail_union_at: None,
            fail_read: false,
        })
    }

    /// Makes the `n`-th (1-based) hyperslab union on each file space fail.
    pub fn with_failing_union(
        mut self,
        n: usize,
    ) -> Self {
        self.fail_union_at = Some(n);
        self
    }

    /// Makes every read fail.
    pub fn with_failing_read(mut self) -> Self {
        self.fail_read = true;
        self
    }

    /// Number of times [`ArrayStore::read_into`] was called.
    pub fn read_calls(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of spaces created by this store and not yet dropped.
    pub fn open_spaces(&self) -> usize {
        self.open_spaces.load(Ordering::SeqCst)
    }

    fn open(
        &self,
        dims: &[u64],
        fail_union_at: Option<usize>,
    ) -> MemSpace {
        self.open_spaces.fetch_add(1, Ordering::SeqCst);
        MemSpace {
            inner: SlabSpace::new(dims),
            unions: 0,
            fail_union_at,
            open: Arc::clone(&self.open_spaces),
        }
    }
}

/// Space handed out by [`MemStore`]. Releases itself on drop.
#[derive(Debug)]
pub struct MemSpace {
    inner:         SlabSpace,
    unions:        usize,
    fail_union_at: Option<usize>,
    open:          Arc<AtomicUsize>,
}

impl MemSpace {
    pub fn inner(&self) -> &SlabSpace {
        &self.inner
    }
}

impl Drop for MemSpace {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

impl Dataspace for MemSpace {
    fn dims(&self) -> &[u64] {
        self.inner.dims()
    }

    fn select_none(&mut self) -> anyhow::Result<()> {
        self.inner.select_none()
    }

    fn select_all(&mut self) -> anyhow::Result<()> {
        self.inner.select_all()
    }

    fn select_hyperslab_or(
        &mut self,
        offset: &[u64],
        extent: &[u64],
    ) -> anyhow::Result<()> {
        self.unions += 1;
        if self.fail_union_at == Some(self.unions) {
            bail!("injected failure on union {}", self.unions);
        }
        self.inner.select_hyperslab_or(offset, extent)
    }

    fn selected_len(&self) -> u64 {
        self.inner.selected_len()
    }
}

impl ArrayStore for MemStore {
    type Space = MemSpace;

    fn dims(&self) -> anyhow::Result<Vec<u64>> {
        Ok(self.dims.clone())
    }

    fn element_type(&self) -> ElementType {
        self.dtype
    }

    fn file_space(&self) -> anyhow::Result<MemSpace> {
        let mut space = self.open(&self.dims, self.fail_union_at);
        space.inner.select_all()?;
        Ok(space)
    }

    fn mem_space(
        &self,
        dims: &[u64],
    ) -> anyhow::Result<MemSpace> {
        let mut space = self.open(dims, None);
        space.inner.select_all()?;
        Ok(space)
    }

    fn read_into<T: Element>(
        &self,
        mem: &MemSpace,
        file: &MemSpace,
        buf: &mut [T],
    ) -> anyhow::Result<()> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_read {
            bail!("injected read failure");
        }
        ensure!(
            file.dims() == self.dims.as_slice(),
            "source space extents {:?} do not match the array {:?}",
            file.dims(),
            self.dims
        );
        gather(&self.bytes, self.dtype, &mem.inner, &file.inner, buf)
    }
}
