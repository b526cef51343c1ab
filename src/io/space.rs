use std::convert::Infallible;

use anyhow::{
    anyhow,
    bail,
    ensure,
};
use itertools::Itertools;

use super::store::Dataspace;
use crate::data_structs::{
    AxisVec,
    Element,
    ElementType,
    Hyperslab,
};

/// What a [`SlabSpace`] currently selects.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SpaceSelection {
    #[default]
    None,
    All,
    /// Union of boxes. Boxes may overlap; shared elements count once.
    Hyperslabs(Vec<Hyperslab>),
}

/// In-memory [`Dataspace`] over a dense row-major array.
///
/// Selected elements are traversed in row-major order of the space (last
/// axis fastest), whatever order the boxes were added in.
#[derive(Debug, Clone)]
pub struct SlabSpace {
    dims:      AxisVec<u64>,
    selection: SpaceSelection,
}

impl SlabSpace {
    /// A space of extent `dims` with nothing selected.
    pub fn new(dims: &[u64]) -> Self {
        Self {
            dims:      AxisVec::from_slice(dims),
            selection: SpaceSelection::None,
        }
    }

    pub fn rank(&self) -> usize {
        self.dims.len()
    }

    /// Number of elements in the whole space.
    pub fn len(&self) -> u64 {
        self.dims.iter().product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn selection(&self) -> &SpaceSelection {
        &self.selection
    }

    /// Boxes of a hyperslab selection; empty for `None` and `All`.
    pub fn hyperslabs(&self) -> &[Hyperslab] {
        match &self.selection {
            SpaceSelection::Hyperslabs(slabs) => slabs,
            _ => &[],
        }
    }

    fn strides(&self) -> AxisVec<u64> {
        let mut strides: AxisVec<u64> = smallvec::smallvec![1; self.rank()];
        for axis in (0..self.rank().saturating_sub(1)).rev() {
            strides[axis] = strides[axis + 1] * self.dims[axis + 1];
        }
        strides
    }

    /// Calls `f(start, len)` for each run of consecutive selected linear
    /// (row-major) indices, in increasing order. Runs never overlap, so
    /// elements shared by several boxes are visited once.
    pub fn for_each_run<E, F>(
        &self,
        mut f: F,
    ) -> Result<(), E>
    where
        F: FnMut(u64, u64) -> Result<(), E>, {
        match &self.selection {
            SpaceSelection::None => Ok(()),
            SpaceSelection::All if self.is_empty() => Ok(()),
            SpaceSelection::All => f(0, self.len()),
            SpaceSelection::Hyperslabs(_) if self.rank() == 0 => f(0, 1),
            SpaceSelection::Hyperslabs(slabs) => {
                let active = slabs.iter().collect_vec();
                self.walk_runs(&active, 0, 0, &self.strides(), &mut f)
            },
        }
    }

    /// Sweeps `axis` over the union of the `active` boxes' ranges, recursing
    /// with the boxes that cover each coordinate. Runs come from the last
    /// axis.
    fn walk_runs<E, F>(
        &self,
        active: &[&Hyperslab],
        axis: usize,
        base: u64,
        strides: &[u64],
        f: &mut F,
    ) -> Result<(), E>
    where
        F: FnMut(u64, u64) -> Result<(), E>, {
        let ranges = active
            .iter()
            .map(|slab| {
                let lo = slab.offset()[axis];
                (lo, lo + slab.extent()[axis])
            })
            .sorted_unstable()
            .coalesce(|a, b| {
                if b.0 <= a.1 {
                    Ok((a.0, a.1.max(b.1)))
                }
                else {
                    Err((a, b))
                }
            });

        if axis + 1 == self.rank() {
            for (lo, hi) in ranges {
                f(base + lo, hi - lo)?;
            }
            return Ok(());
        }
        for (lo, hi) in ranges {
            for x in lo..hi {
                let covering = active
                    .iter()
                    .copied()
                    .filter(|slab| {
                        let o = slab.offset()[axis];
                        x >= o && x - o < slab.extent()[axis]
                    })
                    .collect_vec();
                self.walk_runs(&covering, axis + 1, base + x * strides[axis], strides, f)?;
            }
        }
        Ok(())
    }
}

impl Dataspace for SlabSpace {
    fn dims(&self) -> &[u64] {
        &self.dims
    }

    fn select_none(&mut self) -> anyhow::Result<()> {
        self.selection = SpaceSelection::None;
        Ok(())
    }

    fn select_all(&mut self) -> anyhow::Result<()> {
        self.selection = SpaceSelection::All;
        Ok(())
    }

    fn select_hyperslab_or(
        &mut self,
        offset: &[u64],
        extent: &[u64],
    ) -> anyhow::Result<()> {
        ensure!(
            offset.len() == self.rank() && extent.len() == self.rank(),
            "hyperslab of rank {} does not match a space of rank {}",
            offset.len(),
            self.rank()
        );
        for (axis, ((o, e), d)) in offset.iter().zip(extent).zip(self.dims.iter()).enumerate() {
            match o.checked_add(*e) {
                Some(stop) if stop <= *d => {},
                _ => {
                    bail!(
                        "hyperslab offset {} + extent {} exceeds dimension {} ({})",
                        o,
                        e,
                        axis,
                        d
                    )
                },
            }
        }

        let slab = Hyperslab::new(offset, extent);
        if slab.is_empty() {
            return Ok(());
        }
        match &mut self.selection {
            SpaceSelection::All => {},
            SpaceSelection::Hyperslabs(slabs) => slabs.push(slab),
            none @ SpaceSelection::None => *none = SpaceSelection::Hyperslabs(vec![slab]),
        }
        Ok(())
    }

    fn selected_len(&self) -> u64 {
        match &self.selection {
            SpaceSelection::None => 0,
            SpaceSelection::All => self.len(),
            SpaceSelection::Hyperslabs(slabs) if slabs.len() == 1 => slabs[0].len(),
            SpaceSelection::Hyperslabs(_) => {
                let mut total = 0;
                let walked: Result<(), Infallible> = self.for_each_run(|_, len| {
                    total += len;
                    Ok(())
                });
                match walked {
                    Ok(()) => total,
                    Err(never) => match never {},
                }
            },
        }
    }
}

/// Copies the elements of `data` (dense, little-endian, stored as `dtype`)
/// selected by `file` into the positions of `buf` selected by `mem`.
///
/// Both selections are walked run by run in row-major order; the i-th
/// selected source element lands on the i-th selected destination position.
pub(crate) fn gather<T: Element>(
    data: &[u8],
    dtype: ElementType,
    mem: &SlabSpace,
    file: &SlabSpace,
    buf: &mut [T],
) -> anyhow::Result<()> {
    ensure!(
        buf.len() as u64 == mem.len(),
        "destination buffer holds {} elements but the destination space has {}",
        buf.len(),
        mem.len()
    );
    let (file_len, mem_len) = (file.selected_len(), mem.selected_len());
    ensure!(
        file_len == mem_len,
        "source selects {} elements but destination selects {}",
        file_len,
        mem_len
    );

    // Destination spaces are usually fully selected, so this is one run.
    let mut mem_runs = Vec::new();
    mem.for_each_run(|start, len| -> anyhow::Result<()> {
        mem_runs.push((start, len));
        Ok(())
    })?;
    let mut dst = mem_runs
        .into_iter()
        .flat_map(|(start, len)| start..start + len);

    let size = dtype.size();
    file.for_each_run(|start, len| -> anyhow::Result<()> {
        for src in start..start + len {
            let at = dst
                .next()
                .ok_or_else(|| anyhow!("destination selection ended before element {}", src))?;
            let offset = src as usize * size;
            let bytes = data
                .get(offset..offset + size)
                .ok_or_else(|| anyhow!("element {} is past the end of the data", src))?;
            buf[at as usize] = dtype
                .decode_as(bytes)
                .ok_or_else(|| anyhow!("element {} is not representable as {}", src, T::TYPE))?;
        }
        Ok(())
    })
}
