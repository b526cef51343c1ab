use crate::data_structs::{
    Element,
    ElementType,
};

/// An address space over an N-dimensional array, carrying a selection.
///
/// Extents and hyperslabs are in storage axis order. Dropping a space
/// releases it.
pub trait Dataspace {
    /// Extent of the space along each axis.
    fn dims(&self) -> &[u64];

    /// Clears the selection.
    fn select_none(&mut self) -> anyhow::Result<()>;

    /// Selects every element of the space.
    fn select_all(&mut self) -> anyhow::Result<()>;

    /// Adds the box `offset .. offset + extent` (zero-based) to the
    /// selection.
    fn select_hyperslab_or(
        &mut self,
        offset: &[u64],
        extent: &[u64],
    ) -> anyhow::Result<()>;

    /// Number of selected elements.
    fn selected_len(&self) -> u64;
}

/// The array store a region read is served from.
///
/// Only the primitives needed to describe a selection and run a single
/// batched read are required; opening files or datasets happens before a
/// store value exists.
pub trait ArrayStore {
    type Space: Dataspace;

    /// Extents of the array, in storage axis order.
    fn dims(&self) -> anyhow::Result<Vec<u64>>;

    /// Type the elements are stored as.
    fn element_type(&self) -> ElementType;

    /// A fresh space over the whole array. The initial selection is
    /// unspecified.
    fn file_space(&self) -> anyhow::Result<Self::Space>;

    /// A destination space of extent `dims` with everything selected.
    fn mem_space(
        &self,
        dims: &[u64],
    ) -> anyhow::Result<Self::Space>;

    /// Copies the elements selected in `file` into the elements selected in
    /// `mem`, both traversed in row-major order, converting them to `T`.
    /// `buf` is the dense backing buffer of `mem`.
    fn read_into<T: Element>(
        &self,
        mem: &Self::Space,
        file: &Self::Space,
        buf: &mut [T],
    ) -> anyhow::Result<()>;
}

impl<S: ArrayStore> ArrayStore for &S {
    type Space = S::Space;

    fn dims(&self) -> anyhow::Result<Vec<u64>> {
        (**self).dims()
    }

    fn element_type(&self) -> ElementType {
        (**self).element_type()
    }

    fn file_space(&self) -> anyhow::Result<Self::Space> {
        (**self).file_space()
    }

    fn mem_space(
        &self,
        dims: &[u64],
    ) -> anyhow::Result<Self::Space> {
        (**self).mem_space(dims)
    }

    fn read_into<T: Element>(
        &self,
        mem: &Self::Space,
        file: &Self::Space,
        buf: &mut [T],
    ) -> anyhow::Result<()> {
        (**self).read_into(mem, file, buf)
    }
}
