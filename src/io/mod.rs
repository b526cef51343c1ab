//! Store access and the read orchestrator.
//!
//! [`ArrayStore`] and [`Dataspace`] are the only things the read pipeline
//! needs from a storage backend. Two backends ship with the crate:
//! [`MemStore`], a dense in-memory array, and [`RawArrayFile`], a
//! memory-mapped file in the format written by [`RawArrayWriter`].

mod mem;
mod raw;
mod read;
mod space;
mod store;

pub use mem::{
    MemSpace,
    MemStore,
};
pub use raw::{
    RawArrayFile,
    RawArrayWriter,
    MAGIC,
    VERSION,
};
pub use read::{
    read_regions,
    ReadPlan,
    RegionRead,
    RegionReader,
};
pub use space::{
    SlabSpace,
    SpaceSelection,
};
pub use store::{
    ArrayStore,
    Dataspace,
};
