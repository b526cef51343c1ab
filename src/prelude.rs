pub use crate::config::ReadConfig;
pub use crate::data_structs::{
    Element,
    ElementType,
    Interval,
    OutputShape,
    RawVector,
    RegionTable,
    SelectionSpec,
};
pub use crate::error::{
    ErrorKind,
    SlabError,
    SlabResult,
};
pub use crate::io::{
    read_regions,
    ArrayStore,
    Dataspace,
    MemStore,
    RawArrayFile,
    RawArrayWriter,
    ReadPlan,
    RegionRead,
    RegionReader,
    SlabSpace,
};
