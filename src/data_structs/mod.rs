//! Value types shared by the selection pipeline.
//!
//! - [`SelectionSpec`] and [`RawVector`]: the caller's starts/counts, as
//!   received, before validation.
//! - [`Interval`], [`AxisRegions`], [`RegionTable`]: validated, per-axis
//!   interval lists with their count sums.
//! - [`Odometer`]: mixed-radix enumeration of one-interval-per-axis
//!   combinations.
//! - [`Hyperslab`]: one box of the array in storage axis order.
//! - [`OutputShape`]: the shape of the dense output buffer.
//! - [`ElementType`] and [`Element`]: stored and requested numeric types.

mod element;
mod hyperslab;
mod odometer;
mod region;
mod shape;
mod spec;

pub use element::{
    Element,
    ElementType,
};
pub use hyperslab::Hyperslab;
pub use odometer::{
    AxisVec,
    Odometer,
};
pub use region::{
    AxisRegions,
    Interval,
    RegionTable,
};
pub use shape::OutputShape;
pub use spec::{
    RawVector,
    SelectionSpec,
};
