//! # slabread
//!
//! `slabread` reads rectangular unions of regions out of N-dimensional numeric
//! arrays. A request names, for every axis of the array, an ordered list of
//! non-overlapping intervals (`starts`, with optional `counts` defaulting to
//! 1). The selected elements are the Cartesian product of those intervals,
//! and they come back as a single dense array whose extent along each axis is
//! the sum of that axis' counts.
//!
//! Besides the library, the [**slabread CLI**](https://crates.io/crates/slabread-ci)
//! inspects and reads raw array files from the command line.
//!
//! ## Key Features
//!
//! * **Early validation**: ordering, overlap, bounds and overflow are checked
//!   in one pass per axis, before any store state exists. Diagnostics name
//!   the offending axis and position (`starts[[2]][3] is NA`).
//! * **One batched read**: every one-interval-per-axis combination becomes a
//!   hyperslab of a single selection, read with one store call.
//! * **Pluggable stores**: anything implementing [`ArrayStore`] can be read
//!   from. [`MemStore`] and the memory-mapped [`RawArrayFile`] are included.
//! * **Typed output**: results are [`ndarray::ArrayD`] values of any
//!   [`Element`] type, converted from the stored type.
//!
//! Limits on output size and hyperslab count live in [`ReadConfig`]; they
//! can be set from the `SLABREAD_MAX_HYPERSLABS` and `SLABREAD_MAX_TOTAL_LEN`
//! environment variables.
//!
//! ## Axis order
//!
//! Callers list axes outermost first. Stores index them innermost last, so
//! caller axis `d` of a rank `R` array is storage axis `R - 1 - d`. The
//! returned array is shaped in caller order and laid out column-major.
//!
//! ## Structure
//!
//! * [`data_structs`]: requests, interval tables, hyperslabs, shapes and
//!   element types.
//! * [`select`]: validation, region table construction and selection
//!   building.
//! * [`io`]: the store traits, bundled stores and the [`RegionReader`].
//! * [`error`]: [`SlabError`] and its [`ErrorKind`]s.
//!
//! ## Usage
//!
//! ```no_run
//! use slabread::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let file = RawArrayFile::open("path/to/array.slab")?;
//!     let reader = RegionReader::new(&file).with_config(ReadConfig::from_env());
//!
//!     // Rows 1-10 and 21-30 of the first caller axis, element 5 of the second.
//!     let spec = SelectionSpec::parse("1,21;5", Some("10,10;1"))?;
//!     println!("{}", reader.plan(&spec)?);
//!
//!     let read = reader.read::<f64>(&spec)?;
//!     println!("shape {:?}: {:?}", read.shape(), read.data());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod data_structs;
pub mod error;
pub mod io;
pub mod prelude;
pub mod select;
pub mod utils;

#[allow(unused_imports)]
use prelude::*;
