//! Translation of a [`SelectionSpec`](crate::data_structs::SelectionSpec)
//! into a store selection.
//!
//! The pipeline runs strictly in order:
//!
//! 1. [`check_spec_shape`] verifies arity, element types and lengths.
//! 2. [`build_region_table`] converts values to intervals, checking order,
//!    overlap, bounds and overflow in one pass per axis.
//! 3. [`build_selection`] enumerates every one-interval-per-axis combination
//!    and unions the matching hyperslab into a [`Dataspace`](crate::io::Dataspace).
//!
//! Steps 1 and 2 never touch the store.

mod builder;
mod table;
mod validate;

pub use builder::{
    build_selection,
    check_hyperslab_limit,
};
pub use table::build_region_table;
pub use validate::check_spec_shape;
