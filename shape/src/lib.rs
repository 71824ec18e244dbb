//! Logical-shape algebra for tile-aligned tensor execution.
//!
//! Hardware tiling constraints force tensor buffers to be padded up to
//! alignment multiples, while user-level computation keeps reasoning about the
//! original, unpadded extents. This crate provides the pure bookkeeping for
//! that split:
//!
//! - [`dim`] - the [`Dim`] value type: a dimension size that carries a
//!   "came from padding" flag and an explicit unresolved state
//! - [`algebra`] - prefix/suffix stripping, broadcast resolution and the
//!   greedy reshape grouping used by view inference
//! - [`pad`] - alignment arithmetic: rounded-up sizes and pad widths
//!
//! Everything here is pure: no buffers, no I/O. Physical padding and slicing
//! of actual data live in the engine crate.

pub mod algebra;
pub mod dim;
pub mod error;
pub mod pad;

pub use dim::{Dim, Shape};
pub use error::{Error, Result};
