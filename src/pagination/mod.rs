//! Pagination module
//!
//! Supports: Offset, Keyset, Keyset with total, Join, Rownum, Materialized view
//!
//! # Overview
//!
//! Offset-like strategies address pages by number and have random access.
//! Keyset strategies only know the boundary of the next page, so going back
//! needs a stack of every boundary already crossed. [`PositionTracker`]
//! keeps exactly one of the two representations live and turns it into
//! request parameters.

mod tracker;
mod types;

pub use tracker::PositionTracker;
pub use types::{BoundaryMode, Navigation, PageRequest, Position};
