//! Spatial partition: uniform cell grid over the XZ plane.
//!
//! # Invariants
//! - An object is registered in exactly the cells its bounding box covers.
//! - Queries return candidates in ascending id order; callers run the exact
//!   overlap test themselves.
//!
//! Obstacles in a maze are already grid-aligned, so a partition keyed by the
//! maze cell size makes a box query touch a handful of cells instead of
//! scanning every object.

mod grid;

pub use grid::{CellCoord, CellPartition};

pub fn crate_info() -> &'static str {
    "labyrinth-spatial v0.1.0"
}
