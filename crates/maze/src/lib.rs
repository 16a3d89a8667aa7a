//! Maze generation: grid model, carver, placement sampler and path solver.
//!
//! # Invariants
//! - A grid is allocated all-wall and only the carver (or a hand-authored
//!   layout) opens cells.
//! - After carving from an odd-aligned interior start, the open cells form a
//!   perfect maze: connected and acyclic.
//! - The carver never opens the outer border.
//! - The sampler never yields the same cell twice from one pool.

mod carver;
mod error;
mod grid;
mod sampler;
mod solver;

pub use carver::{Direction, carve, generate};
pub use error::MazeError;
pub use grid::{Cell, Grid};
pub use sampler::OpenCellPool;
pub use solver::{reachable_from, shortest_path};

pub fn crate_info() -> &'static str {
    "labyrinth-maze v0.1.0"
}
