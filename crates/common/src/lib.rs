//! Shared value types used across the labyrinth crates.
//!
//! # Invariants
//! - Every type here is plain data: `Copy` where possible, no interior state.
//! - `Aabb` always satisfies `min <= max` on every axis.

mod aabb;
mod types;

pub use aabb::Aabb;
pub use types::{ObjectId, ObjectKind, SessionId, Transform};
