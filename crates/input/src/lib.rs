//! Input: raw key events folded into a fixed key-state table, read once per
//! frame as a movement intent, plus the UI actions a session consumes.
//!
//! # Invariants
//! - The session never sees raw key names, only [`MoveIntent`] and [`Action`].
//! - Opposite movement keys cancel instead of overriding each other.

pub mod action;
pub mod keys;

pub use action::Action;
pub use keys::{InputError, Key, KeyBindings, KeyState, MoveIntent};

pub fn crate_info() -> &'static str {
    "labyrinth-input v0.1.0"
}
