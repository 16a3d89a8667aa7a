//! Game kernel: the authoritative state of one maze session.
//!
//! # Invariants
//! - A session is an owned value; every update goes through `&mut` methods.
//!   There is no global state.
//! - Within a tick, movement resolves strictly before triggers.
//! - The player's bounding volume is derived from its position on every
//!   query, never cached across frames.
//! - Won and Lost are terminal; only a full rebuild leaves them.

pub mod config;
pub mod error;
pub mod materialize;
pub mod player;
pub mod session;
pub mod triggers;
pub mod world;

pub use config::GameConfig;
pub use error::KernelError;
pub use materialize::{Layout, MaterializeStats, Placements, Shortfall, materialize, plan_placements};
pub use player::{AnimationState, MoveOutcome, MovementParams, Player};
pub use session::{GameEvent, GameSession, MAX_MOVE_DT, SessionBuilder, SessionState, TickReport};
pub use triggers::{TriggerOutcome, resolve_triggers};
pub use world::{World, WorldEvent, WorldObject};

pub fn crate_info() -> &'static str {
    "labyrinth-kernel v0.1.0"
}
