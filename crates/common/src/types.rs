use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Identifier of an object in the world collection.
///
/// Ids are handed out sequentially by the world so that iteration order and
/// replays stay deterministic for a given seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

impl fmt::Display for ObjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "obj#{}", self.0)
    }
}

/// Unique identifier for one game session. A restart produces a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Semantic tag of a world object.
///
/// Closed set: the trigger resolver matches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Maze wall volume. Blocks movement.
    Wall,
    /// Hazard. Touching it loses the session.
    Trap,
    /// Pickup. Touching it removes it and scores a point.
    Coin,
    /// Goal. Touching it wins the session.
    Endpoint,
    /// Solid scenery with no gameplay meaning.
    Plain,
}

impl ObjectKind {
    /// Whether the player's movement is rejected when it would overlap this kind.
    pub fn blocks_movement(self) -> bool {
        matches!(self, Self::Wall | Self::Plain)
    }

    /// Whether overlapping this kind raises a trigger.
    pub fn is_trigger(self) -> bool {
        matches!(self, Self::Trap | Self::Coin | Self::Endpoint)
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Wall => "wall",
            Self::Trap => "trap",
            Self::Coin => "coin",
            Self::Endpoint => "endpoint",
            Self::Plain => "plain",
        };
        f.write_str(name)
    }
}

/// Spatial transform: position, rotation, scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    /// Identity rotation and unit scale at `position`.
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}
