use glam::{Quat, Vec3};
use labyrinth_common::{Aabb, ObjectId, Transform};
use labyrinth_input::MoveIntent;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::world::World;

/// Which clip the presentation layer should be playing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AnimationState {
    #[default]
    Idle,
    Walking,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovementParams {
    pub move_speed: f32,
    pub run_multiplier: f32,
    pub collision_margin: f32,
}

impl MovementParams {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            move_speed: config.move_speed,
            run_multiplier: config.run_multiplier,
            collision_margin: config.collision_margin,
        }
    }

    /// Displacement for one frame of `intent`.
    pub fn velocity(&self, intent: &MoveIntent, dt: f32) -> Vec3 {
        let v = intent.axis * self.move_speed * dt;
        if intent.running {
            v * self.run_multiplier
        } else {
            v
        }
    }
}

impl Default for MovementParams {
    fn default() -> Self {
        Self::from_config(&GameConfig::default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MoveOutcome {
    Idle,
    Moved { from: Vec3, to: Vec3 },
    /// Rejected by the lowest-id blocking object; the position is unchanged.
    Blocked { by: ObjectId },
}

/// The player's kinematic body.
///
/// The collider is an axis-aligned box centered on the position and is
/// rebuilt from it on every query, so it can never lag behind a move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub transform: Transform,
    half_extents: Vec3,
    animation: AnimationState,
}

impl Player {
    pub fn new(position: Vec3, half_extents: Vec3) -> Self {
        Self {
            transform: Transform::at(position),
            half_extents,
            animation: AnimationState::Idle,
        }
    }

    /// Collider half extents for a player mesh: the local bounds scaled by
    /// the mesh transform, then padded on every axis.
    ///
    /// Only the size is taken from the mesh. The collider stays centered on
    /// the player position even when the mesh origin sits at its feet.
    pub fn half_extents_from_mesh(local: &Aabb, scale: Vec3, padding: f32) -> Vec3 {
        local.scaled(scale).half_extents() + Vec3::splat(padding)
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn half_extents(&self) -> Vec3 {
        self.half_extents
    }

    pub fn animation(&self) -> AnimationState {
        self.animation
    }

    pub fn bounds(&self) -> Aabb {
        Aabb::from_center(self.transform.position, self.half_extents)
    }

    /// Heading around +Y, in radians. Zero faces +Z.
    pub fn yaw(&self) -> f32 {
        let forward = self.transform.rotation * Vec3::Z;
        forward.x.atan2(forward.z)
    }

    /// Advance one frame of `intent` against the world's blocking volumes.
    pub fn step(&mut self, intent: &MoveIntent, dt: f32, world: &World, params: &MovementParams) -> MoveOutcome {
        let velocity = params.velocity(intent, dt);
        self.try_move(velocity, intent.running, world, params.collision_margin)
    }

    /// Attempt a single discrete displacement.
    ///
    /// The candidate box is the current collider translated by `velocity`
    /// and shrunk by `margin` on every face. Any blocking overlap rejects the
    /// whole move; there is no sliding along walls and no sweep, so a
    /// displacement longer than an obstacle can pass through it.
    pub fn try_move(&mut self, velocity: Vec3, running: bool, world: &World, margin: f32) -> MoveOutcome {
        if velocity == Vec3::ZERO {
            self.animation = AnimationState::Idle;
            return MoveOutcome::Idle;
        }
        self.animation = if running {
            AnimationState::Running
        } else {
            AnimationState::Walking
        };

        let candidate = self.bounds().translated(velocity).shrunk(margin);
        if let Some(by) = world.first_blocker(&candidate) {
            tracing::trace!(%by, "move blocked");
            return MoveOutcome::Blocked { by };
        }

        let from = self.transform.position;
        let to = from + velocity;
        self.transform.position = to;
        self.face(velocity);
        MoveOutcome::Moved { from, to }
    }

    fn face(&mut self, direction: Vec3) {
        let flat = Vec3::new(direction.x, 0.0, direction.z);
        if flat.length_squared() > 0.0 {
            self.transform.rotation = Quat::from_rotation_y(flat.x.atan2(flat.z));
        }
    }
}
