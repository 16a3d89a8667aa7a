use glam::Vec3;
use labyrinth_maze::{Cell, Grid, MazeError};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::KernelError;

/// Tunables for one session. Every field has a default, so a config file
/// only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    /// Grid rows (world Z).
    pub rows: usize,
    /// Grid columns (world X).
    pub cols: usize,
    /// Maze seed. `None` draws a fresh one per session.
    pub seed: Option<u64>,
    /// Carve start and player spawn. Must be odd-aligned and interior.
    pub start: Cell,
    /// World units per grid cell.
    pub cell_size: f32,
    pub wall_height: f32,
    pub trap_count: usize,
    pub coin_count: usize,
    /// Units per second.
    pub move_speed: f32,
    pub run_multiplier: f32,
    /// Fallback player collider when no player mesh bounds are available.
    pub player_half_extents: Vec3,
    /// Added to every half extent of a mesh-derived collider.
    pub player_padding: f32,
    /// Inward shrink applied to the candidate box before the obstacle test.
    pub collision_margin: f32,
    /// Fail session construction when fewer cells than requested remain
    /// for traps and coins, instead of placing fewer.
    pub strict_placement: bool,
    /// Keep traps off the unique start-to-goal corridor.
    pub keep_path_clear: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            rows: 21,
            cols: 21,
            seed: None,
            start: Cell::new(1, 1),
            cell_size: 2.0,
            wall_height: 2.0,
            trap_count: 3,
            coin_count: 5,
            move_speed: 5.0,
            run_multiplier: 2.0,
            player_half_extents: Vec3::splat(0.5),
            player_padding: 0.0,
            collision_margin: 0.1,
            strict_placement: false,
            keep_path_clear: true,
        }
    }
}

impl GameConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, KernelError> {
        let config: Self = serde_yaml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, KernelError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&text)
    }

    /// Reject configs a session cannot start from.
    ///
    /// Grid dimension and start-cell problems surface as [`MazeError`]s so
    /// callers see the same error the carver would raise.
    pub fn validate(&self) -> Result<(), KernelError> {
        if self.rows < Grid::MIN_DIMENSION || self.cols < Grid::MIN_DIMENSION {
            return Err(MazeError::InvalidGridDimensions {
                rows: self.rows,
                cols: self.cols,
            }
            .into());
        }
        let s = self.start;
        if s.row == 0
            || s.col == 0
            || s.row + 1 >= self.rows
            || s.col + 1 >= self.cols
            || s.row % 2 == 0
            || s.col % 2 == 0
        {
            return Err(MazeError::InvalidStart {
                row: s.row,
                col: s.col,
            }
            .into());
        }
        positive("cell_size", self.cell_size)?;
        positive("wall_height", self.wall_height)?;
        positive("run_multiplier", self.run_multiplier)?;
        non_negative("move_speed", self.move_speed)?;
        non_negative("collision_margin", self.collision_margin)?;
        non_negative("player_padding", self.player_padding)?;
        let h = self.player_half_extents;
        if !(h.x > 0.0 && h.y > 0.0 && h.z > 0.0) {
            return Err(KernelError::Config(format!(
                "player_half_extents must be positive, got {h}"
            )));
        }
        if h.x.max(h.z) >= self.cell_size * 0.5 {
            tracing::warn!(
                half_extents = %h,
                cell_size = self.cell_size,
                "player collider is at least as wide as a corridor; it will not fit between walls"
            );
        }
        Ok(())
    }
}

fn positive(name: &str, value: f32) -> Result<(), KernelError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(KernelError::Config(format!("{name} must be positive, got {value}")))
    }
}

fn non_negative(name: &str, value: f32) -> Result<(), KernelError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(KernelError::Config(format!(
            "{name} must be non-negative, got {value}"
        )))
    }
}
