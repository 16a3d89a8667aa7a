use glam::Vec3;
use labyrinth_input::MoveIntent;
use labyrinth_kernel::{GameSession, MAX_MOVE_DT};
use labyrinth_maze::shortest_path;

/// Steers the player along the solved start-to-goal route, one cell center
/// at a time.
#[derive(Debug, Clone)]
pub struct Autopilot {
    waypoints: Vec<Vec3>,
    next: usize,
}

/// Distance at which a waypoint counts as reached.
const ARRIVED: f32 = 1e-3;

impl Autopilot {
    /// `None` when the goal is not reachable from the player's cell.
    pub fn plan(session: &GameSession) -> Option<Self> {
        let from = session.player_cell()?;
        let path = shortest_path(session.grid(), from, session.placements().goal)?;
        let layout = session.layout();
        Some(Self {
            waypoints: path.into_iter().map(|c| layout.cell_center(c)).collect(),
            next: 0,
        })
    }

    pub fn route_len(&self) -> usize {
        self.waypoints.len()
    }

    /// Intent for the next frame of `dt` seconds.
    ///
    /// The axis is scaled down on the last stretch to a waypoint so the
    /// player lands on it instead of overshooting.
    pub fn intent(&mut self, session: &GameSession, dt: f32) -> MoveIntent {
        let position = session.player().position();
        let reach = session.config().move_speed * dt.min(MAX_MOVE_DT);
        while let Some(target) = self.waypoints.get(self.next) {
            let delta = Vec3::new(target.x - position.x, 0.0, target.z - position.z);
            let distance = delta.length();
            if distance < ARRIVED {
                self.next += 1;
                continue;
            }
            if reach <= 0.0 {
                return MoveIntent::idle();
            }
            let axis = if distance > reach {
                delta / distance
            } else {
                delta / reach
            };
            return MoveIntent::toward(axis, false);
        }
        MoveIntent::idle()
    }
}
