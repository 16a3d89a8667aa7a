//! One play-through of a maze, from the start screen to win or loss.

use glam::Vec3;
use labyrinth_assets::{AssetId, AssetStore};
use labyrinth_common::{ObjectId, SessionId};
use labyrinth_input::{Action, MoveIntent};
use labyrinth_maze::{Cell, Grid, MazeError, carve};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::GameConfig;
use crate::error::KernelError;
use crate::materialize::{Layout, Placements, materialize, plan_placements};
use crate::player::{AnimationState, MoveOutcome, MovementParams, Player};
use crate::triggers::{TriggerOutcome, resolve_triggers};
use crate::world::{World, WorldEvent};

/// Longest frame, in seconds, the player is allowed to move through in one
/// tick. The timer still advances by the full frame.
pub const MAX_MOVE_DT: f32 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SessionState {
    NotStarted,
    Running,
    Won,
    Lost,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

/// Notifications for whatever presents the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    Started { session: SessionId },
    Restarted { session: SessionId },
    Moved { from: Vec3, to: Vec3 },
    Blocked { by: ObjectId },
    AnimationChanged { from: AnimationState, to: AnimationState },
    CoinCollected { coin: ObjectId, score: u32 },
    Won { elapsed: f32 },
    Lost { elapsed: f32 },
}

/// What one call to [`GameSession::tick`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct TickReport {
    pub state: SessionState,
    pub elapsed: f32,
    /// `None` when the session was not running.
    pub movement: Option<MoveOutcome>,
    pub triggers: TriggerOutcome,
}

/// Everything needed to build a session again from scratch.
#[derive(Debug, Clone)]
struct Blueprint {
    config: GameConfig,
    fixed_grid: Option<Grid>,
    fixed_placements: Option<Placements>,
    player_half_extents: Vec3,
    notes: Vec<String>,
}

/// Configures and builds a [`GameSession`].
#[derive(Debug, Clone)]
pub struct SessionBuilder {
    blueprint: Blueprint,
}

impl SessionBuilder {
    pub fn new(config: GameConfig) -> Self {
        let player_half_extents = config.player_half_extents;
        Self {
            blueprint: Blueprint {
                config,
                fixed_grid: None,
                fixed_placements: None,
                player_half_extents,
                notes: Vec::new(),
            },
        }
    }

    /// Use a hand-authored grid instead of carving one. The config's `rows`
    /// and `cols` are replaced by the grid's.
    pub fn with_grid(mut self, grid: Grid) -> Self {
        self.blueprint.config.rows = grid.rows();
        self.blueprint.config.cols = grid.cols();
        self.blueprint.fixed_grid = Some(grid);
        self
    }

    /// Use fixed placements instead of sampling them.
    pub fn with_placements(mut self, placements: Placements) -> Self {
        self.blueprint.fixed_placements = Some(placements);
        self
    }

    /// Size the player collider from a resolved mesh in `store`.
    ///
    /// When the mesh is missing or failed to load, the configured half
    /// extents stay in effect and a diagnostic is recorded on the session.
    /// The same fallback applies to a mesh whose collider would be empty,
    /// non-finite, or too wide to pass between two walls.
    pub fn with_player_mesh(mut self, store: &AssetStore, mesh: AssetId, scale: Vec3) -> Self {
        let padding = self.blueprint.config.player_padding;
        let corridor = self.blueprint.config.cell_size * 0.5;
        match store.mesh_bounds(mesh) {
            Ok(local) => {
                let half = Player::half_extents_from_mesh(&local, scale, padding);
                if !half.is_finite() || !half.cmpgt(Vec3::ZERO).all() {
                    self.note(format!("player mesh bounds are degenerate ({half}); using configured collider"));
                } else if half.x.max(half.z) >= corridor {
                    self.note(format!(
                        "player mesh collider ({half}) does not fit a {} corridor; using configured collider",
                        self.blueprint.config.cell_size
                    ));
                } else {
                    tracing::debug!(%half, "player collider sized from mesh");
                    self.blueprint.player_half_extents = half;
                }
            }
            Err(err) => {
                let reason = store.failure(mesh).map(str::to_string).unwrap_or_else(|| err.to_string());
                self.note(format!("player mesh unavailable ({reason}); using configured collider"));
            }
        }
        self
    }

    fn note(&mut self, message: String) {
        tracing::warn!("{message}");
        self.blueprint.notes.push(message);
    }

    pub fn build(self) -> Result<GameSession, KernelError> {
        GameSession::from_blueprint(self.blueprint)
    }
}

/// The authoritative state of one play-through.
///
/// Owned by the host and driven through `&mut self`; nothing is shared or
/// global. Movement always resolves before triggers within a tick, and once
/// the session is won or lost neither the timer nor the player moves again.
#[derive(Debug, Clone)]
pub struct GameSession {
    id: SessionId,
    blueprint: Blueprint,
    seed: u64,
    state: SessionState,
    layout: Layout,
    params: MovementParams,
    grid: Grid,
    placements: Placements,
    world: World,
    player: Player,
    score: u32,
    elapsed: f32,
    events: Vec<GameEvent>,
    diagnostics: Vec<String>,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Result<Self, KernelError> {
        SessionBuilder::new(config).build()
    }

    fn from_blueprint(blueprint: Blueprint) -> Result<Self, KernelError> {
        let config = &blueprint.config;
        config.validate()?;
        let start = config.start;
        let seed = config.seed.unwrap_or_else(rand::random);
        let _span = tracing::info_span!("build_session", seed, rows = config.rows, cols = config.cols).entered();
        let mut rng = StdRng::seed_from_u64(seed);

        let grid = match &blueprint.fixed_grid {
            Some(grid) => {
                if !grid.is_open(start) {
                    return Err(MazeError::InvalidStart {
                        row: start.row,
                        col: start.col,
                    }
                    .into());
                }
                grid.clone()
            }
            None => {
                let mut grid = Grid::filled(config.rows, config.cols)?;
                carve(&mut grid, start, &mut rng)?;
                grid
            }
        };

        let placements = match &blueprint.fixed_placements {
            Some(p) => {
                check_placements(&grid, start, p)?;
                p.clone()
            }
            None => plan_placements(&grid, start, config, &mut rng)?,
        };

        let mut diagnostics = blueprint.notes.clone();
        if !placements.shortfall.is_empty() {
            diagnostics.push(format!(
                "placed {} fewer traps and {} fewer coins than requested",
                placements.shortfall.traps, placements.shortfall.coins
            ));
        }

        let layout = Layout::from_config(config);
        let mut world = World::new(layout.cell_size);
        let stats = materialize(&grid, &placements, &layout, &mut world);
        world.drain_events();

        let half = blueprint.player_half_extents;
        let mut spawn = layout.cell_center(start);
        spawn.y = half.y;
        let player = Player::new(spawn, half);

        let id = SessionId::new();
        tracing::info!(%id, walls = stats.walls, traps = stats.traps, coins = stats.coins, "session built");
        Ok(Self {
            id,
            seed,
            state: SessionState::NotStarted,
            layout,
            params: MovementParams::from_config(config),
            grid,
            placements,
            world,
            player,
            score: 0,
            elapsed: 0.0,
            events: Vec::new(),
            diagnostics,
            blueprint,
        })
    }

    /// NotStarted -> Running.
    pub fn start(&mut self) -> Result<(), KernelError> {
        if self.state != SessionState::NotStarted {
            return Err(KernelError::InvalidTransition {
                from: self.state,
                action: "start",
            });
        }
        self.state = SessionState::Running;
        self.elapsed = 0.0;
        tracing::info!(id = %self.id, "session started");
        self.events.push(GameEvent::Started { session: self.id });
        Ok(())
    }

    /// Throw everything away and rebuild from the same blueprint.
    ///
    /// The new session has a fresh id and is back at NotStarted. Unless the
    /// config fixes a seed, the maze is carved anew.
    pub fn restart(&mut self) -> Result<(), KernelError> {
        let mut next = Self::from_blueprint(self.blueprint.clone())?;
        tracing::info!(old = %self.id, new = %next.id, "session restarted");
        next.events.push(GameEvent::Restarted { session: next.id });
        *self = next;
        Ok(())
    }

    pub fn apply(&mut self, action: Action) -> Result<(), KernelError> {
        match action {
            Action::Start => self.start(),
            Action::Restart => self.restart(),
            Action::Noop => Ok(()),
        }
    }

    /// Advance one frame of `dt` seconds.
    ///
    /// Does nothing unless the session is running. Non-finite or negative
    /// frame times count as zero.
    pub fn tick(&mut self, dt: f32, intent: &MoveIntent) -> TickReport {
        if self.state != SessionState::Running {
            return TickReport {
                state: self.state,
                elapsed: self.elapsed,
                movement: None,
                triggers: TriggerOutcome::None,
            };
        }
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let _span = tracing::trace_span!("tick", dt).entered();
        self.elapsed += dt;

        let before = self.player.animation();
        let movement = self
            .player
            .step(intent, dt.min(MAX_MOVE_DT), &self.world, &self.params);
        match movement {
            MoveOutcome::Moved { from, to } => self.events.push(GameEvent::Moved { from, to }),
            MoveOutcome::Blocked { by } => self.events.push(GameEvent::Blocked { by }),
            MoveOutcome::Idle => {}
        }
        let after = self.player.animation();
        if after != before {
            self.events.push(GameEvent::AnimationChanged { from: before, to: after });
        }

        let triggers = resolve_triggers(&self.player.bounds(), &mut self.world);
        match &triggers {
            TriggerOutcome::None => {}
            TriggerOutcome::Collected(coins) => {
                for coin in coins {
                    self.score += 1;
                    self.events.push(GameEvent::CoinCollected {
                        coin: *coin,
                        score: self.score,
                    });
                }
            }
            TriggerOutcome::Won { .. } => {
                self.state = SessionState::Won;
                tracing::info!(id = %self.id, elapsed = self.elapsed, score = self.score, "session won");
                self.events.push(GameEvent::Won { elapsed: self.elapsed });
            }
            TriggerOutcome::Lost { .. } => {
                self.state = SessionState::Lost;
                tracing::info!(id = %self.id, elapsed = self.elapsed, score = self.score, "session lost");
                self.events.push(GameEvent::Lost { elapsed: self.elapsed });
            }
        }

        TickReport {
            state: self.state,
            elapsed: self.elapsed,
            movement: Some(movement),
            triggers,
        }
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// World mutations (coin removals) since the last drain.
    pub fn drain_world_events(&mut self) -> Vec<WorldEvent> {
        self.world.drain_events()
    }

    /// Non-fatal problems found while building: asset fallbacks and
    /// placement shortfalls.
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Seconds spent running; frozen once the session ends.
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Seed the maze and placements were drawn from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &GameConfig {
        &self.blueprint.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn placements(&self) -> &Placements {
        &self.placements
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Grid cell under the player's center.
    pub fn player_cell(&self) -> Option<Cell> {
        self.layout.cell_at(self.player.position())
    }
}

/// Fixed placements must be open interior cells, pairwise distinct and off
/// the start cell.
fn check_placements(grid: &Grid, start: Cell, placements: &Placements) -> Result<(), KernelError> {
    let mut seen = HashSet::from([start]);
    for cell in placements.all_cells() {
        if !grid.is_open(cell) || !grid.is_interior(cell) {
            return Err(KernelError::Config(format!("placement {cell} is not an open interior cell")));
        }
        if !seen.insert(cell) {
            return Err(KernelError::Config(format!("placement {cell} is used twice or is the start cell")));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materialize::Shortfall;
    use labyrinth_assets::{AssetError, AssetLoader, AssetRequest, LoadedAsset};
    use labyrinth_common::{Aabb, ObjectKind};

    const CORRIDOR: [&str; 3] = ["#######", "#     #", "#######"];
    const EAST: Vec3 = Vec3::X;

    fn corridor(goal: Cell, traps: Vec<Cell>, coins: Vec<Cell>) -> GameSession {
        let grid = Grid::from_rows(&CORRIDOR).unwrap();
        SessionBuilder::new(GameConfig::default())
            .with_grid(grid)
            .with_placements(Placements {
                goal,
                traps,
                coins,
                shortfall: Shortfall::default(),
            })
            .build()
            .unwrap()
    }

    fn seeded(seed: u64) -> GameConfig {
        GameConfig {
            seed: Some(seed),
            rows: 15,
            cols: 15,
            ..GameConfig::default()
        }
    }

    #[test]
    fn new_session_waits_for_start() {
        let mut s = GameSession::new(seeded(1)).unwrap();
        assert_eq!(s.state(), SessionState::NotStarted);
        let report = s.tick(0.1, &MoveIntent::toward(EAST, false));
        assert_eq!(report.movement, None);
        assert_eq!(s.elapsed(), 0.0);
        assert_eq!(s.player_cell(), Some(Cell::new(1, 1)));
    }

    #[test]
    fn start_only_from_not_started() {
        let mut s = GameSession::new(seeded(1)).unwrap();
        s.apply(Action::Start).unwrap();
        assert_eq!(s.state(), SessionState::Running);
        assert!(matches!(
            s.start(),
            Err(KernelError::InvalidTransition {
                from: SessionState::Running,
                ..
            })
        ));
        assert_eq!(s.drain_events(), vec![GameEvent::Started { session: s.id() }]);
    }

    #[test]
    fn noop_action_changes_nothing() {
        let mut s = GameSession::new(seeded(1)).unwrap();
        s.apply(Action::Noop).unwrap();
        assert_eq!(s.state(), SessionState::NotStarted);
        assert!(s.events().is_empty());
    }

    #[test]
    fn same_seed_builds_identical_worlds() {
        let a = GameSession::new(seeded(77)).unwrap();
        let b = GameSession::new(seeded(77)).unwrap();
        assert_eq!(a.grid(), b.grid());
        assert_eq!(a.placements(), b.placements());
        assert_eq!(a.world().state_hash(), b.world().state_hash());
        assert_ne!(a.id(), b.id());

        let c = GameSession::new(seeded(78)).unwrap();
        assert_ne!(a.world().state_hash(), c.world().state_hash());
    }

    #[test]
    fn unseeded_sessions_record_their_seed() {
        let s = GameSession::new(GameConfig::default()).unwrap();
        let replay = GameSession::new(GameConfig {
            seed: Some(s.seed()),
            ..GameConfig::default()
        })
        .unwrap();
        assert_eq!(s.grid(), replay.grid());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = GameSession::new(GameConfig {
            cols: 1,
            ..GameConfig::default()
        })
        .unwrap_err();
        assert!(matches!(err, KernelError::Maze(MazeError::InvalidGridDimensions { .. })));
    }

    #[test]
    fn walls_stop_the_player() {
        let mut s = corridor(Cell::new(1, 5), vec![], vec![]);
        s.start().unwrap();
        let start = s.player().position();
        // North of the corridor is solid.
        let mut blocked = false;
        for _ in 0..20 {
            let report = s.tick(0.1, &MoveIntent::toward(Vec3::NEG_Z, false));
            blocked |= matches!(report.movement, Some(MoveOutcome::Blocked { .. }));
        }
        assert!(blocked);
        assert_eq!(s.player().position().x, start.x);
        assert!(s.player().bounds().min.z >= 1.0 - 0.1);
    }

    #[test]
    fn coin_scores_once_and_disappears() {
        let coin_cell = Cell::new(1, 2);
        let mut s = corridor(Cell::new(1, 5), vec![], vec![coin_cell]);
        s.start().unwrap();
        assert_eq!(s.world().count_of(ObjectKind::Coin), 1);

        let mut collected = Vec::new();
        for _ in 0..10 {
            if let TriggerOutcome::Collected(ids) = s.tick(0.1, &MoveIntent::toward(EAST, false)).triggers {
                collected.extend(ids);
            }
        }
        assert_eq!(collected.len(), 1);
        assert_eq!(s.score(), 1);
        assert_eq!(s.world().count_of(ObjectKind::Coin), 0);
        assert_eq!(s.state(), SessionState::Running);
        assert!(s.events().iter().any(|e| matches!(e, GameEvent::CoinCollected { score: 1, .. })));
        let removed = s.drain_world_events();
        assert!(matches!(
            removed.as_slice(),
            [WorldEvent::Despawned { kind: ObjectKind::Coin, cell: Some(c), .. }] if *c == coin_cell
        ));
    }

    #[test]
    fn reaching_the_endpoint_wins_and_freezes_the_timer() {
        let mut s = corridor(Cell::new(1, 4), vec![], vec![Cell::new(1, 2)]);
        s.start().unwrap();
        let mut ticks = 0;
        while s.state() == SessionState::Running && ticks < 100 {
            s.tick(0.1, &MoveIntent::toward(EAST, false));
            ticks += 1;
        }
        assert_eq!(s.state(), SessionState::Won);
        assert_eq!(s.score(), 1);

        let frozen = s.elapsed();
        let position = s.player().position();
        let report = s.tick(0.1, &MoveIntent::toward(EAST, true));
        assert_eq!(report.state, SessionState::Won);
        assert_eq!(report.movement, None);
        assert_eq!(s.elapsed(), frozen);
        assert_eq!(s.player().position(), position);
        assert!(matches!(s.events().last(), Some(GameEvent::Won { elapsed }) if *elapsed == frozen));
    }

    #[test]
    fn stepping_onto_a_trap_loses_within_one_tick() {
        let trap_cell = Cell::new(1, 3);
        let mut s = corridor(Cell::new(1, 5), vec![trap_cell], vec![]);
        s.start().unwrap();
        let trap_bounds: Aabb = s
            .world()
            .objects()
            .values()
            .find(|o| o.kind == ObjectKind::Trap)
            .map(|o| o.bounds)
            .unwrap();

        let mut lost_on = None;
        for tick in 0..40 {
            s.tick(0.1, &MoveIntent::toward(EAST, false));
            if s.player().bounds().intersects(&trap_bounds) {
                assert_eq!(s.state(), SessionState::Lost, "overlap on tick {tick} did not end the session");
                lost_on = Some(tick);
                break;
            }
            assert_eq!(s.state(), SessionState::Running);
        }
        assert!(lost_on.is_some());

        let frozen = s.elapsed();
        let position = s.player().position();
        for _ in 0..5 {
            s.tick(0.1, &MoveIntent::toward(EAST, true));
        }
        assert_eq!(s.player().position(), position);
        assert_eq!(s.elapsed(), frozen);
        assert_eq!(s.state(), SessionState::Lost);
    }

    #[test]
    fn long_frames_are_clamped_for_movement_only() {
        let mut s = corridor(Cell::new(1, 5), vec![], vec![]);
        s.start().unwrap();
        let x0 = s.player().position().x;
        s.tick(2.0, &MoveIntent::toward(EAST, false));
        assert!((s.player().position().x - x0 - 5.0 * MAX_MOVE_DT).abs() < 1e-5);
        assert_eq!(s.elapsed(), 2.0);
        s.tick(f32::NAN, &MoveIntent::idle());
        assert_eq!(s.elapsed(), 2.0);
    }

    #[test]
    fn animation_changes_are_reported() {
        let mut s = corridor(Cell::new(1, 5), vec![], vec![]);
        s.start().unwrap();
        s.tick(0.05, &MoveIntent::toward(EAST, true));
        s.tick(0.05, &MoveIntent::idle());
        let changes: Vec<_> = s
            .events()
            .iter()
            .filter_map(|e| match e {
                GameEvent::AnimationChanged { to, .. } => Some(*to),
                _ => None,
            })
            .collect();
        assert_eq!(changes, vec![AnimationState::Running, AnimationState::Idle]);
    }

    #[test]
    fn restart_discards_progress() {
        let mut s = corridor(Cell::new(1, 4), vec![], vec![Cell::new(1, 2)]);
        s.start().unwrap();
        for _ in 0..40 {
            s.tick(0.1, &MoveIntent::toward(EAST, false));
        }
        assert_eq!(s.state(), SessionState::Won);
        let old = s.id();

        s.apply(Action::Restart).unwrap();
        assert_ne!(s.id(), old);
        assert_eq!(s.state(), SessionState::NotStarted);
        assert_eq!(s.score(), 0);
        assert_eq!(s.elapsed(), 0.0);
        assert_eq!(s.world().count_of(ObjectKind::Coin), 1);
        assert_eq!(s.player_cell(), Some(Cell::new(1, 1)));
        assert_eq!(s.events(), &[GameEvent::Restarted { session: s.id() }]);
        s.start().unwrap();
    }

    #[test]
    fn restart_with_fixed_seed_keeps_the_maze() {
        let mut s = GameSession::new(seeded(5)).unwrap();
        let grid = s.grid().clone();
        let hash = s.world().state_hash();
        s.restart().unwrap();
        assert_eq!(s.grid(), &grid);
        assert_eq!(s.world().state_hash(), hash);
    }

    #[test]
    fn bad_fixed_placements_are_rejected() {
        let grid = Grid::from_rows(&CORRIDOR).unwrap();
        let on_wall = SessionBuilder::new(GameConfig::default())
            .with_grid(grid.clone())
            .with_placements(Placements {
                goal: Cell::new(0, 3),
                traps: vec![],
                coins: vec![],
                shortfall: Shortfall::default(),
            })
            .build();
        assert!(matches!(on_wall, Err(KernelError::Config(_))));

        let on_start = SessionBuilder::new(GameConfig::default())
            .with_grid(grid)
            .with_placements(Placements {
                goal: Cell::new(1, 1),
                traps: vec![],
                coins: vec![],
                shortfall: Shortfall::default(),
            })
            .build();
        assert!(matches!(on_start, Err(KernelError::Config(_))));
    }

    #[test]
    fn shortfall_becomes_a_diagnostic() {
        let s = SessionBuilder::new(GameConfig {
            seed: Some(3),
            trap_count: 50,
            ..GameConfig::default()
        })
        .with_grid(Grid::from_rows(&CORRIDOR).unwrap())
        .build()
        .unwrap();
        assert!(s.placements().shortfall.traps > 0);
        assert_eq!(s.diagnostics().len(), 1);
    }

    struct OneMesh;

    impl AssetLoader for OneMesh {
        fn load(&self, request: &AssetRequest) -> Result<LoadedAsset, AssetError> {
            let bounds = match request.path.as_str() {
                "robot.glb" => Aabb::new(Vec3::new(-0.3, 0.0, -0.3), Vec3::new(0.3, 1.6, 0.3)),
                "wide.glb" => Aabb::new(Vec3::new(-1.2, 0.0, -1.2), Vec3::new(1.2, 3.0, 1.2)),
                "broken.glb" => Aabb::new(Vec3::new(-0.3, 0.0, -0.3), Vec3::new(0.3, f32::INFINITY, 0.3)),
                _ => {
                    return Err(AssetError::LoadFailure {
                        path: request.path.clone(),
                        reason: "no such file".into(),
                    });
                }
            };
            Ok(LoadedAsset {
                request: request.clone(),
                bounds: Some(bounds),
                byte_len: 0,
            })
        }
    }

    #[test]
    fn player_collider_comes_from_mesh_when_loaded() {
        let mut store = AssetStore::new();
        let robot = store.request(AssetRequest::mesh("robot.glb"));
        store.resolve_pending(&OneMesh);

        let s = SessionBuilder::new(seeded(1))
            .with_player_mesh(&store, robot, Vec3::ONE)
            .build()
            .unwrap();
        assert!((s.player().half_extents() - Vec3::new(0.3, 0.8, 0.3)).abs().max_element() < 1e-6);
        assert!((s.player().position().y - 0.8).abs() < 1e-6);
        assert!(s.diagnostics().is_empty());
    }

    #[test]
    fn missing_mesh_falls_back_to_config() {
        let mut store = AssetStore::new();
        let maze = store.request(AssetRequest::mesh("Maze.glb"));
        store.resolve_pending(&OneMesh);

        let s = SessionBuilder::new(seeded(1))
            .with_player_mesh(&store, maze, Vec3::ONE)
            .build()
            .unwrap();
        assert_eq!(s.player().half_extents(), Vec3::splat(0.5));
        assert_eq!(s.diagnostics().len(), 1);
        assert!(s.diagnostics()[0].contains("no such file"));
    }

    #[test]
    fn mesh_wider_than_a_corridor_falls_back_to_config() {
        let mut store = AssetStore::new();
        let wide = store.request(AssetRequest::mesh("wide.glb"));
        store.resolve_pending(&OneMesh);

        let mut s = SessionBuilder::new(seeded(1))
            .with_player_mesh(&store, wide, Vec3::ONE)
            .build()
            .unwrap();
        assert_eq!(s.player().half_extents(), Vec3::splat(0.5));
        assert_eq!(s.diagnostics().len(), 1);
        assert!(s.diagnostics()[0].contains("corridor"));

        // The configured collider still fits the maze, so the player can walk.
        let start = s.player().position();
        s.start().unwrap();
        for axis in [Vec3::X, Vec3::Z, Vec3::NEG_X, Vec3::NEG_Z] {
            s.tick(0.1, &MoveIntent::toward(axis, false));
        }
        assert_ne!(s.player().position(), start);
    }

    #[test]
    fn non_finite_mesh_bounds_fall_back_to_config() {
        let mut store = AssetStore::new();
        let broken = store.request(AssetRequest::mesh("broken.glb"));
        store.resolve_pending(&OneMesh);

        let s = SessionBuilder::new(seeded(1))
            .with_player_mesh(&store, broken, Vec3::ONE)
            .build()
            .unwrap();
        assert_eq!(s.player().half_extents(), Vec3::splat(0.5));
        assert_eq!(s.diagnostics().len(), 1);
        assert!(s.diagnostics()[0].contains("degenerate"));
    }
}
