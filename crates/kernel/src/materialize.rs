//! Turns a carved grid plus sampled placements into world volumes.

use glam::Vec3;
use labyrinth_common::{Aabb, ObjectKind};
use labyrinth_maze::{Cell, Grid, MazeError, OpenCellPool, shortest_path};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::GameConfig;
use crate::world::{World, WorldObject};

/// Footprint of a trigger volume relative to its cell, per axis.
const TRIGGER_FOOTPRINT: f32 = 0.5;

/// Grid-to-world mapping. Column maps to X, row maps to Z, the floor is at
/// Y = 0.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    pub cell_size: f32,
    pub wall_height: f32,
}

impl Layout {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            cell_size: config.cell_size,
            wall_height: config.wall_height,
        }
    }

    pub fn cell_center(&self, cell: Cell) -> Vec3 {
        Vec3::new(
            cell.col as f32 * self.cell_size,
            self.wall_height * 0.5,
            cell.row as f32 * self.cell_size,
        )
    }

    /// Full-cell box from the floor to `wall_height`.
    pub fn cell_bounds(&self, cell: Cell) -> Aabb {
        let half = Vec3::new(self.cell_size * 0.5, self.wall_height * 0.5, self.cell_size * 0.5);
        Aabb::from_center(self.cell_center(cell), half)
    }

    /// Trigger box centered in its cell, narrower than the corridor so the
    /// player has to walk into the cell to touch it.
    pub fn trigger_bounds(&self, cell: Cell) -> Aabb {
        let side = self.cell_size * TRIGGER_FOOTPRINT * 0.5;
        let half = Vec3::new(side, self.wall_height * 0.5, side);
        Aabb::from_center(self.cell_center(cell), half)
    }

    /// Grid cell containing a world-space point, if it is on the grid.
    pub fn cell_at(&self, point: Vec3) -> Option<Cell> {
        let col = (point.x / self.cell_size + 0.5).floor();
        let row = (point.z / self.cell_size + 0.5).floor();
        (col >= 0.0 && row >= 0.0).then(|| Cell::new(row as usize, col as usize))
    }
}

/// How many requested entities could not be placed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub traps: usize,
    pub coins: usize,
}

impl Shortfall {
    pub fn is_empty(&self) -> bool {
        self.traps == 0 && self.coins == 0
    }
}

/// Cells chosen for the special entities. Pairwise disjoint and never the
/// start cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placements {
    pub goal: Cell,
    pub traps: Vec<Cell>,
    pub coins: Vec<Cell>,
    pub shortfall: Shortfall,
}

impl Placements {
    pub fn all_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        std::iter::once(self.goal)
            .chain(self.traps.iter().copied())
            .chain(self.coins.iter().copied())
    }
}

/// Sample the goal, traps and coins from one pool of open interior cells.
///
/// The goal is drawn first and is mandatory. With `keep_path_clear` the
/// cells of the start-to-goal path are withheld from trap sampling (coins
/// may still land on it). Traps and coins that do not fit are an error under
/// `strict_placement` and a logged shortfall otherwise.
pub fn plan_placements<R: Rng + ?Sized>(
    grid: &Grid,
    start: Cell,
    config: &GameConfig,
    rng: &mut R,
) -> Result<Placements, MazeError> {
    let mut pool = OpenCellPool::from_grid(grid);
    pool.remove(start);

    let goal = pool.sample(rng).ok_or(MazeError::PlacementExhausted {
        requested: 1,
        available: 0,
    })?;

    let mut trap_pool = pool.clone();
    if config.keep_path_clear {
        let corridor: HashSet<Cell> = shortest_path(grid, start, goal)
            .unwrap_or_default()
            .into_iter()
            .collect();
        trap_pool.retain(|c| !corridor.contains(c));
    }

    let traps = draw(&mut trap_pool, config.trap_count, config.strict_placement, "trap", rng)?;
    for cell in &traps {
        pool.remove(*cell);
    }
    let coins = draw(&mut pool, config.coin_count, config.strict_placement, "coin", rng)?;

    let shortfall = Shortfall {
        traps: config.trap_count - traps.len(),
        coins: config.coin_count - coins.len(),
    };
    tracing::debug!(%goal, traps = traps.len(), coins = coins.len(), "placements planned");
    Ok(Placements {
        goal,
        traps,
        coins,
        shortfall,
    })
}

fn draw<R: Rng + ?Sized>(
    pool: &mut OpenCellPool,
    count: usize,
    strict: bool,
    what: &str,
    rng: &mut R,
) -> Result<Vec<Cell>, MazeError> {
    if strict {
        return pool.sample_many(count, rng);
    }
    let cells = pool.sample_up_to(count, rng);
    if cells.len() < count {
        tracing::warn!(
            kind = what,
            requested = count,
            placed = cells.len(),
            "not enough open cells; placing fewer"
        );
    }
    Ok(cells)
}

/// Counts of the volumes spawned by [`materialize`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaterializeStats {
    pub walls: usize,
    pub traps: usize,
    pub coins: usize,
    pub endpoints: usize,
}

/// Spawn one wall volume per wall cell, then the endpoint, traps and coins.
pub fn materialize(grid: &Grid, placements: &Placements, layout: &Layout, world: &mut World) -> MaterializeStats {
    let _span = tracing::debug_span!("materialize", rows = grid.rows(), cols = grid.cols()).entered();
    let mut stats = MaterializeStats::default();

    for cell in grid.wall_cells() {
        world.spawn(WorldObject::new(ObjectKind::Wall, layout.cell_bounds(cell)).in_cell(cell));
        stats.walls += 1;
    }

    let mut trigger = |kind: ObjectKind, cell: Cell| {
        world.spawn(WorldObject::new(kind, layout.trigger_bounds(cell)).in_cell(cell));
    };
    trigger(ObjectKind::Endpoint, placements.goal);
    stats.endpoints += 1;
    for cell in &placements.traps {
        trigger(ObjectKind::Trap, *cell);
        stats.traps += 1;
    }
    for cell in &placements.coins {
        trigger(ObjectKind::Coin, *cell);
        stats.coins += 1;
    }

    tracing::debug!(?stats, "world materialized");
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use labyrinth_maze::generate;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn layout() -> Layout {
        Layout {
            cell_size: 2.0,
            wall_height: 2.0,
        }
    }

    #[test]
    fn cell_center_maps_col_to_x_and_row_to_z() {
        let l = layout();
        assert_eq!(l.cell_center(Cell::new(3, 5)), Vec3::new(10.0, 1.0, 6.0));
        let b = l.cell_bounds(Cell::new(0, 0));
        assert_eq!(b.min, Vec3::new(-1.0, 0.0, -1.0));
        assert_eq!(b.max, Vec3::new(1.0, 2.0, 1.0));
    }

    #[test]
    fn trigger_sits_inside_its_cell() {
        let l = layout();
        let cell = Cell::new(1, 1);
        let t = l.trigger_bounds(cell);
        let c = l.cell_bounds(cell);
        assert!(t.min.x > c.min.x && t.max.x < c.max.x);
        assert!(t.min.z > c.min.z && t.max.z < c.max.z);
        assert_eq!(t.center(), c.center());
    }

    #[test]
    fn cell_at_inverts_cell_center() {
        let l = layout();
        for cell in [Cell::new(0, 0), Cell::new(1, 7), Cell::new(9, 3)] {
            assert_eq!(l.cell_at(l.cell_center(cell)), Some(cell));
        }
        assert_eq!(l.cell_at(Vec3::new(-5.0, 0.0, 0.0)), None);
    }

    #[test]
    fn placements_are_disjoint_and_avoid_start() {
        let grid = generate(21, 21, Cell::new(1, 1), 9).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let p = plan_placements(&grid, Cell::new(1, 1), &GameConfig::default(), &mut rng).unwrap();
        let cells: Vec<Cell> = p.all_cells().collect();
        let unique: HashSet<Cell> = cells.iter().copied().collect();
        assert_eq!(cells.len(), 1 + 3 + 5);
        assert_eq!(unique.len(), cells.len());
        assert!(!unique.contains(&Cell::new(1, 1)));
        assert!(cells.iter().all(|c| grid.is_open(*c) && grid.is_interior(*c)));
        assert!(p.shortfall.is_empty());
    }

    #[test]
    fn traps_stay_off_the_solution_path() {
        let grid = generate(15, 15, Cell::new(1, 1), 4).unwrap();
        let config = GameConfig {
            trap_count: 20,
            ..GameConfig::default()
        };
        for seed in 0..10 {
            let mut rng = StdRng::seed_from_u64(seed);
            let p = plan_placements(&grid, Cell::new(1, 1), &config, &mut rng).unwrap();
            let path = shortest_path(&grid, Cell::new(1, 1), p.goal).unwrap();
            assert!(p.traps.iter().all(|t| !path.contains(t)));
        }
    }

    #[test]
    fn shortfall_is_recorded_when_lenient() {
        let grid = Grid::from_rows(&["#####", "#   #", "#####"]).unwrap();
        let config = GameConfig {
            trap_count: 2,
            coin_count: 2,
            keep_path_clear: false,
            ..GameConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        let p = plan_placements(&grid, Cell::new(1, 1), &config, &mut rng).unwrap();
        // Three open cells: start, goal and one more.
        assert_eq!(p.traps.len() + p.coins.len(), 1);
        assert_eq!(p.shortfall.traps + p.shortfall.coins, 3);
    }

    #[test]
    fn shortfall_is_an_error_when_strict() {
        let grid = Grid::from_rows(&["#####", "#   #", "#####"]).unwrap();
        let config = GameConfig {
            trap_count: 5,
            strict_placement: true,
            keep_path_clear: false,
            ..GameConfig::default()
        };
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            plan_placements(&grid, Cell::new(1, 1), &config, &mut rng),
            Err(MazeError::PlacementExhausted { requested: 5, available: 1 })
        ));
    }

    #[test]
    fn missing_goal_is_always_an_error() {
        let grid = Grid::from_rows(&["###", "# #", "###"]).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert!(matches!(
            plan_placements(&grid, Cell::new(1, 1), &GameConfig::default(), &mut rng),
            Err(MazeError::PlacementExhausted { requested: 1, .. })
        ));
    }

    #[test]
    fn materialize_spawns_every_volume() {
        let grid = generate(11, 11, Cell::new(1, 1), 2).unwrap();
        let mut rng = StdRng::seed_from_u64(2);
        let p = plan_placements(&grid, Cell::new(1, 1), &GameConfig::default(), &mut rng).unwrap();
        let mut world = World::new(2.0);
        let stats = materialize(&grid, &p, &layout(), &mut world);

        assert_eq!(stats.walls, grid.wall_cells().count());
        assert_eq!(stats.endpoints, 1);
        assert_eq!(world.count_of(ObjectKind::Wall), stats.walls);
        assert_eq!(world.count_of(ObjectKind::Trap), p.traps.len());
        assert_eq!(world.count_of(ObjectKind::Coin), p.coins.len());
        assert_eq!(world.len(), stats.walls + stats.traps + stats.coins + stats.endpoints);
    }

    #[test]
    fn open_cells_have_no_blocking_volume() {
        let grid = generate(11, 11, Cell::new(1, 1), 3).unwrap();
        let mut rng = StdRng::seed_from_u64(3);
        let p = plan_placements(&grid, Cell::new(1, 1), &GameConfig::default(), &mut rng).unwrap();
        let mut world = World::new(2.0);
        let l = layout();
        materialize(&grid, &p, &l, &mut world);
        for cell in grid.open_cells() {
            let probe = Aabb::from_center(l.cell_center(cell), Vec3::splat(0.5));
            assert_eq!(world.first_blocker(&probe), None, "cell {cell} is blocked");
        }
    }
}
