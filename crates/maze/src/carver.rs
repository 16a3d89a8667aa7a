use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use crate::error::MazeError;
use crate::grid::{Cell, Grid};

/// One of the four carving directions, as a `(dx, dy)` unit offset where
/// `x` is the column axis and `y` the row axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Canonical order before shuffling.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn offset(self) -> (isize, isize) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    /// A freshly shuffled copy of [`Direction::ALL`].
    pub fn shuffled<R: Rng + ?Sized>(rng: &mut R) -> [Direction; 4] {
        let mut dirs = Self::ALL;
        dirs.shuffle(rng);
        dirs
    }
}

/// A pending visit: the cell, its shuffled directions and how many of them
/// have been tried. Mirrors one activation of the recursive formulation.
struct Frame {
    cell: Cell,
    dirs: [Direction; 4],
    next: usize,
}

impl Frame {
    fn enter<R: Rng + ?Sized>(cell: Cell, rng: &mut R) -> Self {
        Self {
            cell,
            dirs: Direction::shuffled(rng),
            next: 0,
        }
    }

    fn next_direction(&mut self) -> Option<Direction> {
        let dir = self.dirs.get(self.next).copied()?;
        self.next += 1;
        Some(dir)
    }
}

/// Carve a perfect maze into `grid` by randomized depth-first backtracking.
///
/// Opens `start`, then for each direction in a freshly shuffled order looks
/// two cells away; an interior neighbour that is still wall gets itself and
/// the cell in between opened and is descended into. Neighbours outside the
/// interior or already open are skipped.
///
/// The traversal uses an explicit stack whose frames consume the RNG in the
/// same order the recursive formulation would, so the result depends only on
/// the shuffle outputs. `start` must be an interior cell with odd row and
/// column.
pub fn carve<R: Rng + ?Sized>(grid: &mut Grid, start: Cell, rng: &mut R) -> Result<(), MazeError> {
    if !grid.is_interior(start) || start.row % 2 == 0 || start.col % 2 == 0 {
        return Err(MazeError::InvalidStart {
            row: start.row,
            col: start.col,
        });
    }

    grid.open(start);
    let mut stack = vec![Frame::enter(start, rng)];
    let mut deepest = 1usize;

    while let Some(frame) = stack.last_mut() {
        let Some(dir) = frame.next_direction() else {
            stack.pop();
            continue;
        };
        let cell = frame.cell;
        let (dx, dy) = dir.offset();
        let (Some(between), Some(next)) = (cell.offset(dx, dy), cell.offset(dx * 2, dy * 2)) else {
            continue;
        };
        if grid.is_interior(next) && grid.is_wall(next) {
            grid.open(between);
            grid.open(next);
            stack.push(Frame::enter(next, rng));
            deepest = deepest.max(stack.len());
        }
    }

    tracing::debug!(
        rows = grid.rows(),
        cols = grid.cols(),
        open = grid.open_count(),
        depth = deepest,
        "maze carved"
    );
    Ok(())
}

/// Allocate a `rows x cols` grid and carve it from `start` with a seeded RNG.
pub fn generate(rows: usize, cols: usize, start: Cell, seed: u64) -> Result<Grid, MazeError> {
    let mut grid = Grid::filled(rows, cols)?;
    let mut rng = StdRng::seed_from_u64(seed);
    carve(&mut grid, start, &mut rng)?;
    Ok(grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solver::reachable_from;

    const START: Cell = Cell { row: 1, col: 1 };

    /// Straightforward recursive formulation, used as the reference order.
    fn carve_recursive(grid: &mut Grid, cell: Cell, rng: &mut StdRng) {
        grid.open(cell);
        for dir in Direction::shuffled(rng) {
            let (dx, dy) = dir.offset();
            let (Some(between), Some(next)) = (cell.offset(dx, dy), cell.offset(dx * 2, dy * 2))
            else {
                continue;
            };
            if grid.is_interior(next) && grid.is_wall(next) {
                grid.open(between);
                carve_recursive(grid, next, rng);
            }
        }
    }

    fn assert_perfect(grid: &Grid) {
        let open = grid.open_count();
        let reachable = reachable_from(grid, START);
        assert_eq!(reachable.len(), open, "every open cell reachable from start");
        assert_eq!(grid.adjacent_open_pairs(), open - 1, "open cells form a tree");
        assert!(grid.cells().filter(|c| grid.is_border(*c)).all(|c| grid.is_wall(c)));
    }

    #[test]
    fn perfect_maze_for_many_sizes_and_seeds() {
        for (rows, cols) in [(3, 3), (5, 5), (7, 11), (21, 21), (20, 20), (4, 9), (31, 17)] {
            for seed in 0..8 {
                let grid = generate(rows, cols, START, seed).unwrap();
                assert_perfect(&grid);
            }
        }
    }

    #[test]
    fn odd_grid_opens_every_odd_cell() {
        let grid = generate(11, 15, START, 3).unwrap();
        for row in (1..11).step_by(2) {
            for col in (1..15).step_by(2) {
                assert!(grid.is_open(Cell::new(row, col)), "({row}, {col})");
            }
        }
        // 5 x 7 rooms, each a node of a spanning tree: rooms + (rooms - 1) links.
        assert_eq!(grid.open_count(), 35 + 34);
    }

    #[test]
    fn same_seed_same_grid() {
        let a = generate(21, 21, START, 42).unwrap();
        let b = generate(21, 21, START, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_diverge() {
        let a = generate(21, 21, START, 1).unwrap();
        let b = generate(21, 21, START, 2).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn explicit_stack_matches_recursive_order() {
        for seed in 0..16 {
            let iterative = generate(25, 19, START, seed).unwrap();

            let mut recursive = Grid::filled(25, 19).unwrap();
            let mut rng = StdRng::seed_from_u64(seed);
            carve_recursive(&mut recursive, START, &mut rng);

            assert_eq!(iterative, recursive, "seed {seed}");
        }
    }

    #[test]
    fn large_maze_does_not_overflow_the_call_stack() {
        let grid = generate(401, 401, START, 9).unwrap();
        assert_eq!(grid.open_count(), 200 * 200 * 2 - 1);
    }

    #[test]
    fn rejects_misaligned_or_border_start() {
        let mut grid = Grid::filled(9, 9).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            carve(&mut grid, Cell::new(2, 1), &mut rng),
            Err(MazeError::InvalidStart { row: 2, col: 1 })
        );
        assert!(carve(&mut grid, Cell::new(0, 0), &mut rng).is_err());
        assert!(carve(&mut grid, Cell::new(9, 9), &mut rng).is_err());
        assert_eq!(grid.open_count(), 0);
    }

    #[test]
    fn other_odd_starts_also_carve_everything() {
        let grid = generate(15, 15, Cell::new(7, 5), 11).unwrap();
        let reachable = reachable_from(&grid, Cell::new(7, 5));
        assert_eq!(reachable.len(), grid.open_count());
        assert!(grid.is_open(START));
    }
}
