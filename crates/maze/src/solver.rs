use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet, VecDeque};

use crate::grid::{Cell, Grid};

/// Shortest open-cell path from `from` to `to`, both ends included.
///
/// Breadth-first search over edge adjacency. In a perfect maze this is the
/// unique simple path. `None` when either end is wall or they are not
/// connected.
pub fn shortest_path(grid: &Grid, from: Cell, to: Cell) -> Option<Vec<Cell>> {
    if grid.is_wall(from) || grid.is_wall(to) {
        return None;
    }

    let mut came_from: HashMap<Cell, Cell> = HashMap::new();
    let mut queue = VecDeque::new();
    came_from.insert(from, from);
    queue.push_back(from);

    while let Some(cell) = queue.pop_front() {
        if cell == to {
            let mut path = vec![to];
            let mut current = to;
            while current != from {
                current = came_from[&current];
                path.push(current);
            }
            path.reverse();
            return Some(path);
        }
        for next in grid.open_neighbors(cell) {
            if let Entry::Vacant(e) = came_from.entry(next) {
                e.insert(cell);
                queue.push_back(next);
            }
        }
    }
    None
}

/// Every open cell reachable from `from` through open adjacency.
pub fn reachable_from(grid: &Grid, from: Cell) -> HashSet<Cell> {
    let mut seen = HashSet::new();
    if grid.is_wall(from) {
        return seen;
    }
    let mut stack = vec![from];
    while let Some(cell) = stack.pop() {
        if !seen.insert(cell) {
            continue;
        }
        stack.extend(grid.open_neighbors(cell).into_iter().filter(|n| !seen.contains(n)));
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carver::generate;

    #[test]
    fn path_connects_opposite_corners() {
        let grid = generate(15, 15, Cell::new(1, 1), 8).unwrap();
        let goal = Cell::new(13, 13);
        let path = shortest_path(&grid, Cell::new(1, 1), goal).unwrap();
        assert_eq!(path[0], Cell::new(1, 1));
        assert_eq!(*path.last().unwrap(), goal);
        for pair in path.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            assert_eq!(a.row.abs_diff(b.row) + a.col.abs_diff(b.col), 1);
            assert!(grid.is_open(b));
        }
    }

    #[test]
    fn path_to_self_is_single_cell() {
        let grid = generate(5, 5, Cell::new(1, 1), 0).unwrap();
        assert_eq!(
            shortest_path(&grid, Cell::new(1, 1), Cell::new(1, 1)),
            Some(vec![Cell::new(1, 1)])
        );
    }

    #[test]
    fn no_path_into_walls() {
        let grid = generate(5, 5, Cell::new(1, 1), 0).unwrap();
        assert_eq!(shortest_path(&grid, Cell::new(1, 1), Cell::new(0, 0)), None);
        assert!(reachable_from(&grid, Cell::new(0, 0)).is_empty());
    }

    #[test]
    fn reachable_covers_whole_maze() {
        let grid = generate(21, 21, Cell::new(1, 1), 77).unwrap();
        assert_eq!(reachable_from(&grid, Cell::new(1, 1)).len(), grid.open_count());
    }
}
