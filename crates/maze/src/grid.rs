use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::MazeError;

/// A grid coordinate: `row` indexes the Z axis of the world, `col` the X axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Cell at a signed offset, or `None` if it would leave the first quadrant.
    pub fn offset(self, d_col: isize, d_row: isize) -> Option<Cell> {
        let row = self.row.checked_add_signed(d_row)?;
        let col = self.col.checked_add_signed(d_col)?;
        Some(Cell { row, col })
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A `rows x cols` boolean grid where `true` is wall and `false` is open path.
///
/// Allocated all-wall. Only the carver or [`Grid::from_rows`] open cells;
/// after that the grid is read-only input to placement and materialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    rows: usize,
    cols: usize,
    walls: Vec<bool>,
}

impl Grid {
    /// Smallest accepted dimension on either axis.
    pub const MIN_DIMENSION: usize = 3;

    /// All-wall grid. Rejects dimensions below [`Grid::MIN_DIMENSION`].
    ///
    /// Even dimensions are accepted; the carver only opens odd-aligned cells,
    /// so the trailing even row or column stays solid next to the border.
    pub fn filled(rows: usize, cols: usize) -> Result<Self, MazeError> {
        if rows < Self::MIN_DIMENSION || cols < Self::MIN_DIMENSION {
            return Err(MazeError::InvalidGridDimensions { rows, cols });
        }
        let len = rows
            .checked_mul(cols)
            .ok_or(MazeError::InvalidGridDimensions { rows, cols })?;
        Ok(Self {
            rows,
            cols,
            walls: vec![true; len],
        })
    }

    /// Parse a hand-authored layout: `#` is wall, space or `.` is open.
    ///
    /// Rows must all have the same width. Lets fixed levels bypass the carver.
    pub fn from_rows<S: AsRef<str>>(lines: &[S]) -> Result<Self, MazeError> {
        let rows = lines.len();
        let cols = lines.first().map(|l| l.as_ref().chars().count()).unwrap_or(0);
        let mut grid = Self::filled(rows, cols)?;
        for (row, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            if line.chars().count() != cols {
                return Err(MazeError::InvalidLayout {
                    row,
                    reason: format!("expected {cols} columns"),
                });
            }
            for (col, ch) in line.chars().enumerate() {
                match ch {
                    '#' => {}
                    ' ' | '.' => grid.open(Cell::new(row, col)),
                    other => {
                        return Err(MazeError::InvalidLayout {
                            row,
                            reason: format!("unexpected character {other:?}"),
                        });
                    }
                }
            }
        }
        Ok(grid)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row < self.rows && cell.col < self.cols
    }

    /// Inside the outer border.
    pub fn is_interior(&self, cell: Cell) -> bool {
        cell.row > 0 && cell.col > 0 && cell.row + 1 < self.rows && cell.col + 1 < self.cols
    }

    pub fn is_border(&self, cell: Cell) -> bool {
        self.in_bounds(cell) && !self.is_interior(cell)
    }

    /// Out-of-bounds cells read as wall.
    pub fn is_wall(&self, cell: Cell) -> bool {
        match self.index(cell) {
            Some(i) => self.walls[i],
            None => true,
        }
    }

    pub fn is_open(&self, cell: Cell) -> bool {
        !self.is_wall(cell)
    }

    pub(crate) fn open(&mut self, cell: Cell) {
        if let Some(i) = self.index(cell) {
            self.walls[i] = false;
        }
    }

    /// Every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows).flat_map(move |row| (0..self.cols).map(move |col| Cell::new(row, col)))
    }

    /// Open cells in row-major order.
    pub fn open_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells().filter(|c| self.is_open(*c))
    }

    /// Wall cells in row-major order.
    pub fn wall_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells().filter(|c| self.is_wall(*c))
    }

    pub fn open_count(&self) -> usize {
        self.walls.iter().filter(|w| !**w).count()
    }

    /// Open cells sharing an edge with `cell`.
    pub fn open_neighbors(&self, cell: Cell) -> Vec<Cell> {
        [(0, -1), (1, 0), (0, 1), (-1, 0)]
            .into_iter()
            .filter_map(|(dx, dy)| cell.offset(dx, dy))
            .filter(|n| self.is_open(*n))
            .collect()
    }

    /// Number of distinct edge-adjacent pairs of open cells.
    ///
    /// For a perfect maze this equals `open_count() - 1`.
    pub fn adjacent_open_pairs(&self) -> usize {
        self.open_cells()
            .map(|c| {
                let right = Cell::new(c.row, c.col + 1);
                let down = Cell::new(c.row + 1, c.col);
                usize::from(self.is_open(right)) + usize::from(self.is_open(down))
            })
            .sum()
    }

    fn index(&self, cell: Cell) -> Option<usize> {
        self.in_bounds(cell).then(|| cell.row * self.cols + cell.col)
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.rows {
            for col in 0..self.cols {
                let ch = if self.is_wall(Cell::new(row, col)) { '#' } else { ' ' };
                write!(f, "{ch}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
