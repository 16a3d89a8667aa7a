use rand::Rng;

use crate::error::MazeError;
use crate::grid::{Cell, Grid};

/// Pool of open, non-border cells consumed by sampling without replacement.
///
/// Every cell handed out is removed, so repeated draws against one pool are
/// disjoint and no two placed entities can share a cell.
#[derive(Debug, Clone, Default)]
pub struct OpenCellPool {
    cells: Vec<Cell>,
}

impl OpenCellPool {
    /// Collect every open cell not on the outer border, in row-major order.
    pub fn from_grid(grid: &Grid) -> Self {
        Self {
            cells: grid.open_cells().filter(|c| grid.is_interior(*c)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Withdraw a specific cell so it can never be sampled. Returns whether it
    /// was present.
    pub fn remove(&mut self, cell: Cell) -> bool {
        match self.cells.iter().position(|c| *c == cell) {
            Some(i) => {
                self.cells.swap_remove(i);
                true
            }
            None => false,
        }
    }

    /// Keep only the cells matching `keep`.
    pub fn retain(&mut self, keep: impl FnMut(&Cell) -> bool) {
        self.cells.retain(keep);
    }

    /// Remove and return one uniformly random cell, or `None` once exhausted.
    pub fn sample<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Cell> {
        if self.cells.is_empty() {
            return None;
        }
        let i = rng.gen_range(0..self.cells.len());
        Some(self.cells.swap_remove(i))
    }

    /// Draw exactly `count` cells, or fail without consuming anything.
    pub fn sample_many<R: Rng + ?Sized>(
        &mut self,
        count: usize,
        rng: &mut R,
    ) -> Result<Vec<Cell>, MazeError> {
        if count > self.cells.len() {
            return Err(MazeError::PlacementExhausted {
                requested: count,
                available: self.cells.len(),
            });
        }
        Ok(self.sample_up_to(count, rng))
    }

    /// Draw up to `count` cells; fewer when the pool runs dry.
    pub fn sample_up_to<R: Rng + ?Sized>(&mut self, count: usize, rng: &mut R) -> Vec<Cell> {
        let mut out = Vec::with_capacity(count.min(self.cells.len()));
        while out.len() < count {
            match self.sample(rng) {
                Some(cell) => out.push(cell),
                None => break,
            }
        }
        out
    }
}
