use glam::Vec3;
use labyrinth_common::{Aabb, ObjectId};
use std::collections::{BTreeSet, HashMap};

/// A 2D cell coordinate in the partition (the Y axis is ignored).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellCoord {
    pub x: i32,
    pub z: i32,
}

impl CellCoord {
    pub fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }
}

/// Fixed-size grid partitioning of the world.
///
/// Objects are registered in every cell their XZ footprint overlaps, so a
/// box query only has to look at the cells the box itself covers.
#[derive(Debug, Clone)]
pub struct CellPartition {
    cell_size: f32,
    cells: HashMap<CellCoord, BTreeSet<ObjectId>>,
}

impl CellPartition {
    /// Create a new partition with the given cell size.
    pub fn new(cell_size: f32) -> Self {
        assert!(cell_size > 0.0, "cell_size must be positive");
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    /// Cell size used for this partition.
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Convert a world position to a cell coordinate.
    pub fn position_to_cell(&self, pos: Vec3) -> CellCoord {
        CellCoord {
            x: (pos.x / self.cell_size).floor() as i32,
            z: (pos.z / self.cell_size).floor() as i32,
        }
    }

    /// Register `id` in every cell covered by `bounds`.
    pub fn insert(&mut self, id: ObjectId, bounds: &Aabb) {
        for coord in self.covered(bounds) {
            self.cells.entry(coord).or_default().insert(id);
        }
    }

    /// Unregister `id` from the cells covered by `bounds`. Emptied cells are
    /// dropped.
    pub fn remove(&mut self, id: ObjectId, bounds: &Aabb) {
        for coord in self.covered(bounds) {
            if let Some(set) = self.cells.get_mut(&coord) {
                set.remove(&id);
                if set.is_empty() {
                    self.cells.remove(&coord);
                }
            }
        }
    }

    /// Candidate ids whose cells intersect the footprint of `bounds`.
    pub fn query(&self, bounds: &Aabb) -> BTreeSet<ObjectId> {
        let mut result = BTreeSet::new();
        for coord in self.covered(bounds) {
            if let Some(ids) = self.cells.get(&coord) {
                result.extend(ids.iter().copied());
            }
        }
        tracing::trace!(candidates = result.len(), "partition query");
        result
    }

    /// Get all ids registered in a specific cell.
    pub fn entities_in_cell(&self, coord: CellCoord) -> BTreeSet<ObjectId> {
        self.cells.get(&coord).cloned().unwrap_or_default()
    }

    /// Get all ids within a radius (in cells) of a center cell.
    pub fn entities_in_radius(&self, center: CellCoord, radius: i32) -> BTreeSet<ObjectId> {
        let mut result = BTreeSet::new();
        for dx in -radius..=radius {
            for dz in -radius..=radius {
                let coord = CellCoord::new(center.x + dx, center.z + dz);
                if let Some(ids) = self.cells.get(&coord) {
                    result.extend(ids.iter().copied());
                }
            }
        }
        result
    }

    /// Number of non-empty cells.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Total number of id placements across all cells.
    pub fn total_placements(&self) -> usize {
        self.cells.values().map(|s| s.len()).sum()
    }

    fn covered(&self, bounds: &Aabb) -> impl Iterator<Item = CellCoord> + use<> {
        let lo = self.position_to_cell(bounds.min);
        let hi = self.position_to_cell(bounds.max);
        (lo.x..=hi.x).flat_map(move |x| (lo.z..=hi.z).map(move |z| CellCoord::new(x, z)))
    }
}
