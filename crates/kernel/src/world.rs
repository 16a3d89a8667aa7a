use labyrinth_common::{Aabb, ObjectId, ObjectKind, Transform};
use labyrinth_maze::Cell;
use labyrinth_spatial::CellPartition;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A record produced by every mutation to the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum WorldEvent {
    Spawned { id: ObjectId, kind: ObjectKind },
    /// Carries the removed object's kind and cell so observers can update
    /// without looking the id up.
    Despawned {
        id: ObjectId,
        kind: ObjectKind,
        cell: Option<Cell>,
    },
}

/// One static volume in the maze.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldObject {
    pub kind: ObjectKind,
    pub transform: Transform,
    /// World-space bounds, fixed at spawn time.
    pub bounds: Aabb,
    /// Grid cell this object was placed from, if any.
    pub cell: Option<Cell>,
}

impl WorldObject {
    pub fn new(kind: ObjectKind, bounds: Aabb) -> Self {
        Self {
            kind,
            transform: Transform::at(bounds.center()),
            bounds,
            cell: None,
        }
    }

    pub fn in_cell(mut self, cell: Cell) -> Self {
        self.cell = Some(cell);
        self
    }
}

/// The authoritative set of static volumes for one session.
///
/// Objects live in a `BTreeMap` keyed by sequential ids, so iteration and
/// overlap results come back in spawn order on every platform. A
/// [`CellPartition`] mirrors the map for broad-phase queries; both are
/// updated together on every spawn and despawn.
#[derive(Debug, Clone)]
pub struct World {
    objects: BTreeMap<ObjectId, WorldObject>,
    partition: CellPartition,
    next_id: u64,
    event_log: Vec<WorldEvent>,
}

impl World {
    /// Empty world whose partition uses `cell_size`, normally the maze's
    /// world-space cell size.
    pub fn new(cell_size: f32) -> Self {
        Self {
            objects: BTreeMap::new(),
            partition: CellPartition::new(cell_size),
            next_id: 0,
            event_log: Vec::new(),
        }
    }

    pub fn spawn(&mut self, object: WorldObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.partition.insert(id, &object.bounds);
        self.event_log.push(WorldEvent::Spawned {
            id,
            kind: object.kind,
        });
        self.objects.insert(id, object);
        id
    }

    /// Remove an object from the map and the partition. Returns it if it
    /// existed.
    pub fn despawn(&mut self, id: ObjectId) -> Option<WorldObject> {
        let object = self.objects.remove(&id)?;
        self.partition.remove(id, &object.bounds);
        self.event_log.push(WorldEvent::Despawned {
            id,
            kind: object.kind,
            cell: object.cell,
        });
        Some(object)
    }

    pub fn get(&self, id: ObjectId) -> Option<&WorldObject> {
        self.objects.get(&id)
    }

    pub fn objects(&self) -> &BTreeMap<ObjectId, WorldObject> {
        &self.objects
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn count_of(&self, kind: ObjectKind) -> usize {
        self.objects.values().filter(|o| o.kind == kind).count()
    }

    pub fn partition(&self) -> &CellPartition {
        &self.partition
    }

    /// Ids of every object whose bounds intersect `bounds`, in id order.
    ///
    /// Broad phase through the partition, then an exact box test.
    pub fn overlapping(&self, bounds: &Aabb) -> Vec<ObjectId> {
        self.partition
            .query(bounds)
            .into_iter()
            .filter(|id| {
                self.objects
                    .get(id)
                    .is_some_and(|o| o.bounds.intersects(bounds))
            })
            .collect()
    }

    /// Lowest-id movement-blocking object intersecting `bounds`.
    pub fn first_blocker(&self, bounds: &Aabb) -> Option<ObjectId> {
        self.overlapping(bounds)
            .into_iter()
            .find(|id| self.objects[id].kind.blocks_movement())
    }

    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// FNV-1a over the canonical object order. Two worlds built from the
    /// same grid and placements hash equal.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325;
        let mut mix = |bytes: &[u8]| {
            for &b in bytes {
                h ^= b as u64;
                h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        for (id, object) in &self.objects {
            mix(&id.0.to_le_bytes());
            mix(&[object.kind as u8]);
            for v in [object.bounds.min, object.bounds.max] {
                mix(&v.x.to_le_bytes());
                mix(&v.y.to_le_bytes());
                mix(&v.z.to_le_bytes());
            }
        }
        h
    }
}
