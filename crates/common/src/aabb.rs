use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box.
///
/// Defined by its minimum and maximum corners. Overlap tests are inclusive:
/// boxes that share only a face count as overlapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

impl Aabb {
    /// Box spanning the two corners, in any order.
    pub fn new(a: Vec3, b: Vec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Box centered on `center` extending `half_extents` along each axis.
    pub fn from_center(center: Vec3, half_extents: Vec3) -> Self {
        let half = half_extents.abs();
        Self {
            min: center - half,
            max: center + half,
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn half_extents(&self) -> Vec3 {
        (self.max - self.min) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Copy of this box moved by `offset`.
    pub fn translated(&self, offset: Vec3) -> Self {
        Self {
            min: self.min + offset,
            max: self.max + offset,
        }
    }

    /// Grow every face outward by `amount`; negative components shrink.
    ///
    /// Shrinking never inverts the box: an axis shrunk past its center
    /// collapses to the center.
    pub fn expanded(&self, amount: Vec3) -> Self {
        let center = self.center();
        let min = self.min - amount;
        let max = self.max + amount;
        Self {
            min: min.min(center),
            max: max.max(center),
        }
    }

    /// Shrink every face inward by `margin` on all three axes.
    pub fn shrunk(&self, margin: f32) -> Self {
        self.expanded(Vec3::splat(-margin))
    }

    /// Smallest box containing both.
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Box scaled component-wise about the origin, as when a local mesh
    /// bound is placed with a non-uniform scale.
    pub fn scaled(&self, scale: Vec3) -> Self {
        Self::new(self.min * scale, self.max * scale)
    }

    /// Whether the two boxes overlap on all three axes.
    pub fn intersects(&self, other: &Aabb) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y
            || self.max.z < other.min.z
            || self.min.z > other.max.z)
    }

    pub fn contains_point(&self, p: Vec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}
