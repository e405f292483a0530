//! Collision and proximity tests
//!
//! Everything here is plain geometry on centre positions: Euclidean proximity
//! for circles, axis-aligned boxes for walls, and containment radii.

use glam::Vec2;

use super::entity::{Entity, GATE_HEIGHT};

/// Axis-aligned bounding box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub min: Vec2,
    pub max: Vec2,
}

impl Aabb {
    /// Box of `size` centred on `center`
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        let half = size / 2.0;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    /// Box around a square player of side `side`
    pub fn square(center: Vec2, side: f32) -> Self {
        Self::from_center(center, Vec2::splat(side))
    }

    /// Box of a gate wall (`size` is its width)
    pub fn gate(wall: &Entity) -> Self {
        Self::from_center(wall.pos, Vec2::new(wall.size, GATE_HEIGHT))
    }

    /// Strict overlap: touching edges do not count
    #[inline]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.max.x > other.min.x
            && self.min.x < other.max.x
            && self.max.y > other.min.y
            && self.min.y < other.max.y
    }
}

/// True if `a` and `b` are closer than `radius`
#[inline]
pub fn within_radius(a: Vec2, b: Vec2, radius: f32) -> bool {
    a.distance_squared(b) < radius * radius
}

/// True if `pos` has left the circle of `radius` around `center`
#[inline]
pub fn escaped(pos: Vec2, center: Vec2, radius: f32) -> bool {
    pos.distance(center) > radius
}

/// First entity whose (decayed) circle contains `point`, topmost (last spawned) first
pub fn pick<'a, I>(entities: I, point: Vec2) -> Option<&'a Entity>
where
    I: DoubleEndedIterator<Item = &'a Entity>,
{
    entities.rev().find(|e| !e.removed && e.contains_point(point))
}
