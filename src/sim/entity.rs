//! Shared body model for everything that occupies the arena

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Which side a body belongs to (decides valid collision targets)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Faction {
    Defender,
    Hostile,
    DefenderProjectile,
    HostileProjectile,
}

/// A body in arena-local coordinates.
///
/// `position` is the body's center; `size` is its full extent (square side or
/// diameter), so the collision radius is `size / 2`.
pub trait Entity {
    fn id(&self) -> u32;
    fn position(&self) -> Vec2;
    fn size(&self) -> f32;
    fn faction(&self) -> Faction;

    #[inline]
    fn radius(&self) -> f32 {
        self.size() / 2.0
    }

    /// Circle-distance overlap: `|a - b| < ra + rb`
    #[inline]
    fn overlaps(&self, other: &impl Entity) -> bool {
        circles_overlap(self.position(), self.radius(), other.position(), other.radius())
    }
}

/// Strict circle overlap (touching edges do not count)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_circles_overlap_is_strict() {
        assert!(circles_overlap(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
        assert!(!circles_overlap(Vec2::ZERO, 5.0, Vec2::new(8.0, 8.0), 5.0));
    }
}
