//! Collision detection and response for axis-aligned boxes
//!
//! Every body in the runner world is a box that never rotates, so contact
//! generation boils down to per-axis separation tests.

use glam::Vec2;

use crate::consts::LINEAR_SLOP;

/// Result of a collision check
#[derive(Debug, Clone)]
pub struct CollisionResult {
    /// Whether the boxes touch (overlap or sit within the slop distance)
    pub hit: bool,
    /// Contact normal, pointing from the first box toward the second
    pub normal: Vec2,
    /// Overlap depth along the normal (0 when merely touching)
    pub penetration: f32,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            normal: Vec2::ZERO,
            penetration: 0.0,
        }
    }
}

/// Per-axis gap between two boxes (negative components mean overlap)
#[inline]
pub fn box_separation(a_pos: Vec2, a_half: Vec2, b_pos: Vec2, b_half: Vec2) -> Vec2 {
    (b_pos - a_pos).abs() - (a_half + b_half)
}

/// Check contact between two boxes given as center + half extents
///
/// The normal is taken along the axis of least penetration (largest
/// separation), signed from `a` toward `b`.
pub fn box_box_collision(a_pos: Vec2, a_half: Vec2, b_pos: Vec2, b_half: Vec2) -> CollisionResult {
    let sep = box_separation(a_pos, a_half, b_pos, b_half);
    if sep.x > LINEAR_SLOP || sep.y > LINEAR_SLOP {
        return CollisionResult::miss();
    }

    let delta = b_pos - a_pos;
    let (normal, gap) = if sep.x > sep.y {
        (Vec2::new(if delta.x < 0.0 { -1.0 } else { 1.0 }, 0.0), sep.x)
    } else {
        (Vec2::new(0.0, if delta.y < 0.0 { -1.0 } else { 1.0 }), sep.y)
    };

    CollisionResult {
        hit: true,
        normal,
        penetration: (-gap).max(0.0),
    }
}

/// Strip the velocity component that drives into a surface
///
/// `normal` points out of the surface toward the moving body.
#[inline]
pub fn remove_approach_velocity(vel: Vec2, normal: Vec2) -> Vec2 {
    let vn = vel.dot(normal);
    if vn < 0.0 { vel - normal * vn } else { vel }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_collision_resting_contact() {
        // Runner standing exactly on top of the ground slab
        let ground = (Vec2::new(0.0, 0.0), Vec2::new(10.0, 1.0));
        let runner = (Vec2::new(2.0, 2.0), Vec2::new(0.5, 1.0));

        let result = box_box_collision(ground.0, ground.1, runner.0, runner.1);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::Y);
        assert_eq!(result.penetration, 0.0);
    }

    #[test]
    fn test_box_collision_overlap_picks_shallow_axis() {
        let a = (Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let b = (Vec2::new(1.8, 0.5), Vec2::new(1.0, 1.0));

        let result = box_box_collision(a.0, a.1, b.0, b.1);
        assert!(result.hit);
        assert_eq!(result.normal, Vec2::X);
        assert!((result.penetration - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_box_collision_miss() {
        let a = (Vec2::new(0.0, 0.0), Vec2::new(1.0, 1.0));
        let b = (Vec2::new(0.0, 2.1), Vec2::new(1.0, 1.0));
        assert!(!box_box_collision(a.0, a.1, b.0, b.1).hit);
    }

    #[test]
    fn test_remove_approach_velocity() {
        let falling = Vec2::new(3.0, -5.0);
        assert_eq!(remove_approach_velocity(falling, Vec2::Y), Vec2::new(3.0, 0.0));

        // Moving away is untouched
        let rising = Vec2::new(3.0, 5.0);
        assert_eq!(remove_approach_velocity(rising, Vec2::Y), rising);
    }
}
