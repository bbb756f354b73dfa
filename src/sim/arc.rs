//! Melee swing geometry
//!
//! A swing is a circular sector around the attacker: everything within
//! `range` whose bearing lies within `half_span` of the facing angle.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::normalize_angle;

/// A circular sector anchored at the attacker
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SlashArc {
    pub origin: Vec2,
    /// Facing angle (radians, normalized to [-π, π))
    pub facing: f32,
    /// Half of the total angular extent
    pub half_span: f32,
    pub range: f32,
}

impl SlashArc {
    pub fn new(origin: Vec2, facing: f32, half_span: f32, range: f32) -> Self {
        Self {
            origin,
            facing: normalize_angle(facing),
            half_span,
            range,
        }
    }

    /// Unit vector along the facing angle
    #[inline]
    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.facing)
    }

    /// Check if an angle is within the swing's angular extent
    pub fn contains_angle(&self, theta: f32) -> bool {
        normalize_angle(theta - self.facing).abs() <= self.half_span
    }

    /// Check if a world-space point is inside the swing
    pub fn contains_point(&self, point: Vec2) -> bool {
        let delta = point - self.origin;
        if delta.length() > self.range {
            return false;
        }
        // The attacker's own position counts as inside
        delta == Vec2::ZERO || self.contains_angle(delta.y.atan2(delta.x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_contains_angle_across_wraparound() {
        // Facing left: the arc straddles ±π
        let arc = SlashArc::new(Vec2::ZERO, PI, FRAC_PI_2, 80.0);
        assert!(arc.contains_angle(PI - 0.2));
        assert!(arc.contains_angle(-PI + 0.2));
        assert!(!arc.contains_angle(0.0));
    }

    #[test]
    fn test_contains_point_in_range_and_arc() {
        let arc = SlashArc::new(Vec2::new(100.0, 100.0), 0.0, FRAC_PI_2, 80.0);
        assert!(arc.contains_point(Vec2::new(160.0, 100.0)));
        assert!(arc.contains_point(Vec2::new(100.0, 170.0)), "edge of the half-plane");
        assert!(!arc.contains_point(Vec2::new(40.0, 100.0)), "behind the attacker");
        assert!(!arc.contains_point(Vec2::new(190.0, 100.0)), "out of range");
    }
}
