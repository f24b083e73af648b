//! Playfield geometry: the shared [`Body`] component plus the collision
//! predicates and small math helpers used by every entity module.
//!
//! All functions here are pure; none touch the ECS world.

use bevy::prelude::*;

/// Axis-aligned box of a gameplay entity in playfield coordinates.
///
/// `pos` is the top-left corner (y grows downward) and `size` the extent.
/// Rendering converts this into a Bevy `Transform`; gameplay code never reads
/// `Transform` directly.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Build a body of `size` whose centre sits at `center`.
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        Self {
            pos: center - size * 0.5,
            size,
        }
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    #[inline]
    pub fn set_center(&mut self, center: Vec2) {
        self.pos = center - self.size * 0.5;
    }

    /// Hit radius used by [`circle_overlap`]: half the shorter side times `scale`.
    #[inline]
    pub fn radius(&self, scale: f32) -> f32 {
        self.size.x.min(self.size.y) * 0.5 * scale
    }
}

// ── Collision predicates ──────────────────────────────────────────────────────

/// Strict axis-aligned rectangle overlap (touching edges do not count).
pub fn rect_overlap(a: &Body, b: &Body) -> bool {
    a.pos.x < b.pos.x + b.size.x
        && a.pos.x + a.size.x > b.pos.x
        && a.pos.y < b.pos.y + b.size.y
        && a.pos.y + a.size.y > b.pos.y
}

/// Circle overlap between the centres of two bodies.
///
/// Each body's radius is `min(w, h) / 2 * scale`, so a scale below 1 shrinks
/// the hitbox inside the sprite and a scale above 1 makes it generous.
pub fn circle_overlap(a: &Body, b: &Body, scale_a: f32, scale_b: f32) -> bool {
    let reach = a.radius(scale_a) + b.radius(scale_b);
    a.center().distance_squared(b.center()) < reach * reach
}

// ── Math helpers ──────────────────────────────────────────────────────────────

/// Angle (rad) of the vector pointing from `from` to `to`, in y-down space.
#[inline]
pub fn angle_to(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Unit vector for `angle` (rad).
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), angle.sin())
}

/// Wrap an angle into `(-π, π]`.
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn rect_overlap_excludes_touching_edges() {
        let a = Body::new(0.0, 0.0, 10.0, 10.0);
        let touching = Body::new(10.0, 0.0, 10.0, 10.0);
        let inside = Body::new(5.0, 5.0, 10.0, 10.0);
        assert!(!rect_overlap(&a, &touching));
        assert!(rect_overlap(&a, &inside));
        assert!(rect_overlap(&inside, &a));
    }

    #[test]
    fn circle_scale_changes_reach() {
        let a = Body::new(0.0, 0.0, 20.0, 20.0);
        let b = Body::new(18.0, 0.0, 20.0, 20.0);
        // Centres are 18 apart; radii 10 + 10 at scale 1, 4 + 4 at scale 0.4.
        assert!(circle_overlap(&a, &b, 1.0, 1.0));
        assert!(!circle_overlap(&a, &b, 0.4, 0.4));
    }

    #[test]
    fn normalize_angle_wraps_into_half_open_range() {
        assert!((normalize_angle(2.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(-1.5 * PI) - 0.5 * PI).abs() < 1e-5);
        assert!((normalize_angle(0.25) - 0.25).abs() < 1e-6);
    }

    #[test]
    fn angle_to_points_down_in_y_down_space() {
        let a = angle_to(Vec2::ZERO, Vec2::new(0.0, 10.0));
        assert!((a - PI / 2.0).abs() < 1e-6);
        assert!((heading(a) - Vec2::Y).length() < 1e-6);
    }
}
