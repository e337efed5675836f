//! Axis-aligned collision tests and velocity helpers
//!
//! Everything in this game is a circle (ball) or an axis-aligned rectangle
//! (paddle, bricks, power-ups), so the whole collision vocabulary fits in a
//! handful of pure functions over `Rect`.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.w / 2.0
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Point-containment test (used for ball-center-vs-brick hits)
    #[inline]
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Rectangle overlap test (used for spawn placement and power-up pickup)
    #[inline]
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    /// Circle overlap test via the circle's bounding box; corner contacts
    /// count as hits, which plays forgivingly at the paddle edges
    #[inline]
    pub fn overlaps_circle(&self, center: Vec2, radius: f32) -> bool {
        center.x + radius > self.x
            && center.x - radius < self.right()
            && center.y + radius > self.y
            && center.y - radius < self.bottom()
    }
}

/// Rescale a velocity vector to a target speed, preserving direction.
///
/// Returns the input unchanged when it is (near) zero, since there is no
/// direction to preserve.
#[inline]
pub fn renormalize(vel: Vec2, target_speed: f32) -> Vec2 {
    let speed = vel.length();
    if speed < f32::EPSILON {
        vel
    } else {
        vel * (target_speed / speed)
    }
}
