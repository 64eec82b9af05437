//! Circle vs. axis-aligned rectangle collision
//!
//! Shared by the ball games (breakout bricks and paddles, pong paddles).

use glam::Vec2;

/// Axis-aligned rectangle (top-left origin, y down)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Closest point of the rectangle to `p`
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.pos, self.pos + self.size)
    }
}

/// True if the circle touches or overlaps the rectangle
pub fn circle_rect_overlap(center: Vec2, radius: f32, rect: &Rect) -> bool {
    let d = center - rect.closest_point(center);
    d.length_squared() <= radius * radius
}

/// Reflect `vel` off `rect` along the axis of least penetration
///
/// Uses the offset from the closest point: a mostly-horizontal offset flips
/// x, anything else flips y.
pub fn bounce_off_rect(center: Vec2, vel: Vec2, rect: &Rect) -> Vec2 {
    let d = center - rect.closest_point(center);
    if d.x.abs() > d.y.abs() {
        Vec2::new(-vel.x, vel.y)
    } else {
        Vec2::new(vel.x, -vel.y)
    }
}
