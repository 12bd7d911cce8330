use serde::{Deserialize, Serialize};
use std::ops::Add;

/// A position in maze coordinate space. `x` runs along columns, `y` along rows.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub fn new(x: f32, y: f32) -> Self {
        Vec2 { x, y }
    }

    /// Clamps each axis independently into `[min, max]`.
    pub fn clamp_axes(self, min: f32, max: f32) -> Self {
        Vec2 {
            x: clamp(self.x, min, max),
            y: clamp(self.y, min, max),
        }
    }
}

impl From<[f32; 2]> for Vec2 {
    fn from(p: [f32; 2]) -> Self {
        Vec2::new(p[0], p[1])
    }
}

impl From<Vec2> for [f32; 2] {
    fn from(v: Vec2) -> Self {
        [v.x, v.y]
    }
}

impl Add for Vec2 {
    type Output = Self;
    fn add(self, other: Self) -> Self {
        Self { x: self.x + other.x, y: self.y + other.y }
    }
}

/// Clamps a value between a minimum and maximum.
pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
    value.max(min).min(max)
}
