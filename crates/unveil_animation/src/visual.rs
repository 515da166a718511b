//! Visual state endpoints

use serde::{Deserialize, Serialize};

/// The animated properties of a fragment: opacity and vertical offset
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    /// Opacity (0.0 to 1.0)
    pub opacity: f32,
    /// Vertical translation in pixels (positive = down)
    #[serde(alias = "vertical_offset")]
    pub y: f32,
}

impl VisualState {
    pub const fn new(opacity: f32, y: f32) -> Self {
        Self { opacity, y }
    }

    /// Fully transparent, pushed down by `offset` pixels
    pub const fn hidden_below(offset: f32) -> Self {
        Self::new(0.0, offset)
    }

    /// Fully opaque at the natural position
    pub const fn shown() -> Self {
        Self::new(1.0, 0.0)
    }

    /// Interpolate towards `other`. `t` is not clamped so overshooting
    /// curves carry through.
    pub fn lerp(&self, other: &Self, t: f32) -> Self {
        Self {
            opacity: self.opacity + (other.opacity - self.opacity) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}
