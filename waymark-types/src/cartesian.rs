//! Screen-space primitives.
//!
//! Screen coordinates are measured in pixels from the top-left corner of the viewport, with `y` growing
//! downwards.

pub use nalgebra::{Point2, Vector2};
use serde::{Deserialize, Serialize};

/// Point on the screen in pixels.
pub type Point2d = Point2<f64>;

/// Screen-space delta in pixels.
pub type Vector2d = Vector2<f64>;

/// Size of a viewport in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f64,
    height: f64,
}

impl Size {
    /// Creates a new size. Negative dimensions are clamped to zero.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width: width.max(0.0),
            height: height.max(0.0),
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Half of the width.
    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }

    /// Height in pixels.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Half of the height.
    pub fn half_height(&self) -> f64 {
        self.height / 2.0
    }

    /// Returns true if either of the dimensions is zero.
    pub fn is_zero(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Center point of the viewport.
    pub fn center(&self) -> Point2d {
        Point2d::new(self.half_width(), self.half_height())
    }
}
