//! Screen-space geometry shared by the gesture core and its front ends.
//!
//! Units are logical pixels. The y axis grows downwards.

use serde::{Deserialize, Serialize};

/// A pointer position.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Create a point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle of a measured row (its bounding client rect).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RowRect {
    /// Distance from the viewport top to the row's top edge.
    pub top: f32,
    /// Distance from the viewport left to the row's left edge.
    pub left: f32,
    /// Row width.
    pub width: f32,
    /// Row height.
    pub height: f32,
}

impl RowRect {
    /// Create a rectangle.
    pub fn new(top: f32, left: f32, width: f32, height: f32) -> Self {
        Self {
            top,
            left,
            width,
            height,
        }
    }

    /// Bottom edge.
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Right edge.
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Vertical center, used for drop-index computation.
    pub fn center_y(&self) -> f32 {
        self.top + self.height / 2.0
    }

    /// Whether the point lies inside the rectangle (right/bottom edges exclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left
            && point.x < self.right()
            && point.y >= self.top
            && point.y < self.bottom()
    }
}

/// The visible part of a scroll container, in the same space as [`RowRect`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    /// Top edge of the visible area.
    pub top: f32,
    /// Height of the visible area.
    pub height: f32,
}

impl Viewport {
    /// Create a viewport.
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    /// Bottom edge of the visible area.
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}
