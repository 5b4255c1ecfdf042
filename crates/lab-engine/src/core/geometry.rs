//! Axis-aligned rectangles for hit testing and drop-target collision.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world units (y grows downward).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f32,
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
}

impl Rect {
    pub const fn new(left: f32, top: f32, right: f32, bottom: f32) -> Self {
        Self { left, top, right, bottom }
    }

    /// Build a rect from its top-left corner and size.
    pub fn from_origin_size(origin: Vec2, size: Vec2) -> Self {
        Self::new(origin.x, origin.y, origin.x + size.x, origin.y + size.y)
    }

    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.left, self.top)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }

    pub fn width(&self) -> f32 {
        self.right - self.left
    }

    pub fn height(&self) -> f32 {
        self.bottom - self.top
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(
            self.left + self.width() * 0.5,
            self.top + self.height() * 0.5,
        )
    }

    /// The same rect shifted by `offset`.
    pub fn translate(&self, offset: Vec2) -> Self {
        Self::new(
            self.left + offset.x,
            self.top + offset.y,
            self.right + offset.x,
            self.bottom + offset.y,
        )
    }

    /// Strict AABB overlap. Rects that only share an edge or a corner do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        !(self.right <= other.left
            || self.left >= other.right
            || self.bottom <= other.top
            || self.top >= other.bottom)
    }

    /// Euclidean distance between the two centers.
    pub fn center_distance(&self, other: &Rect) -> f32 {
        self.center().distance(other.center())
    }

    /// Whether `point` lies inside the rect (edges inclusive).
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left && point.x <= self.right && point.y >= self.top && point.y <= self.bottom
    }

    /// A rect is measurable when all edges are finite and it is not inverted.
    pub fn is_valid(&self) -> bool {
        let finite = self.left.is_finite()
            && self.top.is_finite()
            && self.right.is_finite()
            && self.bottom.is_finite();
        finite && self.right >= self.left && self.bottom >= self.top
    }
}
