use glam::Vec2;
use serde::{Deserialize, Serialize};
use crate::core::geometry::Rect;
use crate::error::{LabError, Result};

/// Row-major grid that assigns anchor rects to top-level tiles by order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridLayout {
    pub columns: usize,
    /// Tile size in world units.
    pub cell: Vec2,
    /// Space between neighbouring cells.
    pub gap: f32,
    /// Inset from the world origin to the first cell.
    pub padding: f32,
}

impl Default for GridLayout {
    fn default() -> Self {
        Self {
            columns: 2,
            cell: Vec2::splat(64.0),
            gap: 16.0,
            padding: 32.0,
        }
    }
}

impl GridLayout {
    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 {
            return Err(LabError::EmptyGrid);
        }
        Ok(())
    }

    /// Anchor rect for the tile at `index`.
    pub fn rect_for(&self, index: usize) -> Rect {
        let columns = self.columns.max(1);
        let col = (index % columns) as f32;
        let row = (index / columns) as f32;
        let origin = Vec2::new(
            self.padding + col * (self.cell.x + self.gap),
            self.padding + row * (self.cell.y + self.gap),
        );
        Rect::from_origin_size(origin, self.cell)
    }

    /// World size needed to hold `count` tiles.
    pub fn extent(&self, count: usize) -> Vec2 {
        let columns = self.columns.max(1);
        let rows = count.div_ceil(columns).max(1) as f32;
        let cols = columns.min(count.max(1)) as f32;
        Vec2::new(
            self.padding * 2.0 + cols * self.cell.x + (cols - 1.0) * self.gap,
            self.padding * 2.0 + rows * self.cell.y + (rows - 1.0) * self.gap,
        )
    }
}
