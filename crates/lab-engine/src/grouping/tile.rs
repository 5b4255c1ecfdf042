use glam::Vec2;
use crate::api::types::TileId;
use crate::core::geometry::Rect;

/// Most child badges a group tile shows before collapsing the rest into `+N`.
pub const MAX_CHILD_BADGES: usize = 3;

/// Visual state of a tile, in priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum TileStyle {
    Default = 0,
    Dragging = 1,
    Colliding = 2,
    Group = 3,
}

/// Badge content for a group tile: the container's own label first, then up
/// to three child labels, then an overflow count.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TileBadges {
    pub labels: Vec<u32>,
    pub overflow: Option<usize>,
}

/// A draggable tile. Group containers own their absorbed tiles in `children`.
#[derive(Debug, Clone)]
pub struct Tile {
    pub id: TileId,
    /// Live offset from the rest anchor.
    pub position: Vec2,
    pub dragging: bool,
    pub colliding: bool,
    /// Set when a drop found no target; cleared once the return finishes.
    pub snap_back: bool,
    pub children: Vec<Tile>,
    group_container: bool,
    rest: Option<Rect>,
}

impl Tile {
    pub fn new(id: TileId) -> Self {
        Self {
            id,
            position: Vec2::ZERO,
            dragging: false,
            colliding: false,
            snap_back: false,
            children: Vec::new(),
            group_container: false,
            rest: None,
        }
    }

    pub fn is_group_container(&self) -> bool {
        self.group_container
    }

    /// Absorb `child`. Irreversible: there is no way to ungroup.
    pub(crate) fn absorb(&mut self, mut child: Tile) {
        child.position = Vec2::ZERO;
        child.dragging = false;
        child.colliding = false;
        child.snap_back = false;
        child.rest = None;
        self.children.push(child);
        self.group_container = true;
    }

    /// Anchor rect before any drag offset. `None` until measured.
    pub fn rest_rect(&self) -> Option<Rect> {
        self.rest
    }

    pub(crate) fn set_rest(&mut self, rect: Option<Rect>) {
        self.rest = rect;
    }

    /// Where the tile is drawn right now: its anchor shifted by `position`.
    pub fn rendered_rect(&self) -> Option<Rect> {
        self.rest.map(|r| r.translate(self.position))
    }

    pub fn style(&self) -> TileStyle {
        if self.dragging {
            TileStyle::Dragging
        } else if self.colliding {
            TileStyle::Colliding
        } else if self.group_container {
            TileStyle::Group
        } else {
            TileStyle::Default
        }
    }

    /// Badge content. Plain tiles show only their own label.
    pub fn badges(&self) -> TileBadges {
        let mut labels = vec![self.id.label()];
        if !self.group_container {
            return TileBadges { labels, overflow: None };
        }
        labels.extend(self.children.iter().take(MAX_CHILD_BADGES).map(|c| c.id.label()));
        let overflow = self
            .children
            .len()
            .checked_sub(MAX_CHILD_BADGES)
            .filter(|&n| n > 0);
        TileBadges { labels, overflow }
    }
}
