use bytemuck::{Pod, Zeroable};
use crate::grouping::{GroupingBoard, Tile};
use crate::reel::{HandleStyle, Reel, SpinMachine, SpinSlider};

/// Per-tile render data read by the host page.
/// Must match the TypeScript protocol: 12 floats = 48 bytes stride.
///
/// Badge slots hold 1-based labels; 0 means the slot is empty.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct TileInstance {
    pub id: f32,
    /// Rendered rect (anchor plus live offset). Zero-sized when unmeasured.
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
    /// `TileStyle` discriminant.
    pub style: f32,
    pub child_count: f32,
    pub badge0: f32,
    pub badge1: f32,
    pub badge2: f32,
    /// Children beyond the three badges, 0 if none.
    pub overflow: f32,
    /// See `TileInstance::FLAG_*`.
    pub flags: f32,
}

impl TileInstance {
    pub const FLOATS: usize = 12;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub const FLAG_MEASURED: u32 = 1;
    pub const FLAG_SNAP_BACK: u32 = 2;

    pub fn from_tile(tile: &Tile) -> Self {
        let badges = tile.badges();
        // Slot 0 is the tile's own label; child labels follow.
        let child = |i: usize| badges.labels.get(i + 1).copied().unwrap_or(0) as f32;
        let rect = tile.rendered_rect();

        let mut flags = 0;
        if rect.is_some() {
            flags |= Self::FLAG_MEASURED;
        }
        if tile.snap_back {
            flags |= Self::FLAG_SNAP_BACK;
        }
        let rect = rect.unwrap_or_default();

        Self {
            id: tile.id.0 as f32,
            left: rect.left,
            top: rect.top,
            width: rect.width(),
            height: rect.height(),
            style: tile.style() as u32 as f32,
            child_count: tile.children.len() as f32,
            badge0: child(0),
            badge1: child(1),
            badge2: child(2),
            overflow: badges.overflow.unwrap_or(0) as f32,
            flags: flags as f32,
        }
    }
}

/// Per-reel render data: 8 floats = 32 bytes stride.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct ReelInstance {
    /// Strip offset in world units.
    pub offset: f32,
    /// Face under the window right now.
    pub visible_symbol: f32,
    pub outcome: f32,
    pub previous_outcome: f32,
    /// 1.0 while the reel is moving.
    pub spinning: f32,
    pub border_r: f32,
    pub border_g: f32,
    pub border_b: f32,
}

impl ReelInstance {
    pub const FLOATS: usize = 8;
    pub const STRIDE_BYTES: usize = Self::FLOATS * 4;

    pub fn from_reel(reel: &Reel, visible_symbol: usize) -> Self {
        Self {
            offset: reel.offset,
            visible_symbol: visible_symbol as f32,
            outcome: reel.outcome as f32,
            previous_outcome: reel.previous_outcome as f32,
            spinning: if reel.spinning { 1.0 } else { 0.0 },
            border_r: reel.border.r,
            border_g: reel.border.g,
            border_b: reel.border.b,
        }
    }
}

/// Snippet-wide state written into the frame header.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameStatus {
    pub spinning: bool,
    pub spin_complete: bool,
    /// Whether the reset control should be enabled.
    pub reset_enabled: bool,
    /// Current wizard step, 0 for snippets without one.
    pub step: u32,
    pub slider_offset: f32,
    pub slider_progress: f32,
    pub handle_style: HandleStyle,
    /// Tile being dragged.
    pub active_tile: Option<u32>,
}

impl FrameStatus {
    pub const FLAG_SPINNING: u32 = 1;
    pub const FLAG_SPIN_COMPLETE: u32 = 2;
    pub const FLAG_RESET_ENABLED: u32 = 4;

    pub fn flags(&self) -> u32 {
        let mut flags = 0;
        if self.spinning {
            flags |= Self::FLAG_SPINNING;
        }
        if self.spin_complete {
            flags |= Self::FLAG_SPIN_COMPLETE;
        }
        if self.reset_enabled {
            flags |= Self::FLAG_RESET_ENABLED;
        }
        flags
    }
}

impl Default for FrameStatus {
    fn default() -> Self {
        Self {
            spinning: false,
            spin_complete: false,
            reset_enabled: false,
            step: 0,
            slider_offset: 0.0,
            slider_progress: 0.0,
            handle_style: HandleStyle::Idle,
            active_tile: None,
        }
    }
}

/// Everything a snippet draws in one frame.
pub struct FrameBuffer {
    pub tiles: Vec<TileInstance>,
    pub reels: Vec<ReelInstance>,
    pub status: FrameStatus,
}

impl FrameBuffer {
    pub fn new() -> Self {
        Self::with_capacity(16, 8)
    }

    pub fn with_capacity(tiles: usize, reels: usize) -> Self {
        Self {
            tiles: Vec::with_capacity(tiles),
            reels: Vec::with_capacity(reels),
            status: FrameStatus::default(),
        }
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
        self.reels.clear();
        self.status = FrameStatus::default();
    }

    pub fn push_tile(&mut self, instance: TileInstance) {
        self.tiles.push(instance);
    }

    pub fn push_reel(&mut self, instance: ReelInstance) {
        self.reels.push(instance);
    }

    /// Every top-level tile, plus the active drag.
    pub fn push_board(&mut self, board: &GroupingBoard) {
        for tile in board.tiles() {
            self.push_tile(TileInstance::from_tile(tile));
        }
        self.status.active_tile = board.dragging().map(|id| id.0);
    }

    /// Every reel, plus the spin flags.
    pub fn push_machine(&mut self, machine: &SpinMachine) {
        for (i, reel) in machine.reels().iter().enumerate() {
            let visible = machine.visible_symbol(i).unwrap_or(reel.outcome);
            self.push_reel(ReelInstance::from_reel(reel, visible));
        }
        self.status.spinning = machine.is_spinning();
        self.status.spin_complete = machine.is_complete();
    }

    pub fn set_slider(&mut self, slider: &SpinSlider, spinning: bool) {
        self.status.slider_offset = slider.offset();
        self.status.slider_progress = slider.progress();
        self.status.handle_style = slider.style(spinning);
    }

    pub fn tile_count(&self) -> u32 {
        self.tiles.len() as u32
    }

    pub fn reel_count(&self) -> u32 {
        self.reels.len() as u32
    }
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::TileId;
    use crate::core::geometry::Rect;
    use crate::reel::Color;

    #[test]
    fn instance_strides() {
        assert_eq!(std::mem::size_of::<TileInstance>(), 48);
        assert_eq!(std::mem::size_of::<ReelInstance>(), 32);
    }

    #[test]
    fn unmeasured_tile_has_no_measured_flag() {
        let inst = TileInstance::from_tile(&Tile::new(TileId(2)));
        assert_eq!(inst.id, 2.0);
        assert_eq!(inst.width, 0.0);
        assert_eq!(inst.flags as u32 & TileInstance::FLAG_MEASURED, 0);
        assert_eq!(inst.badge0, 0.0);
    }

    #[test]
    fn tile_rect_includes_offset() {
        let mut tile = Tile::new(TileId(0));
        tile.set_rest(Some(Rect::new(10.0, 10.0, 74.0, 74.0)));
        tile.position = glam::Vec2::new(5.0, -5.0);
        tile.dragging = true;
        let inst = TileInstance::from_tile(&tile);
        assert_eq!((inst.left, inst.top, inst.width, inst.height), (15.0, 5.0, 64.0, 64.0));
        assert_eq!(inst.style, 1.0);
        assert_eq!(inst.flags as u32, TileInstance::FLAG_MEASURED);
    }

    #[test]
    fn reel_instance_carries_border() {
        let reel = Reel {
            outcome: 4,
            previous_outcome: 1,
            offset: -9152.0,
            spinning: false,
            border: Color::from_rgb8(255, 0, 0),
        };
        let inst = ReelInstance::from_reel(&reel, 4);
        assert_eq!(inst.border_r, 1.0);
        assert_eq!(inst.border_g, 0.0);
        assert_eq!(inst.visible_symbol, 4.0);
        assert_eq!(inst.spinning, 0.0);
    }

    #[test]
    fn machine_frame_shows_resting_reels() {
        let mut frame = FrameBuffer::new();
        frame.push_machine(&SpinMachine::fruit_spin());
        assert_eq!(frame.reel_count(), 3);
        assert_eq!(frame.reels[2].visible_symbol, 2.0);
        assert!(!frame.status.spinning);
    }

    #[test]
    fn board_frame_lists_top_level_tiles() {
        let mut board = GroupingBoard::default();
        board.on_drag_start(TileId(1));
        let mut frame = FrameBuffer::new();
        frame.push_board(&board);
        assert_eq!(frame.tile_count(), 4);
        assert_eq!(frame.status.active_tile, Some(1));
        assert_eq!(frame.tiles[1].style, 1.0);
    }

    #[test]
    fn status_flags() {
        let status = FrameStatus { spin_complete: true, reset_enabled: true, ..FrameStatus::default() };
        assert_eq!(status.flags(), FrameStatus::FLAG_SPIN_COMPLETE | FrameStatus::FLAG_RESET_ENABLED);
    }
}
