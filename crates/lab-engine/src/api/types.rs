use bytemuck::{Pod, Zeroable};

/// Stable identity of a draggable tile. Assigned once, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TileId(pub u32);

impl TileId {
    /// 1-based number shown on the tile's badge.
    pub fn label(self) -> u32 {
        self.0 + 1
    }
}

/// Event kinds written into the frame's event section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum EventKind {
    /// a = dragged tile, b = target tile, c = target's child count.
    TileGrouped = 1,
    /// a = tile returning to its anchor.
    TileSnapBack = 2,
    /// a = tile that finished returning.
    TileSettled = 3,
    /// a = spin epoch.
    SpinStarted = 10,
    /// a = reel index, b = landed symbol.
    ReelLanded = 11,
    /// a = most reels showing the same symbol, b = reel count.
    SpinComplete = 12,
    /// a = reel index, b = symbol whose color is now the border.
    BorderRevealed = 13,
    /// a = spin progress handle committed (1.0) or cancelled (0.0).
    SliderReleased = 20,
    /// a = new wizard step.
    StepChanged = 30,
}

/// An event communicated from Rust to the host page.
/// Generic container: `kind` identifies the event, `a/b/c` carry payload.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct SnippetEvent {
    pub kind: f32,
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl SnippetEvent {
    pub const FLOATS: usize = 4;

    pub fn new(kind: EventKind, a: f32, b: f32, c: f32) -> Self {
        Self {
            kind: kind as u32 as f32,
            a,
            b,
            c,
        }
    }

    pub fn is(&self, kind: EventKind) -> bool {
        self.kind == kind as u32 as f32
    }
}
