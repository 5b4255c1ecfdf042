/// Frame buffer layout shared with the host page.
/// Must stay in sync with TypeScript `protocol.ts`.
///
/// Layout (all values in f32 / 4 bytes):
/// ```text
/// [Header: 16 floats]
/// [Tiles:  max_tiles × 12 floats]
/// [Reels:  max_reels × 8 floats]
/// [Events: max_events × 4 floats]
/// ```
///
/// Capacities are written into the header every frame.
/// TypeScript reads them from the header to compute offsets dynamically.

use crate::api::snippet::SnippetConfig;
use crate::api::types::SnippetEvent;
use crate::renderer::instance::{FrameBuffer, ReelInstance, TileInstance};

/// Number of floats in the header section.
pub const HEADER_FLOATS: usize = 16;

/// Header field indices.
pub const HEADER_FRAME_COUNTER: usize = 0;
pub const HEADER_PROTOCOL_VERSION: usize = 1;
pub const HEADER_WORLD_WIDTH: usize = 2;
pub const HEADER_WORLD_HEIGHT: usize = 3;
pub const HEADER_MAX_TILES: usize = 4;
pub const HEADER_TILE_COUNT: usize = 5;
pub const HEADER_MAX_REELS: usize = 6;
pub const HEADER_REEL_COUNT: usize = 7;
pub const HEADER_MAX_EVENTS: usize = 8;
pub const HEADER_EVENT_COUNT: usize = 9;
pub const HEADER_FLAGS: usize = 10;
pub const HEADER_STEP: usize = 11;
pub const HEADER_SLIDER_OFFSET: usize = 12;
pub const HEADER_SLIDER_PROGRESS: usize = 13;
pub const HEADER_HANDLE_STYLE: usize = 14;
/// Id of the dragged tile, or -1.
pub const HEADER_ACTIVE_TILE: usize = 15;

/// Protocol version written into the header.
pub const PROTOCOL_VERSION: f32 = 1.0;

/// Floats per snippet event: kind, a, b, c. Fixed by the wire format.
pub const EVENT_FLOATS: usize = SnippetEvent::FLOATS;

/// Runtime-computed buffer layout.
#[derive(Debug, Clone, PartialEq)]
pub struct ProtocolLayout {
    pub max_tiles: usize,
    pub max_reels: usize,
    pub max_events: usize,

    pub tile_data_floats: usize,
    pub reel_data_floats: usize,
    pub event_data_floats: usize,

    /// Offset (in floats) where tile data begins.
    pub tile_data_offset: usize,
    /// Offset (in floats) where reel data begins.
    pub reel_data_offset: usize,
    /// Offset (in floats) where event data begins.
    pub event_data_offset: usize,

    /// Total buffer size in floats.
    pub buffer_total_floats: usize,
    /// Total buffer size in bytes.
    pub buffer_total_bytes: usize,
}

impl ProtocolLayout {
    /// Compute layout from raw capacity values.
    pub fn new(max_tiles: usize, max_reels: usize, max_events: usize) -> Self {
        let tile_data_floats = max_tiles * TileInstance::FLOATS;
        let reel_data_floats = max_reels * ReelInstance::FLOATS;
        let event_data_floats = max_events * EVENT_FLOATS;

        let tile_data_offset = HEADER_FLOATS;
        let reel_data_offset = tile_data_offset + tile_data_floats;
        let event_data_offset = reel_data_offset + reel_data_floats;

        let buffer_total_floats = event_data_offset + event_data_floats;

        Self {
            max_tiles,
            max_reels,
            max_events,
            tile_data_floats,
            reel_data_floats,
            event_data_floats,
            tile_data_offset,
            reel_data_offset,
            event_data_offset,
            buffer_total_floats,
            buffer_total_bytes: buffer_total_floats * 4,
        }
    }

    /// Compute layout from a SnippetConfig.
    pub fn from_config(config: &SnippetConfig) -> Self {
        Self::new(config.max_tiles, config.max_reels, config.max_events)
    }

    /// A zeroed buffer of the right size.
    pub fn allocate(&self) -> Vec<f32> {
        vec![0.0; self.buffer_total_floats]
    }

    /// Pack one frame into `out`. Sections are truncated to capacity.
    /// `out` must be at least `buffer_total_floats` long; shorter buffers are left untouched.
    pub fn write_frame(
        &self,
        out: &mut [f32],
        frame_counter: u64,
        world: (f32, f32),
        frame: &FrameBuffer,
        events: &[SnippetEvent],
    ) -> bool {
        if out.len() < self.buffer_total_floats {
            log::warn!(
                "frame buffer too small: {} < {} floats",
                out.len(),
                self.buffer_total_floats
            );
            return false;
        }

        let tiles = &frame.tiles[..frame.tiles.len().min(self.max_tiles)];
        let reels = &frame.reels[..frame.reels.len().min(self.max_reels)];
        let events = &events[..events.len().min(self.max_events)];

        let status = &frame.status;
        let header = &mut out[..HEADER_FLOATS];
        header[HEADER_FRAME_COUNTER] = frame_counter as f32;
        header[HEADER_PROTOCOL_VERSION] = PROTOCOL_VERSION;
        header[HEADER_WORLD_WIDTH] = world.0;
        header[HEADER_WORLD_HEIGHT] = world.1;
        header[HEADER_MAX_TILES] = self.max_tiles as f32;
        header[HEADER_TILE_COUNT] = tiles.len() as f32;
        header[HEADER_MAX_REELS] = self.max_reels as f32;
        header[HEADER_REEL_COUNT] = reels.len() as f32;
        header[HEADER_MAX_EVENTS] = self.max_events as f32;
        header[HEADER_EVENT_COUNT] = events.len() as f32;
        header[HEADER_FLAGS] = status.flags() as f32;
        header[HEADER_STEP] = status.step as f32;
        header[HEADER_SLIDER_OFFSET] = status.slider_offset;
        header[HEADER_SLIDER_PROGRESS] = status.slider_progress;
        header[HEADER_HANDLE_STYLE] = status.handle_style as u32 as f32;
        header[HEADER_ACTIVE_TILE] = status.active_tile.map_or(-1.0, |id| id as f32);

        let tile_floats: &[f32] = bytemuck::cast_slice(tiles);
        out[self.tile_data_offset..self.tile_data_offset + tile_floats.len()]
            .copy_from_slice(tile_floats);
        let reel_floats: &[f32] = bytemuck::cast_slice(reels);
        out[self.reel_data_offset..self.reel_data_offset + reel_floats.len()]
            .copy_from_slice(reel_floats);
        let event_floats: &[f32] = bytemuck::cast_slice(events);
        out[self.event_data_offset..self.event_data_offset + event_floats.len()]
            .copy_from_slice(event_floats);
        true
    }
}
