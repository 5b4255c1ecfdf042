//! Drag-to-group tiles.
//!
//! Tiles can be dragged with raw pointer input (the demo hit-tests) or by a
//! host that lays tiles out itself and reports each move with a live rect.

use glam::Vec2;
use lab_engine::api::snippet::{Snippet, SnippetConfig, SnippetContext};
use lab_engine::api::types::{EventKind, SnippetEvent, TileId};
use lab_engine::assets::manifest::SnippetManifest;
use lab_engine::error::Result;
use lab_engine::grouping::{DropOutcome, GroupingBoard};
use lab_engine::input::queue::{InputEvent, InputQueue};
use lab_engine::renderer::instance::FrameBuffer;

/// A pointer-driven drag in progress.
#[derive(Debug, Clone, Copy)]
struct Grab {
    tile: TileId,
    /// Pointer position at grab time.
    pointer: Vec2,
    /// Tile offset at grab time; non-zero when caught mid-return.
    offset: Vec2,
}

pub struct GroupingDemo {
    board: GroupingBoard,
    grab: Option<Grab>,
}

impl GroupingDemo {
    pub fn new() -> Self {
        Self {
            board: GroupingBoard::default(),
            grab: None,
        }
    }

    pub fn board(&self) -> &GroupingBoard {
        &self.board
    }

    fn pointer_down(&mut self, pos: Vec2) {
        if self.grab.is_some() {
            return;
        }
        let Some(id) = self.board.hit_test(pos) else { return };
        if !self.board.on_drag_start(id) {
            return;
        }
        let offset = self.board.tile(id).map_or(Vec2::ZERO, |t| t.position);
        self.grab = Some(Grab { tile: id, pointer: pos, offset });
    }

    fn pointer_move(&mut self, pos: Vec2) {
        if let Some(grab) = self.grab {
            self.board.on_drag_offset(grab.tile, grab.offset + (pos - grab.pointer));
        }
    }

    fn drop_tile(&mut self, ctx: &mut SnippetContext, id: TileId) {
        match self.board.on_drag_end(id) {
            DropOutcome::Grouped { dragged, target } => {
                let children = self.board.tile(target).map_or(0, |t| t.children.len());
                ctx.emit_event(SnippetEvent::new(
                    EventKind::TileGrouped,
                    dragged.0 as f32,
                    target.0 as f32,
                    children as f32,
                ));
            }
            DropOutcome::SnapBack(id) => {
                ctx.emit_event(SnippetEvent::new(EventKind::TileSnapBack, id.0 as f32, 0.0, 0.0));
            }
            DropOutcome::Ignored => {}
        }
    }
}

impl Default for GroupingDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl Snippet for GroupingDemo {
    fn config(&self) -> SnippetConfig {
        let config = self.board.config();
        let world = config.layout.extent(config.tile_count);
        SnippetConfig {
            world_width: world.x,
            world_height: world.y,
            max_tiles: config.tile_count.max(1),
            max_reels: 0,
            ..SnippetConfig::default()
        }
    }

    fn init(&mut self, _ctx: &mut SnippetContext) {
        log::info!("dnd-grouping: {} tiles", self.board.tiles().len());
    }

    fn update(&mut self, ctx: &mut SnippetContext, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::PointerDown { x, y } => self.pointer_down(Vec2::new(x, y)),
                InputEvent::PointerMove { x, y } => self.pointer_move(Vec2::new(x, y)),
                InputEvent::PointerUp { x, y } => {
                    self.pointer_move(Vec2::new(x, y));
                    if let Some(grab) = self.grab.take() {
                        self.drop_tile(ctx, grab.tile);
                    }
                }
                InputEvent::DragStart { target } => {
                    self.board.on_drag_start(TileId(target));
                }
                InputEvent::DragMove { target, rect } => {
                    self.board.on_drag_move(TileId(target), rect);
                }
                InputEvent::DragEnd { target } => self.drop_tile(ctx, TileId(target)),
                _ => {}
            }
        }

        for id in self.board.tick(ctx.dt()) {
            ctx.emit_event(SnippetEvent::new(EventKind::TileSettled, id.0 as f32, 0.0, 0.0));
        }
    }

    fn render(&self, frame: &mut FrameBuffer) {
        frame.push_board(&self.board);
    }

    fn load_manifest(&mut self, manifest: &SnippetManifest) -> Result<()> {
        let config = manifest.apply_grouping(self.board.config());
        self.board = GroupingBoard::new(config)?;
        self.grab = None;
        Ok(())
    }
}
