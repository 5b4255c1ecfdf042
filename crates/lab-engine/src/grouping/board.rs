//! Drag-to-group controller.
//!
//! Owns the top-level tile collection. A drag gesture is
//! `on_drag_start` → `on_drag_move`* → `on_drag_end`; a drop onto an
//! overlapping tile merges the dragged tile into it, otherwise the tile
//! springs back to its anchor over a few `tick`s.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use crate::api::types::TileId;
use crate::core::geometry::Rect;
use crate::error::{LabError, Result};
use crate::extensions::{Easing, Tween, TweenState};
use super::layout::GridLayout;
use super::tile::Tile;

/// Upper bound on tiles a board will create.
pub const MAX_TILES: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroupingConfig {
    /// Tiles created at mount.
    pub tile_count: usize,
    pub layout: GridLayout,
    /// Seconds for a missed drop to return to its anchor.
    pub snap_back_duration: f32,
    pub snap_back_easing: Easing,
}

impl Default for GroupingConfig {
    fn default() -> Self {
        Self {
            tile_count: 4,
            layout: GridLayout::default(),
            snap_back_duration: 0.35,
            snap_back_easing: Easing::BackOut,
        }
    }
}

/// What a drop did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// `dragged` now lives in `target.children`.
    Grouped { dragged: TileId, target: TileId },
    /// No overlapping tile; the tile is returning to its anchor.
    SnapBack(TileId),
    /// The id was not the active drag.
    Ignored,
}

fn find_mut(tiles: &mut [Tile], id: TileId) -> Option<&mut Tile> {
    tiles.iter_mut().find(|t| t.id == id)
}

pub struct GroupingBoard {
    tiles: Vec<Tile>,
    next_id: u32,
    config: GroupingConfig,
    /// When false the host measures anchors through `set_rest_rect`.
    auto_layout: bool,
    active: Option<TileId>,
    live_rect: Option<Rect>,
    returns: TweenState<TileId>,
}

impl GroupingBoard {
    /// Board whose tiles are anchored on `config.layout`.
    pub fn new(config: GroupingConfig) -> Result<Self> {
        config.layout.validate()?;
        if config.tile_count > MAX_TILES {
            return Err(LabError::TooMany { what: "tiles", requested: config.tile_count, max: MAX_TILES });
        }
        Ok(Self::populated(config))
    }

    fn populated(config: GroupingConfig) -> Self {
        let mut board = Self::empty(config, true);
        for _ in 0..config.tile_count {
            board.spawn_tile();
        }
        board.relayout();
        board
    }

    /// Board whose anchors are measured by the host. Tiles start unmeasured.
    pub fn host_measured(tile_count: usize) -> Self {
        let config = GroupingConfig {
            tile_count,
            ..GroupingConfig::default()
        };
        let mut board = Self::empty(config, false);
        for _ in 0..tile_count {
            board.spawn_tile();
        }
        board
    }

    fn empty(config: GroupingConfig, auto_layout: bool) -> Self {
        Self {
            tiles: Vec::with_capacity(config.tile_count),
            next_id: 0,
            config,
            auto_layout,
            active: None,
            live_rect: None,
            returns: TweenState::new(),
        }
    }

    /// Append a new top-level tile. Ids are never reused.
    pub fn spawn_tile(&mut self) -> TileId {
        let id = TileId(self.next_id);
        self.next_id += 1;
        self.tiles.push(Tile::new(id));
        if self.auto_layout {
            self.relayout();
        }
        id
    }

    /// Reflow anchors so top-level tiles fill the grid in order.
    fn relayout(&mut self) {
        if !self.auto_layout {
            return;
        }
        let layout = self.config.layout;
        for (i, tile) in self.tiles.iter_mut().enumerate() {
            tile.set_rest(Some(layout.rect_for(i)));
        }
    }

    /// Record a host measurement. Unusable rects leave the tile unmeasured.
    pub fn set_rest_rect(&mut self, id: TileId, rect: Rect) {
        if let Some(tile) = find_mut(&mut self.tiles, id) {
            tile.set_rest(rect.is_valid().then_some(rect));
        }
    }

    pub fn config(&self) -> &GroupingConfig {
        &self.config
    }

    /// Top-level tiles in layout order.
    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn tile(&self, id: TileId) -> Option<&Tile> {
        self.tiles.iter().find(|t| t.id == id)
    }

    /// The tile currently being dragged.
    pub fn dragging(&self) -> Option<TileId> {
        self.active
    }

    pub fn group_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_group_container()).count()
    }

    /// Topmost top-level tile under `point`. Later tiles draw above earlier ones.
    pub fn hit_test(&self, point: Vec2) -> Option<TileId> {
        self.tiles
            .iter()
            .rev()
            .find(|t| t.rendered_rect().is_some_and(|r| r.contains(point)))
            .map(|t| t.id)
    }

    /// Begin a drag. Ignored while another tile is dragging or if `id` is not top-level.
    pub fn on_drag_start(&mut self, id: TileId) -> bool {
        if self.active.is_some_and(|active| active != id) {
            return false;
        }
        if self.tile(id).is_none() {
            return false;
        }

        // Grabbing a returning tile stops it where it is.
        if let Some(pos) = self.returns.remove_key(id).and_then(|s| s.point()) {
            if let Some(tile) = find_mut(&mut self.tiles, id) {
                tile.position = pos;
            }
        }

        for tile in self.tiles.iter_mut() {
            if tile.id == id {
                tile.dragging = true;
                tile.snap_back = false;
            } else {
                tile.colliding = false;
            }
        }
        self.active = Some(id);
        self.live_rect = None;
        log::debug!("drag start: tile {}", id.0);
        true
    }

    /// Live rect of the dragged tile, as measured by the host.
    /// Returns how many tiles it now overlaps.
    pub fn on_drag_move(&mut self, id: TileId, live: Rect) -> usize {
        if self.active != Some(id) || !live.is_valid() {
            return 0;
        }
        if let Some(tile) = find_mut(&mut self.tiles, id) {
            if let Some(rest) = tile.rest_rect() {
                tile.position = live.origin() - rest.origin();
            }
        }
        self.live_rect = Some(live);

        let mut hits = 0;
        for tile in self.tiles.iter_mut().filter(|t| t.id != id) {
            tile.colliding = !tile.dragging
                && tile.rendered_rect().is_some_and(|r| live.overlaps(&r));
            if tile.colliding {
                hits += 1;
            }
        }
        hits
    }

    /// Drag by offset from the anchor, for hosts that only report pointer motion.
    /// A tile that has not been measured just records the offset.
    pub fn on_drag_offset(&mut self, id: TileId, offset: Vec2) -> usize {
        if self.active != Some(id) {
            return 0;
        }
        let rest = match find_mut(&mut self.tiles, id) {
            Some(tile) => {
                tile.position = offset;
                tile.rest_rect()
            }
            None => return 0,
        };
        match rest {
            Some(rest) => self.on_drag_move(id, rest.translate(offset)),
            None => 0,
        }
    }

    /// Finish the drag: merge into the nearest overlapping tile, or snap back.
    pub fn on_drag_end(&mut self, id: TileId) -> DropOutcome {
        if self.active != Some(id) {
            return DropOutcome::Ignored;
        }
        let dragged_rect = self
            .live_rect
            .take()
            .or_else(|| self.tile(id).and_then(Tile::rendered_rect));
        self.active = None;

        let target = dragged_rect.and_then(|rect| self.nearest_overlap(id, &rect));
        for tile in self.tiles.iter_mut() {
            tile.colliding = false;
        }

        match target {
            Some(target) => {
                self.group_into(id, target);
                DropOutcome::Grouped { dragged: id, target }
            }
            None => {
                self.start_snap_back(id);
                DropOutcome::SnapBack(id)
            }
        }
    }

    /// Nearest-center overlapping candidate. Equidistant candidates resolve to the lowest id.
    fn nearest_overlap(&self, dragged: TileId, rect: &Rect) -> Option<TileId> {
        let mut best: Option<(f32, TileId)> = None;
        for tile in self.tiles.iter().filter(|t| t.id != dragged && !t.dragging) {
            let Some(other) = tile.rendered_rect() else { continue };
            if !rect.overlaps(&other) {
                continue;
            }
            let distance = rect.center_distance(&other);
            let closer = match best {
                None => true,
                Some((best_d, best_id)) => {
                    distance < best_d || (distance == best_d && tile.id < best_id)
                }
            };
            if closer {
                best = Some((distance, tile.id));
            }
        }
        best.map(|(_, id)| id)
    }

    fn group_into(&mut self, dragged: TileId, target: TileId) {
        let Some(idx) = self.tiles.iter().position(|t| t.id == dragged) else { return };
        self.returns.remove_key(dragged);
        let tile = self.tiles.remove(idx);
        if let Some(parent) = find_mut(&mut self.tiles, target) {
            parent.absorb(tile);
            log::info!(
                "tile {} grouped into {} ({} children)",
                dragged.0,
                target.0,
                parent.children.len()
            );
        }
        self.relayout();
    }

    fn start_snap_back(&mut self, id: TileId) {
        let Some(tile) = find_mut(&mut self.tiles, id) else { return };
        tile.dragging = false;
        tile.snap_back = true;
        let from = tile.position;
        self.returns.add(
            id,
            Tween::point(from, Vec2::ZERO, self.config.snap_back_duration, self.config.snap_back_easing),
        );
        log::debug!("tile {} snapping back from {:?}", id.0, from);
    }

    /// Advance return transitions. Returns tiles that settled this tick.
    pub fn tick(&mut self, dt: f32) -> Vec<TileId> {
        let done = self.returns.tick(dt);

        for (id, sample) in self.returns.samples() {
            if let (Some(tile), Some(pos)) = (find_mut(&mut self.tiles, id), sample.point()) {
                tile.position = pos;
            }
        }

        let mut settled = Vec::with_capacity(done.len());
        for c in done {
            if let Some(tile) = find_mut(&mut self.tiles, c.key) {
                tile.position = Vec2::ZERO;
                tile.snap_back = false;
                settled.push(c.key);
            }
        }
        settled
    }

    /// Whether any tile is still returning to its anchor.
    pub fn is_settling(&self) -> bool {
        !self.returns.is_empty()
    }
}

impl Default for GroupingBoard {
    /// Four tiles on the two-column grid.
    fn default() -> Self {
        Self::populated(GroupingConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(l: f32, t: f32, r: f32, b: f32) -> Rect {
        Rect::new(l, t, r, b)
    }

    /// Dragged tile 0 sits at [0,0,20,20] (center 10,10).
    /// Tile 1 overlaps with center distance 12, tile 2 with distance 5.
    fn measured_board() -> GroupingBoard {
        let mut board = GroupingBoard::host_measured(4);
        board.set_rest_rect(TileId(0), rect(0.0, 0.0, 20.0, 20.0));
        board.set_rest_rect(TileId(1), rect(12.0, 0.0, 32.0, 20.0));
        board.set_rest_rect(TileId(2), rect(3.0, 4.0, 23.0, 24.0));
        board.set_rest_rect(TileId(3), rect(200.0, 200.0, 220.0, 220.0));
        board
    }

    #[test]
    fn default_board_has_four_tiles_in_grid() {
        let board = GroupingBoard::default();
        assert_eq!(board.tiles().len(), 4);
        let ids: Vec<u32> = board.tiles().iter().map(|t| t.id.0).collect();
        assert_eq!(ids, vec![0, 1, 2, 3]);
        assert!(board.tiles().iter().all(|t| t.rest_rect().is_some()));
    }

    #[test]
    fn drag_start_marks_only_the_dragged_tile() {
        let mut board = measured_board();
        assert!(board.on_drag_start(TileId(0)));
        board.on_drag_move(TileId(0), rect(0.0, 0.0, 20.0, 20.0));
        assert!(board.tile(TileId(1)).unwrap().colliding);

        // A repeated start for the same gesture clears stale collision flags.
        assert!(board.on_drag_start(TileId(0)));
        assert!(board.tile(TileId(0)).unwrap().dragging);
        assert!(board
            .tiles()
            .iter()
            .filter(|t| t.id != TileId(0))
            .all(|t| !t.colliding && !t.dragging));
    }

    #[test]
    fn only_one_drag_at_a_time() {
        let mut board = measured_board();
        assert!(board.on_drag_start(TileId(0)));
        assert!(!board.on_drag_start(TileId(1)));
        assert_eq!(board.on_drag_end(TileId(1)), DropOutcome::Ignored);
    }

    #[test]
    fn drag_move_flags_overlapping_tiles() {
        let mut board = measured_board();
        board.on_drag_start(TileId(0));
        let hits = board.on_drag_move(TileId(0), rect(0.0, 0.0, 20.0, 20.0));
        assert_eq!(hits, 2);
        assert!(board.tile(TileId(1)).unwrap().colliding);
        assert!(board.tile(TileId(2)).unwrap().colliding);
        assert!(!board.tile(TileId(3)).unwrap().colliding);
        assert!(!board.tile(TileId(0)).unwrap().colliding);
    }

    #[test]
    fn drop_picks_nearest_center() {
        let mut board = measured_board();
        board.on_drag_start(TileId(0));
        board.on_drag_move(TileId(0), rect(0.0, 0.0, 20.0, 20.0));
        let outcome = board.on_drag_end(TileId(0));

        assert_eq!(outcome, DropOutcome::Grouped { dragged: TileId(0), target: TileId(2) });
        assert!(board.tile(TileId(0)).is_none(), "grouped tile leaves the top level");
        let target = board.tile(TileId(2)).unwrap();
        assert!(target.is_group_container());
        assert_eq!(target.children.len(), 1);
        assert_eq!(target.children[0].id, TileId(0));
        assert_eq!(target.children[0].position, Vec2::ZERO);
        assert!(board.tiles().iter().all(|t| !t.colliding && !t.dragging));
    }

    #[test]
    fn equidistant_candidates_resolve_to_lowest_id() {
        let mut board = GroupingBoard::host_measured(3);
        board.set_rest_rect(TileId(0), rect(10.0, 0.0, 30.0, 20.0));
        board.set_rest_rect(TileId(1), rect(20.0, 0.0, 40.0, 20.0));
        board.set_rest_rect(TileId(2), rect(0.0, 0.0, 20.0, 20.0));

        board.on_drag_start(TileId(0));
        let outcome = board.on_drag_end(TileId(0));
        assert_eq!(outcome, DropOutcome::Grouped { dragged: TileId(0), target: TileId(1) });
    }

    #[test]
    fn miss_snaps_back_and_settles() {
        let mut board = measured_board();
        board.on_drag_start(TileId(3));
        board.on_drag_move(TileId(3), rect(300.0, 300.0, 320.0, 320.0));
        assert_eq!(board.tile(TileId(3)).unwrap().position, Vec2::new(100.0, 100.0));

        let outcome = board.on_drag_end(TileId(3));
        assert_eq!(outcome, DropOutcome::SnapBack(TileId(3)));
        let tile = board.tile(TileId(3)).unwrap();
        assert!(tile.snap_back);
        assert!(!tile.dragging);
        assert_eq!(board.tiles().len(), 4);
        assert!(board.is_settling());

        let mut settled = Vec::new();
        for _ in 0..60 {
            settled.extend(board.tick(1.0 / 60.0));
        }
        assert_eq!(settled, vec![TileId(3)]);
        let tile = board.tile(TileId(3)).unwrap();
        assert_eq!(tile.position, Vec2::ZERO);
        assert!(!tile.snap_back);
    }

    #[test]
    fn grabbing_a_returning_tile_keeps_its_offset() {
        let mut board = measured_board();
        board.on_drag_start(TileId(3));
        board.on_drag_offset(TileId(3), Vec2::new(100.0, 0.0));
        board.on_drag_end(TileId(3));
        board.tick(0.1);
        let mid = board.tile(TileId(3)).unwrap().position;
        assert!(mid.x > 0.0 && mid.x < 100.0 + 20.0, "mid {:?}", mid);

        board.on_drag_start(TileId(3));
        assert!(!board.is_settling());
        assert_eq!(board.tile(TileId(3)).unwrap().position, mid);
        assert!(!board.tile(TileId(3)).unwrap().snap_back);
    }

    #[test]
    fn unmeasured_tiles_never_collide() {
        let mut board = GroupingBoard::host_measured(2);
        board.set_rest_rect(TileId(0), rect(0.0, 0.0, 20.0, 20.0));
        board.on_drag_start(TileId(0));
        assert_eq!(board.on_drag_move(TileId(0), rect(0.0, 0.0, 20.0, 20.0)), 0);
        assert!(!board.tile(TileId(1)).unwrap().colliding);
        assert_eq!(board.on_drag_end(TileId(0)), DropOutcome::SnapBack(TileId(0)));
    }

    #[test]
    fn unmeasured_dragged_tile_is_a_no_op_move() {
        let mut board = GroupingBoard::host_measured(2);
        board.set_rest_rect(TileId(1), rect(0.0, 0.0, 20.0, 20.0));
        board.on_drag_start(TileId(0));
        assert_eq!(board.on_drag_offset(TileId(0), Vec2::new(5.0, 5.0)), 0);
        assert!(!board.tile(TileId(1)).unwrap().colliding);
        assert_eq!(board.on_drag_end(TileId(0)), DropOutcome::SnapBack(TileId(0)));
    }

    #[test]
    fn invalid_live_rect_is_ignored() {
        let mut board = measured_board();
        board.on_drag_start(TileId(0));
        let bad = rect(f32::NAN, 0.0, 20.0, 20.0);
        assert_eq!(board.on_drag_move(TileId(0), bad), 0);
        assert_eq!(board.tile(TileId(0)).unwrap().position, Vec2::ZERO);
    }

    #[test]
    fn grouping_reflows_remaining_tiles() {
        let mut board = GroupingBoard::new(GroupingConfig::default()).unwrap();
        let grid = board.config().layout;
        let over_tile_1 = grid.rect_for(1).origin() - grid.rect_for(0).origin();

        board.on_drag_start(TileId(0));
        board.on_drag_offset(TileId(0), over_tile_1);
        let outcome = board.on_drag_end(TileId(0));
        assert_eq!(outcome, DropOutcome::Grouped { dragged: TileId(0), target: TileId(1) });

        assert_eq!(board.tiles().len(), 3);
        assert_eq!(board.tile(TileId(1)).unwrap().rest_rect(), Some(grid.rect_for(0)));
        assert_eq!(board.tile(TileId(3)).unwrap().rest_rect(), Some(grid.rect_for(2)));
        assert_eq!(board.group_count(), 1);
    }

    #[test]
    fn groups_keep_growing() {
        let mut board = GroupingBoard::new(GroupingConfig::default()).unwrap();
        let target = TileId(0);
        for _ in 0..3 {
            let dragged = board.tiles()[1].id;
            let offset = board.tile(target).unwrap().rest_rect().unwrap().origin()
                - board.tile(dragged).unwrap().rest_rect().unwrap().origin();
            board.on_drag_start(dragged);
            board.on_drag_offset(dragged, offset);
            assert_eq!(
                board.on_drag_end(dragged),
                DropOutcome::Grouped { dragged, target }
            );
        }
        assert_eq!(board.tiles().len(), 1);
        let group = &board.tiles()[0];
        let child_ids: Vec<u32> = group.children.iter().map(|c| c.id.0).collect();
        assert_eq!(child_ids, vec![1, 2, 3]);
        assert_eq!(group.badges().labels, vec![1, 2, 3, 4]);
    }

    #[test]
    fn tile_count_is_capped() {
        let config = GroupingConfig { tile_count: MAX_TILES + 1, ..GroupingConfig::default() };
        assert!(matches!(
            GroupingBoard::new(config),
            Err(LabError::TooMany { what: "tiles", .. })
        ));
    }

    #[test]
    fn grabbing_another_tile_keeps_returning_flag() {
        let mut board = GroupingBoard::new(GroupingConfig::default()).unwrap();
        board.on_drag_start(TileId(0));
        board.on_drag_offset(TileId(0), Vec2::new(0.0, 400.0));
        assert_eq!(board.on_drag_end(TileId(0)), DropOutcome::SnapBack(TileId(0)));
        board.tick(0.05);

        assert!(board.on_drag_start(TileId(3)));
        assert!(board.tile(TileId(0)).unwrap().snap_back);
        assert!(board.is_settling());

        board.tick(1.0);
        assert!(!board.tile(TileId(0)).unwrap().snap_back);
    }

    #[test]
    fn hit_test_finds_tile_under_pointer() {
        let board = GroupingBoard::new(GroupingConfig::default()).unwrap();
        let center = board.config().layout.rect_for(2).center();
        assert_eq!(board.hit_test(center), Some(TileId(2)));
        assert_eq!(board.hit_test(Vec2::new(-10.0, -10.0)), None);
    }
}
