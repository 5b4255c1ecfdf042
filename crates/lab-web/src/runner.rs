use lab_engine::{
    Snippet, SnippetConfig, SnippetContext, SnippetEvent, SnippetManifest,
    InputEvent, InputQueue, FrameBuffer, FixedTimestep, ProtocolLayout,
};

/// Generic snippet runner that wires up the interaction loop.
///
/// Each concrete snippet (e.g., `fruit-spin`) creates a `thread_local!` SnippetRunner
/// and exports free functions via `#[wasm_bindgen]`, because wasm-bindgen
/// cannot export generic structs directly.
pub struct SnippetRunner<S: Snippet> {
    snippet: S,
    ctx: SnippetContext,
    input: InputQueue,
    frame: FrameBuffer,
    timestep: FixedTimestep,
    config: SnippetConfig,
    layout: ProtocolLayout,
    /// Packed frame the host reads after every tick.
    buffer: Vec<f32>,
    frame_counter: u64,
    initialized: bool,
}

impl<S: Snippet> SnippetRunner<S> {
    pub fn new(snippet: S) -> Self {
        let dt = snippet.config().fixed_dt;
        Self::with_context(snippet, SnippetContext::new(dt))
    }

    /// Runner with a caller-supplied context (a seeded generator in tests).
    pub fn with_context(snippet: S, ctx: SnippetContext) -> Self {
        let config = snippet.config();
        let timestep = FixedTimestep::new(config.fixed_dt);
        let layout = ProtocolLayout::from_config(&config);
        let frame = FrameBuffer::with_capacity(config.max_tiles, config.max_reels);

        Self {
            snippet,
            ctx,
            input: InputQueue::new(),
            frame,
            timestep,
            buffer: layout.allocate(),
            layout,
            config,
            frame_counter: 0,
            initialized: false,
        }
    }

    /// Initialize the snippet. Call once after construction.
    pub fn init(&mut self) {
        self.snippet.init(&mut self.ctx);
        self.initialized = true;
        self.publish();
    }

    /// Push an input event into the queue.
    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    /// Run one animation frame: fixed steps, render, pack.
    pub fn tick(&mut self, dt: f32) {
        if !self.initialized {
            return;
        }

        // Clear per-frame transient data
        self.ctx.clear_frame_data();

        // Input goes to the first step only; with no step this frame it waits.
        let steps = self.timestep.accumulate(dt);
        if steps > 0 {
            let input = self.input.take();
            let idle = InputQueue::new();
            for step in 0..steps {
                let queue = if step == 0 { &input } else { &idle };
                self.snippet.update(&mut self.ctx, queue);
            }
        }

        self.publish();
    }

    fn publish(&mut self) {
        self.frame.clear();
        self.snippet.render(&mut self.frame);
        self.frame_counter += 1;
        self.layout.write_frame(
            &mut self.buffer,
            self.frame_counter,
            (self.config.world_width, self.config.world_height),
            &self.frame,
            &self.ctx.events,
        );
    }

    /// Parse and apply a JSON manifest. Rejected manifests are logged and
    /// leave the snippet unchanged.
    ///
    /// An accepted manifest may change the world size and frame capacities,
    /// so the buffer is reallocated: hosts must re-read the buffer pointer
    /// and layout offsets afterwards.
    pub fn load_manifest(&mut self, json: &str) -> bool {
        let applied = SnippetManifest::from_json(json)
            .and_then(|manifest| self.snippet.load_manifest(&manifest));
        match applied {
            Ok(()) => {
                self.relayout();
                log::info!(
                    "manifest applied: world {}x{}, {} floats",
                    self.config.world_width,
                    self.config.world_height,
                    self.layout.buffer_total_floats
                );
                self.publish();
                true
            }
            Err(err) => {
                log::warn!("manifest rejected: {}", err);
                false
            }
        }
    }

    /// Re-read the snippet's config and size the frame to match.
    fn relayout(&mut self) {
        let config = self.snippet.config();
        let layout = ProtocolLayout::from_config(&config);
        if layout != self.layout {
            self.buffer = layout.allocate();
            self.frame = FrameBuffer::with_capacity(config.max_tiles, config.max_reels);
            self.layout = layout;
        }
        self.config = config;
    }

    pub fn snippet(&self) -> &S {
        &self.snippet
    }

    /// Events emitted during the last tick.
    pub fn events(&self) -> &[SnippetEvent] {
        &self.ctx.events
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    /// The packed frame.
    pub fn buffer(&self) -> &[f32] {
        &self.buffer
    }

    // ---- Pointer accessors for direct memory reads ----

    pub fn buffer_ptr(&self) -> *const f32 {
        self.buffer.as_ptr()
    }

    pub fn world_width(&self) -> f32 {
        self.config.world_width
    }

    pub fn world_height(&self) -> f32 {
        self.config.world_height
    }

    // ---- Layout accessors (read by TypeScript via wasm_bindgen exports) ----

    pub fn buffer_total_floats(&self) -> u32 {
        self.layout.buffer_total_floats as u32
    }

    pub fn tile_data_offset(&self) -> u32 {
        self.layout.tile_data_offset as u32
    }

    pub fn reel_data_offset(&self) -> u32 {
        self.layout.reel_data_offset as u32
    }

    pub fn event_data_offset(&self) -> u32 {
        self.layout.event_data_offset as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lab_engine::bridge::protocol::{
        HEADER_EVENT_COUNT, HEADER_FRAME_COUNTER, HEADER_MAX_TILES, HEADER_TILE_COUNT, HEADER_WORLD_HEIGHT,
    };
    use lab_engine::{EventKind, TileInstance};

    /// Counts the input events and steps it sees; renders one tile per event seen so far.
    #[derive(Default)]
    struct Probe {
        steps: u32,
        seen: Vec<usize>,
        manifest_tiles: u32,
    }

    impl Snippet for Probe {
        fn config(&self) -> SnippetConfig {
            let tiles = self.manifest_tiles.max(4) as usize;
            SnippetConfig {
                world_height: 80.0 * tiles as f32,
                max_tiles: tiles,
                ..SnippetConfig::default()
            }
        }

        fn init(&mut self, _ctx: &mut SnippetContext) {}

        fn update(&mut self, ctx: &mut SnippetContext, input: &InputQueue) {
            self.steps += 1;
            self.seen.push(input.len());
            if !input.is_empty() {
                ctx.emit_event(SnippetEvent::new(EventKind::StepChanged, input.len() as f32, 0.0, 0.0));
            }
        }

        fn render(&self, frame: &mut FrameBuffer) {
            let tiles = self.seen.iter().filter(|&&n| n > 0).count() + self.manifest_tiles as usize;
            for _ in 0..tiles {
                frame.push_tile(TileInstance::default());
            }
        }

        fn load_manifest(&mut self, manifest: &SnippetManifest) -> lab_engine::Result<()> {
            if let Some(tiles) = &manifest.tiles {
                self.manifest_tiles = tiles.count.unwrap_or(0) as u32;
            }
            Ok(())
        }
    }

    fn runner() -> SnippetRunner<Probe> {
        let mut r = SnippetRunner::with_context(Probe::default(), SnippetContext::with_seed(1.0 / 60.0, 1));
        r.init();
        r
    }

    #[test]
    fn input_reaches_only_the_first_step() {
        let mut r = runner();
        r.push_input(InputEvent::PointerDown { x: 1.0, y: 1.0 });
        r.push_input(InputEvent::PointerUp { x: 1.0, y: 1.0 });
        r.tick(3.0 / 60.0 + 0.001);
        assert_eq!(r.snippet().seen, vec![2, 0, 0]);
        assert_eq!(r.events().len(), 1);
    }

    #[test]
    fn input_waits_for_a_step() {
        let mut r = runner();
        r.push_input(InputEvent::SliderRelease);
        r.tick(0.001);
        assert_eq!(r.snippet().steps, 0);
        r.tick(1.0 / 60.0);
        assert_eq!(r.snippet().seen, vec![1]);
    }

    #[test]
    fn tick_before_init_does_nothing() {
        let mut r = SnippetRunner::with_context(Probe::default(), SnippetContext::with_seed(1.0 / 60.0, 1));
        r.push_input(InputEvent::SliderRelease);
        r.tick(1.0);
        assert_eq!(r.snippet().steps, 0);
    }

    #[test]
    fn frame_is_packed_after_tick() {
        let mut r = runner();
        r.push_input(InputEvent::SliderRelease);
        r.tick(1.0 / 60.0 + 0.001);
        let buf = r.buffer();
        assert_eq!(buf.len(), r.buffer_total_floats() as usize);
        assert_eq!(buf[HEADER_FRAME_COUNTER], 2.0);
        assert_eq!(buf[HEADER_TILE_COUNT], 1.0);
        assert_eq!(buf[HEADER_EVENT_COUNT], 1.0);

        // Events are per frame.
        r.tick(1.0 / 60.0);
        assert_eq!(r.buffer()[HEADER_EVENT_COUNT], 0.0);
    }

    #[test]
    fn manifest_errors_are_reported() {
        let mut r = runner();
        assert!(!r.load_manifest("not json"));
        assert!(r.load_manifest(r#"{ "tiles": { "count": 10 } }"#));
        assert_eq!(r.snippet().manifest_tiles, 10);
    }

    #[test]
    fn manifest_resizes_the_frame() {
        let mut r = runner();
        let before = r.buffer_total_floats();
        assert!(r.load_manifest(r#"{ "tiles": { "count": 6 } }"#));
        assert!(r.buffer_total_floats() > before);
        assert_eq!(r.buffer().len(), r.buffer_total_floats() as usize);
        assert_eq!(r.world_height(), 480.0);

        r.tick(1.0 / 60.0 + 0.001);
        let buf = r.buffer();
        assert_eq!(buf[HEADER_MAX_TILES], 6.0);
        assert_eq!(buf[HEADER_TILE_COUNT], 6.0);
        assert_eq!(buf[HEADER_WORLD_HEIGHT], 480.0);
    }

    #[test]
    fn rejected_manifest_keeps_the_layout() {
        let mut r = runner();
        let before = r.buffer_total_floats();
        assert!(!r.load_manifest(r#"{ "tiles": 3 }"#));
        assert_eq!(r.buffer_total_floats(), before);
    }
}
