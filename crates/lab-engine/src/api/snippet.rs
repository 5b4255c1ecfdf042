use crate::api::types::SnippetEvent;
use crate::assets::manifest::SnippetManifest;
use crate::core::rng::Rng;
use crate::error::Result;
use crate::input::queue::InputQueue;
use crate::renderer::instance::FrameBuffer;

/// Configuration for the host loop, provided by the snippet.
#[derive(Debug, Clone)]
pub struct SnippetConfig {
    /// Fixed timestep in seconds (default: 1/60).
    pub fixed_dt: f32,
    /// World width in layout units.
    pub world_width: f32,
    /// World height in layout units.
    pub world_height: f32,
    /// Maximum number of tile instances per frame (default: 16).
    pub max_tiles: usize,
    /// Maximum number of reel instances per frame (default: 8).
    pub max_reels: usize,
    /// Maximum number of snippet events per frame (default: 32).
    pub max_events: usize,
}

impl Default for SnippetConfig {
    fn default() -> Self {
        Self {
            fixed_dt: 1.0 / 60.0,
            world_width: 320.0,
            world_height: 320.0,
            max_tiles: 16,
            max_reels: 8,
            max_events: 32,
        }
    }
}

/// The contract every showcase snippet fulfills.
pub trait Snippet {
    /// Return loop configuration. Called once before init.
    fn config(&self) -> SnippetConfig {
        SnippetConfig::default()
    }

    /// Setup initial state.
    fn init(&mut self, ctx: &mut SnippetContext);

    /// One fixed step. `input` holds the events queued since the previous step.
    fn update(&mut self, ctx: &mut SnippetContext, input: &InputQueue);

    /// Describe the current state for the host.
    fn render(&self, frame: &mut FrameBuffer);

    /// Apply runtime overrides. On error the snippet keeps its previous configuration.
    fn load_manifest(&mut self, _manifest: &SnippetManifest) -> Result<()> {
        Ok(())
    }
}

/// Mutable loop state, passed to Snippet::init and Snippet::update.
pub struct SnippetContext {
    pub events: Vec<SnippetEvent>,
    pub rng: Rng,
    dt: f32,
}

impl SnippetContext {
    /// Context with an entropy-seeded generator.
    pub fn new(dt: f32) -> Self {
        Self::with_rng(dt, Rng::from_entropy())
    }

    pub fn with_seed(dt: f32, seed: u64) -> Self {
        Self::with_rng(dt, Rng::new(seed))
    }

    fn with_rng(dt: f32, rng: Rng) -> Self {
        Self {
            events: Vec::new(),
            rng,
            dt,
        }
    }

    /// Seconds per fixed step.
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Emit an event to be forwarded to TypeScript.
    pub fn emit_event(&mut self, event: SnippetEvent) {
        self.events.push(event);
    }

    /// Clear per-frame transient data.
    pub fn clear_frame_data(&mut self) {
        self.events.clear();
    }
}
