use lab_engine::api::snippet::{Snippet, SnippetConfig, SnippetContext};
use lab_engine::api::types::{EventKind, SnippetEvent};
use lab_engine::assets::manifest::SnippetManifest;
use lab_engine::error::Result;
use lab_engine::input::queue::{InputEvent, InputQueue};
use lab_engine::reel::{RewardSummary, SpinEvent, SpinMachine};
use lab_engine::renderer::instance::FrameBuffer;

pub mod events {
    /// The spin button.
    pub const SPIN: u32 = 1;
}

/// Reel lab: a plain spin button over three reels that all start on the first face.
pub struct ReelDemo {
    machine: SpinMachine,
    summary: Option<RewardSummary>,
}

impl ReelDemo {
    pub fn new() -> Self {
        Self {
            machine: SpinMachine::reel_lab(),
            summary: None,
        }
    }

    pub fn machine(&self) -> &SpinMachine {
        &self.machine
    }

    pub fn summary(&self) -> Option<&RewardSummary> {
        self.summary.as_ref()
    }

    fn spin(&mut self, ctx: &mut SnippetContext) {
        if self.machine.spin(&mut ctx.rng).is_some() {
            self.summary = None;
            let epoch = self.machine.epoch();
            ctx.emit_event(SnippetEvent::new(EventKind::SpinStarted, epoch.0 as f32, 0.0, 0.0));
        }
    }
}

impl Default for ReelDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl Snippet for ReelDemo {
    fn config(&self) -> SnippetConfig {
        SnippetConfig {
            world_width: 320.0,
            world_height: 160.0,
            max_tiles: 0,
            max_reels: self.machine.reels().len(),
            ..SnippetConfig::default()
        }
    }

    fn init(&mut self, _ctx: &mut SnippetContext) {
        log::info!("reel: {} reels", self.machine.reels().len());
    }

    fn update(&mut self, ctx: &mut SnippetContext, input: &InputQueue) {
        for event in input.iter() {
            if let InputEvent::Custom { kind, .. } = *event {
                if kind == events::SPIN {
                    self.spin(ctx);
                }
            }
        }

        for event in self.machine.tick(ctx.dt()) {
            if let SpinEvent::Complete { outcomes } = &event {
                self.summary = Some(RewardSummary::new(outcomes));
            }
            ctx.emit_event(event.to_event());
        }
    }

    fn render(&self, frame: &mut FrameBuffer) {
        frame.push_machine(&self.machine);
    }

    fn load_manifest(&mut self, manifest: &SnippetManifest) -> Result<()> {
        let symbols = match manifest.symbol_set()? {
            Some(symbols) => symbols,
            None => self.machine.symbols().clone(),
        };
        let config = manifest.apply_spin(self.machine.config());
        self.machine.reconfigure(symbols, config)?;
        self.summary = None;
        Ok(())
    }
}
