use lab_engine::api::snippet::{Snippet, SnippetConfig, SnippetContext};
use lab_engine::api::types::{EventKind, SnippetEvent};
use lab_engine::assets::manifest::SnippetManifest;
use lab_engine::error::Result;
use lab_engine::input::queue::{InputEvent, InputQueue};
use lab_engine::reel::{SliderRelease, SpinMachine, SpinSlider};
use lab_engine::renderer::instance::FrameBuffer;

/// Custom event kinds sent by the page.
pub mod events {
    /// The reset button.
    pub const RESET: u32 = 1;
}

/// Three fruit reels behind a drag-to-spin slider.
pub struct FruitSpinDemo {
    machine: SpinMachine,
    slider: SpinSlider,
}

impl FruitSpinDemo {
    pub fn new() -> Self {
        Self {
            machine: SpinMachine::fruit_spin(),
            slider: SpinSlider::default(),
        }
    }

    pub fn machine(&self) -> &SpinMachine {
        &self.machine
    }

    pub fn slider(&self) -> &SpinSlider {
        &self.slider
    }

    /// The handle stays put while reels move and until a finished spin is reset.
    fn sync_lock(&mut self) {
        self.slider
            .set_locked(self.machine.is_spinning() || self.machine.is_complete());
    }

    fn release(&mut self, ctx: &mut SnippetContext) {
        match self.slider.release() {
            SliderRelease::Commit => {
                ctx.emit_event(SnippetEvent::new(EventKind::SliderReleased, 1.0, 0.0, 0.0));
                if self.machine.spin(&mut ctx.rng).is_some() {
                    let epoch = self.machine.epoch();
                    ctx.emit_event(SnippetEvent::new(EventKind::SpinStarted, epoch.0 as f32, 0.0, 0.0));
                }
            }
            SliderRelease::Cancel => {
                ctx.emit_event(SnippetEvent::new(EventKind::SliderReleased, 0.0, 0.0, 0.0));
            }
            SliderRelease::Ignored => {}
        }
    }

    fn reset(&mut self) {
        if !self.machine.is_complete() {
            log::debug!("reset ignored: no finished spin");
            return;
        }
        self.machine.reset();
        self.slider.reset();
    }
}

impl Default for FruitSpinDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl Snippet for FruitSpinDemo {
    fn config(&self) -> SnippetConfig {
        SnippetConfig {
            world_width: 320.0,
            world_height: 240.0,
            max_tiles: 0,
            max_reels: self.machine.reels().len(),
            ..SnippetConfig::default()
        }
    }

    fn init(&mut self, _ctx: &mut SnippetContext) {
        log::info!("fruit-spin: {} reels", self.machine.reels().len());
    }

    fn update(&mut self, ctx: &mut SnippetContext, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::SliderDrag { offset } => self.slider.drag(offset),
                InputEvent::SliderRelease => self.release(ctx),
                InputEvent::Custom { kind, .. } if kind == events::RESET => self.reset(),
                _ => {}
            }
            self.sync_lock();
        }

        for event in self.machine.tick(ctx.dt()) {
            ctx.emit_event(event.to_event());
        }
        self.slider.tick(ctx.dt());
        self.sync_lock();
    }

    fn render(&self, frame: &mut FrameBuffer) {
        frame.push_machine(&self.machine);
        frame.set_slider(&self.slider, self.machine.is_spinning());
        frame.status.reset_enabled = self.machine.is_complete();
    }

    fn load_manifest(&mut self, manifest: &SnippetManifest) -> Result<()> {
        let symbols = match manifest.symbol_set()? {
            Some(symbols) => symbols,
            None => self.machine.symbols().clone(),
        };
        let config = manifest.apply_spin(self.machine.config());
        self.machine.reconfigure(symbols, config)?;
        self.slider.reset();
        self.sync_lock();
        Ok(())
    }
}
