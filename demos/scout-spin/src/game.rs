//! Claim wizard: intro screen, a slider spin, then a reward screen that
//! opens by itself a moment after the reels stop.

use lab_engine::api::snippet::{Snippet, SnippetConfig, SnippetContext};
use lab_engine::api::types::{EventKind, SnippetEvent};
use lab_engine::assets::manifest::SnippetManifest;
use lab_engine::error::Result;
use lab_engine::input::queue::{InputEvent, InputQueue};
use lab_engine::reel::{
    ClaimFlow, ClaimStep, RewardSummary, SliderRelease, SpinEvent, SpinMachine, SpinSlider,
};
use lab_engine::renderer::instance::FrameBuffer;

pub mod events {
    pub const CLAIM: u32 = 1;
    pub const BACK: u32 = 2;
    pub const FORWARD: u32 = 3;
    pub const MENU: u32 = 4;
}

pub struct ScoutSpinDemo {
    flow: ClaimFlow,
    machine: SpinMachine,
    slider: SpinSlider,
    reward: Option<RewardSummary>,
}

impl ScoutSpinDemo {
    pub fn new() -> Self {
        let mut demo = Self {
            flow: ClaimFlow::new(),
            machine: SpinMachine::fruit_spin(),
            slider: SpinSlider::default(),
            reward: None,
        };
        demo.sync_lock();
        demo
    }

    pub fn step(&self) -> ClaimStep {
        self.flow.step()
    }

    pub fn machine(&self) -> &SpinMachine {
        &self.machine
    }

    pub fn slider(&self) -> &SpinSlider {
        &self.slider
    }

    /// Summary of the last finished spin.
    pub fn reward(&self) -> Option<&RewardSummary> {
        self.reward.as_ref()
    }

    fn sync_lock(&mut self) {
        let idle_on_spin = self.flow.step() == ClaimStep::Spin
            && !self.machine.is_spinning()
            && !self.machine.is_complete();
        self.slider.set_locked(!idle_on_spin);
    }

    fn entered(&mut self, ctx: &mut SnippetContext) {
        let step = self.flow.step();
        ctx.emit_event(SnippetEvent::new(EventKind::StepChanged, step as u32 as f32, 0.0, 0.0));
        // Each visit to the spin screen starts from fresh reels.
        if step == ClaimStep::Spin {
            self.machine.reset();
            self.slider.reset();
            self.reward = None;
        }
    }

    fn navigate(&mut self, ctx: &mut SnippetContext, kind: u32) {
        let changed = match kind {
            events::CLAIM => self.flow.claim(),
            events::BACK => self.flow.back(),
            events::FORWARD => self.flow.forward(),
            events::MENU => self.flow.back_to_menu(),
            _ => {
                log::debug!("scout-spin: unknown custom event {}", kind);
                false
            }
        };
        if changed {
            self.entered(ctx);
        }
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
}

impl Default for ScoutSpinDemo {
    fn default() -> Self {
        Self::new()
    }
}

impl Snippet for ScoutSpinDemo {
    fn config(&self) -> SnippetConfig {
        SnippetConfig {
            world_width: 320.0,
            world_height: 480.0,
            max_tiles: 0,
            max_reels: self.machine.reels().len(),
            ..SnippetConfig::default()
        }
    }

    fn init(&mut self, ctx: &mut SnippetContext) {
        log::info!("scout-spin: starting at {:?}", self.flow.step());
        ctx.emit_event(SnippetEvent::new(
            EventKind::StepChanged,
            self.flow.step() as u32 as f32,
            0.0,
            0.0,
        ));
    }

    fn update(&mut self, ctx: &mut SnippetContext, input: &InputQueue) {
        for event in input.iter() {
            match *event {
                InputEvent::SliderDrag { offset } => self.slider.drag(offset),
                InputEvent::SliderRelease => self.release(ctx),
                InputEvent::Custom { kind, .. } => self.navigate(ctx, kind),
                _ => {}
            }
            self.sync_lock();
        }

        for event in self.machine.tick(ctx.dt()) {
            if let SpinEvent::Complete { outcomes } = &event {
                let summary = RewardSummary::new(outcomes);
                log::info!("scout-spin: largest match {}", summary.largest_match);
                self.reward = Some(summary);
                self.flow.on_spin_complete();
            }
            ctx.emit_event(event.to_event());
        }

        if self.flow.tick(ctx.dt()).is_some() {
            self.entered(ctx);
        }
        self.slider.tick(ctx.dt());
        self.sync_lock();
    }

    fn render(&self, frame: &mut FrameBuffer) {
        frame.push_machine(&self.machine);
        frame.set_slider(&self.slider, self.machine.is_spinning());
        frame.status.step = self.flow.step() as u32;
    }

    fn load_manifest(&mut self, manifest: &SnippetManifest) -> Result<()> {
        let symbols = match manifest.symbol_set()? {
            Some(symbols) => symbols,
            None => self.machine.symbols().clone(),
        };
        let config = manifest.apply_spin(self.machine.config());
        self.machine.reconfigure(symbols, config)?;
        self.slider.reset();
        self.reward = None;
        self.sync_lock();
        Ok(())
    }
}
