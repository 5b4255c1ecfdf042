//! Multi-reel spin controller.
//!
//! `spin` draws every outcome up front and starts one offset tween per reel.
//! Completion is driven by a single timer scheduled for the whole spin, not
//! by the reels reporting in. Every timer carries the spin epoch it was
//! scheduled under; `reset` moves the epoch on, so anything left over from a
//! superseded spin is discarded when it comes due.

use serde::{Deserialize, Serialize};
use crate::api::types::{EventKind, SnippetEvent};
use crate::core::rng::OutcomeSource;
use crate::core::timer::{Epoch, TimerQueue};
use crate::error::{LabError, Result};
use crate::extensions::{Easing, Tween, TweenState};
use super::claim::RewardSummary;
use super::strip::StripGeometry;
use super::symbols::{Color, SymbolSet};

/// Upper bound on reels a machine will drive.
pub const MAX_REELS: usize = 16;

/// Timing and layout of a spin.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpinConfig {
    pub reel_count: usize,
    /// Seconds each reel spends moving.
    pub duration: f32,
    /// Extra start delay per reel index.
    pub stagger: f32,
    /// Seconds from spin start until the spin counts as complete.
    pub complete_after: f32,
    /// Delay between consecutive border reveals.
    pub reveal_stagger: f32,
    /// Outcomes shown before the first spin and after a reset.
    pub initial_outcomes: Vec<usize>,
    pub easing: Easing,
    pub strip: StripGeometry,
}

impl SpinConfig {
    /// Fruit slider page: completes at 4.5 s, starts on `[0, 1, 2]`.
    pub fn fruit_spin() -> Self {
        Self {
            reel_count: 3,
            duration: 4.0,
            stagger: 0.2,
            complete_after: 4.5,
            reveal_stagger: 0.3,
            initial_outcomes: vec![0, 1, 2],
            easing: Easing::REEL,
            strip: StripGeometry::default(),
        }
    }

    /// Reel lab page: completes at 4.8 s, starts on `[0, 0, 0]`.
    pub fn reel_lab() -> Self {
        Self {
            complete_after: 4.8,
            initial_outcomes: vec![0, 0, 0],
            ..Self::fruit_spin()
        }
    }

    /// When the last reel stops moving, relative to spin start.
    pub fn last_landing(&self) -> f32 {
        self.reel_count.saturating_sub(1) as f32 * self.stagger + self.duration
    }

    pub fn validate(&self, symbols: &SymbolSet) -> Result<()> {
        if self.reel_count == 0 {
            return Err(LabError::NoReels);
        }
        if self.reel_count > MAX_REELS {
            return Err(LabError::TooMany { what: "reels", requested: self.reel_count, max: MAX_REELS });
        }
        let timings = [self.duration, self.stagger, self.complete_after, self.reveal_stagger];
        if timings.iter().any(|t| !t.is_finite() || *t < 0.0) {
            return Err(LabError::InvalidDuration);
        }
        if self.initial_outcomes.len() != self.reel_count {
            return Err(LabError::InitialOutcomeCount {
                expected: self.reel_count,
                actual: self.initial_outcomes.len(),
            });
        }
        if let Some(&outcome) = self.initial_outcomes.iter().find(|&&o| o >= symbols.len()) {
            return Err(LabError::OutcomeOutOfRange { outcome, symbols: symbols.len() });
        }
        let last_landing = self.last_landing();
        if self.complete_after < last_landing {
            return Err(LabError::CompletionTooEarly {
                complete_after: self.complete_after,
                last_landing,
            });
        }
        self.strip.validate()
    }
}

impl Default for SpinConfig {
    fn default() -> Self {
        Self::fruit_spin()
    }
}

/// One column of the display.
#[derive(Debug, Clone, PartialEq)]
pub struct Reel {
    pub outcome: usize,
    /// What the reel showed before the current spin; the spin scrolls from here.
    pub previous_outcome: usize,
    /// Current strip offset (non-positive, grows more negative while spinning).
    pub offset: f32,
    pub spinning: bool,
    pub border: Color,
}

impl Reel {
    fn resting(outcome: usize, strip: &StripGeometry) -> Self {
        Self {
            outcome,
            previous_outcome: outcome,
            offset: strip.initial_offset(outcome),
            spinning: false,
            border: Color::DEFAULT_BORDER,
        }
    }
}

/// Something the host may want to react to, produced by `tick`.
#[derive(Debug, Clone, PartialEq)]
pub enum SpinEvent {
    /// Reel `reel` stopped on `symbol`.
    ReelLanded { reel: usize, symbol: usize },
    /// The whole spin finished.
    Complete { outcomes: Vec<usize> },
    /// Reel `reel` now shows the accent color of `symbol`.
    BorderRevealed { reel: usize, symbol: usize },
}

impl SpinEvent {
    /// Wire form for the frame's event section.
    pub fn to_event(&self) -> SnippetEvent {
        match self {
            SpinEvent::ReelLanded { reel, symbol } => {
                SnippetEvent::new(EventKind::ReelLanded, *reel as f32, *symbol as f32, 0.0)
            }
            SpinEvent::Complete { outcomes } => SnippetEvent::new(
                EventKind::SpinComplete,
                RewardSummary::new(outcomes).largest_match as f32,
                outcomes.len() as f32,
                0.0,
            ),
            SpinEvent::BorderRevealed { reel, symbol } => {
                SnippetEvent::new(EventKind::BorderRevealed, *reel as f32, *symbol as f32, 0.0)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum SpinTimer {
    Complete,
    Reveal { reel: usize },
}

/// Everything observable about a machine, minus its epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct SpinSnapshot {
    pub reels: Vec<Reel>,
    pub spinning: bool,
    pub complete: bool,
}

pub struct SpinMachine {
    symbols: SymbolSet,
    config: SpinConfig,
    reels: Vec<Reel>,
    spinning: bool,
    complete: bool,
    epoch: Epoch,
    timers: TimerQueue<SpinTimer>,
    offsets: TweenState<usize>,
}

impl SpinMachine {
    pub fn new(symbols: SymbolSet, config: SpinConfig) -> Result<Self> {
        config.validate(&symbols)?;
        Ok(Self::from_parts(symbols, config))
    }

    /// Fruit faces with the `SpinConfig::fruit_spin` timing.
    pub fn fruit_spin() -> Self {
        Self::from_parts(SymbolSet::fruits(), SpinConfig::fruit_spin())
    }

    /// Fruit faces with the `SpinConfig::reel_lab` timing.
    pub fn reel_lab() -> Self {
        Self::from_parts(SymbolSet::fruits(), SpinConfig::reel_lab())
    }

    fn from_parts(symbols: SymbolSet, config: SpinConfig) -> Self {
        let reels = Self::initial_reels(&config);
        Self {
            symbols,
            config,
            reels,
            spinning: false,
            complete: false,
            epoch: Epoch::default(),
            timers: TimerQueue::new(),
            offsets: TweenState::new(),
        }
    }

    fn initial_reels(config: &SpinConfig) -> Vec<Reel> {
        config
            .initial_outcomes
            .iter()
            .map(|&o| Reel::resting(o, &config.strip))
            .collect()
    }

    /// Replace symbols and timing. Resets the machine.
    pub fn reconfigure(&mut self, symbols: SymbolSet, config: SpinConfig) -> Result<()> {
        config.validate(&symbols)?;
        self.symbols = symbols;
        self.config = config;
        self.reset();
        Ok(())
    }

    /// Start a spin. Returns the drawn outcomes, or `None` if a spin is in flight.
    pub fn spin(&mut self, source: &mut impl OutcomeSource) -> Option<Vec<usize>> {
        if self.spinning {
            log::debug!("spin ignored: already spinning");
            return None;
        }

        let epoch = self.epoch.bump();
        self.timers.retain_epoch(epoch);
        self.offsets.clear();
        self.complete = false;
        self.spinning = true;

        let k = self.symbols.len();
        let strip = self.config.strip;
        for (i, reel) in self.reels.iter_mut().enumerate() {
            reel.previous_outcome = reel.outcome;
            reel.outcome = source.pick(k);
            reel.spinning = true;
            reel.border = Color::DEFAULT_BORDER;

            let from = strip.initial_offset(reel.previous_outcome);
            let to = strip.final_offset(k, reel.outcome);
            reel.offset = from;
            self.offsets.add(
                i,
                Tween::scalar(from, to, self.config.duration, self.config.easing)
                    .with_delay(i as f32 * self.config.stagger),
            );
        }
        self.timers.schedule(self.config.complete_after, epoch, SpinTimer::Complete);

        let outcomes = self.outcomes();
        log::info!("spin {} started: {:?}", epoch.0, outcomes);
        Some(outcomes)
    }

    /// Advance reel animations and spin timers by `dt` seconds.
    pub fn tick(&mut self, dt: f32) -> Vec<SpinEvent> {
        let mut events = Vec::new();

        let landed = self.offsets.tick(dt);
        for (i, sample) in self.offsets.samples() {
            if let (Some(reel), Some(offset)) = (self.reels.get_mut(i), sample.scalar()) {
                reel.offset = offset;
            }
        }
        for done in landed {
            if let (Some(reel), Some(offset)) = (self.reels.get_mut(done.key), done.value.scalar()) {
                reel.offset = offset;
                reel.spinning = false;
                events.push(SpinEvent::ReelLanded { reel: done.key, symbol: reel.outcome });
            }
        }

        self.timers.advance(dt);
        while let Some(fired) = self.timers.pop_due() {
            if !self.epoch.is_current(fired.epoch) {
                log::debug!("dropping timer from superseded spin {}", fired.epoch.0);
                continue;
            }
            match fired.payload {
                SpinTimer::Complete => self.finish(&mut events),
                SpinTimer::Reveal { reel } => {
                    if let Some(r) = self.reels.get_mut(reel) {
                        if let Some(symbol) = self.symbols.get(r.outcome) {
                            r.border = symbol.color;
                        }
                        events.push(SpinEvent::BorderRevealed { reel, symbol: r.outcome });
                    }
                }
            }
        }
        events
    }

    fn finish(&mut self, events: &mut Vec<SpinEvent>) {
        let k = self.symbols.len();
        let strip = self.config.strip;
        // Validation keeps the completion after the last landing; settle
        // anything still moving so the final frame is always exact.
        for (i, reel) in self.reels.iter_mut().enumerate() {
            if reel.spinning {
                self.offsets.remove_key(i);
                reel.offset = strip.final_offset(k, reel.outcome);
                reel.spinning = false;
                events.push(SpinEvent::ReelLanded { reel: i, symbol: reel.outcome });
            }
        }

        self.spinning = false;
        self.complete = true;
        let outcomes = self.outcomes();
        log::info!("spin {} complete: {:?}", self.epoch.0, outcomes);
        events.push(SpinEvent::Complete { outcomes });

        for i in 0..self.reels.len() {
            self.timers.schedule(
                i as f32 * self.config.reveal_stagger,
                self.epoch,
                SpinTimer::Reveal { reel: i },
            );
        }
    }

    /// Return to the pre-spin state. Pending timers become no-ops.
    pub fn reset(&mut self) {
        self.epoch.bump();
        self.offsets.clear();
        self.spinning = false;
        self.complete = false;
        self.reels = Self::initial_reels(&self.config);
        log::debug!("spin machine reset (epoch {})", self.epoch.0);
    }

    pub fn snapshot(&self) -> SpinSnapshot {
        SpinSnapshot {
            reels: self.reels.clone(),
            spinning: self.spinning,
            complete: self.complete,
        }
    }

    pub fn is_spinning(&self) -> bool {
        self.spinning
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn epoch(&self) -> Epoch {
        self.epoch
    }

    pub fn reels(&self) -> &[Reel] {
        &self.reels
    }

    pub fn outcomes(&self) -> Vec<usize> {
        self.reels.iter().map(|r| r.outcome).collect()
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    pub fn config(&self) -> &SpinConfig {
        &self.config
    }

    /// Face currently under reel `reel`'s window.
    pub fn visible_symbol(&self, reel: usize) -> Option<usize> {
        let r = self.reels.get(reel)?;
        Some(self.config.strip.index_at_offset(self.symbols.len(), r.offset))
    }
}
