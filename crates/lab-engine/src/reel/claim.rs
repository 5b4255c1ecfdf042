//! Three-step claim wizard wrapped around a spin: intro, spin, reward.

use crate::core::timer::{Epoch, TimerQueue};

/// Seconds between a completed spin and the reward screen.
pub const REWARD_DELAY: f32 = 2.5;

/// Compute minutes granted by the reward screen.
pub const REWARD_MINUTES: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u32)]
pub enum ClaimStep {
    Intro = 0,
    Spin = 1,
    Reward = 2,
}

impl ClaimStep {
    pub fn from_index(index: u32) -> Self {
        match index {
            0 => ClaimStep::Intro,
            1 => ClaimStep::Spin,
            _ => ClaimStep::Reward,
        }
    }

    fn prev(self) -> Self {
        Self::from_index((self as u32).saturating_sub(1))
    }

    fn next(self) -> Self {
        Self::from_index(self as u32 + 1)
    }
}

/// What the reward screen shows for a set of outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardSummary {
    pub outcomes: Vec<usize>,
    /// Most reels that landed on the same symbol.
    pub largest_match: usize,
    pub minutes: u32,
}

impl RewardSummary {
    pub fn new(outcomes: &[usize]) -> Self {
        let largest_match = outcomes
            .iter()
            .map(|o| outcomes.iter().filter(|&x| x == o).count())
            .max()
            .unwrap_or(0);
        Self {
            outcomes: outcomes.to_vec(),
            largest_match,
            minutes: REWARD_MINUTES,
        }
    }

    /// Every reel shows the same symbol.
    pub fn is_jackpot(&self) -> bool {
        self.outcomes.len() > 1 && self.largest_match == self.outcomes.len()
    }

    pub fn has_match(&self) -> bool {
        self.largest_match > 1
    }
}

pub struct ClaimFlow {
    step: ClaimStep,
    epoch: Epoch,
    timers: TimerQueue<ClaimStep>,
    reward_delay: f32,
}

impl ClaimFlow {
    pub fn new() -> Self {
        Self {
            step: ClaimStep::Intro,
            epoch: Epoch::default(),
            timers: TimerQueue::new(),
            reward_delay: REWARD_DELAY,
        }
    }

    pub fn step(&self) -> ClaimStep {
        self.step
    }

    /// Move to `step`, dropping any pending automatic advance.
    /// Returns true if the step changed.
    fn go_to(&mut self, step: ClaimStep) -> bool {
        let epoch = self.epoch.bump();
        self.timers.retain_epoch(epoch);
        if step == self.step {
            return false;
        }
        log::debug!("claim flow: {:?} -> {:?}", self.step, step);
        self.step = step;
        true
    }

    /// "Claim" on the intro screen.
    pub fn claim(&mut self) -> bool {
        self.step == ClaimStep::Intro && self.go_to(ClaimStep::Spin)
    }

    pub fn back(&mut self) -> bool {
        self.go_to(self.step.prev())
    }

    pub fn forward(&mut self) -> bool {
        self.go_to(self.step.next())
    }

    pub fn back_to_menu(&mut self) -> bool {
        self.go_to(ClaimStep::Intro)
    }

    /// A spin on the spin screen finished; schedule the reward screen.
    pub fn on_spin_complete(&mut self) {
        if self.step != ClaimStep::Spin {
            return;
        }
        self.timers.schedule(self.reward_delay, self.epoch, ClaimStep::Reward);
    }

    /// Whether the reward screen is scheduled.
    pub fn is_advancing(&self) -> bool {
        !self.timers.is_empty()
    }

    /// Advance timers. Returns the new step if it changed.
    pub fn tick(&mut self, dt: f32) -> Option<ClaimStep> {
        self.timers.advance(dt);
        let mut changed = None;
        while let Some(fired) = self.timers.pop_due() {
            if !self.epoch.is_current(fired.epoch) {
                log::debug!("claim flow: dropping stale advance");
                continue;
            }
            if self.go_to(fired.payload) {
                changed = Some(self.step);
            }
        }
        changed
    }
}

impl Default for ClaimFlow {
    fn default() -> Self {
        Self::new()
    }
}
