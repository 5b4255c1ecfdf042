//! Drag-to-spin handle.
//!
//! The handle slides along a track. Releasing it within a few units of the
//! far end commits a spin; any release springs the handle back to the start.

use serde::{Deserialize, Serialize};
use crate::core::timer::{Epoch, TimerQueue};
use crate::extensions::{Easing, Tween, TweenState};
use super::symbols::Color;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SliderConfig {
    pub track_width: f32,
    pub handle_width: f32,
    /// How close to the far end counts as "at the end".
    pub end_tolerance: f32,
    pub return_duration: f32,
    pub return_easing: Easing,
    /// Progress lingers this long after a commit before dropping to zero.
    pub progress_reset_delay: f32,
}

impl Default for SliderConfig {
    fn default() -> Self {
        Self {
            track_width: 312.0,
            handle_width: 36.0,
            end_tolerance: 5.0,
            return_duration: 0.45,
            return_easing: Easing::BackOut,
            progress_reset_delay: 0.1,
        }
    }
}

impl SliderConfig {
    /// Furthest the handle can travel.
    pub fn max_offset(&self) -> f32 {
        (self.track_width - self.handle_width).max(0.0)
    }
}

/// Handle appearance, highest priority first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u32)]
pub enum HandleStyle {
    Idle = 0,
    AtEnd = 1,
    Spinning = 2,
}

impl HandleStyle {
    pub fn background(self) -> Color {
        match self {
            HandleStyle::Spinning => Color::from_rgb8(0xb3, 0xb3, 0xb3),
            HandleStyle::AtEnd => Color::from_rgb8(0x2d, 0xa9, 0xff),
            HandleStyle::Idle => Color::from_rgb8(0xff, 0xff, 0xff),
        }
    }

    pub fn foreground(self) -> Color {
        match self {
            HandleStyle::Spinning | HandleStyle::AtEnd => Color::from_rgb8(0xff, 0xff, 0xff),
            HandleStyle::Idle => Color::from_rgb8(0x2d, 0xa9, 0xff),
        }
    }
}

/// Result of letting go of the handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SliderRelease {
    /// Released at the end: start a spin.
    Commit,
    /// Released short of the end.
    Cancel,
    /// Not dragging, or locked.
    Ignored,
}

pub struct SpinSlider {
    config: SliderConfig,
    offset: f32,
    progress: f32,
    at_end: bool,
    dragging: bool,
    locked: bool,
    epoch: Epoch,
    timers: TimerQueue<()>,
    handle: TweenState<()>,
}

impl SpinSlider {
    pub fn new(config: SliderConfig) -> Self {
        Self {
            config,
            offset: 0.0,
            progress: 0.0,
            at_end: false,
            dragging: false,
            locked: false,
            epoch: Epoch::default(),
            timers: TimerQueue::new(),
            handle: TweenState::new(),
        }
    }

    /// Handle dragged to `offset` units from the start of the track.
    /// Ignored while locked.
    pub fn drag(&mut self, offset: f32) {
        if self.locked || !offset.is_finite() {
            return;
        }
        if !self.dragging {
            self.dragging = true;
            self.handle.clear();
            self.epoch.bump();
        }
        let max = self.config.max_offset();
        self.offset = offset.clamp(0.0, max);
        self.progress = if max > 0.0 { (offset / max).clamp(0.0, 1.0) } else { 1.0 };
        self.at_end = offset >= max - self.config.end_tolerance;
    }

    pub fn release(&mut self) -> SliderRelease {
        if !self.dragging {
            return SliderRelease::Ignored;
        }
        self.dragging = false;
        let committed = self.at_end;
        self.at_end = false;

        self.handle.add(
            (),
            Tween::scalar(self.offset, 0.0, self.config.return_duration, self.config.return_easing),
        );
        if committed {
            self.timers.schedule(self.config.progress_reset_delay, self.epoch, ());
            log::debug!("slider committed");
            SliderRelease::Commit
        } else {
            self.progress = 0.0;
            SliderRelease::Cancel
        }
    }

    pub fn tick(&mut self, dt: f32) {
        self.handle.tick(dt);
        self.offset = self.handle.scalar(()).unwrap_or(if self.dragging { self.offset } else { 0.0 });

        self.timers.advance(dt);
        while let Some(fired) = self.timers.pop_due() {
            if self.epoch.is_current(fired.epoch) {
                self.progress = 0.0;
            }
        }
    }

    /// Lock or unlock the handle. Locking mid-drag drops the gesture.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
        if locked && self.dragging {
            self.dragging = false;
            self.at_end = false;
            self.progress = 0.0;
            self.handle.add(
                (),
                Tween::scalar(self.offset, 0.0, self.config.return_duration, self.config.return_easing),
            );
        }
    }

    /// Snap everything back to the start immediately.
    pub fn reset(&mut self) {
        self.epoch.bump();
        self.handle.clear();
        self.timers.clear();
        self.offset = 0.0;
        self.progress = 0.0;
        self.at_end = false;
        self.dragging = false;
    }

    pub fn style(&self, spinning: bool) -> HandleStyle {
        if spinning {
            HandleStyle::Spinning
        } else if self.at_end {
            HandleStyle::AtEnd
        } else {
            HandleStyle::Idle
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn progress(&self) -> f32 {
        self.progress
    }

    pub fn at_end(&self) -> bool {
        self.at_end
    }

    pub fn is_locked(&self) -> bool {
        self.locked
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    pub fn config(&self) -> &SliderConfig {
        &self.config
    }
}

impl Default for SpinSlider {
    fn default() -> Self {
        Self::new(SliderConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped_fraction_of_travel() {
        let mut s = SpinSlider::default();
        let max = s.config().max_offset();
        assert_eq!(max, 276.0);
        s.drag(69.0);
        assert!((s.progress() - 0.25).abs() < 1e-6);
        s.drag(-20.0);
        assert_eq!(s.progress(), 0.0);
        assert_eq!(s.offset(), 0.0);
        s.drag(400.0);
        assert_eq!(s.progress(), 1.0);
        assert_eq!(s.offset(), max);
    }

    #[test]
    fn at_end_within_tolerance() {
        let mut s = SpinSlider::default();
        s.drag(270.0);
        assert!(!s.at_end());
        s.drag(271.0);
        assert!(s.at_end());
        assert_eq!(s.style(false), HandleStyle::AtEnd);
        assert_eq!(s.style(true), HandleStyle::Spinning);
    }

    #[test]
    fn release_short_cancels_and_clears_progress() {
        let mut s = SpinSlider::default();
        s.drag(100.0);
        assert_eq!(s.release(), SliderRelease::Cancel);
        assert_eq!(s.progress(), 0.0);
        assert_eq!(s.release(), SliderRelease::Ignored);
    }

    #[test]
    fn commit_keeps_progress_briefly() {
        let mut s = SpinSlider::default();
        s.drag(276.0);
        assert_eq!(s.release(), SliderRelease::Commit);
        assert!(!s.at_end());
        s.tick(0.05);
        assert_eq!(s.progress(), 1.0);
        s.tick(0.06);
        assert_eq!(s.progress(), 0.0);
    }

    #[test]
    fn handle_springs_back_to_start() {
        let mut s = SpinSlider::default();
        s.drag(200.0);
        s.release();
        s.tick(0.1);
        assert!(s.offset() > 0.0 && s.offset() < 200.0);
        for _ in 0..30 {
            s.tick(1.0 / 60.0);
        }
        assert_eq!(s.offset(), 0.0);
    }

    #[test]
    fn locked_handle_ignores_drags() {
        let mut s = SpinSlider::default();
        s.set_locked(true);
        s.drag(276.0);
        assert_eq!(s.progress(), 0.0);
        assert_eq!(s.release(), SliderRelease::Ignored);
    }

    #[test]
    fn idle_colors() {
        assert_eq!(HandleStyle::Idle.background(), Color::from_hex("#ffffff").unwrap());
        assert_eq!(HandleStyle::Idle.foreground(), Color::from_hex("#2DA9FF").unwrap());
        assert_eq!(HandleStyle::Spinning.background(), Color::from_hex("#b3b3b3").unwrap());
    }
}
