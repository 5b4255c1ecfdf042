// extensions/tween.rs
//
// Tween system: animated value transitions keyed by whatever the owner uses
// to identify the animated thing (a tile id, a reel index).
// Completely decoupled from tiles and reels; owners read samples back.
//
// Usage:
//   let mut tweens = TweenState::new();
//   tweens.add(tile_id, Tween::point(from, Vec2::ZERO, 0.35, Easing::BackOut));
//   for done in tweens.tick(dt) { ... }
//   let pos = tweens.point(tile_id);

use glam::Vec2;
use super::easing::{Easing, ease, ease_vec2};

/// What a tween interpolates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenValue {
    Scalar { from: f32, to: f32 },
    Point { from: Vec2, to: Vec2 },
}

/// A sampled tween value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TweenSample {
    Scalar(f32),
    Point(Vec2),
}

impl TweenSample {
    pub fn scalar(self) -> Option<f32> {
        match self {
            TweenSample::Scalar(v) => Some(v),
            TweenSample::Point(_) => None,
        }
    }

    pub fn point(self) -> Option<Vec2> {
        match self {
            TweenSample::Point(v) => Some(v),
            TweenSample::Scalar(_) => None,
        }
    }
}

/// A single one-shot tween.
#[derive(Debug, Clone)]
pub struct Tween {
    pub value: TweenValue,
    /// Duration in seconds, excluding the start delay.
    pub duration: f32,
    /// Seconds to hold at `from` before moving.
    pub delay: f32,
    /// Elapsed time, including the delay.
    pub elapsed: f32,
    pub easing: Easing,
}

impl Tween {
    fn with_value(value: TweenValue, duration: f32, easing: Easing) -> Self {
        Self {
            value,
            duration,
            delay: 0.0,
            elapsed: 0.0,
            easing,
        }
    }

    /// Create a scalar tween (a scroll offset, a progress bar).
    pub fn scalar(from: f32, to: f32, duration: f32, easing: Easing) -> Self {
        Self::with_value(TweenValue::Scalar { from, to }, duration, easing)
    }

    /// Create a 2D tween (a tile offset).
    pub fn point(from: Vec2, to: Vec2, duration: f32, easing: Easing) -> Self {
        Self::with_value(TweenValue::Point { from, to }, duration, easing)
    }

    // -- Builder methods --

    pub fn with_delay(mut self, delay: f32) -> Self {
        self.delay = delay.max(0.0);
        self
    }

    /// Normalized progress [0, 1]. Zero during the delay.
    pub fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            if self.elapsed >= self.delay { 1.0 } else { 0.0 }
        } else {
            ((self.elapsed - self.delay) / self.duration).clamp(0.0, 1.0)
        }
    }

    pub fn is_complete(&self) -> bool {
        self.elapsed >= self.delay + self.duration
    }

    pub fn sample(&self) -> TweenSample {
        let t = self.progress();
        match self.value {
            TweenValue::Scalar { from, to } => TweenSample::Scalar(ease(from, to, t, self.easing)),
            TweenValue::Point { from, to } => TweenSample::Point(ease_vec2(from, to, t, self.easing)),
        }
    }

    /// The value the tween lands on.
    pub fn target(&self) -> TweenSample {
        match self.value {
            TweenValue::Scalar { to, .. } => TweenSample::Scalar(to),
            TweenValue::Point { to, .. } => TweenSample::Point(to),
        }
    }
}

/// A tween that finished during `tick`, with its landing value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Completed<K> {
    pub key: K,
    pub value: TweenSample,
}

/// Manages active tweens, at most one per key.
/// Iteration order is insertion order, so completions come back deterministically.
#[derive(Debug)]
pub struct TweenState<K> {
    tweens: Vec<(K, Tween)>,
}

impl<K: Copy + PartialEq> TweenState<K> {
    pub fn new() -> Self {
        Self { tweens: Vec::new() }
    }

    /// Start a tween for `key`, replacing any tween already running for it.
    pub fn add(&mut self, key: K, tween: Tween) {
        self.remove_key(key);
        self.tweens.push((key, tween));
    }

    /// Stop whatever is animating `key`. Returns the sample at the moment it stopped.
    pub fn remove_key(&mut self, key: K) -> Option<TweenSample> {
        let idx = self.tweens.iter().position(|(k, _)| *k == key)?;
        let (_, tween) = self.tweens.remove(idx);
        Some(tween.sample())
    }

    pub fn get(&self, key: K) -> Option<&Tween> {
        self.tweens.iter().find(|(k, _)| *k == key).map(|(_, t)| t)
    }

    /// Current scalar value for `key`, if a scalar tween is running.
    pub fn scalar(&self, key: K) -> Option<f32> {
        self.get(key).and_then(|t| t.sample().scalar())
    }

    /// Current 2D value for `key`, if a point tween is running.
    pub fn point(&self, key: K) -> Option<Vec2> {
        self.get(key).and_then(|t| t.sample().point())
    }

    /// Advance all tweens. Finished tweens are removed and returned
    /// with their exact target value.
    pub fn tick(&mut self, dt: f32) -> Vec<Completed<K>> {
        let mut completed = Vec::new();

        for (key, tween) in self.tweens.iter_mut() {
            tween.elapsed += dt;
            if tween.is_complete() {
                completed.push(Completed {
                    key: *key,
                    value: tween.target(),
                });
            }
        }

        self.tweens.retain(|(_, t)| !t.is_complete());
        completed
    }

    /// Iterate over running tweens with their current samples.
    pub fn samples(&self) -> impl Iterator<Item = (K, TweenSample)> + '_ {
        self.tweens.iter().map(|(k, t)| (*k, t.sample()))
    }

    pub fn len(&self) -> usize {
        self.tweens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tweens.is_empty()
    }

    pub fn clear(&mut self) {
        self.tweens.clear();
    }
}

impl<K: Copy + PartialEq> Default for TweenState<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_tween_reaches_target_and_is_removed() {
        let mut tweens = TweenState::new();
        tweens.add(1u32, Tween::point(Vec2::ZERO, Vec2::new(100.0, 0.0), 1.0, Easing::Linear));

        assert!(tweens.tick(0.5).is_empty());
        let mid = tweens.point(1).unwrap();
        assert!((mid.x - 50.0).abs() < 0.01);

        let done = tweens.tick(0.5);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].key, 1);
        assert_eq!(done[0].value, TweenSample::Point(Vec2::new(100.0, 0.0)));
        assert!(tweens.is_empty());
    }

    #[test]
    fn delay_holds_start_value() {
        let mut tweens = TweenState::new();
        tweens.add(0usize, Tween::scalar(10.0, 20.0, 1.0, Easing::Linear).with_delay(0.5));

        tweens.tick(0.4);
        assert_eq!(tweens.scalar(0), Some(10.0));
        tweens.tick(0.6);
        let v = tweens.scalar(0).unwrap();
        assert!((v - 15.0).abs() < 0.01, "v = {}", v);
        assert_eq!(tweens.tick(0.5).len(), 1);
    }

    #[test]
    fn adding_for_same_key_replaces() {
        let mut tweens = TweenState::new();
        tweens.add(3u32, Tween::scalar(0.0, 1.0, 1.0, Easing::Linear));
        tweens.add(3u32, Tween::scalar(5.0, 6.0, 1.0, Easing::Linear));
        assert_eq!(tweens.len(), 1);
        assert_eq!(tweens.scalar(3), Some(5.0));
    }

    #[test]
    fn remove_key_reports_current_sample() {
        let mut tweens = TweenState::new();
        tweens.add(9u32, Tween::scalar(0.0, 10.0, 1.0, Easing::Linear));
        tweens.tick(0.3);
        let stopped = tweens.remove_key(9).and_then(TweenSample::scalar).unwrap();
        assert!((stopped - 3.0).abs() < 0.01);
        assert!(tweens.is_empty());
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut tweens = TweenState::new();
        tweens.add(0u8, Tween::scalar(0.0, 1.0, 0.0, Easing::Linear));
        let done = tweens.tick(0.0);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].value, TweenSample::Scalar(1.0));
        assert!(tweens.is_empty());
    }
}
