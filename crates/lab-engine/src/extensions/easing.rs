// extensions/easing.rs
//
// Pure easing functions for interaction timing.
// No dependencies on tiles or reels, just math.

use serde::{Deserialize, Serialize};

/// CSS-style `cubic-bezier(x1, y1, x2, y2)` timing curve.
/// Endpoints are fixed at (0,0) and (1,1).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CubicBezier {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl CubicBezier {
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    #[inline]
    fn sample(a1: f32, a2: f32, t: f32) -> f32 {
        // B(t) = 3(1-t)^2 t a1 + 3(1-t) t^2 a2 + t^3
        let u = 1.0 - t;
        3.0 * u * u * t * a1 + 3.0 * u * t * t * a2 + t * t * t
    }

    #[inline]
    fn slope(a1: f32, a2: f32, t: f32) -> f32 {
        let u = 1.0 - t;
        3.0 * u * u * a1 + 6.0 * u * t * (a2 - a1) + 3.0 * t * t * (1.0 - a2)
    }

    /// Find the curve parameter whose x equals `x`.
    fn solve_t(&self, x: f32) -> f32 {
        let mut t = x;
        for _ in 0..8 {
            let err = Self::sample(self.x1, self.x2, t) - x;
            if err.abs() < 1e-6 {
                return t;
            }
            let d = Self::slope(self.x1, self.x2, t);
            if d.abs() < 1e-6 {
                break;
            }
            t = (t - err / d).clamp(0.0, 1.0);
        }

        // Newton stalled on a flat segment; bisect instead.
        let (mut lo, mut hi) = (0.0_f32, 1.0_f32);
        t = x;
        for _ in 0..32 {
            let value = Self::sample(self.x1, self.x2, t);
            if (value - x).abs() < 1e-6 {
                break;
            }
            if value < x {
                lo = t;
            } else {
                hi = t;
            }
            t = (lo + hi) * 0.5;
        }
        t
    }

    /// Eased progress for normalized time `x` in [0, 1].
    pub fn apply(&self, x: f32) -> f32 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        Self::sample(self.y1, self.y2, self.solve_t(x))
    }
}

/// Easing function type.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum Easing {
    /// Constant velocity.
    #[default]
    Linear,
    /// Overshoot then settle. Stands in for a lightly damped spring.
    BackOut,
    /// Arbitrary cubic-bezier curve.
    Bezier(CubicBezier),
}

impl Easing {
    /// The reel travel curve: long acceleration, long deceleration.
    pub const REEL: Easing = Easing::Bezier(CubicBezier::new(0.77, 0.0, 0.175, 1.0));

    /// Apply the easing function to a normalized time value `t` in [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::BackOut => {
                const C1: f32 = 1.70158;
                const C3: f32 = C1 + 1.0;
                1.0 + C3 * (t - 1.0).powi(3) + C1 * (t - 1.0).powi(2)
            }
            Easing::Bezier(curve) => curve.apply(t),
        }
    }
}

// ── Interpolation helpers ────────────────────────────────────────────────

/// Linearly interpolate between two values.
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Linearly interpolate between two Vec2 values.
#[inline]
pub fn lerp_vec2(a: glam::Vec2, b: glam::Vec2, t: f32) -> glam::Vec2 {
    a + (b - a) * t
}

/// Interpolate with easing.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

/// Interpolate Vec2 with easing.
#[inline]
pub fn ease_vec2(a: glam::Vec2, b: glam::Vec2, t: f32, easing: Easing) -> glam::Vec2 {
    lerp_vec2(a, b, easing.apply(t))
}
