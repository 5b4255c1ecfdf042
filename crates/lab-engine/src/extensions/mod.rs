// extensions/mod.rs
//
// Animation helpers shared by the interaction controllers.
// Decoupled from tiles and reels: controllers own a TweenState and read samples back.

pub mod easing;
pub mod tween;

pub use easing::{CubicBezier, Easing, lerp, lerp_vec2, ease, ease_vec2};
pub use tween::{Completed, TweenState, Tween, TweenSample, TweenValue};
