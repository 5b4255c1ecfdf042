pub mod api;
pub mod core;
pub mod error;
pub mod renderer;
pub mod bridge;
pub mod input;
pub mod assets;
pub mod extensions;
pub mod grouping;
pub mod reel;

// Re-export key types at crate root for convenience
pub use api::snippet::{Snippet, SnippetConfig, SnippetContext};
pub use api::types::{EventKind, SnippetEvent, TileId};
pub use error::{LabError, Result};
pub use crate::core::geometry::Rect;
pub use crate::core::rng::{OutcomeSource, Rng, ScriptedOutcomes};
pub use crate::core::time::FixedTimestep;
pub use crate::core::timer::{Epoch, Fired, TimerQueue};
pub use renderer::instance::{FrameBuffer, FrameStatus, ReelInstance, TileInstance};
pub use input::queue::{InputEvent, InputQueue};
pub use assets::manifest::SnippetManifest;
pub use bridge::protocol::ProtocolLayout;

// Interaction controllers
pub use grouping::{DropOutcome, GridLayout, GroupingBoard, GroupingConfig, Tile, TileStyle};
pub use reel::{
    ClaimFlow, ClaimStep, Color, HandleStyle, Reel, RewardSummary, SliderConfig,
    SliderRelease, SpinConfig, SpinEvent, SpinMachine, SpinSlider, StripGeometry,
    Symbol, SymbolSet,
};

pub use extensions::{Easing, CubicBezier, lerp, lerp_vec2, ease, ease_vec2, TweenState, Tween};
