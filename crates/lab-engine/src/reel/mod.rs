pub mod claim;
pub mod machine;
pub mod slider;
pub mod strip;
pub mod symbols;

pub use claim::{ClaimFlow, ClaimStep, RewardSummary, REWARD_DELAY};
pub use machine::{Reel, SpinConfig, SpinEvent, SpinMachine, SpinSnapshot};
pub use slider::{HandleStyle, SliderConfig, SliderRelease, SpinSlider};
pub use strip::StripGeometry;
pub use symbols::{Color, Symbol, SymbolSet};
