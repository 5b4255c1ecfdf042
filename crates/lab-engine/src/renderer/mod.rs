pub mod instance;

pub use instance::{FrameBuffer, FrameStatus, ReelInstance, TileInstance};
