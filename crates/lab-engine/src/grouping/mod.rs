pub mod board;
pub mod layout;
pub mod tile;

pub use board::{DropOutcome, GroupingBoard, GroupingConfig};
pub use layout::GridLayout;
pub use tile::{Tile, TileBadges, TileStyle, MAX_CHILD_BADGES};
