pub mod snippet;
pub mod types;
