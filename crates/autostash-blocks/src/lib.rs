//! Block ids and the registry that classifies them for container search.
#![forbid(unsafe_code)]

pub mod config;
pub mod registry;
pub mod types;

pub use registry::{BlockRegistry, BlockType};
pub use types::{Block, BlockId, BlockState};
