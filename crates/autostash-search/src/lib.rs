//! Breadth-first container discovery over a captured voxel snapshot.
#![forbid(unsafe_code)]

mod locator;
mod visited;
mod window;

pub use locator::{ChestLocator, ContainerQueue, LocateStats, NEIGHBORS, locate};
pub use visited::VisitedSet;
pub use window::{SearchWindow, VERTICAL_REACH};
