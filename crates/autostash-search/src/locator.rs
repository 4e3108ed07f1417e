use std::collections::VecDeque;

use autostash_blocks::{BlockId, BlockRegistry};
use autostash_chunk::{VoxelCoord, VoxelSnapshot};

use crate::visited::VisitedSet;
use crate::window::SearchWindow;

/// World coordinates of discovered containers, in discovery order.
pub type ContainerQueue = VecDeque<VoxelCoord>;

/// Expansion order of the six face neighbours: +X, -X, +Y, -Y, +Z, -Z.
pub const NEIGHBORS: [(i32, i32, i32); 6] = [
    (1, 0, 0),
    (-1, 0, 0),
    (0, 1, 0),
    (0, -1, 0),
    (0, 0, 1),
    (0, 0, -1),
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LocateStats {
    /// Cells taken off the frontier that had block data.
    pub visited: usize,
    /// Cells whose neighbours were enqueued.
    pub expanded: usize,
    pub hits: usize,
    /// Containers rejected because a solid block sits on top.
    pub obstructed: usize,
}

/// Flood fill from the requester's eyes through air, chests, and sign-like
/// fixtures, collecting every container whose lid is free to open.
pub struct ChestLocator<'a> {
    snapshot: &'a VoxelSnapshot,
    registry: &'a BlockRegistry,
    window: SearchWindow,
    visited: VisitedSet,
    stats: LocateStats,
}

impl<'a> ChestLocator<'a> {
    pub fn new(snapshot: &'a VoxelSnapshot, registry: &'a BlockRegistry, window: SearchWindow) -> Self {
        Self {
            snapshot,
            registry,
            window,
            visited: VisitedSet::new(window),
            stats: LocateStats::default(),
        }
    }

    pub fn stats(&self) -> LocateStats {
        self.stats
    }

    /// Block id at a local position inside the window, if there is one.
    #[inline]
    fn block_id(&self, local: VoxelCoord) -> Option<BlockId> {
        if !self.window.contains(local.y) {
            return None;
        }
        self.snapshot.block_local(local).map(|b| b.id)
    }

    /// Runs the search from `start` (world space). Consumes the visited state,
    /// so a locator answers exactly one query.
    pub fn run(mut self, start: VoxelCoord) -> (ContainerQueue, LocateStats) {
        let mut found = ContainerQueue::new();
        let start_local = self.snapshot.to_local(start);
        if !self.snapshot.has_column(start_local) {
            log::debug!(target: "search", "start {} has no captured column", start);
            return (found, self.stats);
        }

        let mut frontier: VecDeque<VoxelCoord> = VecDeque::new();
        if self.visited.mark(start_local) {
            frontier.push_back(start_local);
        }

        while let Some(cur) = frontier.pop_front() {
            let Some(id) = self.block_id(cur) else {
                continue;
            };
            self.stats.visited += 1;

            if self.registry.is_container(id) {
                let above = self.block_id(cur.above());
                if self.registry.obstructs_opening(above) {
                    self.stats.obstructed += 1;
                } else {
                    self.stats.hits += 1;
                    found.push_back(self.snapshot.to_world(cur));
                }
            }

            if self.registry.is_passable(id) {
                self.stats.expanded += 1;
                for (dx, dy, dz) in NEIGHBORS {
                    let next = cur.offset(dx, dy, dz);
                    if self.visited.mark(next) {
                        frontier.push_back(next);
                    }
                }
            }
        }

        log::debug!(
            target: "search",
            "searched from {}: visited={} expanded={} hits={} obstructed={}",
            start,
            self.stats.visited,
            self.stats.expanded,
            self.stats.hits,
            self.stats.obstructed
        );
        (found, self.stats)
    }
}

/// Containers reachable from `start` within `window`, nearest-first by BFS layer.
pub fn locate(
    snapshot: &VoxelSnapshot,
    registry: &BlockRegistry,
    window: SearchWindow,
    start: VoxelCoord,
) -> ContainerQueue {
    ChestLocator::new(snapshot, registry, window).run(start).0
}
