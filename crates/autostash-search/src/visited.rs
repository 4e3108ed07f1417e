use autostash_chunk::{SNAPSHOT_SPAN, VoxelCoord};

use crate::window::SearchWindow;

/// One flag per cell of the searchable region, indexed in snapshot-local space.
///
/// Cells are set once and never cleared.
pub struct VisitedSet {
    window: SearchWindow,
    seen: Vec<bool>,
}

impl VisitedSet {
    pub fn new(window: SearchWindow) -> Self {
        let span = SNAPSHOT_SPAN as usize;
        Self {
            window,
            seen: vec![false; span * window.height() * span],
        }
    }

    /// Region volume in cells.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.seen.len()
    }

    #[inline]
    fn index(&self, local: VoxelCoord) -> Option<usize> {
        if !(0..SNAPSHOT_SPAN).contains(&local.x)
            || !(0..SNAPSHOT_SPAN).contains(&local.z)
            || !self.window.contains(local.y)
        {
            return None;
        }
        let span = SNAPSHOT_SPAN as usize;
        let y = (local.y - self.window.min_y) as usize;
        Some((y * span + local.z as usize) * span + local.x as usize)
    }

    /// Out-of-bounds cells count as already seen.
    #[inline]
    pub fn is_seen(&self, local: VoxelCoord) -> bool {
        self.index(local).map(|i| self.seen[i]).unwrap_or(true)
    }

    /// Marks the cell; true only the first time an in-bounds cell is marked.
    #[inline]
    pub fn mark(&mut self, local: VoxelCoord) -> bool {
        match self.index(local) {
            Some(i) if !self.seen[i] => {
                self.seen[i] = true;
                true
            }
            _ => false,
        }
    }
}
