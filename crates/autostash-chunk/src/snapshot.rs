use std::sync::Arc;

use autostash_blocks::types::Block;

use crate::{CHUNK_SIZE, ChunkBuf, ChunkCoord, VoxelCoord};

/// Chunks per side of the captured grid (the requester's column plus one ring).
pub const GRID_CHUNKS: usize = 3;
/// Blocks per horizontal side of a snapshot.
pub const SNAPSHOT_SPAN: i32 = (GRID_CHUNKS * CHUNK_SIZE) as i32;

/// Source of immutable column copies, owned by whoever holds the live world.
pub trait ChunkSource {
    /// Point-in-time copy of a column, or `None` if it is not loaded.
    fn chunk_snapshot(&self, coord: ChunkCoord) -> Option<Arc<ChunkBuf>>;
    fn world_height(&self) -> i32;
}

/// Read-only 3×3 grid of columns around a center column.
///
/// Local x/z run from 0 to `SNAPSHOT_SPAN - 1` starting at the minimum corner of
/// the south-west column; y stays in world space. Columns that were not loaded at
/// capture time read as "no block".
#[derive(Clone, Debug)]
pub struct VoxelSnapshot {
    origin: ChunkCoord,
    world_height: i32,
    chunks: [Option<Arc<ChunkBuf>>; GRID_CHUNKS * GRID_CHUNKS],
}

impl VoxelSnapshot {
    /// Copies the 3×3 neighbourhood of `center` out of `source`.
    pub fn capture(source: &impl ChunkSource, center: ChunkCoord) -> Self {
        let origin = center.offset(-1, -1);
        let chunks = std::array::from_fn(|i| {
            let (gx, gz) = (i / GRID_CHUNKS, i % GRID_CHUNKS);
            source.chunk_snapshot(origin.offset(gx as i32, gz as i32))
        });
        Self {
            origin,
            world_height: source.world_height(),
            chunks,
        }
    }

    /// Builds a snapshot from columns already in hand; `grid[gx][gz]` sits at `origin + (gx, gz)`.
    pub fn from_grid(
        origin: ChunkCoord,
        world_height: i32,
        grid: [[Option<Arc<ChunkBuf>>; GRID_CHUNKS]; GRID_CHUNKS],
    ) -> Self {
        let mut chunks: [Option<Arc<ChunkBuf>>; GRID_CHUNKS * GRID_CHUNKS] = Default::default();
        for (gx, row) in grid.into_iter().enumerate() {
            for (gz, c) in row.into_iter().enumerate() {
                chunks[gx * GRID_CHUNKS + gz] = c;
            }
        }
        Self {
            origin,
            world_height,
            chunks,
        }
    }

    #[inline]
    pub fn origin(&self) -> ChunkCoord {
        self.origin
    }

    #[inline]
    pub fn world_height(&self) -> i32 {
        self.world_height
    }

    #[inline]
    pub fn to_local(&self, world: VoxelCoord) -> VoxelCoord {
        let (ox, oz) = self.origin.min_block();
        VoxelCoord::new(world.x - ox, world.y, world.z - oz)
    }

    #[inline]
    pub fn to_world(&self, local: VoxelCoord) -> VoxelCoord {
        let (ox, oz) = self.origin.min_block();
        VoxelCoord::new(local.x + ox, local.y, local.z + oz)
    }

    /// Column covering the local x/z position, if captured.
    #[inline]
    fn column(&self, lx: i32, lz: i32) -> Option<&ChunkBuf> {
        if !(0..SNAPSHOT_SPAN).contains(&lx) || !(0..SNAPSHOT_SPAN).contains(&lz) {
            return None;
        }
        let gx = lx as usize / CHUNK_SIZE;
        let gz = lz as usize / CHUNK_SIZE;
        self.chunks[gx * GRID_CHUNKS + gz].as_deref()
    }

    /// True if the column under a local position was loaded at capture time.
    #[inline]
    pub fn has_column(&self, local: VoxelCoord) -> bool {
        self.column(local.x, local.z).is_some()
    }

    /// Block at a local position; `None` outside the grid, outside the world
    /// height, or inside a column that was unavailable.
    #[inline]
    pub fn block_local(&self, local: VoxelCoord) -> Option<Block> {
        if local.y < 0 || local.y >= self.world_height {
            return None;
        }
        let buf = self.column(local.x, local.z)?;
        buf.try_get_local(
            local.x as usize % CHUNK_SIZE,
            local.y as usize,
            local.z as usize % CHUNK_SIZE,
        )
    }

    #[inline]
    pub fn block_world(&self, world: VoxelCoord) -> Option<Block> {
        self.block_local(self.to_local(world))
    }
}
