//! Chunk columns, coordinates, and the immutable 3×3 snapshot searched off-thread.
#![forbid(unsafe_code)]

mod coord;
mod snapshot;

pub use coord::{ChunkCoord, VoxelCoord};
pub use snapshot::{ChunkSource, GRID_CHUNKS, SNAPSHOT_SPAN, VoxelSnapshot};

use autostash_blocks::types::Block;

/// Horizontal edge length of a chunk column.
pub const CHUNK_SIZE: usize = 16;

#[derive(Clone, Debug)]
pub struct ChunkBuf {
    pub coord: ChunkCoord,
    pub sx: usize,
    pub sy: usize,
    pub sz: usize,
    pub blocks: Vec<Block>,
}

impl ChunkBuf {
    /// Full-height column of air at `coord`.
    pub fn empty(coord: ChunkCoord, height: usize) -> Self {
        Self::from_blocks_local(coord, CHUNK_SIZE, height, CHUNK_SIZE, Vec::new())
    }

    #[inline]
    pub fn idx(&self, x: usize, y: usize, z: usize) -> usize {
        (y * self.sz + z) * self.sx + x
    }

    #[inline]
    pub fn get_local(&self, x: usize, y: usize, z: usize) -> Block {
        self.blocks[self.idx(x, y, z)]
    }

    #[inline]
    pub fn try_get_local(&self, x: usize, y: usize, z: usize) -> Option<Block> {
        if x < self.sx && y < self.sy && z < self.sz {
            Some(self.get_local(x, y, z))
        } else {
            None
        }
    }

    #[inline]
    pub fn set_local(&mut self, x: usize, y: usize, z: usize, b: Block) {
        let i = self.idx(x, y, z);
        self.blocks[i] = b;
    }

    #[inline]
    pub fn contains_world(&self, wx: i32, wy: i32, wz: i32) -> bool {
        let base_x = self.coord.cx * self.sx as i32;
        let base_z = self.coord.cz * self.sz as i32;
        if wy < 0 || wy >= self.sy as i32 {
            return false;
        }
        wx >= base_x && wx < base_x + self.sx as i32 && wz >= base_z && wz < base_z + self.sz as i32
    }

    #[inline]
    pub fn get_world(&self, wx: i32, wy: i32, wz: i32) -> Option<Block> {
        if !self.contains_world(wx, wy, wz) {
            return None;
        }
        let lx = (wx - self.coord.cx * self.sx as i32) as usize;
        let lz = (wz - self.coord.cz * self.sz as i32) as usize;
        Some(self.get_local(lx, wy as usize, lz))
    }

    /// Writes a block by world coordinate; returns false if it lies outside this column.
    pub fn set_world(&mut self, wx: i32, wy: i32, wz: i32, b: Block) -> bool {
        if !self.contains_world(wx, wy, wz) {
            return false;
        }
        let lx = (wx - self.coord.cx * self.sx as i32) as usize;
        let lz = (wz - self.coord.cz * self.sz as i32) as usize;
        self.set_local(lx, wy as usize, lz, b);
        true
    }

    pub fn from_blocks_local(
        coord: ChunkCoord,
        sx: usize,
        sy: usize,
        sz: usize,
        blocks: Vec<Block>,
    ) -> Self {
        let mut b = blocks;
        let expect = sx * sy * sz;
        if b.len() != expect {
            b.resize(expect, Block::AIR);
        }
        ChunkBuf {
            coord,
            sx,
            sy,
            sz,
            blocks: b,
        }
    }
}
