use serde::{Deserialize, Serialize};

use crate::CHUNK_SIZE;

/// Column coordinate; chunks span the full world height.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChunkCoord {
    pub cx: i32,
    pub cz: i32,
}

impl ChunkCoord {
    #[inline]
    pub const fn new(cx: i32, cz: i32) -> Self {
        Self { cx, cz }
    }

    #[inline]
    pub fn offset(self, dx: i32, dz: i32) -> Self {
        Self {
            cx: self.cx + dx,
            cz: self.cz + dz,
        }
    }

    /// World x/z of this column's minimum corner.
    #[inline]
    pub fn min_block(self) -> (i32, i32) {
        (self.cx * CHUNK_SIZE as i32, self.cz * CHUNK_SIZE as i32)
    }
}

impl From<(i32, i32)> for ChunkCoord {
    fn from(value: (i32, i32)) -> Self {
        Self::new(value.0, value.1)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoxelCoord {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl VoxelCoord {
    #[inline]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    #[inline]
    pub fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    #[inline]
    pub fn above(self) -> Self {
        self.offset(0, 1, 0)
    }

    /// Column containing this voxel (floor division, so negatives land correctly).
    #[inline]
    pub fn chunk(self) -> ChunkCoord {
        ChunkCoord::new(
            self.x.div_euclid(CHUNK_SIZE as i32),
            self.z.div_euclid(CHUNK_SIZE as i32),
        )
    }
}

impl From<(i32, i32, i32)> for VoxelCoord {
    fn from(value: (i32, i32, i32)) -> Self {
        Self::new(value.0, value.1, value.2)
    }
}

impl std::fmt::Display for VoxelCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}
