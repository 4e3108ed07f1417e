use serde::{Deserialize, Serialize};

// Compact voxel representation stored in chunk columns
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default, Debug, Serialize, Deserialize)]
pub struct Block {
    pub id: BlockId,
    pub state: BlockState,
}

pub type BlockId = u16;
pub type BlockState = u16;

impl Block {
    pub const AIR: Block = Block { id: 0, state: 0 };

    #[inline]
    pub const fn of(id: BlockId) -> Self {
        Block { id, state: 0 }
    }
}
