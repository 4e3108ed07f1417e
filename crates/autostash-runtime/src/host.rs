use autostash_blocks::BlockId;
use autostash_chunk::VoxelCoord;
use autostash_items::{Inventory, InventoryKind};

use crate::message::MessageSink;

pub type RequesterId = u32;

/// Anything placed in the world that may carry an item inventory.
pub trait InventoryHolder {
    fn container_inventory(&mut self) -> Option<&mut Inventory>;
}

impl InventoryHolder for Inventory {
    fn container_inventory(&mut self) -> Option<&mut Inventory> {
        Some(self)
    }
}

/// The requester's inventory and the holder at a position, borrowed together.
pub struct OpenContainer<'a> {
    pub player: &'a mut Inventory,
    pub holder: &'a mut dyn InventoryHolder,
}

/// Live world state owned by the coordination thread.
pub trait DepositHost: MessageSink {
    fn is_online(&self, requester: RequesterId) -> bool;

    fn block_at(&self, pos: VoxelCoord) -> Option<BlockId>;

    /// `None` when the requester is gone or nothing stands at `pos`.
    fn open(&mut self, requester: RequesterId, pos: VoxelCoord) -> Option<OpenContainer<'_>>;
}

/// Veto point for a requester touching a container (protection plugins, claims).
pub trait InteractionPolicy: Send + Sync {
    fn allows(&self, requester: RequesterId, pos: VoxelCoord, block: BlockId) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct AllowAll;

impl InteractionPolicy for AllowAll {
    fn allows(&self, _requester: RequesterId, _pos: VoxelCoord, _block: BlockId) -> bool {
        true
    }
}

impl<F> InteractionPolicy for F
where
    F: Fn(RequesterId, VoxelCoord, BlockId) -> bool + Send + Sync,
{
    fn allows(&self, requester: RequesterId, pos: VoxelCoord, block: BlockId) -> bool {
        self(requester, pos, block)
    }
}

/// Decides whether an inventory is ordinary storage the requester may manage.
pub trait InventoryFilter: Send + Sync {
    fn is_manageable(&self, inventory: &Inventory) -> bool;
}

/// Chests, ender chests and shulker boxes.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardContainers;

impl InventoryFilter for StandardContainers {
    fn is_manageable(&self, inventory: &Inventory) -> bool {
        matches!(
            inventory.kind,
            InventoryKind::Chest | InventoryKind::EnderChest | InventoryKind::ShulkerBox
        )
    }
}
