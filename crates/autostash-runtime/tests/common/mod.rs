#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use autostash_blocks::{Block, BlockId, BlockRegistry};
use autostash_chunk::{ChunkBuf, ChunkCoord, ChunkSource, VoxelCoord};
use autostash_items::{Inventory, InventoryKind, ItemCatalog, ItemStack};
use autostash_runtime::{DepositHost, Message, MessageSink, OpenContainer, RequesterId};

pub const HEIGHT: i32 = 32;

/// 3x3 columns around the origin with a stone floor at y=0.
#[derive(Clone)]
pub struct TestWorld {
    pub reg: Arc<BlockRegistry>,
    pub catalog: Arc<ItemCatalog>,
    columns: HashMap<ChunkCoord, ChunkBuf>,
    pub containers: HashMap<VoxelCoord, Inventory>,
    pub players: HashMap<RequesterId, Inventory>,
    pub online: HashSet<RequesterId>,
    pub messages: Vec<(RequesterId, Message)>,
}

impl TestWorld {
    pub fn new() -> Self {
        let reg = Arc::new(BlockRegistry::bundled().unwrap());
        let catalog = Arc::new(ItemCatalog::bundled().unwrap());
        let stone = reg.id_by_name("stone").unwrap();
        let mut columns = HashMap::new();
        for cx in -1..=1 {
            for cz in -1..=1 {
                let coord = ChunkCoord::new(cx, cz);
                let mut c = ChunkBuf::empty(coord, HEIGHT as usize);
                for x in 0..16 {
                    for z in 0..16 {
                        c.set_local(x, 0, z, Block::of(stone));
                    }
                }
                columns.insert(coord, c);
            }
        }
        Self {
            reg,
            catalog,
            columns,
            containers: HashMap::new(),
            players: HashMap::new(),
            online: HashSet::new(),
            messages: Vec::new(),
        }
    }

    pub fn item(&self, name: &str) -> u16 {
        self.catalog.get_id(name).unwrap()
    }

    pub fn join(&mut self, who: RequesterId) -> &mut Inventory {
        self.online.insert(who);
        self.players.entry(who).or_insert_with(Inventory::player)
    }

    pub fn player(&self, who: RequesterId) -> &Inventory {
        &self.players[&who]
    }

    /// Places a block; container blocks get an empty 27-slot inventory.
    pub fn place(&mut self, pos: VoxelCoord, name: &str) {
        let id = self.reg.id_by_name(name).unwrap();
        let col = self.columns.get_mut(&pos.chunk()).unwrap();
        assert!(col.set_world(pos.x, pos.y, pos.z, Block::of(id)));
        let kind = match name {
            "chest" | "trapped_chest" => Some(InventoryKind::Chest),
            "ender_chest" => Some(InventoryKind::EnderChest),
            "hopper" => Some(InventoryKind::Hopper),
            n if n.contains("shulker_box") => Some(InventoryKind::ShulkerBox),
            _ => None,
        };
        match kind {
            Some(kind) => {
                let size = if kind == InventoryKind::Hopper { 5 } else { 27 };
                self.containers.insert(pos, Inventory::new(kind, size));
            }
            None => {
                self.containers.remove(&pos);
            }
        }
    }

    pub fn chest_with(&mut self, pos: VoxelCoord, item: &str, count: u32) -> &mut Inventory {
        self.place(pos, "chest");
        let id = self.item(item);
        let inv = self.containers.get_mut(&pos).unwrap();
        inv.set(0, Some(ItemStack::new(id, count)));
        inv
    }

    pub fn total_everywhere(&self, item: u16) -> u64 {
        self.players.values().map(|p| p.total_of(item)).sum::<u64>()
            + self.containers.values().map(|c| c.total_of(item)).sum::<u64>()
    }

    pub fn texts(&self) -> Vec<String> {
        self.messages.iter().map(|(_, m)| m.to_string()).collect()
    }
}

impl ChunkSource for TestWorld {
    fn chunk_snapshot(&self, coord: ChunkCoord) -> Option<Arc<ChunkBuf>> {
        self.columns.get(&coord).cloned().map(Arc::new)
    }

    fn world_height(&self) -> i32 {
        HEIGHT
    }
}

impl MessageSink for TestWorld {
    fn send(&mut self, requester: RequesterId, message: Message) {
        self.messages.push((requester, message));
    }
}

impl DepositHost for TestWorld {
    fn is_online(&self, requester: RequesterId) -> bool {
        self.online.contains(&requester)
    }

    fn block_at(&self, pos: VoxelCoord) -> Option<BlockId> {
        let col = self.columns.get(&pos.chunk())?;
        col.get_world(pos.x, pos.y, pos.z).map(|b| b.id)
    }

    fn open(&mut self, requester: RequesterId, pos: VoxelCoord) -> Option<OpenContainer<'_>> {
        let player = self.players.get_mut(&requester)?;
        let holder = self.containers.get_mut(&pos)?;
        Some(OpenContainer { player, holder })
    }
}
