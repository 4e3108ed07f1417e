use std::error::Error;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use autostash_blocks::{Block, BlockId, BlockRegistry};
use autostash_chunk::{ChunkBuf, ChunkCoord, ChunkSource, VoxelCoord};
use autostash_items::{Inventory, InventoryKind, ItemCatalog, ItemStack};
use autostash_runtime::{
    DepositHost, Feature, FeatureTable, InteractionPolicy, Message, MessageSink, OpenContainer,
    RequesterId,
};
use hashbrown::HashMap;
use serde::Deserialize;

fn default_height() -> i32 {
    64
}

fn default_radius() -> i32 {
    1
}

fn default_true() -> bool {
    true
}

fn default_container_block() -> String {
    "chest".to_string()
}

#[derive(Deserialize, Debug)]
struct WorldSection {
    #[serde(default = "default_height")]
    height: i32,
    /// Columns loaded on each side of chunk (0, 0).
    #[serde(default = "default_radius")]
    radius: i32,
    /// Block laid at y = 0 across every loaded column.
    #[serde(default)]
    floor: Option<String>,
}

#[derive(Deserialize, Debug)]
struct FillEntry {
    from: [i32; 3],
    to: [i32; 3],
    block: String,
}

#[derive(Deserialize, Debug)]
struct BlockEntry {
    at: [i32; 3],
    name: String,
}

#[derive(Deserialize, Debug)]
struct SlotEntry {
    slot: usize,
    item: String,
    count: u32,
    #[serde(default)]
    variant: u16,
}

#[derive(Deserialize, Debug)]
struct ContainerEntry {
    at: [i32; 3],
    #[serde(default = "default_container_block")]
    block: String,
    #[serde(default)]
    kind: Option<InventoryKind>,
    #[serde(default)]
    size: Option<usize>,
    #[serde(default)]
    items: Vec<SlotEntry>,
}

#[derive(Deserialize, Debug)]
struct PlayerEntry {
    id: RequesterId,
    name: String,
    eye: [i32; 3],
    #[serde(default = "default_true")]
    online: bool,
    /// Absent means every feature.
    #[serde(default)]
    features: Option<Vec<Feature>>,
    #[serde(default)]
    items: Vec<SlotEntry>,
}

#[derive(Deserialize, Debug)]
struct RegionEntry {
    from: [i32; 3],
    to: [i32; 3],
}

#[derive(Deserialize, Debug)]
struct SceneFile {
    world: WorldSection,
    #[serde(default, rename = "fill")]
    fills: Vec<FillEntry>,
    #[serde(default, rename = "block")]
    blocks: Vec<BlockEntry>,
    #[serde(default, rename = "container")]
    containers: Vec<ContainerEntry>,
    #[serde(default, rename = "player")]
    players: Vec<PlayerEntry>,
    #[serde(default)]
    protected: Vec<RegionEntry>,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub name: String,
    pub eye: VoxelCoord,
    pub online: bool,
    pub inventory: Inventory,
}

/// Axis-aligned boxes nobody may open containers in.
#[derive(Clone, Debug, Default)]
pub struct ProtectedRegions {
    regions: Vec<(VoxelCoord, VoxelCoord)>,
}

impl ProtectedRegions {
    pub fn add(&mut self, a: VoxelCoord, b: VoxelCoord) {
        let lo = VoxelCoord::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
        let hi = VoxelCoord::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));
        self.regions.push((lo, hi));
    }

    pub fn covers(&self, p: VoxelCoord) -> bool {
        self.regions.iter().any(|(lo, hi)| {
            (lo.x..=hi.x).contains(&p.x) && (lo.y..=hi.y).contains(&p.y) && (lo.z..=hi.z).contains(&p.z)
        })
    }
}

impl InteractionPolicy for ProtectedRegions {
    fn allows(&self, _requester: RequesterId, pos: VoxelCoord, _block: BlockId) -> bool {
        !self.covers(pos)
    }
}

/// In-memory world standing in for a live server.
#[derive(Clone, Debug)]
pub struct SceneWorld {
    height: i32,
    columns: HashMap<ChunkCoord, Arc<ChunkBuf>>,
    containers: HashMap<VoxelCoord, Inventory>,
    players: Vec<(RequesterId, Player)>,
    outbox: Vec<(RequesterId, Message)>,
}

impl SceneWorld {
    fn set_block(&mut self, p: VoxelCoord, id: BlockId) -> Result<(), Box<dyn Error>> {
        let col = self
            .columns
            .get_mut(&p.chunk())
            .ok_or_else(|| format!("{} is outside the loaded columns", p))?;
        if !Arc::make_mut(col).set_world(p.x, p.y, p.z, Block::of(id)) {
            return Err(format!("{} is outside the world height", p).into());
        }
        Ok(())
    }

    pub fn player(&self, id: RequesterId) -> Option<&Player> {
        self.players.iter().find(|(pid, _)| *pid == id).map(|(_, p)| p)
    }

    pub fn players(&self) -> impl Iterator<Item = (RequesterId, &Player)> + '_ {
        self.players.iter().map(|(id, p)| (*id, p))
    }

    pub fn container(&self, at: VoxelCoord) -> Option<&Inventory> {
        self.containers.get(&at)
    }

    /// Container positions in ascending order.
    pub fn container_positions(&self) -> Vec<VoxelCoord> {
        let mut v: Vec<VoxelCoord> = self.containers.keys().copied().collect();
        v.sort();
        v
    }

    pub fn take_messages(&mut self) -> Vec<(RequesterId, Message)> {
        std::mem::take(&mut self.outbox)
    }
}

impl ChunkSource for SceneWorld {
    fn chunk_snapshot(&self, coord: ChunkCoord) -> Option<Arc<ChunkBuf>> {
        self.columns.get(&coord).cloned()
    }

    fn world_height(&self) -> i32 {
        self.height
    }
}

impl MessageSink for SceneWorld {
    fn send(&mut self, requester: RequesterId, message: Message) {
        self.outbox.push((requester, message));
    }
}

impl DepositHost for SceneWorld {
    fn is_online(&self, requester: RequesterId) -> bool {
        self.player(requester).is_some_and(|p| p.online)
    }

    fn block_at(&self, pos: VoxelCoord) -> Option<BlockId> {
        let col = self.columns.get(&pos.chunk())?;
        col.get_world(pos.x, pos.y, pos.z).map(|b| b.id)
    }

    fn open(&mut self, requester: RequesterId, pos: VoxelCoord) -> Option<OpenContainer<'_>> {
        let player = self
            .players
            .iter_mut()
            .find(|(pid, _)| *pid == requester)
            .map(|(_, p)| &mut p.inventory)?;
        let holder = self.containers.get_mut(&pos)?;
        Some(OpenContainer { player, holder })
    }
}

/// A loaded scene: the world plus the permission and protection rules it declares.
pub struct Scene {
    pub world: SceneWorld,
    pub gate: FeatureTable,
    pub policy: ProtectedRegions,
}

fn kind_for_block(name: &str) -> InventoryKind {
    if name == "ender_chest" {
        InventoryKind::EnderChest
    } else if name.contains("shulker_box") {
        InventoryKind::ShulkerBox
    } else if name == "barrel" {
        InventoryKind::Barrel
    } else if name == "hopper" {
        InventoryKind::Hopper
    } else if name.contains("chest") {
        InventoryKind::Chest
    } else {
        InventoryKind::Other
    }
}

fn fill_slots(inv: &mut Inventory, slots: &[SlotEntry], catalog: &ItemCatalog) -> Result<(), Box<dyn Error>> {
    for s in slots {
        let id = catalog
            .get_id(&s.item)
            .ok_or_else(|| format!("unknown item `{}`", s.item))?;
        if s.slot >= inv.size() {
            return Err(format!("slot {} out of range for {}-slot inventory", s.slot, inv.size()).into());
        }
        let max = catalog.max_stack(id);
        if s.count > max {
            return Err(format!("{} x{} exceeds stack size {}", s.item, s.count, max).into());
        }
        inv.set(s.slot, Some(ItemStack::new(id, s.count).with_variant(s.variant)));
    }
    Ok(())
}

fn coord(c: [i32; 3]) -> VoxelCoord {
    VoxelCoord::new(c[0], c[1], c[2])
}

impl Scene {
    pub fn load(path: &Path, reg: &BlockRegistry, catalog: &ItemCatalog) -> Result<Self, Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        Self::from_toml_str(&text, reg, catalog)
    }

    pub fn from_toml_str(text: &str, reg: &BlockRegistry, catalog: &ItemCatalog) -> Result<Self, Box<dyn Error>> {
        let file: SceneFile = toml::from_str(text)?;
        let block_id = |name: &str| -> Result<BlockId, Box<dyn Error>> {
            reg.id_by_name(name)
                .ok_or_else(|| format!("unknown block `{}`", name).into())
        };
        if file.world.height < 1 {
            return Err("world.height must be positive".into());
        }

        let mut world = SceneWorld {
            height: file.world.height,
            columns: HashMap::new(),
            containers: HashMap::new(),
            players: Vec::new(),
            outbox: Vec::new(),
        };
        let floor = file.world.floor.as_deref().map(block_id).transpose()?;
        let r = file.world.radius.max(0);
        for cx in -r..=r {
            for cz in -r..=r {
                let c = ChunkCoord::new(cx, cz);
                let mut buf = ChunkBuf::empty(c, file.world.height as usize);
                if let Some(id) = floor {
                    for x in 0..buf.sx {
                        for z in 0..buf.sz {
                            buf.set_local(x, 0, z, Block::of(id));
                        }
                    }
                }
                world.columns.insert(c, Arc::new(buf));
            }
        }

        for f in &file.fills {
            let id = block_id(&f.block)?;
            let (a, b) = (coord(f.from), coord(f.to));
            for x in a.x.min(b.x)..=a.x.max(b.x) {
                for y in a.y.min(b.y)..=a.y.max(b.y) {
                    for z in a.z.min(b.z)..=a.z.max(b.z) {
                        world.set_block(VoxelCoord::new(x, y, z), id)?;
                    }
                }
            }
        }
        for b in &file.blocks {
            world.set_block(coord(b.at), block_id(&b.name)?)?;
        }
        for c in &file.containers {
            let at = coord(c.at);
            world.set_block(at, block_id(&c.block)?)?;
            let kind = c.kind.unwrap_or_else(|| kind_for_block(&c.block));
            let size = c
                .size
                .unwrap_or(if kind == InventoryKind::Hopper { 5 } else { 27 });
            let mut inv = Inventory::new(kind, size);
            fill_slots(&mut inv, &c.items, catalog)?;
            world.containers.insert(at, inv);
        }

        let mut gate = FeatureTable::permissive();
        for p in file.players {
            if world.player(p.id).is_some() {
                return Err(format!("player id {} listed twice", p.id).into());
            }
            let mut inventory = Inventory::player();
            fill_slots(&mut inventory, &p.items, catalog)?;
            if let Some(features) = p.features {
                gate.grant(p.id, features);
            }
            world.players.push((
                p.id,
                Player {
                    name: p.name,
                    eye: coord(p.eye),
                    online: p.online,
                    inventory,
                },
            ));
        }

        let mut policy = ProtectedRegions::default();
        for r in &file.protected {
            policy.add(coord(r.from), coord(r.to));
        }

        log::debug!(
            "scene: {} column(s), {} container(s), {} player(s)",
            world.columns.len(),
            world.containers.len(),
            world.players.len()
        );
        Ok(Scene { world, gate, policy })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use autostash_runtime::FeatureGate;

    const SMALL: &str = r#"
        [world]
        height = 16
        radius = 1
        floor = "stone"

        [[fill]]
        from = [5, 1, 0]
        to = [5, 3, 2]
        block = "glass"

        [[container]]
        at = [2, 1, 0]
        items = [{ slot = 0, item = "dirt", count = 3 }]

        [[container]]
        at = [-2, 1, 0]
        block = "hopper"

        [[player]]
        id = 7
        name = "sam"
        eye = [0, 2, 0]
        features = ["quick_deposit"]
        items = [{ slot = 9, item = "dirt", count = 12 }]

        [[protected]]
        from = [-4, 0, -4]
        to = [-1, 8, 4]
    "#;

    fn load(text: &str) -> Result<Scene, Box<dyn Error>> {
        let reg = BlockRegistry::bundled().unwrap();
        let cat = ItemCatalog::bundled().unwrap();
        Scene::from_toml_str(text, &reg, &cat)
    }

    #[test]
    fn builds_world_from_sections() {
        let reg = BlockRegistry::bundled().unwrap();
        let scene = load(SMALL).unwrap();
        let w = &scene.world;
        assert_eq!(w.world_height(), 16);
        assert_eq!(w.block_at(VoxelCoord::new(9, 0, 9)), reg.id_by_name("stone"));
        assert_eq!(w.block_at(VoxelCoord::new(5, 2, 1)), reg.id_by_name("glass"));
        assert_eq!(w.block_at(VoxelCoord::new(2, 1, 0)), reg.id_by_name("chest"));
        assert_eq!(w.block_at(VoxelCoord::new(99, 1, 0)), None);
        assert_eq!(w.container(VoxelCoord::new(-2, 1, 0)).unwrap().kind, InventoryKind::Hopper);
        assert_eq!(w.container(VoxelCoord::new(2, 1, 0)).unwrap().size(), 27);
        let sam = w.player(7).unwrap();
        assert!(sam.online);
        assert_eq!(sam.inventory.get(9).unwrap().count, 12);
    }

    #[test]
    fn rules_come_from_scene() {
        let scene = load(SMALL).unwrap();
        assert!(scene.gate.permits(7, Feature::QuickDeposit));
        assert!(!scene.gate.permits(7, Feature::DepositAll));
        assert!(scene.gate.permits(8, Feature::DepositAll));
        assert!(!scene.policy.allows(7, VoxelCoord::new(-2, 1, 0), 0));
        assert!(scene.policy.allows(7, VoxelCoord::new(2, 1, 0), 0));
    }

    #[test]
    fn snapshots_are_unaffected_by_later_edits() {
        let mut scene = load(SMALL).unwrap();
        let before = scene.world.chunk_snapshot(ChunkCoord::new(0, 0)).unwrap();
        scene.world.set_block(VoxelCoord::new(1, 1, 1), 1).unwrap();
        assert_eq!(before.get_world(1, 1, 1), Some(Block::AIR));
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(load("[world]\nheight = 0\n").is_err());
        let unknown = "[world]\n[[block]]\nat = [0, 1, 0]\nname = \"nope\"\n";
        assert!(load(unknown).is_err());
        let outside = "[world]\nradius = 0\n[[block]]\nat = [40, 1, 0]\nname = \"stone\"\n";
        assert!(load(outside).is_err());
        let overfull = "[world]\n[[player]]\nid = 1\nname = \"a\"\neye = [0, 2, 0]\nitems = [{ slot = 0, item = \"ender_pearl\", count = 40 }]\n";
        assert!(load(overfull).is_err());
    }
}
