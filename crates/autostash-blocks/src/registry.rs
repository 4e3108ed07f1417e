use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use super::config::BlocksConfig;
use super::types::BlockId;

const BUNDLED_BLOCKS: &str = include_str!("../assets/blocks.toml");

#[derive(Default, Clone, Debug)]
pub struct BlockRegistry {
    pub blocks: Vec<BlockType>,
    pub by_name: HashMap<String, BlockId>,
}

impl BlockRegistry {
    pub fn new() -> Self {
        Self {
            blocks: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Registry built from the block table shipped with the crate.
    pub fn bundled() -> Result<Self, Box<dyn Error>> {
        Self::from_toml_str(BUNDLED_BLOCKS)
    }

    #[inline]
    pub fn get(&self, id: BlockId) -> Option<&BlockType> {
        self.blocks.get(id as usize).filter(|ty| !ty.name.is_empty())
    }

    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: BlockId) -> &str {
        self.get(id).map(|ty| ty.name.as_str()).unwrap_or("unknown")
    }

    pub fn load_from_path(blocks_path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let blocks_toml = fs::read_to_string(blocks_path)?;
        Self::from_toml_str(&blocks_toml)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: BlocksConfig = toml::from_str(toml_str)?;
        Self::from_config(cfg)
    }

    pub fn from_config(cfg: BlocksConfig) -> Result<Self, Box<dyn Error>> {
        let mut reg = BlockRegistry::new();
        let lowered = |patterns: &[String]| -> Vec<String> { patterns.iter().map(|p| p.to_ascii_lowercase()).collect() };
        let container_patterns = lowered(&cfg.container_patterns);
        let passable_patterns = lowered(&cfg.passable_patterns);
        for def in cfg.blocks.into_iter() {
            let id = def.id.unwrap_or(reg.blocks.len() as u16);
            if reg.by_name.contains_key(&def.name) {
                return Err(format!("block `{}` defined twice", def.name).into());
            }
            if reg.get(id).is_some() {
                return Err(format!("block id {} used by `{}` and `{}`", id, reg.name_of(id), def.name).into());
            }
            let lower = def.name.to_ascii_lowercase();
            let by_pattern = |patterns: &[String]| patterns.iter().any(|p| lower.contains(p.as_str()));
            let container = def.container.unwrap_or(false) || by_pattern(&container_patterns);
            let passable = def.passable.unwrap_or(false) || by_pattern(&passable_patterns);
            let ty = BlockType {
                id,
                name: def.name,
                solid: def.solid.unwrap_or(true),
                container,
                passable,
            };
            if reg.blocks.len() <= id as usize {
                reg.blocks
                    .resize(id as usize + 1, BlockType::placeholder(id));
            }
            reg.by_name.insert(ty.name.clone(), id);
            reg.blocks[id as usize] = ty;
        }

        match reg.id_by_name("air") {
            Some(0) => {}
            Some(other) => return Err(format!("`air` must have id 0, found {}", other).into()),
            None => return Err("block table must define `air`".into()),
        }
        Ok(reg)
    }

    /// True for any block exposing an item inventory the search may report.
    #[inline]
    pub fn is_container(&self, id: BlockId) -> bool {
        self.get(id).map(|ty| ty.container).unwrap_or(false)
    }

    /// True if the flood fill may expand through this block.
    #[inline]
    pub fn is_passable(&self, id: BlockId) -> bool {
        self.get(id).map(|ty| ty.passable).unwrap_or(false)
    }

    #[inline]
    pub fn is_solid(&self, id: BlockId) -> bool {
        self.get(id).map(|ty| ty.solid).unwrap_or(false)
    }

    /// Whether the block sitting on top of a container keeps its lid shut.
    /// A missing block never obstructs; neither does another container.
    #[inline]
    pub fn obstructs_opening(&self, above: Option<BlockId>) -> bool {
        match above {
            Some(id) => !self.is_container(id) && self.is_solid(id),
            None => false,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockType {
    pub id: BlockId,
    pub name: String,
    pub solid: bool,
    pub container: bool,
    pub passable: bool,
}

impl BlockType {
    fn placeholder(id: BlockId) -> Self {
        BlockType {
            id,
            name: String::new(),
            solid: false,
            container: false,
            passable: false,
        }
    }
}
