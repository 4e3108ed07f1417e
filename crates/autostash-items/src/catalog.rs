use std::collections::HashMap;
use std::error::Error;
use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::stack::ItemId;

const BUNDLED_ITEMS: &str = include_str!("../assets/items.toml");

/// Stack limit assumed for ids the catalog does not know.
pub const DEFAULT_MAX_STACK: u32 = 64;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ItemDef {
    pub id: ItemId,
    pub name: String,
    pub max_stack: u32,
}

#[derive(Default, Clone, Debug)]
pub struct ItemCatalog {
    pub items: Vec<Option<ItemDef>>,
    pub by_name: HashMap<String, ItemId>,
}

impl ItemCatalog {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    pub fn bundled() -> Result<Self, Box<dyn Error>> {
        Self::from_toml_str(BUNDLED_ITEMS)
    }

    pub fn get(&self, id: ItemId) -> Option<&ItemDef> {
        self.items.get(id as usize).and_then(|d| d.as_ref())
    }

    pub fn get_id(&self, name: &str) -> Option<ItemId> {
        self.by_name.get(name).copied()
    }

    pub fn name_of(&self, id: ItemId) -> &str {
        self.get(id).map(|d| d.name.as_str()).unwrap_or("unknown")
    }

    #[inline]
    pub fn max_stack(&self, id: ItemId) -> u32 {
        self.get(id).map(|d| d.max_stack).unwrap_or(DEFAULT_MAX_STACK)
    }

    pub fn from_toml_str(toml_str: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: ItemsConfig = toml::from_str(toml_str)?;
        let mut catalog = ItemCatalog::new();
        for entry in cfg.items {
            let id = entry.id.unwrap_or(catalog.items.len() as ItemId);
            let max_stack = entry.max_stack.unwrap_or(DEFAULT_MAX_STACK);
            if !(1..=DEFAULT_MAX_STACK).contains(&max_stack) {
                return Err(format!("item `{}`: max_stack {} not in 1..=64", entry.name, max_stack).into());
            }
            if catalog.by_name.contains_key(&entry.name) || catalog.get(id).is_some() {
                return Err(format!("item `{}` (id {}) defined twice", entry.name, id).into());
            }
            if catalog.items.len() <= id as usize {
                catalog.items.resize(id as usize + 1, None);
            }
            catalog.by_name.insert(entry.name.clone(), id);
            catalog.items[id as usize] = Some(ItemDef {
                id,
                name: entry.name,
                max_stack,
            });
        }
        Ok(catalog)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let s = fs::read_to_string(path)?;
        Self::from_toml_str(&s)
    }
}

// --- Config ---

#[derive(Deserialize)]
pub struct ItemsConfig {
    pub items: Vec<ItemEntry>,
}

#[derive(Deserialize)]
pub struct ItemEntry {
    pub name: String,
    #[serde(default)]
    pub id: Option<ItemId>,
    #[serde(default)]
    pub max_stack: Option<u32>,
}
