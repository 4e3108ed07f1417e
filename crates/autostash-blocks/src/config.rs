use serde::Deserialize;

// Top-level blocks config file
#[derive(Deserialize, Debug, Default)]
pub struct BlocksConfig {
    pub blocks: Vec<BlockDef>,
    // Substring rules applied to block names after the explicit flags,
    // e.g. every "*shulker*" block is a container.
    #[serde(default)]
    pub container_patterns: Vec<String>,
    #[serde(default)]
    pub passable_patterns: Vec<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BlockDef {
    pub name: String,
    #[serde(default)]
    pub id: Option<u16>,
    #[serde(default)]
    pub solid: Option<bool>,
    #[serde(default)]
    pub container: Option<bool>,
    // Whether the container search may walk through this block.
    #[serde(default)]
    pub passable: Option<bool>,
}

impl BlockDef {
    pub fn named(name: &str) -> Self {
        BlockDef {
            name: name.to_string(),
            id: None,
            solid: None,
            container: None,
            passable: None,
        }
    }
}
