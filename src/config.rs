use std::error::Error;
use std::fs;
use std::path::Path;

use autostash_search::VERTICAL_REACH;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DepositConfig {
    /// Item names never moved by automatic deposits.
    pub excluded_items: Vec<String>,
}

impl Default for DepositConfig {
    fn default() -> Self {
        Self {
            excluded_items: vec![
                "arrow".to_string(),
                "spectral_arrow".to_string(),
                "tipped_arrow".to_string(),
            ],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Blocks searched above and below the requester's eyes.
    pub vertical_reach: i32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            vertical_reach: VERTICAL_REACH,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub deposit: DepositConfig,
    pub search: SearchConfig,
}

impl Config {
    pub fn from_toml_str(s: &str) -> Result<Self, Box<dyn Error>> {
        let cfg: Config = toml::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), Box<dyn Error>> {
        if !(1..=VERTICAL_REACH).contains(&self.search.vertical_reach) {
            return Err(format!(
                "search.vertical_reach {} not in 1..={}",
                self.search.vertical_reach, VERTICAL_REACH
            )
            .into());
        }
        Ok(())
    }

    /// Reads `path`, or writes the defaults there when it does not exist yet.
    pub fn load_or_init(path: &Path) -> Result<Self, Box<dyn Error>> {
        if path.exists() {
            let text = fs::read_to_string(path)?;
            let cfg = Self::from_toml_str(&text)?;
            log::info!("loaded config from {}", path.display());
            return Ok(cfg);
        }
        let cfg = Config::default();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, toml::to_string_pretty(&cfg)?)?;
        log::info!("wrote default config to {}", path.display());
        Ok(cfg)
    }
}
