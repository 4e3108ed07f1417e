use std::fmt;

use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};

use crate::host::RequesterId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    DepositAll,
    QuickDeposit,
    SortChests,
    SortInventory,
    RefillStacks,
}

impl Feature {
    pub const ALL: [Feature; 5] = [
        Feature::DepositAll,
        Feature::QuickDeposit,
        Feature::SortChests,
        Feature::SortInventory,
        Feature::RefillStacks,
    ];
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Feature::DepositAll => "deposit all",
            Feature::QuickDeposit => "quick deposit",
            Feature::SortChests => "chest sorting",
            Feature::SortInventory => "inventory sorting",
            Feature::RefillStacks => "stack refill",
        };
        f.write_str(name)
    }
}

pub trait FeatureGate: Send + Sync {
    fn permits(&self, requester: RequesterId, feature: Feature) -> bool;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct Unrestricted;

impl FeatureGate for Unrestricted {
    fn permits(&self, _requester: RequesterId, _feature: Feature) -> bool {
        true
    }
}

/// Explicit per-requester grants. Requesters without an entry get `default`.
#[derive(Clone, Debug, Default)]
pub struct FeatureTable {
    grants: HashMap<RequesterId, HashSet<Feature>>,
    default: HashSet<Feature>,
}

impl FeatureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every requester without an entry may use everything.
    pub fn permissive() -> Self {
        Self {
            grants: HashMap::new(),
            default: Feature::ALL.into_iter().collect(),
        }
    }

    pub fn grant(&mut self, requester: RequesterId, features: impl IntoIterator<Item = Feature>) {
        self.grants.entry(requester).or_default().extend(features);
    }
}

impl FeatureGate for FeatureTable {
    fn permits(&self, requester: RequesterId, feature: Feature) -> bool {
        match self.grants.get(&requester) {
            Some(set) => set.contains(&feature),
            None => self.default.contains(&feature),
        }
    }
}
