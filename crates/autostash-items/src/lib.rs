//! Item definitions, slot inventories, and the matching deposit between them.
#![forbid(unsafe_code)]

pub mod catalog;
pub mod deposit;
pub mod inventory;
pub mod stack;

pub use catalog::{ItemCatalog, ItemDef};
pub use deposit::{ExclusionSet, TransferStep, deposit_matching};
pub use inventory::{HOTBAR_SLOTS, Inventory, InventoryKind, PLAYER_STORAGE_SLOTS};
pub use stack::{ItemId, ItemSignature, ItemStack};
