use hashbrown::HashSet;

use crate::catalog::ItemCatalog;
use crate::inventory::{HOTBAR_SLOTS, Inventory, PLAYER_STORAGE_SLOTS};
use crate::stack::{ItemId, ItemSignature};

/// Item kinds an administrator has barred from automatic deposits.
#[derive(Clone, Debug, Default)]
pub struct ExclusionSet {
    items: HashSet<ItemId>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolves names against the catalog; unknown names are logged and skipped.
    pub fn from_names<'a>(names: impl IntoIterator<Item = &'a str>, catalog: &ItemCatalog) -> Self {
        let mut items = HashSet::new();
        for name in names {
            match catalog.get_id(name) {
                Some(id) => {
                    items.insert(id);
                }
                None => log::warn!(target: "deposit", "ignoring unknown excluded item `{}`", name),
            }
        }
        Self { items }
    }

    pub fn insert(&mut self, item: ItemId) {
        self.items.insert(item);
    }

    #[inline]
    pub fn contains(&self, item: ItemId) -> bool {
        self.items.contains(&item)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TransferStep {
    pub items_moved: u32,
    /// No empty slot left afterwards. Partial stacks may still have room.
    pub destination_full: bool,
}

/// Moves source stacks into `destination`, but only kinds the destination already holds.
///
/// Slots are scanned in order from 0 (or 9 when the hotbar is left alone) up to
/// the 36th. A kind that cannot move a single item is dropped from the eligible
/// set so later slots of the same kind are not retried. Item totals across both
/// inventories are unchanged.
pub fn deposit_matching(
    source: &mut Inventory,
    destination: &mut Inventory,
    include_hotbar: bool,
    exclusions: &ExclusionSet,
    catalog: &ItemCatalog,
) -> TransferStep {
    let mut eligible: HashSet<ItemSignature> = destination
        .iter()
        .flatten()
        .map(|s| ItemSignature::of(s, catalog.max_stack(s.item)))
        .collect();

    let mut step = TransferStep::default();
    let start = if include_hotbar { 0 } else { HOTBAR_SLOTS };
    let end = source.size().min(PLAYER_STORAGE_SLOTS);
    for slot in start..end {
        let Some(stack) = source.get(slot).copied() else {
            continue;
        };
        if exclusions.contains(stack.item) {
            continue;
        }
        let signature = ItemSignature::of(&stack, catalog.max_stack(stack.item));
        if !eligible.contains(&signature) {
            continue;
        }
        let remainder = destination.add_item(stack, catalog);
        let moved = stack.count - remainder;
        if moved == 0 {
            eligible.remove(&signature);
        } else {
            source.take(slot, moved);
            step.items_moved += moved;
        }
    }

    step.destination_full = destination.first_empty().is_none();
    step
}
