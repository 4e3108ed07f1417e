use serde::{Deserialize, Serialize};

use crate::catalog::ItemCatalog;
use crate::stack::{ItemId, ItemStack};

/// Player slots 0..9 form the hotbar.
pub const HOTBAR_SLOTS: usize = 9;
/// Hotbar plus main storage; slots past this (armor, offhand) never take part in deposits.
pub const PLAYER_STORAGE_SLOTS: usize = 36;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryKind {
    Player,
    #[default]
    Chest,
    EnderChest,
    ShulkerBox,
    Barrel,
    Hopper,
    Other,
}

/// Fixed-size slot array. Empty slots are `None`; a stored stack never has count 0.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    pub kind: InventoryKind,
    slots: Vec<Option<ItemStack>>,
}

impl Inventory {
    pub fn new(kind: InventoryKind, size: usize) -> Self {
        Self {
            kind,
            slots: vec![None; size],
        }
    }

    /// Player layout: 36 storage slots plus 4 armor and 1 offhand.
    pub fn player() -> Self {
        Self::new(InventoryKind::Player, PLAYER_STORAGE_SLOTS + 5)
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn get(&self, slot: usize) -> Option<&ItemStack> {
        self.slots.get(slot).and_then(|s| s.as_ref())
    }

    /// Stores `stack` in `slot`; a zero count clears it. Out-of-range slots are ignored.
    pub fn set(&mut self, slot: usize, stack: Option<ItemStack>) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = stack.filter(|st| st.count > 0);
        }
    }

    pub fn clear(&mut self, slot: usize) {
        self.set(slot, None);
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&ItemStack>> + '_ {
        self.slots.iter().map(|s| s.as_ref())
    }

    pub fn first_empty(&self) -> Option<usize> {
        self.slots.iter().position(|s| s.is_none())
    }

    pub fn total_of(&self, item: ItemId) -> u64 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| s.item == item)
            .map(|s| u64::from(s.count))
            .sum()
    }

    pub fn total_items(&self) -> u64 {
        self.slots.iter().flatten().map(|s| u64::from(s.count)).sum()
    }

    /// Reduces the count in `slot` by `n`, clearing it at zero. Returns how many were removed.
    pub fn take(&mut self, slot: usize, n: u32) -> u32 {
        let Some(Some(stack)) = self.slots.get_mut(slot) else {
            return 0;
        };
        let taken = n.min(stack.count);
        stack.count -= taken;
        if stack.count == 0 {
            self.slots[slot] = None;
        }
        taken
    }

    /// Merges `stack` in, topping up matching partial stacks in slot order before
    /// using empty slots, never exceeding the item's stack limit.
    /// Returns the count that did not fit.
    pub fn add_item(&mut self, stack: ItemStack, catalog: &ItemCatalog) -> u32 {
        let max = catalog.max_stack(stack.item);
        let mut left = stack.count;
        if left == 0 {
            return 0;
        }
        for slot in self.slots.iter_mut().flatten() {
            if slot.stacks_with(&stack) && slot.count < max {
                let moved = left.min(max - slot.count);
                slot.count += moved;
                left -= moved;
                if left == 0 {
                    return 0;
                }
            }
        }
        for slot in self.slots.iter_mut().filter(|s| s.is_none()) {
            let put = left.min(max);
            *slot = Some(stack.with_count(put));
            left -= put;
            if left == 0 {
                break;
            }
        }
        left
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> ItemCatalog {
        ItemCatalog::bundled().unwrap()
    }

    #[test]
    fn add_item_tops_up_partials_before_empties() {
        let cat = catalog();
        let cobble = cat.get_id("cobblestone").unwrap();
        let mut inv = Inventory::new(InventoryKind::Chest, 4);
        inv.set(2, Some(ItemStack::new(cobble, 60)));
        let left = inv.add_item(ItemStack::new(cobble, 10), &cat);
        assert_eq!(left, 0);
        assert_eq!(inv.get(2).unwrap().count, 64);
        assert_eq!(inv.get(0).unwrap().count, 6);
        assert!(inv.get(1).is_none());
    }

    #[test]
    fn add_item_reports_remainder_when_full() {
        let cat = catalog();
        let pearl = cat.get_id("ender_pearl").unwrap();
        let mut inv = Inventory::new(InventoryKind::Chest, 2);
        inv.set(0, Some(ItemStack::new(pearl, 10)));
        let left = inv.add_item(ItemStack::new(pearl, 30), &cat);
        // 6 tops up slot 0, 16 fills slot 1
        assert_eq!(left, 8);
        assert_eq!(inv.total_of(pearl), 32);
        assert!(inv.first_empty().is_none());
    }

    #[test]
    fn variants_do_not_merge() {
        let cat = catalog();
        let log_id = cat.get_id("oak_log").unwrap();
        let mut inv = Inventory::new(InventoryKind::Chest, 1);
        inv.set(0, Some(ItemStack::new(log_id, 1).with_variant(2)));
        let left = inv.add_item(ItemStack::new(log_id, 5), &cat);
        assert_eq!(left, 5);
    }

    #[test]
    fn take_clears_at_zero() {
        let mut inv = Inventory::new(InventoryKind::Chest, 1);
        inv.set(0, Some(ItemStack::new(3, 5)));
        assert_eq!(inv.take(0, 2), 2);
        assert_eq!(inv.get(0).unwrap().count, 3);
        assert_eq!(inv.take(0, 9), 3);
        assert!(inv.get(0).is_none());
        assert_eq!(inv.take(7, 1), 0);
    }

    #[test]
    fn zero_count_set_is_empty() {
        let mut inv = Inventory::new(InventoryKind::Chest, 1);
        inv.set(0, Some(ItemStack::new(3, 0)));
        assert_eq!(inv.first_empty(), Some(0));
    }
}
