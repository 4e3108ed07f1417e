use serde::{Deserialize, Serialize};

pub type ItemId = u16;

/// One occupied slot: `count` items of the same kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ItemStack {
    pub item: ItemId,
    // Damage / data value. Distinguishes otherwise identical stacks.
    #[serde(default)]
    pub variant: u16,
    pub count: u32,
}

impl ItemStack {
    #[inline]
    pub const fn new(item: ItemId, count: u32) -> Self {
        Self {
            item,
            variant: 0,
            count,
        }
    }

    #[inline]
    pub const fn with_variant(self, variant: u16) -> Self {
        Self { variant, ..self }
    }

    #[inline]
    pub const fn with_count(self, count: u32) -> Self {
        Self { count, ..self }
    }

    /// Same item and variant, so the two may share a slot.
    #[inline]
    pub fn stacks_with(&self, other: &ItemStack) -> bool {
        self.item == other.item && self.variant == other.variant
    }
}

/// Equality key deciding whether a destination already holds "this kind" of item.
///
/// The variant only counts for stackable items; single-item kinds (tools, potions)
/// match regardless of damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ItemSignature {
    pub item: ItemId,
    pub variant: Option<u16>,
}

impl ItemSignature {
    #[inline]
    pub fn of(stack: &ItemStack, max_stack: u32) -> Self {
        Self {
            item: stack.item,
            variant: (max_stack > 1).then_some(stack.variant),
        }
    }
}
