//! Read-only view of a grave as exposed by the grave mod.
//!
//! The shim never owns a grave.  It receives a [`GraveState`] from the host
//! adapter every time it evaluates one and renders the overlay from the
//! [`GraveSnapshot`] inside it.

use std::time::Duration;

use crate::item::ItemStack;

/// The payload displayed by a grave's overlay.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GraveSnapshot {
    /// Name of the player who died.
    pub owner_name: Option<String>,
    /// Rendered death message, e.g. "Steve fell from a high place".
    pub death_cause: Option<String>,
    /// Stored item stacks; empty stacks are allowed and ignored.
    pub items: Vec<ItemStack>,
    /// Stored experience points.
    pub xp: u32,
    /// Time until protection expires. `None` means protection never expires.
    pub protection_left: Option<Duration>,
    /// Time until the grave breaks. `None` means it never breaks.
    pub breaking_left: Option<Duration>,
}

impl GraveSnapshot {
    /// Number of non-empty stored stacks.
    pub fn item_count(&self) -> usize {
        self.items.iter().filter(|s| !s.is_empty()).count()
    }

    /// The first non-empty stack, shown on the overlay prop.
    pub fn display_item(&self) -> Option<&ItemStack> {
        self.items.iter().find(|s| !s.is_empty())
    }
}

/// Lifecycle of the grave behind a block position.
#[derive(Debug, Clone, PartialEq)]
pub enum GraveState {
    /// The block exists but its grave data has not been loaded yet.
    NotLoaded,
    /// The grave was collected or broken; the block is about to go away.
    Removed,
    /// A live grave.
    Live(GraveSnapshot),
}

impl GraveState {
    /// Whether the host may replace the grave block.
    ///
    /// Only a grave explicitly marked removed may be destroyed.  A grave whose
    /// data is still loading must survive, or its items would be lost during a
    /// slow server start.
    pub fn permits_block_removal(&self) -> bool {
        matches!(self, GraveState::Removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{ItemKind, ItemStack};

    fn snapshot_with(items: Vec<ItemStack>) -> GraveSnapshot {
        GraveSnapshot {
            items,
            ..GraveSnapshot::default()
        }
    }

    #[test]
    fn test_item_count_ignores_empty_stacks() {
        let snapshot = snapshot_with(vec![
            ItemStack::new(ItemKind::Other("minecraft:apple".into()), 3),
            ItemStack::empty(),
            ItemStack::new(ItemKind::Compass, 1),
        ]);
        assert_eq!(snapshot.item_count(), 2);
    }

    #[test]
    fn test_display_item_skips_leading_empty_stacks() {
        let snapshot = snapshot_with(vec![
            ItemStack::empty(),
            ItemStack::new(ItemKind::Other("minecraft:apple".into()), 3),
        ]);
        let item = snapshot.display_item().expect("an item");
        assert_eq!(item.kind, ItemKind::Other("minecraft:apple".into()));
    }

    #[test]
    fn test_display_item_none_for_empty_grave() {
        assert!(snapshot_with(vec![ItemStack::empty()]).display_item().is_none());
    }

    #[test]
    fn test_only_removed_graves_permit_block_removal() {
        assert!(GraveState::Removed.permits_block_removal());
        assert!(!GraveState::NotLoaded.permits_block_removal());
        assert!(!GraveState::Live(GraveSnapshot::default()).permits_block_removal());
    }
}
