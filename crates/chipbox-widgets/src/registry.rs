#![forbid(unsafe_code)]

//! Chip registry: identity-preserving reconciliation of the chip strip.
//!
//! # Design
//!
//! After every committed selection change the registry diffs its chips
//! against the new selection by item equality. Chips whose item is still
//! selected are moved into the new strip; items without a chip get a fresh
//! one from the factory; leftover chips are dropped. Reordering a selection
//! therefore reorders the same chip values rather than rebuilding them.
//!
//! Retained chips are not rebuilt, but their presentation is re-stamped on
//! every pass: item instance, label, and delete affordance. Re-stamping is
//! what lets a pool replacement refresh the display of an item whose
//! equality key did not change.
//!
//! # Invariants
//!
//! 1. After `reconcile(selection, ..)` there is exactly one chip per
//!    selected item, in selection order.
//! 2. A chip's id and spawn time never change while its item stays
//!    selected.
//! 3. `created + retained == selection.len()` and
//!    `retained + removed == previous chip count` for every pass.

use crate::chip::{Chip, ChipId};

/// Outcome of one reconciliation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    pub created: usize,
    pub removed: usize,
    pub retained: usize,
}

/// Owner of the chip strip.
#[derive(Debug)]
pub struct ChipRegistry<T> {
    chips: Vec<Chip<T>>,
}

impl<T> ChipRegistry<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { chips: Vec::new() }
    }

    /// Chips in strip order (selection order as of the last reconcile).
    #[must_use]
    pub fn chips(&self) -> &[Chip<T>] {
        &self.chips
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chips.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chips.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ChipId) -> Option<&Chip<T>> {
        self.chips.iter().find(|chip| chip.id() == id)
    }

    /// The item behind a chip id, used to route a delete gesture back to a
    /// remove-by-value mutation.
    #[must_use]
    pub fn item_of(&self, id: ChipId) -> Option<&T> {
        self.get(id).map(Chip::item)
    }

    /// Flip the delete affordance on every chip. Idempotent.
    pub fn set_delete_enabled_all(&mut self, enabled: bool) {
        for chip in &mut self.chips {
            chip.set_delete_enabled(enabled);
        }
    }
}

impl<T: Clone + PartialEq> ChipRegistry<T> {
    /// The chip currently representing `item`, if any.
    #[must_use]
    pub fn chip_for(&self, item: &T) -> Option<&Chip<T>> {
        self.chips.iter().find(|chip| chip.item() == item)
    }

    /// Diff the strip against `selection`.
    ///
    /// Existing chips are matched by item equality and moved; misses are
    /// built by `factory`. Every chip in the new strip, retained or fresh,
    /// gets its item, label, and delete flag re-stamped.
    pub fn reconcile(
        &mut self,
        selection: &[T],
        factory: &mut dyn FnMut(&T) -> Chip<T>,
        label_for: &dyn Fn(&T) -> String,
        delete_enabled: bool,
    ) -> ReconcileStats {
        let mut previous = std::mem::take(&mut self.chips);
        let mut next: Vec<Chip<T>> = Vec::with_capacity(selection.len());
        let mut created = 0;
        let mut retained = 0;

        for item in selection {
            let mut chip = match previous.iter().position(|chip| chip.item() == item) {
                Some(index) => {
                    retained += 1;
                    previous.swap_remove(index)
                }
                None => {
                    created += 1;
                    factory(item)
                }
            };
            chip.set_item(item.clone());
            chip.set_label(label_for(item));
            chip.set_delete_enabled(delete_enabled);
            next.push(chip);
        }

        let removed = previous.len();
        self.chips = next;

        tracing::trace!(message = "chips.reconcile", created, removed, retained);
        ReconcileStats {
            created,
            removed,
            retained,
        }
    }

    /// Re-run the label function over every chip in place. Ids, order, and
    /// items are untouched.
    pub fn relabel(&mut self, label_for: &dyn Fn(&T) -> String) {
        for chip in &mut self.chips {
            let label = label_for(chip.item());
            chip.set_label(label);
        }
    }
}

impl<T> Default for ChipRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
