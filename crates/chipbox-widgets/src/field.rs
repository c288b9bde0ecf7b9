#![forbid(unsafe_code)]

//! ChipBox field: a multi-select backed by a picker and a chip strip.
//!
//! # Design
//!
//! [`ChipBox`] composes the core value model with two presentation pieces.
//! The candidate pool and selection decide *what* is chosen; the
//! [`ChipRegistry`] and [`Picker`] render *how*. Every mutation funnels
//! through one commit path:
//!
//! 1. Build the proposed next selection and filter it through the pool.
//! 2. Bail out if it holds the same items as the current selection,
//!    regardless of order.
//! 3. Swap the selection in, then reconcile chips and push the remaining
//!    availability into the picker.
//! 4. Fire exactly one [`ValueChange`] carrying both snapshots and the
//!    origin of the mutation.
//! 5. Drain operations queued through [`Deferred`] handles.
//!
//! Listeners receive `&ChipBox` and can read anything, but the shared
//! borrow makes mutating the field from inside a listener a compile error.
//! Reactions that need to mutate go through [`deferred`](ChipBox::deferred),
//! which queues the operation until the in-flight commit has finished.
//!
//! # Invariants
//!
//! 1. The selection is always a subset of the candidate pool.
//! 2. One chip per selected item, in selection order, identity preserved
//!    while the item stays selected.
//! 3. The picker offers exactly pool minus selection after every commit.
//! 4. Listeners observe fully reconciled state: when a listener runs, the
//!    field already agrees with the event it is handed.
//! 5. At most one event per logical mutation; equal-value writes fire none.
//!
//! # Failure Modes
//!
//! - **Unknown items in a programmatic write**: dropped silently before the
//!   equality gate, logged at debug level.
//! - **Missing items collection**: [`set_items_opt`](ChipBox::set_items_opt)
//!   with `None` is the one rejected call; the pool keeps its contents.
//! - **Listener panic**: propagates to the caller mid-dispatch. Remaining
//!   listeners are skipped; field state is already committed and stays
//!   consistent.
//! - **Deferred feedback loop**: a listener that unconditionally queues a
//!   value-changing operation never converges; the drain loop runs until
//!   the queue is empty and does not break cycles.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;
use chipbox_core::error::{FieldError, Result};
use chipbox_core::event::{CallbackList, ChangeOrigin, Subscription, ValueChange};
use chipbox_core::field::{HasItems, Sizeable, ValidityReporting, ValueHolder};
use chipbox_core::pool::CandidatePool;
use chipbox_core::selection::Selection;

use crate::chip::{Chip, ChipId};
use crate::picker::Picker;
use crate::registry::ChipRegistry;

/// Listener invoked after a commit. The field borrow is shared, so
/// listeners observe but never mutate; mutations go through [`Deferred`].
pub type ValueListener<T> = dyn FnMut(&ChipBox<T>, &ValueChange<T>);

/// Hook building the chip for a newly selected item. The field stamps
/// label and delete flag afterwards, so factories customize the rest.
pub type ChipFactory<T> = Box<dyn FnMut(&T) -> Chip<T>>;

/// Item label function shared by chips and picker options.
pub type LabelGenerator<T> = Box<dyn Fn(&T) -> String>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    struct FieldFlags: u8 {
        const READ_ONLY = 1;
        const REQUIRED_INDICATOR = 1 << 1;
        const INVALID = 1 << 2;
        const CLEAR_ALL_VISIBLE = 1 << 3;
        const FULL_WIDTH = 1 << 4;
    }
}

impl FieldFlags {
    const DEFAULT: Self = Self::CLEAR_ALL_VISIBLE.union(Self::FULL_WIDTH);
}

// ───────────────────────────────────────────────────────────────────────────
// Deferred mutation queue
// ───────────────────────────────────────────────────────────────────────────

enum DeferredOp<T> {
    SetValue(Vec<T>),
    Add(T),
    Remove(T),
    Clear,
    SetItems(Vec<T>),
}

/// Cloneable handle queuing mutations to run after the in-flight commit.
///
/// Listeners hold one of these to react to a change with another change.
/// Operations apply in queue order once dispatch for the current commit
/// has finished; each behaves exactly like its direct counterpart,
/// including firing its own event.
pub struct Deferred<T> {
    queue: Rc<RefCell<VecDeque<DeferredOp<T>>>>,
}

impl<T> Deferred<T> {
    pub fn set_value(&self, values: Vec<T>) {
        self.queue.borrow_mut().push_back(DeferredOp::SetValue(values));
    }

    pub fn add(&self, item: T) {
        self.queue.borrow_mut().push_back(DeferredOp::Add(item));
    }

    pub fn remove(&self, item: T) {
        self.queue.borrow_mut().push_back(DeferredOp::Remove(item));
    }

    pub fn clear(&self) {
        self.queue.borrow_mut().push_back(DeferredOp::Clear);
    }

    pub fn set_items(&self, items: Vec<T>) {
        self.queue.borrow_mut().push_back(DeferredOp::SetItems(items));
    }

    /// Operations waiting for the next drain.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }
}

impl<T> Clone for Deferred<T> {
    fn clone(&self) -> Self {
        Self {
            queue: Rc::clone(&self.queue),
        }
    }
}

impl<T> fmt::Debug for Deferred<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Deferred")
            .field("pending", &self.pending())
            .finish()
    }
}

// ───────────────────────────────────────────────────────────────────────────
// Field
// ───────────────────────────────────────────────────────────────────────────

/// Multi-select field pairing a picker with a strip of removable chips.
///
/// `T` is the item type: cloneable, equality-comparable, owned by the
/// field. Picking an option moves it from the picker into a chip; deleting
/// the chip offers it again. Programmatic and user mutation share one
/// commit path and differ only in the [`ChangeOrigin`] they report and in
/// whether read-only blocks them.
pub struct ChipBox<T> {
    pool: CandidatePool<T>,
    selection: Selection<T>,
    chips: ChipRegistry<T>,
    picker: Picker<T>,
    listeners: CallbackList<ValueListener<T>>,
    deferred: Rc<RefCell<VecDeque<DeferredOp<T>>>>,
    draining: bool,
    flags: FieldFlags,
    error_message: Option<String>,
    clear_all_icon: String,
    label_generator: LabelGenerator<T>,
    chip_factory: ChipFactory<T>,
}

impl<T: Clone + PartialEq + fmt::Display> ChipBox<T> {
    /// Field labeling items with their `Display` form.
    #[must_use]
    pub fn new() -> Self {
        Self::with_labels(|item: &T| item.to_string())
    }
}

impl<T: Clone + PartialEq + fmt::Display> Default for ChipBox<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Clone + PartialEq> ChipBox<T> {
    /// Field with an explicit label function, for item types without
    /// a `Display` form worth showing.
    #[must_use]
    pub fn with_labels(generator: impl Fn(&T) -> String + 'static) -> Self {
        Self {
            pool: CandidatePool::new(),
            selection: Selection::new(),
            chips: ChipRegistry::new(),
            picker: Picker::new(),
            listeners: CallbackList::new(),
            deferred: Rc::new(RefCell::new(VecDeque::new())),
            draining: false,
            flags: FieldFlags::DEFAULT,
            error_message: None,
            clear_all_icon: "🗑".to_string(),
            label_generator: Box::new(generator),
            chip_factory: Box::new(|item: &T| Chip::new(item.clone())),
        }
    }

    // ── Value access ───────────────────────────────────────────────────

    /// Selected items in selection order.
    #[must_use]
    pub fn value(&self) -> &[T] {
        self.selection.values()
    }

    /// The candidate pool in pool order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.pool.items()
    }

    /// Pool minus selection, computed now. The picker holds the copy of
    /// this pushed at the last commit; the two agree between mutations.
    #[must_use]
    pub fn availability(&self) -> Vec<T> {
        self.pool.excluding(self.selection.values())
    }

    /// Chip strip in selection order.
    #[must_use]
    pub fn chips(&self) -> &[Chip<T>] {
        self.chips.chips()
    }

    /// Presentation state for the dropdown collaborator.
    #[must_use]
    pub fn picker(&self) -> &Picker<T> {
        &self.picker
    }

    /// The whole strip as text, chips joined by single spaces.
    #[must_use]
    pub fn chips_text(&self) -> String {
        self.chips
            .chips()
            .iter()
            .map(Chip::display_text)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Labels for the options currently on offer, through the label
    /// generator.
    #[must_use]
    pub fn option_labels(&self) -> Vec<String> {
        self.picker
            .options()
            .iter()
            .map(|item| (self.label_generator)(item))
            .collect()
    }

    // ── Programmatic mutation ──────────────────────────────────────────

    /// Replace the selection. Unknown and duplicate items are dropped
    /// before comparison; a resulting no-op fires nothing. Returns true
    /// when the value changed.
    pub fn set_value(&mut self, values: impl IntoIterator<Item = T>) -> bool {
        let proposed = self.pool.sanitize(values.into_iter().collect());
        self.apply_selection(proposed, ChangeOrigin::Programmatic)
    }

    /// [`set_value`](ChipBox::set_value) accepting an absent collection:
    /// `None` clears. Contrast with [`set_items_opt`](ChipBox::set_items_opt),
    /// which rejects `None`.
    pub fn set_value_opt(&mut self, values: Option<Vec<T>>) -> bool {
        match values {
            Some(values) => self.set_value(values),
            None => self.clear(),
        }
    }

    /// Append one item to the selection. No-op (returning false) when the
    /// item is unknown to the pool or already selected.
    pub fn add(&mut self, item: T) -> bool {
        let mut next = self.selection.snapshot();
        next.push(item);
        let next = self.pool.sanitize(next);
        self.apply_selection(next, ChangeOrigin::Programmatic)
    }

    /// Drop one item from the selection. No-op when it is not selected.
    pub fn remove(&mut self, item: &T) -> bool {
        let next: Vec<T> = self
            .selection
            .values()
            .iter()
            .filter(|value| *value != item)
            .cloned()
            .collect();
        self.apply_selection(next, ChangeOrigin::Programmatic)
    }

    /// Clear the selection programmatically.
    pub fn clear(&mut self) -> bool {
        self.apply_selection(Vec::new(), ChangeOrigin::Programmatic)
    }

    /// Replace the candidate pool. Selected items missing from the new
    /// pool are dropped from the value, firing one programmatic event if
    /// anything fell out. Chips and picker refresh either way.
    pub fn set_items(&mut self, items: impl IntoIterator<Item = T>) {
        self.replace_pool(items.into_iter().collect());
    }

    /// [`set_items`](ChipBox::set_items) accepting an absent collection.
    /// `None` is rejected: an empty pool must be an empty collection, not
    /// a missing one.
    pub fn set_items_opt(&mut self, items: Option<Vec<T>>) -> Result<()> {
        match items {
            Some(items) => {
                self.replace_pool(items);
                Ok(())
            }
            None => Err(FieldError::invalid(
                "items collection is required; pass an empty collection to clear the pool",
            )),
        }
    }

    // ── User gestures ──────────────────────────────────────────────────

    /// Pick an option, as the dropdown does. Read-only blocks it; unknown
    /// items are refused (the picker never offers them); re-picking a
    /// selected item is a no-op.
    pub fn select(&mut self, item: T) -> bool {
        if self.is_read_only() {
            tracing::debug!(message = "chipbox.select_ignored", reason = "read_only");
            return false;
        }
        let Some(canonical) = self.pool.canonical(&item).cloned() else {
            tracing::warn!(message = "chipbox.select_unknown");
            return false;
        };
        if self.selection.contains(&canonical) {
            return false;
        }
        let mut next = self.selection.snapshot();
        next.push(canonical);
        self.apply_selection(next, ChangeOrigin::User)
    }

    /// Delete gesture on one chip. The chip id resolves to its item and
    /// the item is removed by value, never by strip position. Read-only
    /// blocks it.
    pub fn delete_chip(&mut self, id: ChipId) -> bool {
        if self.is_read_only() {
            tracing::debug!(
                message = "chipbox.delete_ignored",
                reason = "read_only",
                id = id.raw()
            );
            return false;
        }
        let Some(item) = self.chips.item_of(id).cloned() else {
            return false;
        };
        let next: Vec<T> = self
            .selection
            .values()
            .iter()
            .filter(|value| **value != item)
            .cloned()
            .collect();
        self.apply_selection(next, ChangeOrigin::User)
    }

    /// Clear-all gesture. Read-only blocks it; an empty selection makes it
    /// a no-op. Visibility of the affordance is presentation state and is
    /// not re-checked here.
    pub fn clear_all(&mut self) -> bool {
        if self.is_read_only() {
            return false;
        }
        self.apply_selection(Vec::new(), ChangeOrigin::User)
    }

    // ── Listeners and deferred mutation ────────────────────────────────

    /// Register a change listener. Listeners run in registration order
    /// after the field has fully reconciled; dropping the returned guard
    /// unsubscribes.
    pub fn on_value_change(
        &mut self,
        listener: impl FnMut(&ChipBox<T>, &ValueChange<T>) + 'static,
    ) -> Subscription<ValueListener<T>> {
        let callback: Rc<RefCell<ValueListener<T>>> = Rc::new(RefCell::new(listener));
        self.listeners.subscribe(callback)
    }

    /// Handle for queuing mutations from inside listeners.
    #[must_use]
    pub fn deferred(&self) -> Deferred<T> {
        Deferred {
            queue: Rc::clone(&self.deferred),
        }
    }

    // ── Configuration ──────────────────────────────────────────────────

    /// Caption above the field. `None` removes it.
    pub fn set_label(&mut self, label: Option<String>) {
        self.picker.set_label(label);
    }

    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.picker.label()
    }

    /// Hint shown in the picker while nothing is picked.
    pub fn set_placeholder(&mut self, placeholder: Option<String>) {
        self.picker.set_placeholder(placeholder);
    }

    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.picker.placeholder()
    }

    /// Read-only gates user gestures only; programmatic writes still
    /// apply. Cascades to the picker and to every chip's delete affordance.
    pub fn set_read_only(&mut self, read_only: bool) {
        self.flags.set(FieldFlags::READ_ONLY, read_only);
        self.picker.set_read_only(read_only);
        self.chips.set_delete_enabled_all(!read_only);
        tracing::debug!(message = "chipbox.read_only", read_only);
    }

    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.flags.contains(FieldFlags::READ_ONLY)
    }

    pub fn set_required_indicator_visible(&mut self, visible: bool) {
        self.flags.set(FieldFlags::REQUIRED_INDICATOR, visible);
        self.picker.set_required(visible);
    }

    #[must_use]
    pub fn is_required_indicator_visible(&self) -> bool {
        self.flags.contains(FieldFlags::REQUIRED_INDICATOR)
    }

    /// Validity is decided outside the field (binder, form, validator)
    /// and mirrored into the picker for rendering.
    pub fn set_invalid(&mut self, invalid: bool) {
        self.flags.set(FieldFlags::INVALID, invalid);
        self.picker.set_invalid(invalid);
    }

    #[must_use]
    pub fn is_invalid(&self) -> bool {
        self.flags.contains(FieldFlags::INVALID)
    }

    pub fn set_error_message(&mut self, message: Option<String>) {
        self.error_message.clone_from(&message);
        self.picker.set_error_message(message);
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    /// Whether the field stretches to its container width.
    pub fn set_full_width(&mut self, full_width: bool) {
        self.flags.set(FieldFlags::FULL_WIDTH, full_width);
        self.picker.set_full_width(full_width);
    }

    #[must_use]
    pub fn is_full_width(&self) -> bool {
        self.flags.contains(FieldFlags::FULL_WIDTH)
    }

    /// Whether the clear-all affordance renders next to the strip.
    pub fn set_clear_all_visible(&mut self, visible: bool) {
        self.flags.set(FieldFlags::CLEAR_ALL_VISIBLE, visible);
    }

    #[must_use]
    pub fn is_clear_all_visible(&self) -> bool {
        self.flags.contains(FieldFlags::CLEAR_ALL_VISIBLE)
    }

    /// Glyph for the clear-all affordance.
    pub fn set_clear_all_icon(&mut self, icon: impl Into<String>) {
        self.clear_all_icon = icon.into();
    }

    #[must_use]
    pub fn clear_all_icon(&self) -> &str {
        &self.clear_all_icon
    }

    /// Swap the label function and re-label every live chip in place.
    /// Option labels pick it up on the next read.
    pub fn set_label_generator(&mut self, generator: impl Fn(&T) -> String + 'static) {
        self.label_generator = Box::new(generator);
        self.chips.relabel(&*self.label_generator);
    }

    /// Swap the chip factory. Applies to chips built from now on; live
    /// chips keep their construction.
    pub fn set_chip_factory(&mut self, factory: impl FnMut(&T) -> Chip<T> + 'static) {
        self.chip_factory = Box::new(factory);
    }

    // ── Fluent configuration ───────────────────────────────────────────

    #[must_use]
    pub fn with_items(mut self, items: impl IntoIterator<Item = T>) -> Self {
        self.set_items(items);
        self
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.set_label(Some(label.into()));
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.set_placeholder(Some(placeholder.into()));
        self
    }

    #[must_use]
    pub fn with_full_width(mut self, full_width: bool) -> Self {
        self.set_full_width(full_width);
        self
    }

    #[must_use]
    pub fn with_clear_all_visible(mut self, visible: bool) -> Self {
        self.set_clear_all_visible(visible);
        self
    }

    #[must_use]
    pub fn with_clear_all_icon(mut self, icon: impl Into<String>) -> Self {
        self.set_clear_all_icon(icon);
        self
    }

    #[must_use]
    pub fn with_label_generator(mut self, generator: impl Fn(&T) -> String + 'static) -> Self {
        self.set_label_generator(generator);
        self
    }

    #[must_use]
    pub fn with_chip_factory(mut self, factory: impl FnMut(&T) -> Chip<T> + 'static) -> Self {
        self.set_chip_factory(factory);
        self
    }

    // ── Commit path ────────────────────────────────────────────────────

    /// Pool replacement shared by `set_items` and `set_items_opt`.
    ///
    /// The surviving selection adopts the new pool's item instances, so a
    /// replacement that changes display data behind an unchanged equality
    /// key still refreshes the chips.
    fn replace_pool(&mut self, items: Vec<T>) {
        self.pool.replace(items);
        let next: Vec<T> = self
            .selection
            .values()
            .iter()
            .filter_map(|value| self.pool.canonical(value).cloned())
            .collect();
        if self.selection.same_values(&next) {
            self.selection.replace_with(next);
            self.refresh_presentation();
        } else {
            self.apply_selection(next, ChangeOrigin::Programmatic);
        }
    }

    /// The single commit gate. `next` must already be pool-filtered and
    /// duplicate-free.
    fn apply_selection(&mut self, next: Vec<T>, origin: ChangeOrigin) -> bool {
        if self.selection.same_values(&next) {
            return false;
        }
        let previous = self.selection.snapshot();
        self.selection.replace_with(next);
        self.refresh_presentation();
        let event = ValueChange::new(previous, self.selection.snapshot(), origin);
        self.dispatch(&event);
        self.drain_deferred();
        true
    }

    /// Reconcile chips against the selection and push availability into
    /// the picker. Runs before listeners see the change.
    fn refresh_presentation(&mut self) {
        let delete_enabled = !self.flags.contains(FieldFlags::READ_ONLY);
        self.chips.reconcile(
            self.selection.values(),
            &mut *self.chip_factory,
            &*self.label_generator,
            delete_enabled,
        );
        self.picker
            .offer(self.pool.excluding(self.selection.values()));
    }

    fn dispatch(&mut self, event: &ValueChange<T>) {
        tracing::debug!(
            message = "chipbox.value_change",
            origin = event.origin().as_str(),
            previous = event.previous_value().len(),
            current = event.value().len()
        );
        for slot in self.listeners.snapshot() {
            if let Some(listener) = slot.upgrade() {
                (&mut *listener.borrow_mut())(self, event);
            }
        }
        self.listeners.prune();
    }

    /// Apply queued operations in FIFO order. Re-entrant commits from the
    /// queue see `draining` set and leave the loop to the outermost call,
    /// so follow-up operations queued by listeners mid-drain still run,
    /// strictly after the ones already queued.
    fn drain_deferred(&mut self) {
        if self.draining {
            return;
        }
        self.draining = true;
        loop {
            let op = self.deferred.borrow_mut().pop_front();
            let Some(op) = op else { break };
            tracing::trace!(
                message = "chipbox.deferred_apply",
                pending = self.deferred.borrow().len()
            );
            self.apply_deferred(op);
        }
        self.draining = false;
    }

    fn apply_deferred(&mut self, op: DeferredOp<T>) {
        match op {
            DeferredOp::SetValue(values) => {
                self.set_value(values);
            }
            DeferredOp::Add(item) => {
                self.add(item);
            }
            DeferredOp::Remove(item) => {
                self.remove(&item);
            }
            DeferredOp::Clear => {
                self.clear();
            }
            DeferredOp::SetItems(items) => self.set_items(items),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for ChipBox<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChipBox")
            .field("items", &self.pool.len())
            .field("value", &self.selection.values())
            .field("chips", &self.chips.len())
            .field("flags", &self.flags)
            .finish()
    }
}

// ───────────────────────────────────────────────────────────────────────────
// Capability trait impls
// ───────────────────────────────────────────────────────────────────────────

impl<T: Clone + PartialEq> ValueHolder for ChipBox<T> {
    type Item = T;

    fn value(&self) -> &[T] {
        self.selection.values()
    }

    fn set_value_opt(&mut self, value: Option<Vec<T>>) -> bool {
        ChipBox::set_value_opt(self, value)
    }

    fn clear(&mut self) -> bool {
        ChipBox::clear(self)
    }

    fn set_read_only(&mut self, read_only: bool) {
        ChipBox::set_read_only(self, read_only);
    }

    fn is_read_only(&self) -> bool {
        ChipBox::is_read_only(self)
    }

    fn set_required_indicator_visible(&mut self, visible: bool) {
        ChipBox::set_required_indicator_visible(self, visible);
    }

    fn is_required_indicator_visible(&self) -> bool {
        ChipBox::is_required_indicator_visible(self)
    }
}

impl<T: Clone + PartialEq> ValidityReporting for ChipBox<T> {
    fn set_invalid(&mut self, invalid: bool) {
        ChipBox::set_invalid(self, invalid);
    }

    fn is_invalid(&self) -> bool {
        ChipBox::is_invalid(self)
    }

    fn set_error_message(&mut self, message: Option<String>) {
        ChipBox::set_error_message(self, message);
    }

    fn error_message(&self) -> Option<&str> {
        ChipBox::error_message(self)
    }
}

impl<T: Clone + PartialEq> Sizeable for ChipBox<T> {
    fn set_full_width(&mut self, full_width: bool) {
        ChipBox::set_full_width(self, full_width);
    }

    fn is_full_width(&self) -> bool {
        ChipBox::is_full_width(self)
    }
}

impl<T: Clone + PartialEq> HasItems<T> for ChipBox<T> {
    fn set_items(&mut self, items: Vec<T>) {
        self.replace_pool(items);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
