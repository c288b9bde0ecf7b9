#![forbid(unsafe_code)]

//! Change events and listener plumbing for the field.
//!
//! # Design
//!
//! A committed mutation produces exactly one [`ValueChange`]: the value
//! before the mutation, the value after it, and whether a user gesture or
//! program code drove it. Listeners are stored as `Weak` callbacks in a
//! [`CallbackList`] and kept alive by the RAII [`Subscription`] guard the
//! caller holds. Dropping the guard unsubscribes.
//!
//! The list never invokes callbacks itself. The owning field snapshots the
//! slots, calls each live one with `&self` plus the event, then prunes dead
//! slots. Keeping dispatch in the owner lets the callback signature borrow
//! the owner immutably, which rules out re-entrant mutation at compile time.
//!
//! # Invariants
//!
//! 1. Callbacks fire in registration order.
//! 2. Dropping a [`Subscription`] removes the callback before the next
//!    notification cycle.
//! 3. A `ValueChange` is only constructed for a real change; equal old and
//!    new values never reach listeners.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

// ---------------------------------------------------------------------------
// Change origin
// ---------------------------------------------------------------------------

/// Who drove a committed mutation.
///
/// User gestures (picking an option, deleting a chip, pressing clear-all)
/// report [`ChangeOrigin::User`]; every API-driven mutation, including pool
/// replacement filtering the value, reports [`ChangeOrigin::Programmatic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeOrigin {
    User,
    Programmatic,
}

impl ChangeOrigin {
    #[must_use]
    pub const fn is_user(self) -> bool {
        matches!(self, Self::User)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Programmatic => "programmatic",
        }
    }
}

// ---------------------------------------------------------------------------
// Value change event
// ---------------------------------------------------------------------------

/// Snapshot of one committed value mutation.
///
/// `previous_value` and `value` are the full selections before and after the
/// commit, in selection order. Both are duplicate-free.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueChange<T> {
    previous: Vec<T>,
    current: Vec<T>,
    origin: ChangeOrigin,
}

impl<T> ValueChange<T> {
    #[must_use]
    pub fn new(previous: Vec<T>, current: Vec<T>, origin: ChangeOrigin) -> Self {
        Self {
            previous,
            current,
            origin,
        }
    }

    /// The selection as it was before the mutation committed.
    #[must_use]
    pub fn previous_value(&self) -> &[T] {
        &self.previous
    }

    /// The selection after the mutation committed.
    #[must_use]
    pub fn value(&self) -> &[T] {
        &self.current
    }

    #[must_use]
    pub fn origin(&self) -> ChangeOrigin {
        self.origin
    }

    /// True when a user gesture drove the mutation.
    #[must_use]
    pub fn is_from_user(&self) -> bool {
        self.origin.is_user()
    }
}

impl<T: PartialEq> ValueChange<T> {
    /// Items present after the commit but not before, in selection order.
    #[must_use]
    pub fn added(&self) -> Vec<&T> {
        self.current
            .iter()
            .filter(|item| !self.previous.contains(item))
            .collect()
    }

    /// Items present before the commit but not after, in prior order.
    #[must_use]
    pub fn removed(&self) -> Vec<&T> {
        self.previous
            .iter()
            .filter(|item| !self.current.contains(item))
            .collect()
    }
}

// ---------------------------------------------------------------------------
// Callback list
// ---------------------------------------------------------------------------

/// Ordered list of weakly-held callbacks.
///
/// `F` is usually an unsized `dyn FnMut(..)` type. The list stores `Weak`
/// references only; each strong reference lives in the [`Subscription`]
/// returned from [`subscribe`](CallbackList::subscribe). Dead slots are
/// skipped during dispatch and reclaimed by [`prune`](CallbackList::prune).
pub struct CallbackList<F: ?Sized> {
    slots: Vec<Weak<RefCell<F>>>,
}

impl<F: ?Sized> CallbackList<F> {
    #[must_use]
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Register a callback. The returned guard keeps it alive; dropping the
    /// guard unsubscribes.
    pub fn subscribe(&mut self, callback: Rc<RefCell<F>>) -> Subscription<F> {
        self.slots.push(Rc::downgrade(&callback));
        tracing::trace!(message = "callbacks.subscribe", live = self.live_count());
        Subscription {
            _callback: callback,
        }
    }

    /// Clone the slot list for dispatch. Callbacks registered or dropped
    /// during dispatch do not affect an already-taken snapshot, except that
    /// a dropped callback upgrades to `None` and is skipped.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Weak<RefCell<F>>> {
        self.slots.clone()
    }

    /// Drop slots whose subscription guard is gone.
    pub fn prune(&mut self) {
        self.slots.retain(|slot| slot.strong_count() > 0);
    }

    /// Number of live callbacks.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| slot.strong_count() > 0)
            .count()
    }
}

impl<F: ?Sized> Default for CallbackList<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: ?Sized> fmt::Debug for CallbackList<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackList")
            .field("slots", &self.slots.len())
            .field("live", &self.live_count())
            .finish()
    }
}

/// RAII guard for a registered callback. Dropping it unsubscribes before
/// the next notification cycle.
pub struct Subscription<F: ?Sized> {
    _callback: Rc<RefCell<F>>,
}

impl<F: ?Sized> fmt::Debug for Subscription<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
