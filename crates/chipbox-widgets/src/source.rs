#![forbid(unsafe_code)]

//! Item sources: shared upstream collections feeding a field's pool.
//!
//! # Design
//!
//! An [`ItemSource`] is a cloneable handle to a collection that can change
//! behind the field's back. [`bind_items`] seeds the host from the source,
//! then subscribes so every source change re-runs `set_items` on the host.
//! The binding holds the host weakly; a dropped host turns notifications
//! into no-ops instead of keeping it alive.
//!
//! [`ListSource`] is the in-memory implementation: a master list plus an
//! optional predicate filter. `fetch` returns the filtered view, so
//! narrowing the filter shrinks the pool, which in turn drops newly
//! missing items from the field's value through the usual event path.
//!
//! # Failure Modes
//!
//! - **Source mutated from a bound host's listener**: the notification
//!   re-enters the host's `RefCell` while the listener still borrows it,
//!   which panics. React through the field's deferred queue instead.
//! - **Listener panic**: propagates to whoever mutated the source; the
//!   master list is already updated at that point.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use chipbox_core::event::{CallbackList, Subscription};
use chipbox_core::field::HasItems;

/// Callback run when a source's visible items change.
pub type SourceListener = dyn FnMut();

pub type SourceSubscription = Subscription<SourceListener>;

/// Cloneable handle to an upstream item collection.
pub trait ItemSource<T>: Clone {
    /// Current visible items, in source order.
    fn fetch(&self) -> Vec<T>;

    /// Register for change notification. Dropping the guard unsubscribes.
    fn subscribe(&self, listener: impl FnMut() + 'static) -> SourceSubscription;
}

struct ListInner<T> {
    items: Vec<T>,
    filter: Option<Box<dyn Fn(&T) -> bool>>,
    listeners: CallbackList<SourceListener>,
}

/// In-memory item source with an optional predicate filter.
///
/// Clones share the same list, filter, and listeners.
pub struct ListSource<T> {
    inner: Rc<RefCell<ListInner<T>>>,
}

impl<T: Clone> ListSource<T> {
    #[must_use]
    pub fn of(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ListInner {
                items: items.into_iter().collect(),
                filter: None,
                listeners: CallbackList::new(),
            })),
        }
    }

    /// Replace the master list and notify.
    pub fn set_items(&self, items: impl IntoIterator<Item = T>) {
        self.inner.borrow_mut().items = items.into_iter().collect();
        self.notify();
    }

    /// Install a predicate deciding which items `fetch` returns, and
    /// notify.
    pub fn set_filter(&self, filter: impl Fn(&T) -> bool + 'static) {
        self.inner.borrow_mut().filter = Some(Box::new(filter));
        self.notify();
    }

    /// Remove the filter. Notifies only when one was installed.
    pub fn clear_filter(&self) {
        let had_filter = self.inner.borrow_mut().filter.take().is_some();
        if had_filter {
            self.notify();
        }
    }

    /// Master list length, ignoring the filter.
    #[must_use]
    pub fn master_len(&self) -> usize {
        self.inner.borrow().items.len()
    }

    fn notify(&self) {
        // Snapshot first: a listener is allowed to read the source, so the
        // inner borrow must not be held across the calls.
        let slots = self.inner.borrow().listeners.snapshot();
        tracing::trace!(message = "source.notify", listeners = slots.len());
        for slot in slots {
            if let Some(listener) = slot.upgrade() {
                (&mut *listener.borrow_mut())();
            }
        }
        self.inner.borrow_mut().listeners.prune();
    }
}

impl<T: Clone> ItemSource<T> for ListSource<T> {
    fn fetch(&self) -> Vec<T> {
        let inner = self.inner.borrow();
        match &inner.filter {
            Some(filter) => inner
                .items
                .iter()
                .filter(|item| filter(item))
                .cloned()
                .collect(),
            None => inner.items.clone(),
        }
    }

    fn subscribe(&self, listener: impl FnMut() + 'static) -> SourceSubscription {
        let callback: Rc<RefCell<SourceListener>> = Rc::new(RefCell::new(listener));
        self.inner.borrow_mut().listeners.subscribe(callback)
    }
}

impl<T> Clone for ListSource<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for ListSource<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListSource")
            .field("items", &self.inner.borrow().items.len())
            .field("filtered", &self.inner.borrow().filter.is_some())
            .finish()
    }
}

/// Keeps a host's pool synchronized with a source. Dropping it detaches.
pub struct ItemsBinding {
    _subscription: SourceSubscription,
}

impl fmt::Debug for ItemsBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ItemsBinding").finish()
    }
}

/// Seed `host` from `source` and keep it fed on every source change.
///
/// The host is held weakly; once the last strong reference outside the
/// binding is gone, notifications become no-ops.
pub fn bind_items<T, H, S>(host: &Rc<RefCell<H>>, source: &S) -> ItemsBinding
where
    H: HasItems<T> + 'static,
    S: ItemSource<T> + 'static,
{
    host.borrow_mut().set_items(source.fetch());

    let weak_host = Rc::downgrade(host);
    let upstream = source.clone();
    let subscription = source.subscribe(move || {
        if let Some(host) = weak_host.upgrade() {
            host.borrow_mut().set_items(upstream.fetch());
        }
    });

    ItemsBinding {
        _subscription: subscription,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
