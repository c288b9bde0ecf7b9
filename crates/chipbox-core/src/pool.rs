#![forbid(unsafe_code)]

//! Candidate pool: the ordered collection of items offered for selection.
//!
//! # Design
//!
//! The pool is the single authority on which items exist. Every proposed
//! value is filtered against it before it can become the selection, so the
//! selected-items invariant is enforced at one choke point rather than in
//! each mutation path.
//!
//! Membership is decided by `PartialEq` with a linear scan. Pools hold
//! option lists for a picker, so item counts stay UI-sized and no hashing
//! bound is imposed on `T`.
//!
//! # Invariants
//!
//! 1. Items are unique by equality; on replacement the first occurrence of
//!    a duplicate wins.
//! 2. Insertion order is preserved across replacement and never re-sorted.
//! 3. Pure data layer: no I/O and no presentation state lives here.

/// Ordered, duplicate-free collection of selectable items.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePool<T> {
    items: Vec<T>,
}

impl<T> CandidatePool<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// All items in pool order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }
}

impl<T: PartialEq> CandidatePool<T> {
    /// Replace the pool contents, deduplicating by equality. The first
    /// occurrence of each item wins and input order is kept.
    pub fn replace(&mut self, items: Vec<T>) {
        let proposed = items.len();
        let mut next: Vec<T> = Vec::with_capacity(items.len());
        for item in items {
            if !next.contains(&item) {
                next.push(item);
            }
        }
        tracing::debug!(
            message = "pool.replace",
            proposed,
            kept = next.len(),
            dropped = proposed - next.len()
        );
        self.items = next;
    }

    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }

    /// The pool's own instance equal to `item`, if any.
    ///
    /// Useful when `PartialEq` compares a key but instances carry display
    /// data that differs: the pool's instance is the fresh one.
    #[must_use]
    pub fn canonical(&self, item: &T) -> Option<&T> {
        self.items.iter().find(|candidate| *candidate == item)
    }
}

impl<T: Clone + PartialEq> CandidatePool<T> {
    /// Items not present in `taken`, cloned in pool order.
    ///
    /// This is the availability computation: pool minus selection. It is
    /// derived on demand and never stored.
    #[must_use]
    pub fn excluding(&self, taken: &[T]) -> Vec<T> {
        self.items
            .iter()
            .filter(|item| !taken.contains(item))
            .cloned()
            .collect()
    }

    /// Filter a proposed selection down to pool members, deduplicating by
    /// equality while keeping the proposal's order.
    ///
    /// Unknown items are dropped silently. Callers that must reject unknown
    /// items check membership first.
    #[must_use]
    pub fn sanitize(&self, proposed: Vec<T>) -> Vec<T> {
        let offered = proposed.len();
        let mut next: Vec<T> = Vec::with_capacity(proposed.len());
        for item in proposed {
            if self.contains(&item) && !next.contains(&item) {
                next.push(item);
            }
        }
        if next.len() < offered {
            tracing::debug!(
                message = "pool.sanitize",
                offered,
                kept = next.len(),
                dropped = offered - next.len()
            );
        }
        next
    }
}

impl<T> Default for CandidatePool<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
