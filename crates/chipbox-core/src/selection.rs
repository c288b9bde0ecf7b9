#![forbid(unsafe_code)]

//! Selection: the committed value of the field.
//!
//! # Design
//!
//! A thin ordered wrapper around the selected items. All filtering happens
//! upstream in [`CandidatePool`](crate::pool::CandidatePool); by the time a
//! collection reaches [`replace_with`](Selection::replace_with) it is
//! duplicate-free and pool-approved. Selection order is insertion order and
//! is presentation-relevant (chips render in it), but it does not take part
//! in change detection: two selections holding the same items in different
//! orders are the same value.
//!
//! # Invariants
//!
//! 1. Values are unique by equality.
//! 2. Order reflects the order items were committed, never re-sorted.

/// Ordered, duplicate-free selected items.
#[derive(Debug, Clone)]
pub struct Selection<T> {
    values: Vec<T>,
}

impl<T> Selection<T> {
    #[must_use]
    pub fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Selected items in selection order.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Adopt a pre-filtered collection as the new selection.
    ///
    /// The caller guarantees uniqueness; this type never re-checks it.
    pub fn replace_with(&mut self, values: Vec<T>) {
        self.values = values;
    }
}

impl<T: PartialEq> Selection<T> {
    #[must_use]
    pub fn contains(&self, value: &T) -> bool {
        self.values.contains(value)
    }

    /// Order-insensitive equality against another duplicate-free collection.
    ///
    /// With both sides unique, equal length plus full containment is set
    /// equality.
    #[must_use]
    pub fn same_values(&self, other: &[T]) -> bool {
        self.values.len() == other.len() && self.values.iter().all(|value| other.contains(value))
    }
}

impl<T: Clone> Selection<T> {
    /// Owned copy of the current values, used for event snapshots.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.values.clone()
    }
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
