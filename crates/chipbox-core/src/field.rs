#![forbid(unsafe_code)]

//! Capability traits for form-bound fields.
//!
//! # Design
//!
//! Form and binder code should not care which concrete widget backs a
//! field. These traits split the field surface into independent
//! capabilities: holding a collection value, reporting validation state,
//! stretching to the container width, and accepting an item pool. A widget
//! implements the subset it supports; binder helpers take `impl` bounds on
//! exactly the capabilities they touch.
//!
//! Change-listener registration stays on the concrete type because the
//! listener signature names it.

/// A field whose value is an ordered collection of items.
pub trait ValueHolder {
    type Item;

    /// Current value in selection order.
    fn value(&self) -> &[Self::Item];

    /// Replace the value. `None` clears, mirroring an "empty value" write.
    /// Returns true when the stored value actually changed.
    fn set_value_opt(&mut self, value: Option<Vec<Self::Item>>) -> bool;

    /// Clear the value. Returns true when it was non-empty.
    fn clear(&mut self) -> bool;

    fn is_empty_value(&self) -> bool {
        self.value().is_empty()
    }

    /// Read-only blocks user-driven mutation; programmatic writes still
    /// apply.
    fn set_read_only(&mut self, read_only: bool);
    fn is_read_only(&self) -> bool;

    fn set_required_indicator_visible(&mut self, visible: bool);
    fn is_required_indicator_visible(&self) -> bool;
}

/// Externally-driven validation state. The field renders what it is told
/// and never computes validity itself.
pub trait ValidityReporting {
    fn set_invalid(&mut self, invalid: bool);
    fn is_invalid(&self) -> bool;

    fn set_error_message(&mut self, message: Option<String>);
    fn error_message(&self) -> Option<&str>;
}

/// Width behavior inside a form layout.
pub trait Sizeable {
    fn set_full_width(&mut self, full_width: bool);
    fn is_full_width(&self) -> bool;
}

/// A component fed from an item collection.
pub trait HasItems<T> {
    fn set_items(&mut self, items: Vec<T>);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    struct StubField {
        value: Vec<u8>,
        read_only: bool,
        required: bool,
    }

    impl ValueHolder for StubField {
        type Item = u8;

        fn value(&self) -> &[u8] {
            &self.value
        }

        fn set_value_opt(&mut self, value: Option<Vec<u8>>) -> bool {
            let next = value.unwrap_or_default();
            if next == self.value {
                return false;
            }
            self.value = next;
            true
        }

        fn clear(&mut self) -> bool {
            self.set_value_opt(None)
        }

        fn set_read_only(&mut self, read_only: bool) {
            self.read_only = read_only;
        }

        fn is_read_only(&self) -> bool {
            self.read_only
        }

        fn set_required_indicator_visible(&mut self, visible: bool) {
            self.required = visible;
        }

        fn is_required_indicator_visible(&self) -> bool {
            self.required
        }
    }

    fn reset_field<F: ValueHolder>(field: &mut F) -> bool {
        field.clear()
    }

    #[test]
    fn default_is_empty_value_tracks_value() {
        let mut field = StubField {
            value: Vec::new(),
            read_only: false,
            required: false,
        };
        assert!(field.is_empty_value());

        field.set_value_opt(Some(vec![1, 2]));
        assert!(!field.is_empty_value());
    }

    #[test]
    fn generic_binder_code_compiles_against_the_seam() {
        let mut field = StubField {
            value: vec![9],
            read_only: false,
            required: false,
        };
        assert!(reset_field(&mut field));
        assert!(field.is_empty_value());
        assert!(!reset_field(&mut field));
    }
}
