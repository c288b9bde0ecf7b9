#![forbid(unsafe_code)]

//! Picker presentation model.
//!
//! The dropdown UI itself is an external collaborator; this struct is the
//! state the field pushes into it after every commit: the options still on
//! offer, the captions around them, and mirrors of the field-level
//! read-only, required, and validity flags. All setters are crate-private
//! so mutation flows through the owning field, never around it.

/// State offered to the dropdown collaborator.
#[derive(Debug, Clone)]
pub struct Picker<T> {
    label: Option<String>,
    placeholder: Option<String>,
    options: Vec<T>,
    read_only: bool,
    required: bool,
    invalid: bool,
    error_message: Option<String>,
    full_width: bool,
}

impl<T> Picker<T> {
    pub(crate) fn new() -> Self {
        Self {
            label: None,
            placeholder: None,
            options: Vec::new(),
            read_only: false,
            required: false,
            invalid: false,
            error_message: None,
            full_width: true,
        }
    }

    /// Caption above the field, if configured.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// Hint shown while nothing is picked, if configured.
    #[must_use]
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Options on offer: the candidate pool minus the current selection,
    /// in pool order, as of the last commit.
    #[must_use]
    pub fn options(&self) -> &[T] {
        &self.options
    }

    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    #[must_use]
    pub const fn is_required(&self) -> bool {
        self.required
    }

    #[must_use]
    pub const fn is_invalid(&self) -> bool {
        self.invalid
    }

    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    #[must_use]
    pub const fn is_full_width(&self) -> bool {
        self.full_width
    }

    pub(crate) fn set_label(&mut self, label: Option<String>) {
        self.label = label;
    }

    pub(crate) fn set_placeholder(&mut self, placeholder: Option<String>) {
        self.placeholder = placeholder;
    }

    pub(crate) fn offer(&mut self, options: Vec<T>) {
        self.options = options;
    }

    pub(crate) fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    pub(crate) fn set_required(&mut self, required: bool) {
        self.required = required;
    }

    pub(crate) fn set_invalid(&mut self, invalid: bool) {
        self.invalid = invalid;
    }

    pub(crate) fn set_error_message(&mut self, message: Option<String>) {
        self.error_message = message;
    }

    pub(crate) fn set_full_width(&mut self, full_width: bool) {
        self.full_width = full_width;
    }
}

impl<T> Default for Picker<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let picker: Picker<i32> = Picker::new();
        assert_eq!(picker.label(), None);
        assert_eq!(picker.placeholder(), None);
        assert!(picker.options().is_empty());
        assert!(!picker.is_read_only());
        assert!(!picker.is_required());
        assert!(!picker.is_invalid());
        assert_eq!(picker.error_message(), None);
        assert!(picker.is_full_width());
    }

    #[test]
    fn offer_replaces_options() {
        let mut picker = Picker::new();
        picker.offer(vec![1, 2, 3]);
        assert_eq!(picker.options(), [1, 2, 3]);

        picker.offer(vec![4]);
        assert_eq!(picker.options(), [4]);
    }
}
