#![forbid(unsafe_code)]

//! Chip widget: one removable entry in the selected-items strip.
//!
//! A chip pairs an item with its rendered label and a delete affordance.
//! Identity lives in the [`ChipId`], minted once at construction and stable
//! for the chip's whole life; reconciliation moves chips instead of
//! recreating them, so the id (and spawn time) survive every selection
//! mutation that keeps the item selected.

use std::sync::atomic::{AtomicU64, Ordering};

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;
use web_time::Instant;

/// Monotonic id source. Ids are process-global so two fields never share one.
static NEXT_CHIP_ID: AtomicU64 = AtomicU64::new(1);

fn next_chip_id() -> ChipId {
    ChipId(NEXT_CHIP_ID.fetch_add(1, Ordering::Relaxed))
}

/// Total number of chips constructed by this process.
#[must_use]
pub fn chips_created_total() -> u64 {
    NEXT_CHIP_ID.load(Ordering::Relaxed) - 1
}

/// Stable identity of a chip, distinct from the equality of its item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChipId(u64);

impl ChipId {
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// One selected item rendered as a removable chip.
#[derive(Debug, Clone)]
pub struct Chip<T> {
    id: ChipId,
    item: T,
    label: String,
    close_marker: String,
    delete_enabled: bool,
    spawned_at: Instant,
}

impl<T> Chip<T> {
    /// Create a chip for an item. The label starts empty; the owning field
    /// stamps it from the current label generator right after construction.
    #[must_use]
    pub fn new(item: T) -> Self {
        Self {
            id: next_chip_id(),
            item,
            label: String::new(),
            close_marker: " x".to_string(),
            delete_enabled: true,
            spawned_at: Instant::now(),
        }
    }

    /// Set the delete affordance text appended after the label.
    #[must_use]
    pub fn with_close_marker(mut self, marker: impl Into<String>) -> Self {
        self.close_marker = marker.into();
        self
    }

    #[must_use]
    pub const fn id(&self) -> ChipId {
        self.id
    }

    #[must_use]
    pub const fn item(&self) -> &T {
        &self.item
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn close_marker(&self) -> &str {
        &self.close_marker
    }

    /// Whether the delete affordance responds. Cleared while the owning
    /// field is read-only; the marker still renders.
    #[must_use]
    pub const fn is_delete_enabled(&self) -> bool {
        self.delete_enabled
    }

    #[must_use]
    pub const fn spawned_at(&self) -> Instant {
        self.spawned_at
    }

    /// Text the chip occupies in the strip: label plus close marker.
    #[must_use]
    pub fn display_text(&self) -> String {
        let mut out = String::with_capacity(self.label.len() + self.close_marker.len());
        out.push_str(&self.label);
        out.push_str(&self.close_marker);
        out
    }

    /// Terminal cell width of [`display_text`](Chip::display_text), summed
    /// per grapheme cluster so wide glyphs count double.
    #[must_use]
    pub fn display_width(&self) -> usize {
        self.label
            .graphemes(true)
            .chain(self.close_marker.graphemes(true))
            .map(UnicodeWidthStr::width)
            .sum()
    }

    /// Label cut to `max_width` cells on a grapheme boundary, with a
    /// trailing ellipsis when anything was cut.
    #[must_use]
    pub fn truncated_label(&self, max_width: usize) -> String {
        let full: usize = self
            .label
            .graphemes(true)
            .map(UnicodeWidthStr::width)
            .sum();
        if full <= max_width {
            return self.label.clone();
        }
        if max_width == 0 {
            return String::new();
        }
        let mut out = String::new();
        let mut used = 0;
        for grapheme in self.label.graphemes(true) {
            let width = UnicodeWidthStr::width(grapheme);
            // Reserve one cell for the ellipsis.
            if used + width + 1 > max_width {
                break;
            }
            out.push_str(grapheme);
            used += width;
        }
        out.push('…');
        out
    }

    pub(crate) fn set_label(&mut self, label: String) {
        self.label = label;
    }

    pub(crate) fn set_delete_enabled(&mut self, enabled: bool) {
        self.delete_enabled = enabled;
    }

    pub(crate) fn set_item(&mut self, item: T) {
        self.item = item;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = Chip::new("a");
        let b = Chip::new("b");
        assert_ne!(a.id(), b.id());
        assert_ne!(a.id().raw(), b.id().raw());
    }

    #[test]
    fn created_total_is_monotonic() {
        let before = chips_created_total();
        let _one = Chip::new(1);
        let _two = Chip::new(2);
        assert!(chips_created_total() >= before + 2);
    }

    #[test]
    fn display_text_appends_marker() {
        let mut chip = Chip::new("rust");
        chip.set_label("rust".to_string());
        assert_eq!(chip.display_text(), "rust x");

        let mut chip = Chip::new("rust").with_close_marker(" [x]");
        chip.set_label("rust".to_string());
        assert_eq!(chip.display_text(), "rust [x]");
    }

    #[test]
    fn display_width_counts_wide_glyphs() {
        let mut chip = Chip::new(1).with_close_marker(" x");
        chip.set_label("你好".to_string());
        // Two wide glyphs (4 cells) plus " x" (2 cells).
        assert_eq!(chip.display_width(), 6);
    }

    #[test]
    fn truncated_label_fits_untouched() {
        let mut chip = Chip::new(1);
        chip.set_label("short".to_string());
        assert_eq!(chip.truncated_label(5), "short");
        assert_eq!(chip.truncated_label(10), "short");
    }

    #[test]
    fn truncated_label_reserves_ellipsis_cell() {
        let mut chip = Chip::new(1);
        chip.set_label("abcdef".to_string());
        assert_eq!(chip.truncated_label(4), "abc…");
        assert_eq!(chip.truncated_label(1), "…");
        assert_eq!(chip.truncated_label(0), "");
    }

    #[test]
    fn truncated_label_breaks_on_grapheme_boundary() {
        let mut chip = Chip::new(1);
        chip.set_label("你好世界".to_string());
        // Budget 5: two wide glyphs (4 cells) fit beside the ellipsis; a
        // third would need 7.
        assert_eq!(chip.truncated_label(5), "你好…");
    }

    #[test]
    fn delete_enabled_defaults_on() {
        let chip = Chip::new(1);
        assert!(chip.is_delete_enabled());
    }
}
