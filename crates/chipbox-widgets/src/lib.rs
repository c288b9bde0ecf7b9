#![forbid(unsafe_code)]

//! Chip multi-select field for terminal UIs.
//!
//! [`ChipBox`] pairs a dropdown picker with a strip of removable chips.
//! Options live in a candidate pool; picking one moves it into a chip and
//! out of the picker, deleting the chip moves it back. Every mutation,
//! user or programmatic, commits through one path that reconciles the
//! chips, refreshes the picker, and fires a single [`ValueChange`].

pub mod chip;
pub mod field;
pub mod picker;
pub mod registry;
pub mod source;

pub use chip::{Chip, ChipId, chips_created_total};
pub use field::{ChipBox, ChipFactory, Deferred, LabelGenerator, ValueListener};
pub use picker::Picker;
pub use registry::{ChipRegistry, ReconcileStats};
pub use source::{
    ItemSource, ItemsBinding, ListSource, SourceListener, SourceSubscription, bind_items,
};

pub use chipbox_core::error::{FieldError, Result};
pub use chipbox_core::event::{CallbackList, ChangeOrigin, Subscription, ValueChange};
pub use chipbox_core::field::{HasItems, Sizeable, ValidityReporting, ValueHolder};
pub use chipbox_core::pool::CandidatePool;
pub use chipbox_core::selection::Selection;
