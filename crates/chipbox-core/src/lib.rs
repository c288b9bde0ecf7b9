#![forbid(unsafe_code)]

//! Core: value model, change events, and binding seams for the chipbox
//! multi-select field.

pub mod error;
pub mod event;
pub mod field;
pub mod pool;
pub mod selection;

pub use error::{FieldError, Result};
pub use event::{CallbackList, ChangeOrigin, Subscription, ValueChange};
pub use field::{HasItems, Sizeable, ValidityReporting, ValueHolder};
pub use pool::CandidatePool;
pub use selection::Selection;
