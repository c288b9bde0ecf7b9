#![forbid(unsafe_code)]

//! Error type for field operations.
//!
//! Almost every mutation on the field is total. The one representable
//! failure is handing the candidate pool "no collection at all"; an empty
//! pool is expressed with an empty collection instead.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, FieldError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FieldError {
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl FieldError {
    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}
