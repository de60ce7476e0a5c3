//! Model validation errors.

use thiserror::Error;

/// Result type for model construction.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while building model values from caller input.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("Invalid trim range: {0}")]
    InvalidTrim(String),
}

impl ModelError {
    pub fn invalid_trim(msg: impl Into<String>) -> Self {
        Self::InvalidTrim(msg.into())
    }
}
