use thiserror::Error;

/// Errors produced while handling JSON Pointer strings.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PointerError {
    #[error("pointer must be empty or start with '/': {0:?}")]
    MissingLeadingSlash(String),

    #[error("invalid escape sequence in pointer segment {0:?}")]
    InvalidEscape(String),
}
