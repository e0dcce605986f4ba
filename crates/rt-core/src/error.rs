//! Shared error type.
//!
//! Sub-crates define their own error enums; `RtError` covers what the core
//! types themselves can reject.

use thiserror::Error;

/// The error type for `rt-core`.
#[derive(Debug, Error)]
pub enum RtError {
    #[error("parse error: {0}")]
    Parse(String),
}

/// Shorthand result type for `rt-core`.
pub type RtResult<T> = Result<T, RtError>;
