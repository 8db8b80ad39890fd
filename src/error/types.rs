//! Error types
//!
//! Failures on the primary root are returned to callers as `StoreError`.
//! Failures on the mirror root are absorbed and only logged.

use std::io;
use thiserror::Error;

/// Errors surfaced by settings and import operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Neither serial nor checksum is known; raised before any I/O.
    #[error("Entity identifier unknown")]
    IdentifierUnknown,

    #[error("Source unreadable: {0}")]
    SourceUnreadable(String),

    /// Mirror grant token is recorded but no longer usable
    #[error("Mirror grant invalid: {0}")]
    GrantInvalid(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Image decode failed: {0}")]
    DecodeFailed(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
