//! Error types for the image browser

use thiserror::Error;

use crate::sort::SortMode;

/// Result type alias using BrowserError
pub type Result<T> = std::result::Result<T, BrowserError>;

/// Errors surfaced by browser operations
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Sort mode string outside the closed set
    #[error("Unknown sort mode '{0}', expected one of: {expected}", expected = SortMode::wire_names().join(", "))]
    UnknownSortMode(String),

    /// Backend request failed (transport or server-side rejection)
    #[error("Backend request failed: {0}")]
    Backend(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Image server failure
///
/// Every rejection maps to `NotFound`; no filesystem detail reaches the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ServeError {
    #[error("Not found")]
    NotFound,
}
