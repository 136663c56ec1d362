//! Error types for deck resolution and asset packaging

use thiserror::Error;

/// Unified error type for deck and session operations
#[derive(Debug, Error)]
pub enum DeckError {
    /// Share link has neither an embedded link nor a `deck` parameter
    #[error("Malformed share link: {0}")]
    MalformedLink(String),
    /// Share link nests more embedded links than allowed
    #[error("Share link nested deeper than {depth} levels")]
    LinkTooDeep { depth: usize },
    /// Recipe API answered with a non-success status
    #[error("Upstream recipe fetch failed: HTTP {0}")]
    UpstreamFetch(reqwest::StatusCode),
    /// HTTP error status code on a non-recipe request
    #[error("HTTP error: {0}")]
    HttpStatus(reqwest::StatusCode),
    /// HTTP request failed (network error, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Failed to parse JSON response
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// No directory exists for the session
    #[error("Session not found: {0}")]
    SessionNotFound(String),
    /// Session ID cannot be used as a directory name
    #[error("Invalid session id: {0:?}")]
    InvalidSessionId(String),
    /// Set or file name in a request cannot be used as a path component
    #[error("Invalid path component: {0:?}")]
    InvalidPath(String),
    /// No stored image at the requested session path
    #[error("Image not found: {0}")]
    ImageNotFound(String),
    /// File I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Image encoding error while writing session files
    #[error("Image error: {0}")]
    Image(String),
    /// Zip archive could not be written
    #[error("Archive error: {0}")]
    Archive(String),
}

/// Result alias for deck and session operations
pub type Result<T> = std::result::Result<T, DeckError>;
