//! Error types for the advocate directory
//!
//! Everything that can go wrong between the advocate source and the screen.

use thiserror::Error;

/// Main error type for directory operations
#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Advocate source at '{url}' answered with status {status}")]
    Status { status: u16, url: String },

    #[error("Malformed advocate payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Fetching advocates failed: {0}")]
    FetchFailed(String),

    #[error("Loader stopped before reporting a result")]
    LoaderDisconnected,
}

/// Result type alias for directory operations
pub type Result<T> = std::result::Result<T, DirectoryError>;

impl DirectoryError {
    /// Short reason suitable for a one-line status display
    pub fn reason(&self) -> String {
        match self {
            DirectoryError::Http(e) if e.is_timeout() => "request timed out".to_string(),
            DirectoryError::Http(e) if e.is_connect() => "could not connect to advocate source".to_string(),
            other => other.to_string(),
        }
    }
}
