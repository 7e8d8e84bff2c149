//! Error types for the render pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while rendering a document
#[derive(Error, Debug)]
pub enum Error {
    /// Failed to launch the browser
    #[error("Browser launch failed: {0}")]
    Launch(String),

    /// Failed to navigate to the target document
    #[error("Navigation failed: {0}")]
    Navigation(String),

    /// Failed to evaluate JavaScript in the page
    #[error("Script execution failed: {0}")]
    Script(String),

    /// Failed to produce the PDF
    #[error("Rendering failed: {0}")]
    Render(String),

    /// Operation timed out
    #[error("Operation timed out after {0}ms")]
    Timeout(u64),

    /// The request is missing or contradicts required fields
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Failed to upload the document to object storage
    #[error("Upload failed: {0}")]
    Upload(String),

    /// The document is too large to return inline
    #[error("Document of {size} bytes exceeds the inline limit of {limit} bytes; use the persisted path")]
    InlineTooLarge { size: usize, limit: usize },

    /// Local filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The browser worker went away before replying
    #[error("Browser worker failed: {0}")]
    Worker(String),
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Render(err.to_string())
    }
}
