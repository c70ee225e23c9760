use thiserror::Error;

use crate::api::ApiError;
use crate::ops::outline_ops::OutlineError;

/// Common result type for homily operations
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level error type surfaced by the loader and the CLI
#[derive(Debug, Error)]
pub enum Error {
    /// API request failed (wraps the client's typed error)
    #[error("api error: {0}")]
    Api(#[from] ApiError),

    /// Outline operation failed
    #[error(transparent)]
    Outline(#[from] OutlineError),

    /// I/O failure (config read/write)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration parse or validation error
    #[error("config error: {0}")]
    Config(String),

    /// Requested entity does not exist
    #[error("not found: {0}")]
    NotFound(String),
}
