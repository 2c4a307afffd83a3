//! Error types for the trigger layer.

use thiserror::Error;

/// Errors that can occur while producing or dispatching triggers.
#[derive(Error, Debug)]
pub enum Error {
    /// File system watching error.
    #[error("file watching error: {0}")]
    Watch(String),

    /// Trigger channel error.
    #[error("channel error: {0}")]
    Channel(String),

    /// Controller is already running.
    #[error("trigger controller is already running")]
    AlreadyRunning,

    /// Controller is not running.
    #[error("trigger controller is not running")]
    NotRunning,

    /// Error from the snapshot layer.
    #[error(transparent)]
    Core(#[from] treesnap_core::Error),
}

/// Result type for trigger operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Convert notify errors to our error type.
impl From<notify::Error> for Error {
    fn from(err: notify::Error) -> Self {
        Error::Watch(err.to_string())
    }
}
