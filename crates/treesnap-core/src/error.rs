//! Error types for snapshot generation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while generating a tree snapshot.
#[derive(Error, Debug)]
pub enum Error {
    /// No usable workspace root.
    #[error("no workspace is open at '{}'", path.display())]
    NoWorkspace {
        /// Path that was expected to be the workspace root.
        path: PathBuf,
    },

    /// The git executable could not be invoked.
    #[error("git is not available: {detail}")]
    ToolUnavailable {
        /// Probe failure text.
        detail: String,
    },

    /// The workspace root is not inside a git repository.
    #[error("'{}' is not a git repository", path.display())]
    NotARepository {
        /// Workspace root that failed the repository probe.
        path: PathBuf,
    },

    /// Snapshot generation failed; wraps the captured error text.
    #[error("failed to generate tree snapshot: {detail}")]
    GenerationFailed {
        /// Captured stderr or filter-compilation error.
        detail: String,
    },

    /// A revision read failed. Transient: callers log it and keep polling.
    #[error("failed to read current revision: {detail}")]
    RevisionRead {
        /// Captured error text from the revision probe.
        detail: String,
    },

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// IO error during file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for snapshot operations.
pub type Result<T> = std::result::Result<T, Error>;
