//! Async client for the fixed set of git probes the snapshot needs.

use crate::error::{Error, Result};
use crate::exec::run_command;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Runs git subcommands with the workspace root as working directory.
///
/// Only the four invocations the snapshot contract needs are exposed;
/// each maps its failure to the corresponding error kind.
#[derive(Debug, Clone)]
pub struct GitClient {
    root: PathBuf,
}

impl GitClient {
    /// Create a client rooted at the given workspace directory.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Workspace root this client operates in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Probe that the git executable can be invoked at all.
    pub async fn version(&self) -> Result<String> {
        match run_command("git", &["--version"], &self.root).await {
            Ok(out) if out.success => Ok(out.stdout.trim().to_string()),
            Ok(out) => Err(Error::ToolUnavailable {
                detail: out.error_text(),
            }),
            Err(e) => Err(Error::ToolUnavailable {
                detail: e.to_string(),
            }),
        }
    }

    /// Probe that the workspace root is inside a git repository.
    pub async fn git_dir(&self) -> Result<String> {
        let out = run_command("git", &["rev-parse", "--git-dir"], &self.root).await?;
        if out.success {
            Ok(out.stdout.trim().to_string())
        } else {
            debug!(
                root = %self.root.display(),
                detail = %out.error_text(),
                "repository probe failed"
            );
            Err(Error::NotARepository {
                path: self.root.clone(),
            })
        }
    }

    /// Read the current revision identifier (`HEAD`), trimmed.
    ///
    /// Failures here are transient from the poller's point of view, so
    /// they map to [`Error::RevisionRead`] regardless of cause.
    pub async fn head_revision(&self) -> Result<String> {
        match run_command("git", &["rev-parse", "HEAD"], &self.root).await {
            Ok(out) if out.success => Ok(out.stdout.trim().to_string()),
            Ok(out) => Err(Error::RevisionRead {
                detail: out.error_text(),
            }),
            Err(e) => Err(Error::RevisionRead {
                detail: e.to_string(),
            }),
        }
    }

    /// List every tracked file path at the current revision, one per line.
    pub async fn tracked_files(&self) -> Result<String> {
        let out = run_command("git", &["ls-tree", "-r", "--name-only", "HEAD"], &self.root).await?;
        if out.success {
            Ok(out.stdout)
        } else {
            Err(Error::GenerationFailed {
                detail: out.error_text(),
            })
        }
    }
}
