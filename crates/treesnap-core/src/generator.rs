//! Regenerates the filtered listing of tracked files.

use crate::config::Settings;
use crate::error::{Error, Result};
use crate::git::GitClient;
use regex::Regex;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Outcome of a successful snapshot run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Where the snapshot was written.
    pub output_path: PathBuf,
    /// Number of tracked paths written to the snapshot.
    pub written: usize,
    /// Number of tracked paths the filter excluded.
    pub excluded: usize,
}

/// Generates the tree snapshot for one workspace.
#[derive(Debug, Clone)]
pub struct TreeGenerator {
    root: PathBuf,
    git: GitClient,
}

impl TreeGenerator {
    /// Create a generator for the given workspace root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let git = GitClient::new(root.clone());
        Self { root, git }
    }

    /// Workspace root this generator operates in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Regenerate the snapshot once.
    ///
    /// Probes run before anything is written, so every failure leaves the
    /// previous snapshot content untouched. The filter regex is applied
    /// in-process to the listing, one line at a time, case-sensitively.
    pub async fn generate(&self, settings: &Settings) -> Result<GenerationReport> {
        if !self.root.is_dir() {
            return Err(Error::NoWorkspace {
                path: self.root.clone(),
            });
        }

        let output_path = settings.output_path(&self.root);
        if let Some(parent) = output_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let version = self.git.version().await?;
        debug!(%version, "git probe ok");
        self.git.git_dir().await?;

        let filter = Regex::new(&settings.filter_patterns).map_err(|e| Error::GenerationFailed {
            detail: e.to_string(),
        })?;

        let listing = self.git.tracked_files().await?;
        let (kept, excluded) = partition_listing(&listing, &filter);

        let mut contents = kept.join("\n");
        if !contents.is_empty() {
            contents.push('\n');
        }
        tokio::fs::write(&output_path, contents).await?;

        let report = GenerationReport {
            written: kept.len(),
            excluded,
            output_path,
        };
        info!(
            output = %report.output_path.display(),
            written = report.written,
            excluded = report.excluded,
            "tree snapshot generated"
        );
        Ok(report)
    }
}

/// Split a listing into kept lines and an excluded count.
fn partition_listing<'a>(listing: &'a str, filter: &Regex) -> (Vec<&'a str>, usize) {
    let mut kept = Vec::new();
    let mut excluded = 0;
    for line in listing.lines() {
        if line.is_empty() {
            continue;
        }
        if filter.is_match(line) {
            excluded += 1;
        } else {
            kept.push(line);
        }
    }
    (kept, excluded)
}
