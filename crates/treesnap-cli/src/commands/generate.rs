//! One-shot snapshot regeneration.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use treesnap_core::{Settings, TreeGenerator};

/// Regenerate the snapshot once and report what was written.
///
/// An explicit invocation runs even when the settings disable the
/// watcher; the `enabled` flag only gates triggers.
pub async fn execute(workspace: PathBuf, config: Option<PathBuf>) -> Result<()> {
    let settings = Settings::load(&workspace, config.as_deref())
        .context("failed to load settings")?;
    let generator = TreeGenerator::new(workspace.as_path());

    let report = generator
        .generate(&settings)
        .await
        .context("failed to generate tree snapshot")?;

    println!(
        "wrote {} entries to {} ({} excluded by filter)",
        report.written,
        display_relative(&report.output_path, &workspace),
        report.excluded
    );
    Ok(())
}

fn display_relative(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
