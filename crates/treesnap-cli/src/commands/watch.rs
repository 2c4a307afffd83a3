//! Long-running watch mode.

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use treesnap_core::Settings;
use treesnap_watch::{backends, SnapshotHandler, TriggerController, TriggerVariant};

/// Watch the workspace until interrupted.
///
/// Starting the controller is the activation entry point; the Ctrl-C
/// handler funnels into `shutdown`, which releases any pending trigger
/// timer before the process exits.
pub async fn execute(
    workspace: PathBuf,
    config: Option<PathBuf>,
    variant: TriggerVariant,
) -> Result<()> {
    let settings = Settings::load(&workspace, config.as_deref())
        .context("failed to load settings")?;

    let backend = backends::create_backend(variant, &workspace, config.as_deref(), &settings);
    let handler = Arc::new(SnapshotHandler::new(&workspace));
    let mut controller = TriggerController::new(workspace.as_path(), config, backend, handler);

    controller
        .start()
        .await
        .context("failed to start the trigger controller")?;
    info!(
        workspace = %workspace.display(),
        "watching workspace, press Ctrl-C to stop"
    );

    tokio::signal::ctrl_c().await.ok();

    controller
        .shutdown()
        .await
        .context("failed to shut down the trigger controller")?;
    Ok(())
}
