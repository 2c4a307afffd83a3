//! Trigger handlers.

use crate::{error::Result, events::TriggerEvent, traits::TriggerHandler};
use async_trait::async_trait;
use std::path::Path;
use tracing::info;
use treesnap_core::{Settings, TreeGenerator};

/// Regenerates the tree snapshot for every trigger it receives.
pub struct SnapshotHandler {
    generator: TreeGenerator,
}

impl SnapshotHandler {
    /// Create a handler regenerating snapshots for the given workspace.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            generator: TreeGenerator::new(root.as_ref()),
        }
    }
}

#[async_trait]
impl TriggerHandler for SnapshotHandler {
    async fn handle(&self, event: &TriggerEvent, settings: &Settings) -> Result<()> {
        let report = self.generator.generate(settings).await?;
        info!(
            source = event.source,
            reason = event.reason.as_str(),
            written = report.written,
            excluded = report.excluded,
            output = %report.output_path.display(),
            "snapshot refreshed"
        );
        Ok(())
    }

    fn name(&self) -> &'static str {
        "snapshot"
    }
}
