//! Trigger backend implementations.

mod revision;
mod save;

pub use revision::{RevisionBackend, RevisionTracker, POLL_INTERVAL};
pub use save::{SaveBackend, SAVE_DEBOUNCE};

use crate::{filter::WatchFilter, traits::TriggerBackend, TriggerVariant};
use std::path::Path;
use treesnap_core::Settings;

/// Construct the backend for the selected trigger variant.
///
/// The save variant snapshots the output path from the settings read at
/// construction; the polling variant re-reads settings on every tick.
pub fn create_backend(
    variant: TriggerVariant,
    root: &Path,
    config_override: Option<&Path>,
    settings: &Settings,
) -> Box<dyn TriggerBackend> {
    match variant {
        TriggerVariant::Save => {
            let filter = WatchFilter::new(root, &settings.output_path(root));
            Box::new(SaveBackend::new(root, filter))
        }
        TriggerVariant::Revision => Box::new(RevisionBackend::new(
            root,
            config_override.map(Path::to_path_buf),
        )),
    }
}
