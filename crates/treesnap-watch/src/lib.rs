//! Trigger layer for treesnap.
//!
//! Two trigger variants exist for the same regeneration action: a
//! save-burst variant that debounces filesystem notifications, and a
//! revision-polling variant that fires only when `HEAD` moves. Both
//! implement [`TriggerBackend`] and feed one [`TriggerController`],
//! which reloads settings per trigger, applies the enabled gate, and
//! serializes regenerations.
//!
//! ```text
//! ┌──────────────┐    ┌───────────────────┐    ┌─────────────────┐
//! │ SaveBackend  │───▶│ TriggerController │───▶│ SnapshotHandler │
//! │ RevisionBack.│    │ (settings + gate) │    │ (TreeGenerator) │
//! └──────────────┘    └───────────────────┘    └─────────────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod backends;
mod controller;
pub mod error;
mod events;
mod filter;
mod handlers;
pub mod traits;

pub use backends::{
    create_backend, RevisionBackend, RevisionTracker, SaveBackend, POLL_INTERVAL, SAVE_DEBOUNCE,
};
pub use controller::TriggerController;
pub use error::{Error, Result};
pub use events::{TriggerEvent, TriggerReason};
pub use filter::WatchFilter;
pub use handlers::SnapshotHandler;
pub use traits::{TriggerBackend, TriggerHandler};

/// Available trigger variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerVariant {
    /// React to file changes in the workspace, debounced.
    Save,
    /// Poll the repository revision on a fixed interval.
    Revision,
}
