//! Core traits for the trigger system.

use crate::{error::Result, events::TriggerEvent};
use async_trait::async_trait;
use tokio::sync::mpsc;
use treesnap_core::Settings;

/// A source of regeneration triggers.
///
/// Exactly one backend is selected at construction; both variants feed
/// the same controller, which owns the shared regeneration path.
#[async_trait]
pub trait TriggerBackend: Send {
    /// Backend kind identifier used in logs and events.
    fn kind(&self) -> &'static str;

    /// Set the event sender for this backend.
    /// This must be called before `start`.
    fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<TriggerEvent>);

    /// Start producing triggers.
    async fn start(&mut self) -> Result<()>;

    /// Stop producing triggers and release any pending timer.
    async fn shutdown(&mut self) -> Result<()>;
}

/// Reaction to a trigger event.
#[async_trait]
pub trait TriggerHandler: Send + Sync {
    /// Handle one trigger, with the settings that were read for it.
    async fn handle(&self, event: &TriggerEvent, settings: &Settings) -> Result<()>;

    /// Handler name used in logs.
    fn name(&self) -> &'static str;
}
