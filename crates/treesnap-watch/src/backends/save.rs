//! Save-burst trigger backend built on filesystem notifications.

use crate::{
    error::{Error, Result},
    events::{TriggerEvent, TriggerReason},
    filter::WatchFilter,
    traits::TriggerBackend,
};
use async_trait::async_trait;
use notify::{EventKind, RecommendedWatcher, RecursiveMode};
use notify_debouncer_full::{new_debouncer, DebounceEventResult, DebouncedEvent, Debouncer};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, error, info};

/// How long a burst of changes must stay quiet before one trigger fires.
pub const SAVE_DEBOUNCE: Duration = Duration::from_millis(1000);

/// Trigger source that reacts to file changes in the workspace.
///
/// Bursts of changes collapse into a single trigger roughly one debounce
/// window after the last change. Dropping the debouncer cancels any
/// pending flush, so no trigger fires after shutdown.
pub struct SaveBackend {
    root: PathBuf,
    filter: WatchFilter,
    window: Duration,
    debouncer: Option<Debouncer<RecommendedWatcher, notify_debouncer_full::NoCache>>,
    event_sender: Option<mpsc::UnboundedSender<TriggerEvent>>,
}

impl SaveBackend {
    /// Backend kind identifier.
    pub const KIND: &'static str = "save";

    /// Create a backend watching the given workspace root.
    ///
    /// The root is canonicalized so the watched path lines up with the
    /// paths the filter was built against.
    pub fn new(root: impl Into<PathBuf>, filter: WatchFilter) -> Self {
        let root = root.into();
        let root = root.canonicalize().unwrap_or(root);
        Self {
            root,
            filter,
            window: SAVE_DEBOUNCE,
            debouncer: None,
            event_sender: None,
        }
    }

    /// Override the debounce window. Tests use short windows.
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    /// Reduce one debounced batch to at most one trigger event.
    ///
    /// Only content-affecting kinds count; access noise is dropped, as is
    /// every path the filter excludes.
    fn reduce_batch(filter: &WatchFilter, events: Vec<DebouncedEvent>) -> Option<TriggerEvent> {
        let mut paths: Vec<PathBuf> = Vec::new();
        for event in events {
            if !matches!(
                event.event.kind,
                EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
            ) {
                continue;
            }
            for path in &event.event.paths {
                if filter.allows(path) && !paths.contains(path) {
                    paths.push(path.clone());
                }
            }
        }

        if paths.is_empty() {
            None
        } else {
            Some(TriggerEvent {
                source: Self::KIND,
                reason: TriggerReason::FilesChanged { paths },
            })
        }
    }
}

#[async_trait]
impl TriggerBackend for SaveBackend {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<TriggerEvent>) {
        self.event_sender = Some(sender);
    }

    async fn start(&mut self) -> Result<()> {
        if self.debouncer.is_some() {
            return Err(Error::AlreadyRunning);
        }
        let sender = self
            .event_sender
            .clone()
            .ok_or_else(|| Error::Channel("event sender not set before start".to_string()))?;
        let filter = self.filter.clone();

        let mut debouncer = new_debouncer(self.window, None, move |result: DebounceEventResult| {
            match result {
                Ok(events) => {
                    if let Some(trigger) = SaveBackend::reduce_batch(&filter, events) {
                        if let Err(e) = sender.send(trigger) {
                            error!("failed to send trigger event: {}", e);
                        }
                    }
                }
                Err(errors) => {
                    for error in errors {
                        error!("notify error: {:?}", error);
                    }
                }
            }
        })
        .map_err(|e| Error::Watch(format!("failed to create debounced watcher: {}", e)))?;

        debouncer
            .watch(&self.root, RecursiveMode::Recursive)
            .map_err(|e| Error::Watch(format!("failed to watch {}: {}", self.root.display(), e)))?;

        self.debouncer = Some(debouncer);
        info!(root = %self.root.display(), "save trigger watching workspace");
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<()> {
        // Dropping the debouncer cancels any pending flush.
        if self.debouncer.take().is_some() {
            debug!("save trigger stopped");
        }
        Ok(())
    }
}
