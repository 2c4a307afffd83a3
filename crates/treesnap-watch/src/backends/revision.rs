//! Revision-polling trigger backend.

use crate::{
    error::{Error, Result},
    events::{TriggerEvent, TriggerReason},
    traits::TriggerBackend,
};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};
use treesnap_core::{GitClient, Settings};

/// How often the repository revision is polled.
pub const POLL_INTERVAL: Duration = Duration::from_millis(5000);

/// Seed-then-compare state machine over observed revisions.
///
/// Kept separate from the polling loop so the seeding and comparison
/// rules stay unit-testable without a repository.
#[derive(Debug, Clone, Default)]
pub struct RevisionTracker {
    last_revision: Option<String>,
}

impl RevisionTracker {
    /// Create an unseeded tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one successful revision read.
    ///
    /// The first read after construction or after [`reset`](Self::reset)
    /// seeds the tracker and returns `None`. A later read returns the
    /// `(from, to)` pair iff it differs from the stored revision.
    pub fn observe(&mut self, revision: String) -> Option<(String, String)> {
        match self.last_revision.replace(revision.clone()) {
            Some(previous) if previous != revision => Some((previous, revision)),
            _ => None,
        }
    }

    /// Forget the stored revision after a failed read, so the next
    /// successful read seeds again instead of diffing against stale state.
    pub fn reset(&mut self) {
        self.last_revision = None;
    }

    /// Currently stored revision, if seeded.
    pub fn current(&self) -> Option<&str> {
        self.last_revision.as_deref()
    }
}

/// Trigger source that polls the repository revision on a fixed interval.
///
/// Failures to read the revision are logged and swallowed; polling
/// continues and the tracker re-seeds on the next successful read.
pub struct RevisionBackend {
    root: PathBuf,
    config_override: Option<PathBuf>,
    interval: Duration,
    event_sender: Option<mpsc::UnboundedSender<TriggerEvent>>,
    poll_task: Option<JoinHandle<()>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
}

impl RevisionBackend {
    /// Backend kind identifier.
    pub const KIND: &'static str = "revision";

    /// Create a backend polling the given workspace root.
    pub fn new(root: impl Into<PathBuf>, config_override: Option<PathBuf>) -> Self {
        Self {
            root: root.into(),
            config_override,
            interval: POLL_INTERVAL,
            event_sender: None,
            poll_task: None,
            shutdown_tx: None,
        }
    }

    /// Override the polling interval. Tests use short intervals.
    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    async fn poll_once(
        git: &GitClient,
        root: &Path,
        config_override: Option<&Path>,
        tracker: &mut RevisionTracker,
    ) -> Option<TriggerEvent> {
        // The enabled gate sits before the revision read, so a disabled
        // watcher spawns no subprocess at all.
        match Settings::load(root, config_override) {
            Ok(settings) if !settings.enabled => {
                debug!("snapshot disabled, skipping poll");
                return None;
            }
            Ok(_) => {}
            Err(e) => {
                warn!("failed to load settings, skipping poll: {}", e);
                return None;
            }
        }

        match git.head_revision().await {
            Ok(revision) => tracker.observe(revision).map(|(from, to)| {
                debug!(%from, %to, "revision changed");
                TriggerEvent {
                    source: Self::KIND,
                    reason: TriggerReason::RevisionChanged { from, to },
                }
            }),
            Err(e) => {
                // Transient: keep polling, re-seed on the next success.
                warn!("revision read failed: {}", e);
                tracker.reset();
                None
            }
        }
    }
}

#[async_trait]
impl TriggerBackend for RevisionBackend {
    fn kind(&self) -> &'static str {
        Self::KIND
    }

    fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<TriggerEvent>) {
        self.event_sender = Some(sender);
    }

    async fn start(&mut self) -> Result<()> {
        if self.poll_task.is_some() {
            return Err(Error::AlreadyRunning);
        }
        let sender = self
            .event_sender
            .clone()
            .ok_or_else(|| Error::Channel("event sender not set before start".to_string()))?;

        let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
        let git = GitClient::new(self.root.clone());
        let root = self.root.clone();
        let config_override = self.config_override.clone();
        let period = self.interval;

        let task = tokio::spawn(async move {
            let mut tracker = RevisionTracker::new();
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        let trigger = RevisionBackend::poll_once(
                            &git,
                            &root,
                            config_override.as_deref(),
                            &mut tracker,
                        )
                        .await;
                        if let Some(trigger) = trigger {
                            if sender.send(trigger).is_err() {
                                debug!("trigger channel closed, stopping poller");
                                break;
                            }
                        }
                    }
                    _ = shutdown_rx.recv() => {
                        debug!("revision poller shutting down");
                        break;
                    }
                }
            }
        });

        self.shutdown_tx = Some(shutdown_tx);
        self.poll_task = Some(task);
        info!(
            root = %self.root.display(),
            interval_ms = self.interval.as_millis() as u64,
            "revision trigger polling repository"
        );
        Ok(())
    }

    async fn shutdown(&mut self) -> Result<()> {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(task) = self.poll_task.take() {
            let _ = task.await;
        }
        Ok(())
    }
}
