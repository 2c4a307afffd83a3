//! Stateful controller that owns a trigger backend and the regeneration path.

use crate::{
    error::{Error, Result},
    events::{TriggerEvent, TriggerReason},
    traits::{TriggerBackend, TriggerHandler},
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use treesnap_core::Settings;

/// Owns one trigger backend, the event channel, and the processing task.
///
/// Constructed at activation and torn down through [`shutdown`](Self::shutdown);
/// all mutable trigger state lives in this object, never at module level.
pub struct TriggerController {
    root: PathBuf,
    config_override: Option<PathBuf>,
    backend: Box<dyn TriggerBackend>,
    handler: Arc<dyn TriggerHandler>,
    processor_task: Option<JoinHandle<()>>,
    shutdown_tx: Option<mpsc::Sender<()>>,
    is_running: bool,
}

impl TriggerController {
    /// Create a controller for a workspace.
    pub fn new(
        root: impl Into<PathBuf>,
        config_override: Option<PathBuf>,
        backend: Box<dyn TriggerBackend>,
        handler: Arc<dyn TriggerHandler>,
    ) -> Self {
        Self {
            root: root.into(),
            config_override,
            backend,
            handler,
            processor_task: None,
            shutdown_tx: None,
            is_running: false,
        }
    }

    /// Whether the controller has been started and not yet shut down.
    pub fn is_running(&self) -> bool {
        self.is_running
    }

    /// Start the backend and the trigger processing task.
    pub async fn start(&mut self) -> Result<()> {
        if self.is_running {
            return Err(Error::AlreadyRunning);
        }

        let (event_tx, event_rx) = mpsc::unbounded_channel();
        self.backend.set_event_sender(event_tx);
        self.backend.start().await?;

        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let handler = Arc::clone(&self.handler);
        let root = self.root.clone();
        let config_override = self.config_override.clone();

        let task = tokio::spawn(Self::run_processor(
            event_rx,
            shutdown_rx,
            root,
            config_override,
            handler,
        ));

        self.processor_task = Some(task);
        self.shutdown_tx = Some(shutdown_tx);
        self.is_running = true;
        info!(backend = self.backend.kind(), "trigger controller started");
        Ok(())
    }

    /// Stop the backend, then the processing task.
    ///
    /// Queued triggers that have not started processing are discarded; an
    /// in-flight regeneration is awaited, never cancelled.
    pub async fn shutdown(&mut self) -> Result<()> {
        if !self.is_running {
            return Ok(());
        }

        info!("shutting down trigger controller");
        self.backend.shutdown().await?;

        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(()).await;
        }
        if let Some(task) = self.processor_task.take() {
            let _ = task.await;
        }

        self.is_running = false;
        info!("trigger controller shutdown complete");
        Ok(())
    }

    async fn run_processor(
        mut events: mpsc::UnboundedReceiver<TriggerEvent>,
        mut shutdown: mpsc::Receiver<()>,
        root: PathBuf,
        config_override: Option<PathBuf>,
        handler: Arc<dyn TriggerHandler>,
    ) {
        loop {
            tokio::select! {
                maybe_event = events.recv() => {
                    match maybe_event {
                        Some(event) => {
                            // Awaiting here serializes regenerations: the
                            // next trigger is not dequeued until the current
                            // run finishes, so two runs never race on the
                            // output file.
                            Self::process_trigger(
                                &event,
                                &root,
                                config_override.as_deref(),
                                handler.as_ref(),
                            )
                            .await;
                        }
                        None => {
                            debug!("trigger channel closed");
                            break;
                        }
                    }
                }
                _ = shutdown.recv() => {
                    debug!("trigger processor shutting down");
                    break;
                }
            }
        }
    }

    async fn process_trigger(
        event: &TriggerEvent,
        root: &Path,
        config_override: Option<&Path>,
        handler: &dyn TriggerHandler,
    ) {
        // Settings are read fresh for every trigger.
        let settings = match Settings::load(root, config_override) {
            Ok(settings) => settings,
            Err(e) => {
                warn!("failed to load settings, trigger dropped: {}", e);
                return;
            }
        };
        if !settings.enabled {
            debug!(source = event.source, "snapshot disabled, trigger ignored");
            return;
        }

        debug!(source = event.source, reason = event.reason.as_str(), "processing trigger");
        if let Err(e) = handler.handle(event, &settings).await {
            // Save triggers surface failures; revision triggers stay quiet
            // so the background watcher keeps its silent self-healing feel.
            match event.reason {
                TriggerReason::FilesChanged { .. } => {
                    error!("{} failed: {}", handler.name(), e);
                }
                TriggerReason::RevisionChanged { .. } => {
                    warn!("{} failed: {}", handler.name(), e);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tempfile::TempDir;

    /// Backend driven by hand from the test body.
    struct ManualBackend {
        sender_slot: Arc<Mutex<Option<mpsc::UnboundedSender<TriggerEvent>>>>,
    }

    #[async_trait]
    impl TriggerBackend for ManualBackend {
        fn kind(&self) -> &'static str {
            "manual"
        }

        fn set_event_sender(&mut self, sender: mpsc::UnboundedSender<TriggerEvent>) {
            *self.sender_slot.lock().unwrap() = Some(sender);
        }

        async fn start(&mut self) -> Result<()> {
            Ok(())
        }

        async fn shutdown(&mut self) -> Result<()> {
            Ok(())
        }
    }

    struct CountingHandler {
        calls: Arc<AtomicUsize>,
        fail_first: bool,
    }

    #[async_trait]
    impl TriggerHandler for CountingHandler {
        async fn handle(&self, _event: &TriggerEvent, _settings: &Settings) -> Result<()> {
            let seen = self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_first && seen == 0 {
                return Err(Error::Watch("synthetic failure".to_string()));
            }
            Ok(())
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    fn save_event() -> TriggerEvent {
        TriggerEvent {
            source: "manual",
            reason: TriggerReason::FilesChanged { paths: vec![] },
        }
    }

    fn controller_with_counter(
        root: &Path,
        fail_first: bool,
    ) -> (
        TriggerController,
        Arc<Mutex<Option<mpsc::UnboundedSender<TriggerEvent>>>>,
        Arc<AtomicUsize>,
    ) {
        let sender_slot = Arc::new(Mutex::new(None));
        let calls = Arc::new(AtomicUsize::new(0));
        let backend = Box::new(ManualBackend {
            sender_slot: Arc::clone(&sender_slot),
        });
        let handler = Arc::new(CountingHandler {
            calls: Arc::clone(&calls),
            fail_first,
        });
        let controller = TriggerController::new(root, None, backend, handler);
        (controller, sender_slot, calls)
    }

    async fn wait_for(calls: &AtomicUsize, expected: usize) {
        for _ in 0..50 {
            if calls.load(Ordering::SeqCst) == expected {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!(
            "handler call count never reached {} (got {})",
            expected,
            calls.load(Ordering::SeqCst)
        );
    }

    #[tokio::test]
    async fn triggers_reach_the_handler_when_enabled() {
        let dir = TempDir::new().unwrap();
        let (mut controller, sender_slot, calls) = controller_with_counter(dir.path(), false);

        controller.start().await.unwrap();
        let sender = sender_slot.lock().unwrap().clone().unwrap();
        sender.send(save_event()).unwrap();

        wait_for(&calls, 1).await;
        controller.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn disabled_settings_drop_triggers_before_the_handler() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("treesnap.toml"), "enabled = false\n").unwrap();
        let (mut controller, sender_slot, calls) = controller_with_counter(dir.path(), false);

        controller.start().await.unwrap();
        let sender = sender_slot.lock().unwrap().clone().unwrap();
        sender.send(save_event()).unwrap();

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        controller.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn handler_failure_does_not_stop_the_loop() {
        let dir = TempDir::new().unwrap();
        let (mut controller, sender_slot, calls) = controller_with_counter(dir.path(), true);

        controller.start().await.unwrap();
        let sender = sender_slot.lock().unwrap().clone().unwrap();
        sender.send(save_event()).unwrap();
        sender.send(save_event()).unwrap();

        wait_for(&calls, 2).await;
        controller.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn double_start_is_rejected() {
        let dir = TempDir::new().unwrap();
        let (mut controller, _slot, _calls) = controller_with_counter(dir.path(), false);

        controller.start().await.unwrap();
        assert!(matches!(
            controller.start().await,
            Err(Error::AlreadyRunning)
        ));
        controller.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn shutdown_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let (mut controller, _slot, _calls) = controller_with_counter(dir.path(), false);

        assert!(!controller.is_running());
        controller.shutdown().await.unwrap();

        controller.start().await.unwrap();
        assert!(controller.is_running());
        controller.shutdown().await.unwrap();
        assert!(!controller.is_running());
        controller.shutdown().await.unwrap();
    }
}
