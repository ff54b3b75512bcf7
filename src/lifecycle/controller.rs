//! Start/stop orchestration.
//!
//! # Responsibilities
//! - Own the listener handle (one at a time, no global state)
//! - Sequence startup: bind listener, then start workers
//! - Sequence shutdown: close listener cleanly, then stop workers
//! - Track the lifecycle state machine
//!
//! # State Machine
//! ```text
//! Stopped → Starting → Running → Stopping → Stopped
//!              │                    │
//!              │ bind failed        │ close failed
//!              ▼                    ▼
//!           Stopped            Stopping (stuck, reported via error)
//! ```

use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::config::GatewayConfig;
use crate::lifecycle::signals;
use crate::net::{Listener, ListenerError, ListenerHandle};
use crate::routing::{ShardRouter, WorkerPool};

/// Lifecycle phase of the front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    /// No listener bound, workers not started.
    Stopped,
    /// `start()` in progress.
    Starting,
    /// Listener accepting, workers started, signal handler installed.
    Running,
    /// `stop()` in progress. Remains here if the listener close failed.
    Stopping,
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            LifecycleState::Stopped => "stopped",
            LifecycleState::Starting => "starting",
            LifecycleState::Running => "running",
            LifecycleState::Stopping => "stopping",
        };
        f.write_str(name)
    }
}

/// Error starting the front-end.
#[derive(Debug, Error)]
pub enum StartError {
    /// `start()` called while not stopped.
    #[error("already started (state: {0})")]
    AlreadyStarted(LifecycleState),
    /// The listening socket could not be bound. Workers were never started.
    #[error("failed to bind listener: {0}")]
    Bind(#[source] ListenerError),
}

/// Error stopping the front-end.
#[derive(Debug, Error)]
pub enum StopError {
    /// `stop()` called while not running.
    #[error("not running (state: {0})")]
    NotRunning(LifecycleState),
    /// The listener failed to close cleanly. Workers were deliberately
    /// left running; the controller stays in `Stopping`.
    #[error("listener failed to close: {0}")]
    Close(#[source] ListenerError),
}

struct Inner {
    state: LifecycleState,
    listener: Option<ListenerHandle>,
}

/// Orchestrates the front-end's start/stop lifecycle.
///
/// Exactly one instance per process. The async mutex around the inner state
/// serializes concurrent `start()`/`stop()` calls; the state check then
/// rejects whichever call arrives out of turn.
pub struct Controller<P: WorkerPool> {
    config: GatewayConfig,
    pool: Arc<P>,
    inner: Mutex<Inner>,
    signal_installed: AtomicBool,
    termination_fired: AtomicBool,
}

impl<P: WorkerPool> Controller<P> {
    /// Create a controller over `pool`, initially stopped.
    pub fn new(config: GatewayConfig, pool: Arc<P>) -> Arc<Self> {
        Arc::new(Self {
            config,
            pool,
            inner: Mutex::new(Inner {
                state: LifecycleState::Stopped,
                listener: None,
            }),
            signal_installed: AtomicBool::new(false),
            termination_fired: AtomicBool::new(false),
        })
    }

    /// Current lifecycle state.
    pub async fn state(&self) -> LifecycleState {
        self.inner.lock().await.state
    }

    /// Address the listener is bound to, while running.
    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.inner
            .lock()
            .await
            .listener
            .as_ref()
            .map(|handle| handle.local_addr())
    }

    /// Start the front-end: bind the listener, then start the workers.
    ///
    /// On bind failure the state reverts to `Stopped` and the workers are
    /// never started. The termination-signal handler is installed once,
    /// after the first successful start.
    pub async fn start(self: &Arc<Self>) -> Result<(), StartError> {
        let mut inner = self.inner.lock().await;
        if inner.state != LifecycleState::Stopped {
            return Err(StartError::AlreadyStarted(inner.state));
        }
        inner.state = LifecycleState::Starting;
        tracing::debug!("Listener starting");

        let listener = match Listener::bind(&self.config.listener.bind_address).await {
            Ok(listener) => listener,
            Err(e) => {
                inner.state = LifecycleState::Stopped;
                return Err(StartError::Bind(e));
            }
        };

        let router = ShardRouter::new(Arc::clone(&self.pool), self.config.sharding.concurrency);
        let handle = listener.spawn(router);
        tracing::info!(
            address = %handle.local_addr(),
            concurrency = self.config.sharding.concurrency,
            "Listener started"
        );
        inner.listener = Some(handle);
        inner.state = LifecycleState::Running;

        tracing::debug!("Workers starting");
        self.pool.start();

        if !self.signal_installed.swap(true, Ordering::SeqCst) {
            signals::install(Arc::clone(self));
        }

        Ok(())
    }

    /// Stop the front-end: close the listener, then stop the workers.
    ///
    /// The workers are told to stop only after the listener has confirmed a
    /// clean close. If the close fails, the error is returned, the state
    /// stays `Stopping`, and the workers keep running.
    pub async fn stop(&self) -> Result<(), StopError> {
        let mut inner = self.inner.lock().await;
        if inner.state != LifecycleState::Running {
            return Err(StopError::NotRunning(inner.state));
        }
        inner.state = LifecycleState::Stopping;
        tracing::debug!("Listener stopping");

        let close_result = match inner.listener.take() {
            Some(handle) => handle.stop().await,
            None => Err(ListenerError::Close(
                "listener handle missing while running".to_string(),
            )),
        };

        self.finish_stop(&mut inner, close_result)
    }

    /// Complete the shutdown sequence given the listener's close result.
    ///
    /// Ordering contract lives here: workers stop only on a clean close.
    fn finish_stop(
        &self,
        inner: &mut Inner,
        close_result: Result<(), ListenerError>,
    ) -> Result<(), StopError> {
        match close_result {
            Ok(()) => {
                tracing::info!("Listener stopped");
                inner.state = LifecycleState::Stopped;
                tracing::debug!("Workers stopping");
                self.pool.stop();
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Listener close failed; workers left running");
                Err(StopError::Close(e))
            }
        }
    }

    /// Entry point for the termination signal.
    ///
    /// Guarded so that repeated invocations run the stop sequence at most
    /// once; a second signal during shutdown is ignored.
    pub async fn handle_termination(self: &Arc<Self>) {
        if self.termination_fired.swap(true, Ordering::SeqCst) {
            tracing::debug!("Termination already handled; ignoring");
            return;
        }
        if let Err(e) = self.stop().await {
            tracing::error!(error = %e, "Shutdown failed");
        }
    }
}
