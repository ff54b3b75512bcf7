//! TCP listener and accept loop.
//!
//! # Responsibilities
//! - Bind to the configured address
//! - Accept incoming TCP connections without reading from them
//! - Hand each accepted connection to the shard router, in accept order
//! - Graceful handling of accept errors

use std::net::SocketAddr;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::net::connection::Connection;
use crate::routing::{ShardRouter, WorkerPool};

/// Error type for listener operations.
#[derive(Debug)]
pub enum ListenerError {
    /// Failed to bind to address.
    Bind(std::io::Error),
    /// Failed to accept connection.
    Accept(std::io::Error),
    /// Failed to close the listener cleanly.
    Close(String),
}

impl std::fmt::Display for ListenerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ListenerError::Bind(e) => write!(f, "Failed to bind: {}", e),
            ListenerError::Accept(e) => write!(f, "Failed to accept: {}", e),
            ListenerError::Close(reason) => write!(f, "Failed to close: {}", reason),
        }
    }
}

impl std::error::Error for ListenerError {}

/// A bound TCP listener that has not yet started accepting.
#[derive(Debug)]
pub struct Listener {
    inner: TcpListener,
    local_addr: SocketAddr,
}

impl Listener {
    /// Bind to the configured address.
    pub async fn bind(bind_address: &str) -> Result<Self, ListenerError> {
        let addr: SocketAddr = bind_address.parse().map_err(|e| {
            ListenerError::Bind(std::io::Error::new(std::io::ErrorKind::InvalidInput, e))
        })?;

        let inner = TcpListener::bind(addr).await.map_err(ListenerError::Bind)?;
        let local_addr = inner.local_addr().map_err(ListenerError::Bind)?;

        tracing::info!(address = %local_addr, "Listener bound");

        Ok(Self { inner, local_addr })
    }

    /// Get the local address this listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Start the accept loop, consuming the listener.
    ///
    /// Each accepted connection is dispatched through `router` synchronously
    /// inside the loop, so hand-off order matches accept order.
    pub fn spawn<P: WorkerPool>(self, router: ShardRouter<P>) -> ListenerHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let local_addr = self.local_addr;
        let task = tokio::spawn(accept_loop(self.inner, router, shutdown_rx));

        ListenerHandle {
            shutdown_tx,
            task,
            local_addr,
        }
    }
}

/// Accept connections until told to shut down.
///
/// Accept errors do not kill the loop; a brief sleep avoids spinning on a
/// persistent error condition.
async fn accept_loop<P: WorkerPool>(
    listener: TcpListener,
    router: ShardRouter<P>,
    mut shutdown: watch::Receiver<bool>,
) {
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, peer_addr)) => {
                    let conn = Connection::new(stream);
                    tracing::debug!(
                        peer_addr = %peer_addr,
                        connection_id = %conn.id(),
                        "Connection accepted"
                    );
                    router.dispatch(conn);
                }
                Err(e) => {
                    tracing::error!(error = %e, "Accept error");
                    tokio::time::sleep(Duration::from_millis(100)).await;
                }
            }
        }
    }
    // The listener drops here, releasing the bound socket.
}

/// Handle to a running accept loop.
///
/// Exactly one exists per bound listener; the lifecycle controller owns it
/// from `start` until `stop` completes.
pub struct ListenerHandle {
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
    local_addr: SocketAddr,
}

impl ListenerHandle {
    /// The address the accept loop is listening on.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting and release the socket.
    ///
    /// Resolves only once the accept task has fully exited, so a caller that
    /// sees `Ok` knows the port is free and no further connections will be
    /// handed off.
    pub async fn stop(self) -> Result<(), ListenerError> {
        let signalled = self.shutdown_tx.send(true).is_ok();

        self.task
            .await
            .map_err(|e| ListenerError::Close(e.to_string()))?;

        if signalled {
            Ok(())
        } else {
            // The accept task was already gone before we asked it to stop.
            Err(ListenerError::Close(
                "accept loop exited before shutdown was requested".to_string(),
            ))
        }
    }
}
