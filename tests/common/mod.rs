//! Shared utilities for integration testing.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use shardgate::{Connection, GatewayConfig, ShardIndex, WorkerPool};

/// Everything the front-end asked the pool to do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PoolEvent {
    Started,
    Entrusted {
        shard: usize,
        remote: Option<String>,
    },
    Stopped,
}

/// A worker pool that records every call for later assertions.
#[derive(Default)]
pub struct RecordingPool {
    events: Mutex<Vec<PoolEvent>>,
}

impl RecordingPool {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<PoolEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn entrusted(&self) -> Vec<(usize, Option<String>)> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                PoolEvent::Entrusted { shard, remote } => Some((shard, remote)),
                _ => None,
            })
            .collect()
    }

    pub fn stop_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| **e == PoolEvent::Stopped)
            .count()
    }
}

impl WorkerPool for RecordingPool {
    fn start(&self) {
        self.events.lock().unwrap().push(PoolEvent::Started);
    }

    fn stop(&self) {
        self.events.lock().unwrap().push(PoolEvent::Stopped);
    }

    fn entrust(&self, index: ShardIndex, connection: Connection) {
        self.events.lock().unwrap().push(PoolEvent::Entrusted {
            shard: index.as_usize(),
            remote: connection.remote_addr().map(String::from),
        });
        // Ownership ends here; the socket closes when dropped.
    }
}

/// Config bound to an ephemeral loopback port.
pub fn loopback_config(concurrency: usize) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.listener.bind_address = "127.0.0.1:0".to_string();
    config.sharding.concurrency = concurrency;
    config
}

/// Poll until `predicate` holds or two seconds pass.
pub async fn wait_until(predicate: impl Fn() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_secs(2);
    while Instant::now() < deadline {
        if predicate() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    predicate()
}
