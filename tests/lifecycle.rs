//! Integration tests for the start/stop lifecycle and connection hand-off.

mod common;

use std::sync::Arc;

use shardgate::lifecycle::{StartError, StopError};
use shardgate::{Controller, LifecycleState};
use tokio::net::{TcpListener, TcpStream};

use common::{loopback_config, wait_until, PoolEvent, RecordingPool};

#[tokio::test]
async fn start_then_stop_round_trip() {
    let pool = RecordingPool::new();
    let controller = Controller::new(loopback_config(4), Arc::clone(&pool));

    assert_eq!(controller.state().await, LifecycleState::Stopped);

    controller.start().await.unwrap();
    assert_eq!(controller.state().await, LifecycleState::Running);
    assert!(controller.local_addr().await.is_some());

    controller.stop().await.unwrap();
    assert_eq!(controller.state().await, LifecycleState::Stopped);
    assert!(controller.local_addr().await.is_none());

    assert_eq!(pool.events(), vec![PoolEvent::Started, PoolEvent::Stopped]);
}

#[tokio::test]
async fn each_connection_entrusted_exactly_once() {
    let pool = RecordingPool::new();
    let controller = Controller::new(loopback_config(4), Arc::clone(&pool));

    controller.start().await.unwrap();
    let addr = controller.local_addr().await.unwrap();

    let mut clients = Vec::new();
    for _ in 0..3 {
        clients.push(TcpStream::connect(addr).await.unwrap());
    }

    let pool_ref = Arc::clone(&pool);
    assert!(wait_until(move || pool_ref.entrusted().len() == 3).await);

    let entrusted = pool.entrusted();
    assert_eq!(entrusted.len(), 3);

    // All loopback clients share a peer IP, so they share a shard.
    let first_shard = entrusted[0].0;
    for (shard, remote) in &entrusted {
        assert_eq!(*shard, first_shard);
        assert!(first_shard < 4);
        assert_eq!(remote.as_deref(), Some("127.0.0.1"));
    }

    drop(clients);
    controller.stop().await.unwrap();
}

#[tokio::test]
async fn stop_before_start_touches_nothing() {
    let pool = RecordingPool::new();
    let controller = Controller::new(loopback_config(4), Arc::clone(&pool));

    let err = controller.stop().await.unwrap_err();
    assert!(matches!(err, StopError::NotRunning(_)));
    assert_eq!(controller.state().await, LifecycleState::Stopped);
    assert!(pool.events().is_empty());
}

#[tokio::test]
async fn bind_conflict_fails_start_without_touching_workers() {
    let occupant = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = occupant.local_addr().unwrap();

    let pool = RecordingPool::new();
    let mut config = loopback_config(4);
    config.listener.bind_address = addr.to_string();
    let controller = Controller::new(config, Arc::clone(&pool));

    let err = controller.start().await.unwrap_err();
    assert!(matches!(err, StartError::Bind(_)));
    assert_eq!(controller.state().await, LifecycleState::Stopped);
    assert!(pool.events().is_empty());
}

#[tokio::test]
async fn second_start_is_rejected() {
    let pool = RecordingPool::new();
    let controller = Controller::new(loopback_config(4), Arc::clone(&pool));

    controller.start().await.unwrap();
    let err = controller.start().await.unwrap_err();
    assert!(matches!(
        err,
        StartError::AlreadyStarted(LifecycleState::Running)
    ));

    // Still running; only one pool start was issued.
    assert_eq!(controller.state().await, LifecycleState::Running);
    assert_eq!(pool.events(), vec![PoolEvent::Started]);

    controller.stop().await.unwrap();
}

#[tokio::test]
async fn repeated_termination_stops_once() {
    let pool = RecordingPool::new();
    let controller = Controller::new(loopback_config(4), Arc::clone(&pool));

    controller.start().await.unwrap();

    controller.handle_termination().await;
    controller.handle_termination().await;

    assert_eq!(controller.state().await, LifecycleState::Stopped);
    assert_eq!(pool.stop_count(), 1);
    assert_eq!(pool.events(), vec![PoolEvent::Started, PoolEvent::Stopped]);
}

#[tokio::test]
async fn restart_after_stop_binds_again() {
    let pool = RecordingPool::new();
    let controller = Controller::new(loopback_config(2), Arc::clone(&pool));

    controller.start().await.unwrap();
    controller.stop().await.unwrap();

    controller.start().await.unwrap();
    assert_eq!(controller.state().await, LifecycleState::Running);
    controller.stop().await.unwrap();

    assert_eq!(
        pool.events(),
        vec![
            PoolEvent::Started,
            PoolEvent::Stopped,
            PoolEvent::Started,
            PoolEvent::Stopped,
        ]
    );
}
