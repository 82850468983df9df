//! Lifecycle tests against a real TCP listener.
//!
//! The server is bound to an ephemeral port, exercised over real sockets,
//! and then shut down through the same future-based signal the binary uses.

#![allow(clippy::unwrap_used, clippy::panic, clippy::arithmetic_side_effects)]

use std::sync::Arc;
use std::time::{Duration, Instant};

use calendar_api::SHUTDOWN_GRACE;
use calendar_api::server::{ServerConfig, bind, run};
use calendar_api::state::AppState;
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::oneshot;

fn local_config() -> ServerConfig {
    ServerConfig {
        host: String::from("127.0.0.1"),
        port: 0,
    }
}

#[tokio::test]
async fn serves_requests_until_shutdown() {
    let state = Arc::new(AppState::new());
    let listener = bind(&local_config()).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(run(listener, Arc::clone(&state), async move {
        let _ = stop_rx.await;
    }));

    let client = reqwest::Client::new();
    let base = format!("http://{addr}");

    let response = client
        .post(format!("{base}/create_event/"))
        .json(&json!({ "id": 1, "name": "standup", "date": "2024-01-02T09:00:00Z" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body: Value = client
        .get(format!("{base}/events_for_day/?date=2024-01-02"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body.pointer("/result/0/id"), Some(&json!(1)));
    assert_eq!(state.store.len().await, 1);

    stop_tx.send(()).unwrap();
    let finished = tokio::time::timeout(SHUTDOWN_GRACE * 3, server)
        .await
        .unwrap()
        .unwrap();
    assert!(finished.is_ok());

    let after = reqwest::Client::new()
        .get(format!("{base}/events_for_day/"))
        .send()
        .await;
    assert!(after.is_err(), "listener should be closed after shutdown");
}

#[tokio::test]
async fn stalled_request_is_closed_after_grace_period() {
    let listener = bind(&local_config()).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(run(listener, Arc::new(AppState::new()), async move {
        let _ = stop_rx.await;
    }));

    // Headers promise a 100-byte body that never fully arrives.
    let mut socket = TcpStream::connect(addr).await.unwrap();
    socket
        .write_all(
            b"POST /create_event/ HTTP/1.1\r\nHost: localhost\r\nContent-Length: 100\r\n\r\n{\"id\":1,",
        )
        .await
        .unwrap();
    tokio::time::sleep(Duration::from_millis(100)).await;

    let started = Instant::now();
    stop_tx.send(()).unwrap();
    let finished = tokio::time::timeout(SHUTDOWN_GRACE * 3, server)
        .await
        .unwrap()
        .unwrap();
    let elapsed = started.elapsed();

    assert!(finished.is_ok());
    assert!(
        elapsed >= SHUTDOWN_GRACE.saturating_sub(Duration::from_millis(50)),
        "shutdown returned before the grace period: {elapsed:?}"
    );

    let mut buf = [0_u8; 64];
    let read = tokio::time::timeout(Duration::from_millis(500), socket.read(&mut buf)).await;
    match read {
        Ok(Ok(0) | Err(_)) => {}
        other => panic!("in-flight connection still open after shutdown: {other:?}"),
    }
}

#[tokio::test]
async fn idle_keep_alive_connection_does_not_delay_shutdown() {
    let listener = bind(&local_config()).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let server = tokio::spawn(run(listener, Arc::new(AppState::new()), async move {
        let _ = stop_rx.await;
    }));

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{addr}/events_for_week/"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::OK);
    response.text().await.unwrap();

    let started = Instant::now();
    stop_tx.send(()).unwrap();
    let finished = tokio::time::timeout(SHUTDOWN_GRACE * 3, server)
        .await
        .unwrap()
        .unwrap();

    assert!(finished.is_ok());
    assert!(started.elapsed() < SHUTDOWN_GRACE, "idle connection held up draining");
}

#[tokio::test]
async fn bind_reports_unusable_address() {
    let config = ServerConfig {
        host: String::from("256.256.256.256"),
        port: 0,
    };
    let err = bind(&config).await.unwrap_err();
    assert!(err.to_string().contains("256.256.256.256"));
}
