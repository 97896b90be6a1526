//! Realtime transport behavior against a raw websocket server.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;
use tokio_tungstenite::tungstenite::Message;
use tutorhub::protocol::ChatMessage;
use tutorhub::{ClientConfig, ConnectionState, ConstantBackoff, RealtimeTransport, RetryConfig};

fn transport_for(addr: std::net::SocketAddr) -> RealtimeTransport {
    let config = ClientConfig::default().with_ws_url(&format!("ws://{addr}"));
    RealtimeTransport::new(&config)
}

fn fast_retry(max_retries: u32) -> RetryConfig {
    RetryConfig::new(max_retries, ConstantBackoff::new(Duration::from_millis(50)))
}

async fn wait_for_state(transport: &RealtimeTransport, want: ConnectionState) {
    for _ in 0..200 {
        if transport.state() == want {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("timed out waiting for {want:?}, still {:?}", transport.state());
}

#[tokio::test]
async fn auth_frame_is_sent_first_and_messages_flow_both_ways() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<String>();

    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(stream).await.unwrap();
        // First inbound frame must be the auth frame.
        let first = ws.next().await.unwrap().unwrap();
        tx.send(first.into_text().unwrap()).unwrap();
        ws.send(Message::Text(
            "{\"kind\":\"chat\",\"content\":\"karibu\"}".into(),
        ))
        .await
        .unwrap();
        let second = ws.next().await.unwrap().unwrap();
        tx.send(second.into_text().unwrap()).unwrap();
    });

    let transport = transport_for(addr);
    let seen = Arc::new(parking_lot::Mutex::new(Vec::<Value>::new()));
    let sink = Arc::clone(&seen);
    transport.subscribe(move |frame| sink.lock().push(frame.clone()));

    transport.connect("tok-live", fast_retry(0));
    wait_for_state(&transport, ConnectionState::Open).await;

    let auth: Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
    assert_eq!(auth, json!({"type": "auth", "token": "tok-live"}));

    for _ in 0..200 {
        if !seen.lock().is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    assert_eq!(seen.lock()[0]["content"], "karibu");

    transport
        .send_message(&ChatMessage {
            conversation_id: "c-7".to_string(),
            content: "asante".to_string(),
        })
        .await
        .unwrap();
    let outbound: Value = serde_json::from_str(&rx.recv().await.unwrap()).unwrap();
    assert_eq!(outbound["conversation_id"], "c-7");
    assert_eq!(outbound["content"], "asante");
}

#[tokio::test]
async fn retry_budget_bounds_reconnect_attempts() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);

    // Accept and drop every connection so each handshake fails.
    tokio::spawn(async move {
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            counter.fetch_add(1, Ordering::SeqCst);
            drop(stream);
        }
    });

    let transport = transport_for(addr);
    transport.connect("tok-live", fast_retry(3));

    // 1 initial attempt + 3 reconnects, then the loop gives up.
    tokio::time::sleep(Duration::from_millis(800)).await;
    assert_eq!(attempts.load(Ordering::SeqCst), 4);
    assert_eq!(transport.state(), ConnectionState::Disconnected);

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(attempts.load(Ordering::SeqCst), 4, "no attempts after budget spent");
}

#[tokio::test]
async fn explicit_disconnect_closes_without_reconnecting() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&accepts);

    tokio::spawn(async move {
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let mut ws = accept_async(stream).await.unwrap();
                while let Some(Ok(frame)) = ws.next().await {
                    if frame.is_close() {
                        break;
                    }
                }
            });
        }
    });

    let transport = transport_for(addr);
    transport.connect("tok-live", fast_retry(3));
    wait_for_state(&transport, ConnectionState::Open).await;

    transport.disconnect().await;
    wait_for_state(&transport, ConnectionState::Closed).await;

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert_eq!(accepts.load(Ordering::SeqCst), 1);
    assert_eq!(transport.state(), ConnectionState::Closed);
}

#[tokio::test]
async fn disconnect_during_backoff_cancels_the_pending_reconnect() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let attempts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&attempts);

    // Accept and drop every connection so each handshake fails.
    tokio::spawn(async move {
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            counter.fetch_add(1, Ordering::SeqCst);
            drop(stream);
        }
    });

    let transport = transport_for(addr);
    transport.connect(
        "tok-live",
        RetryConfig::new(3, ConstantBackoff::new(Duration::from_millis(400))),
    );

    // Let the first attempt fail, then disconnect mid-backoff.
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(attempts.load(Ordering::SeqCst), 1);
    transport.disconnect().await;

    wait_for_state(&transport, ConnectionState::Closed).await;
    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(attempts.load(Ordering::SeqCst), 1, "no dial after disconnect");
}

#[tokio::test]
async fn connect_is_a_no_op_while_already_open() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let accepts = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&accepts);

    tokio::spawn(async move {
        loop {
            let (stream, _) = listener.accept().await.unwrap();
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::spawn(async move {
                let mut ws = accept_async(stream).await.unwrap();
                while ws.next().await.is_some() {}
            });
        }
    });

    let transport = transport_for(addr);
    transport.connect("tok-live", fast_retry(3));
    wait_for_state(&transport, ConnectionState::Open).await;

    transport.connect("tok-live", fast_retry(3));
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(accepts.load(Ordering::SeqCst), 1);
    assert_eq!(transport.state(), ConnectionState::Open);
}
