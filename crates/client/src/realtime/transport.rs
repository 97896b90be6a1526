//! Websocket transport with bounded reconnection and listener fanout.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};
use tracing::{debug, warn};
use tutorhub_protocol::{AuthFrame, ChatMessage};

use crate::config::ClientConfig;
use crate::error::{Error, Result};
use crate::realtime::backoff::{BackoffPolicy, ConstantBackoff};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSink = SplitSink<WsStream, Message>;

type Listener = Arc<dyn Fn(&Value) + Send + Sync>;

/// Connection lifecycle state.
///
/// `Disconnected → Connecting → Open`; `Open → Disconnected` on close;
/// `Connecting → Disconnected` on error. `Closed` is entered only through
/// an explicit [`RealtimeTransport::disconnect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Open,
    Closed,
}

/// Retry budget and delay policy for one `connect` call.
///
/// The budget covers the connection's whole lifetime: every reconnect after
/// a close or error consumes one retry, successful opens do not replenish
/// it, and once exhausted the transport stays Disconnected permanently.
#[derive(Clone)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub backoff: Arc<dyn BackoffPolicy>,
}

impl RetryConfig {
    pub fn new(max_retries: u32, backoff: impl BackoffPolicy + 'static) -> Self {
        Self {
            max_retries,
            backoff: Arc::new(backoff),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new(3, ConstantBackoff::default())
    }
}

/// Handle returned by [`RealtimeTransport::subscribe`]; pass it back to
/// [`RealtimeTransport::unsubscribe`] to stop delivery.
#[derive(Debug)]
pub struct Subscription {
    id: u64,
}

/// The persistent bidirectional connection used for live message delivery.
#[derive(Clone)]
pub struct RealtimeTransport {
    inner: Arc<TransportInner>,
}

struct TransportInner {
    url: String,
    state: parking_lot::Mutex<ConnectionState>,
    listeners: parking_lot::Mutex<Vec<(u64, Listener)>>,
    next_subscription: AtomicU64,
    sink: tokio::sync::Mutex<Option<WsSink>>,
    closing: AtomicBool,
    running: AtomicBool,
}

impl RealtimeTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            inner: Arc::new(TransportInner {
                url: config.ws_url.clone(),
                state: parking_lot::Mutex::new(ConnectionState::Disconnected),
                listeners: parking_lot::Mutex::new(Vec::new()),
                next_subscription: AtomicU64::new(0),
                sink: tokio::sync::Mutex::new(None),
                closing: AtomicBool::new(false),
                running: AtomicBool::new(false),
            }),
        }
    }

    pub fn state(&self) -> ConnectionState {
        *self.inner.state.lock()
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Open
    }

    /// Registers a listener for incoming frames.
    ///
    /// Listeners are invoked synchronously, in registration order, once per
    /// parsed frame.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let id = self.inner.next_subscription.fetch_add(1, Ordering::SeqCst);
        self.inner.listeners.lock().push((id, Arc::new(listener)));
        Subscription { id }
    }

    /// Stops delivery to a previously registered listener.
    pub fn unsubscribe(&self, subscription: &Subscription) {
        self.inner
            .listeners
            .lock()
            .retain(|(id, _)| *id != subscription.id);
    }

    /// Opens the connection and runs it until the retry budget is spent or
    /// [`disconnect`](Self::disconnect) is called.
    ///
    /// No-op while a connection is already open or a connection loop is
    /// still running. On every successful open the first outbound frame is
    /// the authentication frame carrying `token`.
    pub fn connect(&self, token: &str, retry: RetryConfig) {
        if self.state() == ConnectionState::Open {
            debug!(target = "tutorhub.realtime", "already connected; ignoring connect");
            return;
        }
        if self.inner.running.swap(true, Ordering::SeqCst) {
            debug!(target = "tutorhub.realtime", "connection loop already running");
            return;
        }
        self.inner.closing.store(false, Ordering::SeqCst);

        let inner = Arc::clone(&self.inner);
        let token = token.to_string();
        tokio::spawn(async move {
            run_connection(&inner, &token, retry).await;
            inner.running.store(false, Ordering::SeqCst);
        });
    }

    /// Sends a chat message over the open connection.
    ///
    /// Messages are never queued: sending while the transport is not Open
    /// is an error.
    pub async fn send_message(&self, message: &ChatMessage) -> Result<()> {
        if self.state() != ConnectionState::Open {
            return Err(Error::RealtimeNotConnected);
        }
        let text = serde_json::to_string(message)?;
        let mut sink = self.inner.sink.lock().await;
        let Some(sink) = sink.as_mut() else {
            return Err(Error::RealtimeNotConnected);
        };
        sink.send(Message::Text(text.into())).await?;
        Ok(())
    }

    /// Closes the active connection and stops the reconnect loop.
    ///
    /// Does not reset any retry budget and does not clear listeners; a
    /// later `connect` starts over with a fresh budget.
    pub async fn disconnect(&self) {
        self.inner.closing.store(true, Ordering::SeqCst);
        let mut sink = self.inner.sink.lock().await;
        if let Some(sink) = sink.as_mut() {
            let _ = sink.send(Message::Close(None)).await;
        }
    }
}

impl TransportInner {
    fn set_state(&self, state: ConnectionState) {
        *self.state.lock() = state;
    }

    /// Parses one raw frame and fans it out.
    ///
    /// Malformed frames are dropped and logged; they never abort the
    /// dispatch loop. The listener list is snapshotted so callbacks may
    /// subscribe or unsubscribe without deadlocking.
    fn dispatch(&self, raw: &str) {
        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(
                    target = "tutorhub.realtime",
                    error = %err,
                    "dropping malformed frame"
                );
                return;
            }
        };
        let snapshot: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        for listener in snapshot {
            listener(&value);
        }
    }
}

async fn run_connection(inner: &TransportInner, token: &str, retry: RetryConfig) {
    let mut reconnects = 0u32;
    loop {
        // A disconnect during the backoff sleep must not dial again.
        if inner.closing.load(Ordering::SeqCst) {
            inner.set_state(ConnectionState::Closed);
            debug!(target = "tutorhub.realtime", "transport closed before dialing");
            return;
        }

        inner.set_state(ConnectionState::Connecting);
        debug!(target = "tutorhub.realtime", url = %inner.url, "connecting");

        match connect_async(inner.url.as_str()).await {
            Ok((ws, _)) => {
                let (mut sink, mut stream) = ws.split();
                if send_auth_frame(&mut sink, token).await {
                    *inner.sink.lock().await = Some(sink);
                    inner.set_state(ConnectionState::Open);
                    debug!(target = "tutorhub.realtime", "websocket open");
                    read_loop(inner, &mut stream).await;
                    inner.sink.lock().await.take();
                }
            }
            Err(err) => {
                warn!(
                    target = "tutorhub.realtime",
                    error = %err,
                    "websocket connect failed"
                );
            }
        }

        if inner.closing.load(Ordering::SeqCst) {
            inner.set_state(ConnectionState::Closed);
            debug!(target = "tutorhub.realtime", "transport closed");
            return;
        }

        inner.set_state(ConnectionState::Disconnected);

        if reconnects >= retry.max_retries {
            warn!(
                target = "tutorhub.realtime",
                attempts = reconnects,
                "retry budget exhausted; staying disconnected"
            );
            return;
        }
        reconnects += 1;
        let delay = retry.backoff.next_delay(reconnects);
        debug!(
            target = "tutorhub.realtime",
            attempt = reconnects,
            remaining = retry.max_retries - reconnects,
            delay_ms = delay.as_millis() as u64,
            "scheduling reconnect"
        );
        tokio::time::sleep(delay).await;
    }
}

async fn send_auth_frame(sink: &mut WsSink, token: &str) -> bool {
    let frame = AuthFrame::Auth {
        token: token.to_string(),
    };
    let text = match serde_json::to_string(&frame) {
        Ok(text) => text,
        Err(err) => {
            warn!(target = "tutorhub.realtime", error = %err, "auth frame serialization failed");
            return false;
        }
    };
    match sink.send(Message::Text(text.into())).await {
        Ok(()) => true,
        Err(err) => {
            warn!(
                target = "tutorhub.realtime",
                error = %err,
                "failed to send auth frame"
            );
            false
        }
    }
}

async fn read_loop(inner: &TransportInner, stream: &mut SplitStream<WsStream>) {
    while let Some(frame) = stream.next().await {
        match frame {
            Ok(Message::Text(text)) => inner.dispatch(&text),
            Ok(Message::Close(_)) => {
                debug!(target = "tutorhub.realtime", "peer closed connection");
                break;
            }
            Ok(_) => {} // binary/ping/pong frames carry no application data
            Err(err) => {
                warn!(target = "tutorhub.realtime", error = %err, "websocket read error");
                break;
            }
        }
    }
}
