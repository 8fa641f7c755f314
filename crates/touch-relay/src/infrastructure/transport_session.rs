//! WebSocket client transport.
//!
//! [`TransportSession`] implements [`Transport`] on top of
//! `tokio-tungstenite`.  Each call to `connect` spawns one connection attempt
//! identified by a fresh UUID.  A successful attempt splits the socket and
//! runs two tasks:
//!
//! - **reader**: forwards each text frame to the [`FrameSubscriber`] and
//!   awaits it before reading the next one;
//! - **writer**: drains an unbounded queue of outbound frames and resolves
//!   each frame's [`SendReceipt`].
//!
//! Any handshake error, timeout, read error, write error, peer close, or end
//! of stream moves the session to `Failed`.  Only the reader publishes that
//! state once connected, and only after its last `on_text_frame` call has
//! returned.  The writer reports its failure to the reader instead.
//!
//! Tasks belonging to a connection that has since been replaced or torn down
//! carry a stale UUID, and their transitions are ignored.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use touch_core::ConnectionState;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::application::transport::{FrameSubscriber, SendReceipt, Transport, TransportError};
use crate::domain::config::RelayConfig;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Capacity of the state notification channel.  Slow subscribers see
/// `Lagged` and fall back to sampling `state()`.
const STATE_CHANNEL_CAPACITY: usize = 16;

const SUBPROTOCOL_HEADER: &str = "Sec-WebSocket-Protocol";

/// Connection settings for a [`TransportSession`].
#[derive(Debug, Clone)]
pub struct SessionConfig {
    pub endpoint: String,
    pub subprotocol: Option<String>,
    pub connect_timeout: Duration,
}

impl From<&RelayConfig> for SessionConfig {
    fn from(config: &RelayConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            subprotocol: config.subprotocol.clone(),
            connect_timeout: config.connect_timeout,
        }
    }
}

struct Outbound {
    text: String,
    done: oneshot::Sender<Result<(), TransportError>>,
}

#[derive(Default)]
struct SessionInner {
    state: ConnectionState,
    /// Id of the connection attempt that currently owns the session.
    connection_id: Option<Uuid>,
    outbound: Option<mpsc::UnboundedSender<Outbound>>,
    tasks: Vec<JoinHandle<()>>,
}

impl SessionInner {
    fn tear_down(&mut self) {
        self.connection_id = None;
        self.outbound = None;
        for task in self.tasks.drain(..) {
            task.abort();
        }
    }
}

struct Shared {
    config: SessionConfig,
    subscriber: Arc<dyn FrameSubscriber>,
    state_tx: broadcast::Sender<ConnectionState>,
    inner: Mutex<SessionInner>,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Moves connection `id` into `state`, unless another attempt owns the
    /// session by now.  Returns whether the transition happened.
    fn transition(&self, id: Uuid, state: ConnectionState) -> bool {
        let mut inner = self.lock();
        if inner.connection_id != Some(id) {
            debug!(connection = %id, %state, "ignoring transition from stale connection");
            return false;
        }
        inner.tear_down();
        inner.state = state;
        // No receivers is fine; nobody is watching yet.
        let _ = self.state_tx.send(state);
        true
    }
}

/// WebSocket client implementing [`Transport`].
pub struct TransportSession {
    shared: Arc<Shared>,
}

impl TransportSession {
    /// Creates an idle session.  Nothing is opened until [`Transport::connect`].
    pub fn new(config: SessionConfig, subscriber: Arc<dyn FrameSubscriber>) -> Self {
        let (state_tx, _) = broadcast::channel(STATE_CHANNEL_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                config,
                subscriber,
                state_tx,
                inner: Mutex::new(SessionInner::default()),
            }),
        }
    }

    /// Id of the connection attempt in flight or established, if any.
    pub fn connection_id(&self) -> Option<Uuid> {
        self.shared.lock().connection_id
    }
}

impl Transport for TransportSession {
    fn state(&self) -> ConnectionState {
        self.shared.lock().state
    }

    fn subscribe(&self) -> broadcast::Receiver<ConnectionState> {
        self.shared.state_tx.subscribe()
    }

    fn connect(&self) {
        let mut inner = self.shared.lock();
        if inner.state.is_active() {
            return;
        }

        let id = Uuid::new_v4();
        inner.connection_id = Some(id);
        inner.state = ConnectionState::Connecting;
        let _ = self.shared.state_tx.send(ConnectionState::Connecting);
        debug!(connection = %id, endpoint = %self.shared.config.endpoint, "connecting");

        let task = tokio::spawn(run_connection(Arc::clone(&self.shared), id));
        inner.tasks.push(task);
    }

    fn send_text(&self, payload: &str) -> Result<SendReceipt, TransportError> {
        let inner = self.shared.lock();
        let outbound = match (&inner.outbound, inner.state) {
            (Some(outbound), ConnectionState::Ready) => outbound,
            (_, state) => return Err(TransportError::NotReady(state)),
        };

        let (done_tx, done_rx) = oneshot::channel();
        outbound
            .send(Outbound {
                text: payload.to_owned(),
                done: done_tx,
            })
            .map_err(|_| TransportError::ChannelClosed)?;
        Ok(SendReceipt::new(done_rx))
    }

    fn disconnect(&self) {
        let mut inner = self.shared.lock();
        if matches!(
            inner.state,
            ConnectionState::Idle | ConnectionState::Cancelled
        ) {
            return;
        }

        let id = inner.connection_id;
        inner.tear_down();
        inner.state = ConnectionState::Cancelled;
        let _ = self.shared.state_tx.send(ConnectionState::Cancelled);
        info!(connection = ?id, "disconnected");
    }
}

impl Drop for TransportSession {
    fn drop(&mut self) {
        self.shared.lock().tear_down();
    }
}

// ── Connection tasks ──────────────────────────────────────────────────────────

async fn run_connection(shared: Arc<Shared>, id: Uuid) {
    let ws = match open(&shared.config).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!(connection = %id, endpoint = %shared.config.endpoint, "{e}");
            shared.transition(id, ConnectionState::Failed);
            return;
        }
    };

    let (sink, stream) = ws.split();
    let (write_failed_tx, write_failed_rx) = mpsc::channel(1);
    {
        let mut inner = shared.lock();
        if inner.connection_id != Some(id) {
            return;
        }
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let writer = tokio::spawn(run_writer(id, sink, out_rx, write_failed_tx));
        inner.tasks.push(writer);
        inner.outbound = Some(out_tx);
        inner.state = ConnectionState::Ready;
        let _ = shared.state_tx.send(ConnectionState::Ready);
    }
    info!(connection = %id, endpoint = %shared.config.endpoint, "connected");

    read_frames(&shared, id, stream, write_failed_rx).await;
    shared.transition(id, ConnectionState::Failed);
}

async fn open(config: &SessionConfig) -> Result<WsStream, TransportError> {
    let mut request = config
        .endpoint
        .as_str()
        .into_client_request()
        .map_err(|e| TransportError::Handshake(format!("invalid endpoint: {e}")))?;

    if let Some(protocol) = &config.subprotocol {
        let value = HeaderValue::from_str(protocol)
            .map_err(|e| TransportError::Handshake(format!("invalid subprotocol: {e}")))?;
        request.headers_mut().insert(SUBPROTOCOL_HEADER, value);
    }

    match timeout(config.connect_timeout, connect_async(request)).await {
        Ok(Ok((ws, _response))) => Ok(ws),
        Ok(Err(e)) => Err(TransportError::Handshake(e.to_string())),
        Err(_) => Err(TransportError::Handshake(format!(
            "timed out after {} ms",
            config.connect_timeout.as_millis()
        ))),
    }
}

/// Delivers inbound frames until the connection ends.
///
/// A write failure reported by the writer stops the loop between frames, so a
/// delivery already in progress always completes first.
async fn read_frames(
    shared: &Shared,
    id: Uuid,
    mut stream: SplitStream<WsStream>,
    mut write_failed: mpsc::Receiver<()>,
) {
    loop {
        let frame = tokio::select! {
            frame = stream.next() => frame,
            Some(()) = write_failed.recv() => {
                info!(connection = %id, "stopping reader after write failure");
                return;
            }
        };
        let Some(frame) = frame else { break };

        match frame {
            Ok(WsMessage::Text(text)) => shared.subscriber.on_text_frame(text).await,
            Ok(WsMessage::Binary(bytes)) => match String::from_utf8(bytes) {
                Ok(text) => shared.subscriber.on_text_frame(text).await,
                Err(_) => debug!(connection = %id, "dropping non-UTF-8 binary frame"),
            },
            Ok(WsMessage::Close(close)) => {
                info!(connection = %id, ?close, "peer closed the connection");
                return;
            }
            // Ping/pong are answered by tungstenite itself.
            Ok(_) => {}
            Err(e) => {
                warn!(connection = %id, "read failed: {e}");
                return;
            }
        }
    }
    info!(connection = %id, "connection stream ended");
}

/// Writes queued frames in order.  On the first failure it resolves that
/// frame's receipt, tells the reader, and exits; the reader owns the
/// transition to `Failed`.
async fn run_writer(
    id: Uuid,
    mut sink: SplitSink<WsStream, WsMessage>,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    write_failed: mpsc::Sender<()>,
) {
    while let Some(Outbound { text, done }) = outbound.recv().await {
        match sink.send(WsMessage::Text(text)).await {
            Ok(()) => {
                let _ = done.send(Ok(()));
            }
            Err(e) => {
                warn!(connection = %id, "write failed: {e}");
                let _ = done.send(Err(TransportError::Write(e.to_string())));
                let _ = write_failed.try_send(());
                return;
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
