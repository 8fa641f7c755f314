//! Transport seams.
//!
//! The liveness supervisor drives the connection only through [`Transport`],
//! and the connection hands inbound frames out only through
//! [`FrameSubscriber`].  The concrete WebSocket implementation lives in
//! `infrastructure::transport_session`; tests substitute a `mockall` mock.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{broadcast, oneshot};
use touch_core::ConnectionState;

/// Errors surfaced by the transport.
///
/// None of these are retried inside the transport itself.  Connection-level
/// failures also show up as a transition to [`ConnectionState::Failed`], which
/// is what the supervisor reacts to.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransportError {
    /// `send_text` was called while the connection was not `Ready`.
    #[error("transport not ready (state: {0})")]
    NotReady(ConnectionState),

    /// The endpoint could not be turned into a request, or the handshake failed.
    #[error("WebSocket handshake failed: {0}")]
    Handshake(String),

    /// Writing a frame to the socket failed.
    #[error("WebSocket write failed: {0}")]
    Write(String),

    /// The connection's writer went away before the frame was written.
    #[error("connection writer closed")]
    ChannelClosed,
}

/// Completion handle for a frame queued with [`Transport::send_text`].
#[derive(Debug)]
pub struct SendReceipt {
    rx: oneshot::Receiver<Result<(), TransportError>>,
}

impl SendReceipt {
    pub fn new(rx: oneshot::Receiver<Result<(), TransportError>>) -> Self {
        Self { rx }
    }

    /// A receipt that is already resolved with `result`.
    pub fn completed(result: Result<(), TransportError>) -> Self {
        let (tx, rx) = oneshot::channel();
        let _ = tx.send(result);
        Self { rx }
    }

    /// Waits until the frame has been written (or has failed to be).
    ///
    /// A writer that is dropped without answering counts as
    /// [`TransportError::ChannelClosed`].
    pub async fn wait(self) -> Result<(), TransportError> {
        self.rx.await.unwrap_or(Err(TransportError::ChannelClosed))
    }
}

/// Outbound connection as seen by the liveness supervisor.
#[cfg_attr(test, mockall::automock)]
pub trait Transport: Send + Sync {
    /// Samples the current connection state.
    fn state(&self) -> ConnectionState;

    /// Subscribes to state transitions.  Each transition is pushed once.
    fn subscribe(&self) -> broadcast::Receiver<ConnectionState>;

    /// Starts a connection attempt.  No-op while `Connecting` or `Ready`.
    fn connect(&self);

    /// Queues a text frame.
    ///
    /// # Errors
    ///
    /// Returns [`TransportError::NotReady`] unless the state is `Ready`.
    fn send_text(&self, payload: &str) -> Result<SendReceipt, TransportError>;

    /// Tears the connection down and moves to `Cancelled`.  Idempotent.
    fn disconnect(&self);
}

/// Receiver of inbound text frames.
///
/// The transport awaits `on_text_frame` before reading the next frame, so an
/// implementation that enqueues work preserves wire order.
#[async_trait]
pub trait FrameSubscriber: Send + Sync {
    async fn on_text_frame(&self, text: String);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_completed_receipt_yields_result() {
        assert_eq!(SendReceipt::completed(Ok(())).wait().await, Ok(()));

        let err = TransportError::Write("broken pipe".into());
        assert_eq!(SendReceipt::completed(Err(err.clone())).wait().await, Err(err));
    }

    #[tokio::test]
    async fn test_dropped_writer_resolves_as_channel_closed() {
        // Arrange
        let (tx, rx) = oneshot::channel();
        let receipt = SendReceipt::new(rx);

        // Act
        drop(tx);

        // Assert
        assert_eq!(receipt.wait().await, Err(TransportError::ChannelClosed));
    }

    #[test]
    fn test_not_ready_error_mentions_state() {
        let err = TransportError::NotReady(ConnectionState::Failed);
        assert_eq!(err.to_string(), "transport not ready (state: failed)");
    }
}
