//! Transport connection state.

use std::fmt;

/// Lifecycle of the transport connection.
///
/// ```text
/// Idle ──connect()──► Connecting ──ok──► Ready ──error/close──► Failed
///                          │                 │                    │
///                          └──error/timeout──┼──► Failed          │
///                                            └─disconnect()─► Cancelled
///            Failed / Cancelled ──connect()──► Connecting ◄────────┘
/// ```
///
/// `Failed` and `Cancelled` are the *down* states: entering one of them means
/// every live gesture must be flushed as cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConnectionState {
    /// No connection has been attempted yet.
    #[default]
    Idle,
    /// A handshake is in flight.
    Connecting,
    /// The channel is open; frames flow in both directions.
    Ready,
    /// The handshake, a read, or a write failed, or the peer closed.
    Failed,
    /// The connection was torn down locally via `disconnect()`.
    Cancelled,
}

impl ConnectionState {
    /// `true` for `Failed` and `Cancelled`.
    pub fn is_down(self) -> bool {
        matches!(self, ConnectionState::Failed | ConnectionState::Cancelled)
    }

    /// `true` while a connection is being established or is established.
    ///
    /// `connect()` is a no-op in these states.
    pub fn is_active(self) -> bool {
        matches!(self, ConnectionState::Connecting | ConnectionState::Ready)
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionState::Idle => "idle",
            ConnectionState::Connecting => "connecting",
            ConnectionState::Ready => "ready",
            ConnectionState::Failed => "failed",
            ConnectionState::Cancelled => "cancelled",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_state_is_idle() {
        assert_eq!(ConnectionState::default(), ConnectionState::Idle);
    }

    #[test]
    fn test_down_states() {
        assert!(ConnectionState::Failed.is_down());
        assert!(ConnectionState::Cancelled.is_down());
        assert!(!ConnectionState::Idle.is_down());
        assert!(!ConnectionState::Connecting.is_down());
        assert!(!ConnectionState::Ready.is_down());
    }

    #[test]
    fn test_active_states() {
        assert!(ConnectionState::Connecting.is_active());
        assert!(ConnectionState::Ready.is_active());
        assert!(!ConnectionState::Failed.is_active());
        assert!(!ConnectionState::Idle.is_active());
    }

    #[test]
    fn test_display_is_lowercase() {
        assert_eq!(ConnectionState::Ready.to_string(), "ready");
        assert_eq!(ConnectionState::Cancelled.to_string(), "cancelled");
    }
}
