//! Relay configuration.
//!
//! [`RelayConfig`] is the single source of truth for runtime settings.  It is
//! populated from CLI arguments (see `main.rs`) or from [`Default`] in tests
//! and embedded use.

use std::time::Duration;

use touch_core::ScreenSize;

/// Default WebSocket endpoint of the local event source.
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8088";

/// All runtime configuration for the relay.
///
/// # Example
///
/// ```rust
/// use touch_relay::domain::RelayConfig;
///
/// let cfg = RelayConfig::default();
/// assert_eq!(cfg.endpoint, "ws://localhost:8088");
/// assert_eq!(cfg.heartbeat_interval.as_secs(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// WebSocket URL of the event source.  Always a loopback address in
    /// practice; the channel is neither authenticated nor encrypted.
    pub endpoint: String,

    /// Value for the `Sec-WebSocket-Protocol` header, when the source expects
    /// a pre-negotiated sub-protocol.
    pub subprotocol: Option<String>,

    /// Period of the liveness tick.  Each tick either sends a heartbeat or
    /// attempts a reconnect, so this also bounds the reconnect rate.
    pub heartbeat_interval: Duration,

    /// Upper bound on a single WebSocket handshake.
    pub connect_timeout: Duration,

    /// Host screen size used to resolve normalised coordinates.
    pub screen: ScreenSize,

    /// Number of simultaneous contacts the virtual injection sink accepts.
    pub max_gestures: usize,

    /// Capacity of the touch queue command channel.
    pub queue_capacity: usize,
}

impl Default for RelayConfig {
    /// | Field              | Default               |
    /// |--------------------|-----------------------|
    /// | endpoint           | `ws://localhost:8088` |
    /// | subprotocol        | none                  |
    /// | heartbeat_interval | 1 second              |
    /// | connect_timeout    | 3 seconds             |
    /// | screen             | 1920 × 1080           |
    /// | max_gestures       | 10                    |
    /// | queue_capacity     | 256                   |
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            subprotocol: None,
            heartbeat_interval: Duration::from_secs(1),
            connect_timeout: Duration::from_secs(3),
            screen: ScreenSize::new(1920.0, 1080.0),
            max_gestures: 10,
            queue_capacity: 256,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_endpoint_is_local_8088() {
        let cfg = RelayConfig::default();
        assert_eq!(cfg.endpoint, DEFAULT_ENDPOINT);
        assert!(cfg.endpoint.contains("8088"));
    }

    #[test]
    fn test_default_heartbeat_is_one_second() {
        let cfg = RelayConfig::default();
        assert_eq!(cfg.heartbeat_interval, Duration::from_secs(1));
    }

    #[test]
    fn test_default_has_no_subprotocol() {
        assert!(RelayConfig::default().subprotocol.is_none());
    }

    #[test]
    fn test_default_screen_is_valid_1080p() {
        let cfg = RelayConfig::default();
        assert!(cfg.screen.is_valid());
        assert_eq!(cfg.screen, ScreenSize::new(1920.0, 1080.0));
    }

    #[test]
    fn test_config_can_be_cloned() {
        let cfg = RelayConfig {
            subprotocol: Some("touch.v1".to_string()),
            ..RelayConfig::default()
        };
        let cloned = cfg.clone();
        assert_eq!(cloned.subprotocol.as_deref(), Some("touch.v1"));
        assert_eq!(cloned.max_gestures, cfg.max_gestures);
    }
}
