//! touch-relay library crate.
//!
//! Receives touch events from a remote source over a persistent local
//! WebSocket and replays them as synthetic gestures on the host, keeping the
//! channel alive and cancelling in-flight gestures whenever it drops.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Remote source (JSON text frames over WebSocket)
//!         ↓
//! [touch-relay]
//!   ├── domain/            RelayConfig
//!   ├── application/
//!   │     ├── transport        Transport / FrameSubscriber traits
//!   │     ├── gesture_tracker  external id → gesture, phase ordering
//!   │     ├── touch_queue      serial owner of the tracker
//!   │     └── liveness         heartbeat, reconnect, flush on loss
//!   └── infrastructure/
//!         ├── transport_session  WebSocket client (tokio-tungstenite)
//!         ├── injection          gesture sinks (virtual, recording)
//!         ├── screen_info        screen dimension providers
//!         └── relay              wiring: start / shutdown
//!         ↓
//! Injection sink (synthetic touches on the host)
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O.
//! - `application` depends on `domain` and `touch-core`, and on tokio channels
//!   only for message passing between components.
//! - `infrastructure` owns sockets and the concrete backends.

/// Domain layer: configuration.
pub mod domain;

/// Application layer: gesture tracking, the touch queue, and liveness.
pub mod application;

/// Infrastructure layer: WebSocket transport, injection sinks, wiring.
pub mod infrastructure;
