//! Infrastructure layer for touch-relay.
//!
//! - **`transport_session`** – WebSocket client implementing `Transport`.
//! - **`injection`** – `GestureSink` implementations.
//! - **`screen_info`** – `ScreenDimensions` implementations.
//! - **`relay`** – builds and tears down a running relay.

pub mod injection;
pub mod relay;
pub mod screen_info;
pub mod transport_session;

pub use injection::VirtualTouchSink;
pub use relay::{Relay, RelayHandle};
pub use screen_info::FixedScreen;
pub use transport_session::{SessionConfig, TransportSession};
