//! Application layer for touch-relay.
//!
//! Knows *what* happens to an event and to the connection, and delegates
//! *how* (sockets, OS injection) to infrastructure through traits.
//!
//! - **`transport`** – the [`Transport`] seam the supervisor drives, and the
//!   [`FrameSubscriber`] seam the transport delivers frames through.
//! - **`gesture_tracker`** – maps external ids to backend gestures and
//!   enforces phase ordering.  Talks to the host through [`GestureSink`].
//! - **`touch_queue`** – the single task that owns the tracker; every table
//!   mutation is a message on its channel.
//! - **`liveness`** – heartbeat, reconnect, and flush-on-loss policy.

pub mod gesture_tracker;
pub mod liveness;
pub mod touch_queue;
pub mod transport;

pub use gesture_tracker::{ApplyOutcome, GestureSink, GestureTracker};
pub use liveness::{LivenessSupervisor, SupervisorHandle};
pub use touch_queue::{QueueError, TouchQueue, TouchQueueHandle};
pub use transport::{FrameSubscriber, SendReceipt, Transport, TransportError};
