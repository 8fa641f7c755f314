//! # touch-core
//!
//! Shared library for the touch relay containing the inbound frame codec,
//! gesture bookkeeping, and screen geometry.
//!
//! This crate has zero dependencies on sockets, async runtimes, or OS input
//! APIs.  Everything here can be exercised from a plain `#[test]`.
//!
//! # Architecture overview (for beginners)
//!
//! A remote event source (for example a phone or a browser page) streams touch
//! events as small JSON text frames.  The relay replays them on the host as
//! synthetic touches.  This crate defines:
//!
//! - **`protocol`** – What a frame looks like on the wire and how it is turned
//!   into a typed [`TouchEventRecord`].  Malformed frames become a
//!   [`FrameError`] that callers drop silently.
//!
//! - **`domain`** – Pure state with no I/O: the [`GestureTable`] that tracks
//!   which external ids are currently live, the [`GestureState`] marker that
//!   distinguishes pending from confirmed gestures, screen geometry, and the
//!   [`ConnectionState`] of the transport.

pub mod domain;
pub mod protocol;

// Re-export the most-used types at the crate root so callers can write
// `touch_core::GestureTable` instead of `touch_core::domain::gesture::GestureTable`.
pub use domain::connection::ConnectionState;
pub use domain::geometry::{ScreenPoint, ScreenSize};
pub use domain::gesture::{ActiveGesture, ExternalId, GestureId, GestureState, GestureTable};
pub use protocol::codec::{decode_frame, encode_frame, FrameError};
pub use protocol::messages::{TouchEventRecord, TouchPhase, HEARTBEAT_PAYLOAD};
