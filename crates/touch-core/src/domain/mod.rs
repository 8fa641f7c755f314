//! Domain entities for the touch relay.
//!
//! All types here are pure data and state machines.  They perform no I/O and
//! know nothing about tokio, WebSockets, or the injection backend.
//!
//! # Sub-modules
//!
//! - **`connection`** – [`ConnectionState`], the lifecycle of the transport as
//!   seen by the liveness supervisor.
//! - **`geometry`** – screen sizes and points, and the mapping from normalised
//!   fractions to pixels.
//! - **`gesture`** – the active-gesture table keyed by external event id.

pub mod connection;
pub mod geometry;
pub mod gesture;

pub use connection::ConnectionState;
pub use geometry::{ScreenPoint, ScreenSize};
pub use gesture::{ActiveGesture, ExternalId, GestureId, GestureState, GestureTable};
