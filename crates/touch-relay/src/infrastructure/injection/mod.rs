//! Gesture sink implementations.
//!
//! - `virtual_touch` – slot-limited virtual panel that logs each contact; used
//!   by the binary.
//! - `mock` – recording sink for tests.
//!
//! Platform backends implement `application::GestureSink` and are passed to
//! `Relay::start` in place of these.

pub mod mock;
pub mod virtual_touch;

pub use virtual_touch::VirtualTouchSink;
