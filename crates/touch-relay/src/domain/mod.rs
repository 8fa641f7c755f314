//! Domain layer for touch-relay.
//!
//! Holds the plain configuration struct.  No tokio, no sockets, no
//! environment reads: `main.rs` builds a [`RelayConfig`] from CLI arguments
//! and hands it to the infrastructure layer.

pub mod config;

pub use config::RelayConfig;
