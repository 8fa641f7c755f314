//! touch-relay: entry point.
//!
//! Connects to a local touch event source over WebSocket and replays every
//! received event as a synthetic gesture on this host.
//!
//! # Usage
//!
//! ```text
//! touch-relay [OPTIONS]
//!
//! Options:
//!   --endpoint <URL>              WebSocket URL of the event source [default: ws://localhost:8088]
//!   --subprotocol <NAME>          Sec-WebSocket-Protocol to request
//!   --heartbeat-interval-ms <MS>  Liveness tick period [default: 1000]
//!   --connect-timeout-ms <MS>     Handshake timeout [default: 3000]
//!   --screen-width <PX>           Screen width in points [default: 1920]
//!   --screen-height <PX>          Screen height in points [default: 1080]
//!   --max-gestures <N>            Simultaneous contacts accepted [default: 10]
//!   --queue-capacity <N>          Touch queue channel capacity [default: 256]
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable                         | Default               |
//! |----------------------------------|-----------------------|
//! | `TOUCH_RELAY_ENDPOINT`           | `ws://localhost:8088` |
//! | `TOUCH_RELAY_SUBPROTOCOL`        | none                  |
//! | `TOUCH_RELAY_HEARTBEAT_MS`       | `1000`                |
//! | `TOUCH_RELAY_CONNECT_TIMEOUT_MS` | `3000`                |
//! | `TOUCH_RELAY_SCREEN_WIDTH`       | `1920`                |
//! | `TOUCH_RELAY_SCREEN_HEIGHT`      | `1080`                |
//! | `TOUCH_RELAY_MAX_GESTURES`       | `10`                  |
//! | `TOUCH_RELAY_QUEUE_CAPACITY`     | `256`                 |
//!
//! Log verbosity follows `RUST_LOG` (default `info`).

use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Context};
use clap::Parser;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tracing::info;
use tracing_subscriber::EnvFilter;

use touch_core::ScreenSize;
use touch_relay::application::gesture_tracker::{GestureSink, ScreenDimensions};
use touch_relay::domain::RelayConfig;
use touch_relay::infrastructure::{FixedScreen, Relay, VirtualTouchSink};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Replays remote touch events received over a local WebSocket.
#[derive(Debug, Parser)]
#[command(
    name = "touch-relay",
    about = "Replays remote touch events as synthetic gestures on this host",
    version
)]
struct Cli {
    /// WebSocket URL of the touch event source.
    #[arg(long, default_value = "ws://localhost:8088", env = "TOUCH_RELAY_ENDPOINT")]
    endpoint: String,

    /// Sub-protocol to request during the handshake.
    #[arg(long, env = "TOUCH_RELAY_SUBPROTOCOL")]
    subprotocol: Option<String>,

    /// Liveness tick period in milliseconds.
    ///
    /// Each tick sends a heartbeat when connected, or retries the connection
    /// otherwise.
    #[arg(long, default_value_t = 1000, env = "TOUCH_RELAY_HEARTBEAT_MS")]
    heartbeat_interval_ms: u64,

    /// Upper bound on one WebSocket handshake, in milliseconds.
    #[arg(long, default_value_t = 3000, env = "TOUCH_RELAY_CONNECT_TIMEOUT_MS")]
    connect_timeout_ms: u64,

    /// Screen width used to resolve normalised x coordinates.
    #[arg(long, default_value_t = 1920.0, env = "TOUCH_RELAY_SCREEN_WIDTH")]
    screen_width: f64,

    /// Screen height used to resolve normalised y coordinates.
    #[arg(long, default_value_t = 1080.0, env = "TOUCH_RELAY_SCREEN_HEIGHT")]
    screen_height: f64,

    /// Number of simultaneous contacts the virtual touch panel accepts.
    #[arg(long, default_value_t = 10, env = "TOUCH_RELAY_MAX_GESTURES")]
    max_gestures: usize,

    /// Capacity of the touch queue channel.
    #[arg(long, default_value_t = 256, env = "TOUCH_RELAY_QUEUE_CAPACITY")]
    queue_capacity: usize,
}

impl Cli {
    /// Validates the arguments and converts them into a [`RelayConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint is not a WebSocket URL, a duration is
    /// zero, the screen size is not positive, or a capacity is zero.
    fn into_relay_config(self) -> anyhow::Result<RelayConfig> {
        self.endpoint
            .as_str()
            .into_client_request()
            .with_context(|| format!("invalid endpoint URL: '{}'", self.endpoint))?;

        ensure!(
            self.heartbeat_interval_ms > 0,
            "--heartbeat-interval-ms must be greater than zero"
        );
        ensure!(
            self.connect_timeout_ms > 0,
            "--connect-timeout-ms must be greater than zero"
        );

        let screen = ScreenSize::new(self.screen_width, self.screen_height);
        ensure!(
            screen.is_valid(),
            "invalid screen size {}x{}",
            self.screen_width,
            self.screen_height
        );
        ensure!(self.max_gestures > 0, "--max-gestures must be greater than zero");
        ensure!(self.queue_capacity > 0, "--queue-capacity must be greater than zero");

        Ok(RelayConfig {
            endpoint: self.endpoint,
            subprotocol: self.subprotocol,
            heartbeat_interval: Duration::from_millis(self.heartbeat_interval_ms),
            connect_timeout: Duration::from_millis(self.connect_timeout_ms),
            screen,
            max_gestures: self.max_gestures,
            queue_capacity: self.queue_capacity,
        })
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse()
        .into_relay_config()
        .context("invalid configuration")?;

    info!(
        "touch-relay starting: endpoint={}, screen={}x{}, max_gestures={}",
        config.endpoint, config.screen.width, config.screen.height, config.max_gestures
    );

    let sink: Arc<dyn GestureSink> = Arc::new(VirtualTouchSink::new(config.max_gestures));
    let screen: Arc<dyn ScreenDimensions> = Arc::new(FixedScreen::new(config.screen));
    let relay = Relay::start(&config, sink, screen);

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;
    info!("received Ctrl+C, shutting down");

    relay.shutdown().await;
    info!("touch-relay stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
