//! Liveness supervisor.
//!
//! Keeps the transport alive and keeps the gesture table consistent with it:
//!
//! - every heartbeat tick either sends `"ping"` (when `Ready`) or asks the
//!   transport to connect (any other state);
//! - a failed heartbeat write triggers an immediate reconnect attempt;
//! - every transition into `Failed` or `Cancelled` enqueues exactly one
//!   `flush_all` on the touch queue.
//!
//! Retry is a fixed-interval loop with no backoff.  The endpoint is on
//! loopback and a rate of one attempt per tick is cheap for both sides.
//!
//! Because the transport awaits the frame subscriber before it publishes a
//! terminal state, the flush triggered here always lands in the touch queue
//! behind every frame the dead connection delivered.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use touch_core::{ConnectionState, HEARTBEAT_PAYLOAD};
use tracing::{debug, error, info, warn};

use crate::application::touch_queue::TouchQueueHandle;
use crate::application::transport::Transport;

/// Heartbeat, reconnect, and flush-on-loss policy.
pub struct LivenessSupervisor {
    transport: Arc<dyn Transport>,
    touch_queue: TouchQueueHandle,
    heartbeat_interval: Duration,
    /// Whether the last observed state was a down state.
    down: bool,
}

impl LivenessSupervisor {
    pub fn new(
        transport: Arc<dyn Transport>,
        touch_queue: TouchQueueHandle,
        heartbeat_interval: Duration,
    ) -> Self {
        Self {
            transport,
            touch_queue,
            heartbeat_interval,
            down: false,
        }
    }

    /// One liveness tick.
    ///
    /// Never flushes; flushing is driven by state transitions only.
    pub fn tick(&self) {
        let state = self.transport.state();
        if state != ConnectionState::Ready {
            debug!(%state, "liveness tick: reconnecting");
            self.transport.connect();
            return;
        }

        match self.transport.send_text(HEARTBEAT_PAYLOAD) {
            Ok(receipt) => {
                debug!("heartbeat queued");
                let transport = Arc::clone(&self.transport);
                tokio::spawn(async move {
                    if let Err(e) = receipt.wait().await {
                        warn!("heartbeat write failed: {e}; reconnecting");
                        transport.connect();
                    }
                });
            }
            Err(e) => {
                warn!("heartbeat not sent: {e}; reconnecting");
                self.transport.connect();
            }
        }
    }

    /// Reacts to a state transition pushed by the transport.
    ///
    /// Returns `true` when a flush was performed.  Repeated down states with
    /// no non-down state in between flush only once.
    pub async fn on_state_change(&mut self, state: ConnectionState) -> bool {
        if !state.is_down() {
            if self.down {
                debug!(%state, "connection recovering");
            }
            self.down = false;
            return false;
        }
        if self.down {
            return false;
        }

        self.down = true;
        match self.touch_queue.flush_all().await {
            Ok(cancelled) => info!(%state, cancelled, "connection lost; flushed active gestures"),
            Err(e) => warn!(%state, "connection lost but flush failed: {e}"),
        }
        true
    }

    /// Runs the supervisor on its own task.
    ///
    /// The first tick fires immediately, so spawning also starts the first
    /// connection attempt.
    pub fn spawn(self) -> SupervisorHandle {
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(stop_rx));
        SupervisorHandle {
            stop: stop_tx,
            task,
        }
    }

    async fn run(mut self, mut stop: oneshot::Receiver<()>) {
        let mut states = self.transport.subscribe();
        let mut ticker = interval(self.heartbeat_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                _ = ticker.tick() => self.tick(),

                received = states.recv() => match received {
                    Ok(state) => {
                        self.on_state_change(state).await;
                    }
                    Err(RecvError::Lagged(skipped)) => {
                        // Missed transitions; the current state is what matters.
                        warn!(skipped, "state notifications lagged; sampling current state");
                        let state = self.transport.state();
                        self.on_state_change(state).await;
                    }
                    Err(RecvError::Closed) => {
                        error!("transport state channel closed; stopping supervisor");
                        break;
                    }
                },

                // Also fires when the handle is dropped without `shutdown`.
                _ = &mut stop => break,
            }
        }

        match self.touch_queue.flush_all().await {
            Ok(cancelled) => info!(cancelled, "supervisor stopping; flushed active gestures"),
            Err(e) => warn!("supervisor stopping; flush failed: {e}"),
        }
        self.transport.disconnect();
        debug!("liveness supervisor stopped");
    }
}

/// Handle to a running [`LivenessSupervisor`].
pub struct SupervisorHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl SupervisorHandle {
    /// Stops the heartbeat timer, flushes every live gesture, then
    /// disconnects the transport.  Returns once all three have happened.
    pub async fn shutdown(self) {
        let _ = self.stop.send(());
        if let Err(e) = self.task.await {
            error!("liveness supervisor task failed: {e}");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
