//! Wiring for a running relay.
//!
//! [`Relay::start`] builds the components in dependency order:
//!
//! 1. `GestureTracker` around the injection sink and screen provider.
//! 2. `TouchQueue` task that owns the tracker.
//! 3. `TransportSession` whose frames feed the queue.
//! 4. `LivenessSupervisor`, whose first tick opens the connection.
//!
//! [`RelayHandle::shutdown`] tears them down in reverse.

use std::sync::Arc;

use tokio::task::JoinHandle;
use touch_core::{ConnectionState, ExternalId};
use tracing::{error, info};

use crate::application::gesture_tracker::{GestureSink, GestureTracker, ScreenDimensions};
use crate::application::liveness::{LivenessSupervisor, SupervisorHandle};
use crate::application::touch_queue::{QueueError, TouchQueue, TouchQueueHandle};
use crate::application::transport::{FrameSubscriber, Transport};
use crate::domain::config::RelayConfig;
use crate::infrastructure::transport_session::{SessionConfig, TransportSession};

/// Entry point for starting a relay.
pub struct Relay;

impl Relay {
    /// Starts every component and returns immediately.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        config: &RelayConfig,
        sink: Arc<dyn GestureSink>,
        screen: Arc<dyn ScreenDimensions>,
    ) -> RelayHandle {
        let tracker = GestureTracker::new(sink, screen);
        let (queue, queue_task) = TouchQueue::spawn(tracker, config.queue_capacity);

        let subscriber: Arc<dyn FrameSubscriber> = Arc::new(queue.clone());
        let transport = Arc::new(TransportSession::new(
            SessionConfig::from(config),
            subscriber,
        ));

        let supervisor = LivenessSupervisor::new(
            Arc::clone(&transport) as Arc<dyn Transport>,
            queue.clone(),
            config.heartbeat_interval,
        )
        .spawn();

        info!(
            endpoint = %config.endpoint,
            heartbeat_ms = config.heartbeat_interval.as_millis() as u64,
            "relay started"
        );

        RelayHandle {
            transport,
            queue,
            queue_task,
            supervisor,
        }
    }
}

/// Handle to a running relay.
pub struct RelayHandle {
    transport: Arc<TransportSession>,
    queue: TouchQueueHandle,
    queue_task: JoinHandle<GestureTracker>,
    supervisor: SupervisorHandle,
}

impl RelayHandle {
    /// Current connection state.
    pub fn state(&self) -> ConnectionState {
        self.transport.state()
    }

    /// External ids with a live gesture.
    pub async fn active_gestures(&self) -> Result<Vec<ExternalId>, QueueError> {
        self.queue.active_gestures().await
    }

    /// Stops the supervisor (flush, then disconnect) and then the touch queue.
    pub async fn shutdown(self) {
        self.supervisor.shutdown().await;

        if let Err(e) = self.queue.close().await {
            error!("touch queue already stopped: {e}");
        }
        match self.queue_task.await {
            Ok(_) => info!("relay stopped"),
            Err(e) => error!("touch queue task failed: {e}"),
        }
    }
}
