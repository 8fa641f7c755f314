//! The touch queue: serial owner of the gesture tracker.
//!
//! Every operation on the active-gesture table is a [`TouchCommand`] sent over
//! one `mpsc` channel and executed by one task.  That single channel is what
//! provides the ordering guarantees:
//!
//! - records for the same external id are applied in the order they were
//!   received off the wire;
//! - a flush happens after every apply enqueued before it and before every
//!   apply enqueued after it.
//!
//! Nothing else holds a reference to the tracker, so no lock is needed.  The
//! task is also the only context that calls into the injection sink.
//!
//! ```text
//! transport read loop ──on_text_frame──┐
//!                                      ├──► mpsc ──► TouchQueue task ──► GestureTracker ──► sink
//! liveness supervisor ──flush_all──────┘
//! ```

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use touch_core::{decode_frame, ExternalId, TouchEventRecord};
use tracing::{debug, trace, warn};

use crate::application::gesture_tracker::{ApplyOutcome, GestureTracker};
use crate::application::transport::FrameSubscriber;

/// Error returned when the queue task is no longer running.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum QueueError {
    #[error("touch queue is closed")]
    Closed,
}

/// Commands executed by the queue task, in arrival order.
#[derive(Debug)]
enum TouchCommand {
    Apply(TouchEventRecord),
    FlushAll(oneshot::Sender<usize>),
    Snapshot(oneshot::Sender<Vec<ExternalId>>),
    Close(oneshot::Sender<()>),
}

/// Spawner for the queue task.
pub struct TouchQueue;

impl TouchQueue {
    /// Moves `tracker` into a new task and returns a handle for enqueuing work.
    ///
    /// The task ends on [`TouchQueueHandle::close`] or when every handle has
    /// been dropped.  Either way it flushes whatever is still active before
    /// returning the tracker.
    pub fn spawn(
        tracker: GestureTracker,
        capacity: usize,
    ) -> (TouchQueueHandle, JoinHandle<GestureTracker>) {
        // `mpsc::channel` panics on a zero capacity.
        let (tx, rx) = mpsc::channel(capacity.max(1));
        let task = tokio::spawn(run_queue(tracker, rx));
        (TouchQueueHandle { tx }, task)
    }
}

async fn run_queue(
    mut tracker: GestureTracker,
    mut rx: mpsc::Receiver<TouchCommand>,
) -> GestureTracker {
    while let Some(command) = rx.recv().await {
        match command {
            TouchCommand::Apply(record) => match tracker.apply(&record) {
                ApplyOutcome::Rejected => {
                    debug!(id = record.id, phase = %record.phase, "gesture rejected by sink")
                }
                ApplyOutcome::Abandoned => {
                    debug!(id = record.id, "sink lost track of gesture; entry removed")
                }
                outcome => trace!(id = record.id, phase = %record.phase, ?outcome, "touch record applied"),
            },
            TouchCommand::FlushAll(reply) => {
                let cancelled = tracker.flush_all();
                debug!(cancelled, "flushed active gestures");
                let _ = reply.send(cancelled);
            }
            TouchCommand::Snapshot(reply) => {
                let _ = reply.send(tracker.active_gestures());
            }
            TouchCommand::Close(reply) => {
                let _ = reply.send(());
                break;
            }
        }
    }

    let leftover = tracker.flush_all();
    if leftover > 0 {
        warn!(cancelled = leftover, "touch queue closed with active gestures; cancelled them");
    }
    debug!("touch queue stopped");
    tracker
}

/// Cloneable sender side of the touch queue.
#[derive(Debug, Clone)]
pub struct TouchQueueHandle {
    tx: mpsc::Sender<TouchCommand>,
}

impl TouchQueueHandle {
    /// Enqueues one record.  Returns once it is queued, not once it is applied.
    ///
    /// # Errors
    ///
    /// [`QueueError::Closed`] if the queue task has stopped.
    pub async fn apply(&self, record: TouchEventRecord) -> Result<(), QueueError> {
        self.tx
            .send(TouchCommand::Apply(record))
            .await
            .map_err(|_| QueueError::Closed)
    }

    /// Enqueues a flush and waits for it to run.
    ///
    /// Returns the number of cancellations sent to the sink.
    ///
    /// # Errors
    ///
    /// [`QueueError::Closed`] if the queue task has stopped.
    pub async fn flush_all(&self) -> Result<usize, QueueError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(TouchCommand::FlushAll(reply_tx))
            .await
            .map_err(|_| QueueError::Closed)?;
        reply_rx.await.map_err(|_| QueueError::Closed)
    }

    /// External ids with a live gesture, as of every command enqueued so far.
    ///
    /// # Errors
    ///
    /// [`QueueError::Closed`] if the queue task has stopped.
    pub async fn active_gestures(&self) -> Result<Vec<ExternalId>, QueueError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(TouchCommand::Snapshot(reply_tx))
            .await
            .map_err(|_| QueueError::Closed)?;
        reply_rx.await.map_err(|_| QueueError::Closed)
    }

    /// Stops the queue after everything already enqueued has run.
    ///
    /// # Errors
    ///
    /// [`QueueError::Closed`] if the queue task had already stopped.
    pub async fn close(&self) -> Result<(), QueueError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(TouchCommand::Close(reply_tx))
            .await
            .map_err(|_| QueueError::Closed)?;
        reply_rx.await.map_err(|_| QueueError::Closed)
    }
}

#[async_trait]
impl FrameSubscriber for TouchQueueHandle {
    /// Decodes the frame and enqueues it.  Malformed frames are dropped.
    async fn on_text_frame(&self, text: String) {
        match decode_frame(&text) {
            Ok(record) => {
                if let Err(e) = self.apply(record).await {
                    warn!("dropping touch record {}: {e}", record.id);
                }
            }
            Err(e) => debug!("dropping inbound frame: {e}"),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
