//! Recording gesture sink for tests.
//!
//! # Why a recording sink?
//!
//! Real injection backends produce OS-level touches that cannot be observed
//! from test code.  [`RecordingSink`] replaces them with in-memory recording:
//! every call is pushed into a `Mutex<Vec<SinkCall>>` so assertions can check
//! exactly what was injected and in what order.
//!
//! # Behaviour switches
//!
//! - `set_reject_begins(true)` – every `began` returns `None`, simulating a
//!   backend that is out of contact slots.
//! - `set_abandon_moves(true)` – every `moved` returns `None`, simulating a
//!   backend that lost track of the touch.
//! - `set_reassign_on_move(true)` – every `moved` returns a fresh id.
//!
//! # Usage in tests
//!
//! ```ignore
//! let sink = Arc::new(RecordingSink::new());
//! let tracker = GestureTracker::new(Arc::clone(&sink) as Arc<dyn GestureSink>, screen);
//! // ... drive the tracker ...
//! assert_eq!(sink.calls()[0].phase, TouchPhase::Began);
//! ```

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use touch_core::{GestureId, ScreenPoint, TouchPhase};

use crate::application::gesture_tracker::GestureSink;

/// One recorded call to [`GestureSink::apply_gesture`].
#[derive(Debug, Clone, PartialEq)]
pub struct SinkCall {
    pub point: ScreenPoint,
    pub phase: TouchPhase,
    pub current: Option<GestureId>,
    pub key: String,
}

/// A sink that records all calls and never touches the OS.
pub struct RecordingSink {
    calls: Mutex<Vec<SinkCall>>,
    next_id: AtomicU64,
    reject_begins: AtomicBool,
    abandon_moves: AtomicBool,
    reassign_on_move: AtomicBool,
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            // Start at 1 so a zero id never shows up in assertions by accident.
            next_id: AtomicU64::new(1),
            reject_begins: AtomicBool::new(false),
            abandon_moves: AtomicBool::new(false),
            reassign_on_move: AtomicBool::new(false),
        }
    }
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of every call recorded so far, oldest first.
    pub fn calls(&self) -> Vec<SinkCall> {
        self.lock_calls().clone()
    }

    /// `(phase, key)` pairs of every recorded call, oldest first.
    pub fn phases(&self) -> Vec<(TouchPhase, String)> {
        self.lock_calls()
            .iter()
            .map(|c| (c.phase, c.key.clone()))
            .collect()
    }

    pub fn set_reject_begins(&self, reject: bool) {
        self.reject_begins.store(reject, Ordering::SeqCst);
    }

    pub fn set_abandon_moves(&self, abandon: bool) {
        self.abandon_moves.store(abandon, Ordering::SeqCst);
    }

    pub fn set_reassign_on_move(&self, reassign: bool) {
        self.reassign_on_move.store(reassign, Ordering::SeqCst);
    }

    fn lock_calls(&self) -> MutexGuard<'_, Vec<SinkCall>> {
        self.calls.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fresh_id(&self) -> GestureId {
        GestureId(self.next_id.fetch_add(1, Ordering::SeqCst))
    }
}

impl GestureSink for RecordingSink {
    fn apply_gesture(
        &self,
        point: ScreenPoint,
        phase: TouchPhase,
        current: Option<GestureId>,
        key: &str,
    ) -> Option<GestureId> {
        self.lock_calls().push(SinkCall {
            point,
            phase,
            current,
            key: key.to_string(),
        });

        match phase {
            TouchPhase::Began => {
                if self.reject_begins.load(Ordering::SeqCst) {
                    None
                } else {
                    Some(self.fresh_id())
                }
            }
            TouchPhase::Moved => {
                if self.abandon_moves.load(Ordering::SeqCst) {
                    None
                } else if self.reassign_on_move.load(Ordering::SeqCst) {
                    Some(self.fresh_id())
                } else {
                    current
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => None,
        }
    }
}
