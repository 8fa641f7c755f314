//! Virtual touch digitizer.
//!
//! Models a multitouch panel with a fixed number of contact slots and logs
//! every synthesized event.  This is the sink the binary runs with when no
//! platform backend is plugged in, and it behaves like a real one: when all
//! slots are taken, new gestures are declined.

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use touch_core::{GestureId, ScreenPoint, TouchPhase};
use tracing::{debug, info, warn};

use crate::application::gesture_tracker::GestureSink;

#[derive(Debug, Default)]
struct Slots {
    active: BTreeMap<GestureId, ScreenPoint>,
    next_id: u64,
}

/// Slot-limited virtual touch panel.
pub struct VirtualTouchSink {
    max_slots: usize,
    slots: Mutex<Slots>,
}

impl VirtualTouchSink {
    /// Creates a panel that accepts at most `max_slots` simultaneous contacts.
    pub fn new(max_slots: usize) -> Self {
        Self {
            max_slots,
            slots: Mutex::new(Slots::default()),
        }
    }

    /// Number of contacts currently down.
    pub fn active_contacts(&self) -> usize {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .active
            .len()
    }
}

impl GestureSink for VirtualTouchSink {
    fn apply_gesture(
        &self,
        point: ScreenPoint,
        phase: TouchPhase,
        current: Option<GestureId>,
        key: &str,
    ) -> Option<GestureId> {
        let mut slots = self.slots.lock().unwrap_or_else(PoisonError::into_inner);

        match phase {
            TouchPhase::Began => {
                if let Some(id) = current.filter(|id| slots.active.contains_key(id)) {
                    slots.active.insert(id, point);
                    debug!(key, id = id.0, x = point.x, y = point.y, "touch re-began");
                    return Some(id);
                }
                if slots.active.len() >= self.max_slots {
                    warn!(key, max = self.max_slots, "no free touch slot; declining gesture");
                    return None;
                }
                let id = GestureId(slots.next_id);
                slots.next_id = slots.next_id.wrapping_add(1);
                slots.active.insert(id, point);
                info!(key, id = id.0, x = point.x, y = point.y, "touch down");
                Some(id)
            }
            TouchPhase::Moved => {
                let id = current?;
                match slots.active.get_mut(&id) {
                    Some(last) => {
                        *last = point;
                        debug!(key, id = id.0, x = point.x, y = point.y, "touch move");
                        Some(id)
                    }
                    None => None,
                }
            }
            TouchPhase::Ended | TouchPhase::Cancelled => {
                if let Some(id) = current {
                    if slots.active.remove(&id).is_some() {
                        info!(key, id = id.0, x = point.x, y = point.y, %phase, "touch up");
                    }
                }
                None
            }
        }
    }
}
