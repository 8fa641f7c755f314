//! GestureTracker: maps external touch ids to backend gestures.
//!
//! The remote source tags each finger with an integer id; the injection
//! backend tags each synthesized touch with its own [`GestureId`].  The
//! tracker keeps the mapping in a [`GestureTable`] and enforces two rules:
//!
//! 1. A gesture is only tracked once the backend *confirms* its `began`.
//!    If the backend declines (e.g. it is out of contact slots), nothing is
//!    stored and later moves/ends for that id are dropped.
//! 2. Only confirmed gestures receive moves and ends, and only confirmed
//!    gestures are cancelled by [`GestureTracker::flush_all`].
//!
//! The tracker is deliberately synchronous and lock-free: it is owned by the
//! touch queue task, which is the only caller.  See `touch_queue`.

use std::sync::Arc;

use touch_core::{
    ExternalId, GestureId, GestureState, GestureTable, ScreenPoint, ScreenSize,
    TouchEventRecord, TouchPhase,
};

/// Host capability that turns a gesture phase into a synthetic touch.
///
/// Each supported backend provides an implementation in the infrastructure
/// layer.  Implementations are only ever called from the touch queue task.
pub trait GestureSink: Send + Sync {
    /// Applies one phase of a gesture at an absolute screen point.
    ///
    /// - `current` is the backend id previously returned for this gesture,
    ///   or `None` for a fresh `began`.
    /// - `key` is the decimal external id, for backends that label touches.
    ///
    /// Returns the backend id the gesture should carry from now on, or
    /// `None` if the backend declined or no longer tracks the gesture.
    fn apply_gesture(
        &self,
        point: ScreenPoint,
        phase: TouchPhase,
        current: Option<GestureId>,
        key: &str,
    ) -> Option<GestureId>;
}

/// Source of the current host screen size.
pub trait ScreenDimensions: Send + Sync {
    fn screen_size(&self) -> ScreenSize;
}

/// What [`GestureTracker::apply`] did with a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// `began` accepted; the gesture is now confirmed with this id.
    Confirmed(GestureId),
    /// `began` declined by the sink; nothing is tracked for the id.
    Rejected,
    /// `moved` delivered; the gesture continues with this id.
    Updated(GestureId),
    /// `moved` delivered but the sink no longer tracks the gesture.
    Abandoned,
    /// `ended` or `cancelled` delivered; the gesture is gone.
    Released,
    /// Non-`began` record for an id without a confirmed gesture.
    Dropped,
}

/// Owner of the active-gesture table.
pub struct GestureTracker {
    sink: Arc<dyn GestureSink>,
    screen: Arc<dyn ScreenDimensions>,
    table: GestureTable,
}

impl GestureTracker {
    pub fn new(sink: Arc<dyn GestureSink>, screen: Arc<dyn ScreenDimensions>) -> Self {
        Self {
            sink,
            screen,
            table: GestureTable::new(),
        }
    }

    /// Applies one decoded touch record.
    pub fn apply(&mut self, record: &TouchEventRecord) -> ApplyOutcome {
        let point = self.screen.screen_size().resolve(record.x, record.y);
        let key = record.id.to_string();

        match record.phase {
            TouchPhase::Began => self.begin(record.id, point, &key),
            phase => self.continue_gesture(record.id, phase, point, &key),
        }
    }

    fn begin(&mut self, id: ExternalId, point: ScreenPoint, key: &str) -> ApplyOutcome {
        let current = self.table.begin(id, point);
        match self.sink.apply_gesture(point, TouchPhase::Began, current, key) {
            Some(gesture_id) => {
                self.table.confirm(id, gesture_id, point);
                ApplyOutcome::Confirmed(gesture_id)
            }
            None => {
                self.table.remove(id);
                ApplyOutcome::Rejected
            }
        }
    }

    fn continue_gesture(
        &mut self,
        id: ExternalId,
        phase: TouchPhase,
        point: ScreenPoint,
        key: &str,
    ) -> ApplyOutcome {
        // Pending and unknown ids are both expected noise (late or duplicate
        // frames, or a begin the sink declined).
        let Some(current) = self.table.confirmed_id(id) else {
            return ApplyOutcome::Dropped;
        };

        let returned = self.sink.apply_gesture(point, phase, Some(current), key);

        if phase.is_terminal() {
            self.table.remove(id);
            return ApplyOutcome::Released;
        }

        match returned {
            Some(gesture_id) => {
                self.table.confirm(id, gesture_id, point);
                ApplyOutcome::Updated(gesture_id)
            }
            None => {
                self.table.remove(id);
                ApplyOutcome::Abandoned
            }
        }
    }

    /// Empties the table and cancels every confirmed gesture at its last
    /// known point, in ascending external-id order.
    ///
    /// Returns the number of cancellations sent to the sink.  Pending entries
    /// are discarded without a sink call.
    pub fn flush_all(&mut self) -> usize {
        let drained = self.table.take_all();
        let mut cancelled = 0;

        for (id, gesture) in drained {
            match gesture.state {
                GestureState::Confirmed(gesture_id) => {
                    self.sink.apply_gesture(
                        gesture.last_point,
                        TouchPhase::Cancelled,
                        Some(gesture_id),
                        &id.to_string(),
                    );
                    cancelled += 1;
                }
                GestureState::Pending => {}
            }
        }

        cancelled
    }

    /// External ids with a live entry, ascending.
    pub fn active_gestures(&self) -> Vec<ExternalId> {
        self.table.ids()
    }

    #[cfg(test)]
    pub(crate) fn table_mut(&mut self) -> &mut GestureTable {
        &mut self.table
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::injection::mock::{RecordingSink, SinkCall};
    use crate::infrastructure::screen_info::FixedScreen;

    fn make_tracker() -> (GestureTracker, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::new());
        let screen = Arc::new(FixedScreen::new(ScreenSize::new(1000.0, 500.0)));
        let tracker = GestureTracker::new(
            Arc::clone(&sink) as Arc<dyn GestureSink>,
            screen as Arc<dyn ScreenDimensions>,
        );
        (tracker, sink)
    }

    fn rec(id: i64, phase: TouchPhase, x: f64, y: f64) -> TouchEventRecord {
        TouchEventRecord::new(id, phase, x, y)
    }

    // ── Ordering ──────────────────────────────────────────────────────────────

    #[test]
    fn test_began_moves_ended_reach_sink_in_order() {
        // Arrange
        let (mut tracker, sink) = make_tracker();

        // Act
        let began = tracker.apply(&rec(1, TouchPhase::Began, 0.1, 0.1));
        for i in 0..3 {
            tracker.apply(&rec(1, TouchPhase::Moved, 0.2 + 0.1 * i as f64, 0.1));
        }
        let ended = tracker.apply(&rec(1, TouchPhase::Ended, 0.5, 0.1));

        // Assert
        let ApplyOutcome::Confirmed(gid) = began else {
            panic!("began must be confirmed, got {began:?}");
        };
        assert_eq!(ended, ApplyOutcome::Released);

        let calls = sink.calls();
        let phases: Vec<TouchPhase> = calls.iter().map(|c| c.phase).collect();
        assert_eq!(
            phases,
            vec![
                TouchPhase::Began,
                TouchPhase::Moved,
                TouchPhase::Moved,
                TouchPhase::Moved,
                TouchPhase::Ended
            ]
        );
        assert_eq!(calls[0].current, None);
        assert!(calls[1..].iter().all(|c| c.current == Some(gid)));
        assert!(tracker.active_gestures().is_empty());
    }

    #[test]
    fn test_point_is_resolved_against_screen_size() {
        let (mut tracker, sink) = make_tracker();

        tracker.apply(&rec(4, TouchPhase::Began, 0.6, 0.5));

        assert_eq!(sink.calls()[0].point, ScreenPoint::new(600.0, 250.0));
    }

    #[test]
    fn test_sink_key_is_decimal_external_id() {
        let (mut tracker, sink) = make_tracker();

        tracker.apply(&rec(-12, TouchPhase::Began, 0.0, 0.0));

        assert_eq!(sink.calls()[0].key, "-12");
    }

    #[test]
    fn test_independent_ids_are_tracked_separately() {
        let (mut tracker, sink) = make_tracker();

        tracker.apply(&rec(1, TouchPhase::Began, 0.1, 0.1));
        tracker.apply(&rec(2, TouchPhase::Began, 0.9, 0.9));
        tracker.apply(&rec(1, TouchPhase::Ended, 0.1, 0.1));

        assert_eq!(tracker.active_gestures(), vec![2]);
        assert_eq!(sink.calls().len(), 3);
    }

    // ── Drop policy ───────────────────────────────────────────────────────────

    #[test]
    fn test_moved_and_ended_without_began_are_dropped() {
        // Arrange
        let (mut tracker, sink) = make_tracker();

        // Act
        let moved = tracker.apply(&rec(9, TouchPhase::Moved, 0.5, 0.5));
        let ended = tracker.apply(&rec(9, TouchPhase::Ended, 0.5, 0.5));

        // Assert
        assert_eq!(moved, ApplyOutcome::Dropped);
        assert_eq!(ended, ApplyOutcome::Dropped);
        assert!(sink.calls().is_empty());
        assert!(tracker.active_gestures().is_empty());
    }

    #[test]
    fn test_moved_for_pending_gesture_is_dropped() {
        let (mut tracker, sink) = make_tracker();
        tracker.table_mut().insert_pending(3, ScreenPoint::new(1.0, 1.0));

        let outcome = tracker.apply(&rec(3, TouchPhase::Moved, 0.5, 0.5));

        assert_eq!(outcome, ApplyOutcome::Dropped);
        assert!(sink.calls().is_empty());
        // The pending entry itself is untouched.
        assert_eq!(tracker.active_gestures(), vec![3]);
    }

    #[test]
    fn test_rejected_began_is_not_tracked_and_blocks_moves() {
        // Arrange
        let (mut tracker, sink) = make_tracker();
        sink.set_reject_begins(true);

        // Act
        let began = tracker.apply(&rec(2, TouchPhase::Began, 0.5, 0.5));
        let moved = tracker.apply(&rec(2, TouchPhase::Moved, 0.6, 0.5));

        // Assert: only the began reached the sink
        assert_eq!(began, ApplyOutcome::Rejected);
        assert_eq!(moved, ApplyOutcome::Dropped);
        assert_eq!(sink.calls().len(), 1);
        assert!(tracker.active_gestures().is_empty());
    }

    #[test]
    fn test_new_began_after_rejection_can_succeed() {
        let (mut tracker, sink) = make_tracker();
        sink.set_reject_begins(true);
        tracker.apply(&rec(2, TouchPhase::Began, 0.5, 0.5));

        sink.set_reject_begins(false);
        let outcome = tracker.apply(&rec(2, TouchPhase::Began, 0.5, 0.5));

        assert!(matches!(outcome, ApplyOutcome::Confirmed(_)));
        assert_eq!(tracker.active_gestures(), vec![2]);
    }

    #[test]
    fn test_moved_that_sink_abandons_removes_entry() {
        let (mut tracker, sink) = make_tracker();
        tracker.apply(&rec(5, TouchPhase::Began, 0.5, 0.5));
        sink.set_abandon_moves(true);

        let outcome = tracker.apply(&rec(5, TouchPhase::Moved, 0.6, 0.5));
        let after = tracker.apply(&rec(5, TouchPhase::Moved, 0.7, 0.5));

        assert_eq!(outcome, ApplyOutcome::Abandoned);
        assert_eq!(after, ApplyOutcome::Dropped);
        assert_eq!(sink.calls().len(), 2);
    }

    #[test]
    fn test_moved_refreshes_id_from_sink() {
        let (mut tracker, sink) = make_tracker();
        tracker.apply(&rec(5, TouchPhase::Began, 0.5, 0.5));
        sink.set_reassign_on_move(true);

        let outcome = tracker.apply(&rec(5, TouchPhase::Moved, 0.6, 0.5));
        tracker.apply(&rec(5, TouchPhase::Ended, 0.6, 0.5));

        let ApplyOutcome::Updated(new_id) = outcome else {
            panic!("expected Updated, got {outcome:?}");
        };
        let calls = sink.calls();
        assert_ne!(calls[1].current, Some(new_id));
        assert_eq!(calls[2].current, Some(new_id));
    }

    #[test]
    fn test_cancelled_phase_from_source_releases_gesture() {
        let (mut tracker, _sink) = make_tracker();
        tracker.apply(&rec(6, TouchPhase::Began, 0.5, 0.5));

        let outcome = tracker.apply(&rec(6, TouchPhase::Cancelled, 0.5, 0.5));

        assert_eq!(outcome, ApplyOutcome::Released);
        assert!(tracker.active_gestures().is_empty());
    }

    #[test]
    fn test_repeated_began_passes_current_id_to_sink() {
        let (mut tracker, sink) = make_tracker();
        let ApplyOutcome::Confirmed(first) = tracker.apply(&rec(1, TouchPhase::Began, 0.1, 0.1))
        else {
            panic!("first began must be confirmed");
        };

        tracker.apply(&rec(1, TouchPhase::Began, 0.2, 0.2));

        assert_eq!(sink.calls()[1].current, Some(first));
        assert_eq!(tracker.active_gestures(), vec![1]);
    }

    // ── Flush ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_flush_cancels_confirmed_at_last_point_and_skips_pending() {
        // Arrange: A confirmed at p1, B pending at p2
        let (mut tracker, sink) = make_tracker();
        let ApplyOutcome::Confirmed(a_id) = tracker.apply(&rec(1, TouchPhase::Began, 0.1, 0.2))
        else {
            panic!("A must be confirmed");
        };
        tracker.apply(&rec(1, TouchPhase::Moved, 0.3, 0.4));
        tracker
            .table_mut()
            .insert_pending(2, ScreenPoint::new(900.0, 450.0));
        let before = sink.calls().len();

        // Act
        let cancelled = tracker.flush_all();

        // Assert
        assert_eq!(cancelled, 1);
        let calls = sink.calls();
        assert_eq!(calls.len(), before + 1);
        assert_eq!(
            calls[before],
            SinkCall {
                point: ScreenPoint::new(300.0, 200.0),
                phase: TouchPhase::Cancelled,
                current: Some(a_id),
                key: "1".to_string(),
            }
        );
        assert!(tracker.active_gestures().is_empty());
    }

    #[test]
    fn test_second_flush_issues_nothing() {
        let (mut tracker, sink) = make_tracker();
        tracker.apply(&rec(1, TouchPhase::Began, 0.1, 0.1));
        tracker.apply(&rec(2, TouchPhase::Began, 0.2, 0.2));

        let first = tracker.flush_all();
        let calls_after_first = sink.calls().len();
        let second = tracker.flush_all();

        assert_eq!(first, 2);
        assert_eq!(second, 0);
        assert_eq!(sink.calls().len(), calls_after_first);
    }

    #[test]
    fn test_flush_cancels_in_ascending_id_order() {
        let (mut tracker, sink) = make_tracker();
        for id in [30, -1, 7] {
            tracker.apply(&rec(id, TouchPhase::Began, 0.5, 0.5));
        }

        tracker.flush_all();

        let keys: Vec<String> = sink
            .calls()
            .into_iter()
            .filter(|c| c.phase == TouchPhase::Cancelled)
            .map(|c| c.key)
            .collect();
        assert_eq!(keys, vec!["-1", "7", "30"]);
    }

    #[test]
    fn test_apply_after_flush_needs_new_began() {
        let (mut tracker, sink) = make_tracker();
        tracker.apply(&rec(1, TouchPhase::Began, 0.1, 0.1));
        tracker.flush_all();
        let before = sink.calls().len();

        let outcome = tracker.apply(&rec(1, TouchPhase::Moved, 0.2, 0.2));

        assert_eq!(outcome, ApplyOutcome::Dropped);
        assert_eq!(sink.calls().len(), before);
    }
}
