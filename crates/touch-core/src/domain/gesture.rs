//! Active-gesture bookkeeping.
//!
//! The remote source identifies each finger with an integer *external id*.
//! The injection backend identifies each synthesized touch with its own
//! opaque [`GestureId`].  [`GestureTable`] maps the former to the latter and
//! remembers the last position of every live gesture so a cancellation can be
//! synthesized if the transport dies mid-gesture.
//!
//! # Pending vs. confirmed
//!
//! A gesture is [`GestureState::Pending`] between "a `began` was received" and
//! "the backend accepted it".  Only [`GestureState::Confirmed`] gestures may
//! receive moves and ends, and only confirmed gestures are cancelled on flush.
//! Modelling this as an enum rather than an `Option<GestureId>` makes every
//! match over the state exhaustive.

use std::collections::BTreeMap;

use crate::domain::geometry::ScreenPoint;

/// Identifier chosen by the remote event source.
pub type ExternalId = i64;

/// Opaque token assigned by the injection backend to a confirmed gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GestureId(pub u64);

/// Whether the injection backend has accepted a gesture yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    /// `began` was requested but not (yet) accepted by the backend.
    Pending,
    /// The backend accepted the gesture and assigned it this id.
    Confirmed(GestureId),
}

impl GestureState {
    /// Returns the backend id for confirmed gestures.
    pub fn gesture_id(self) -> Option<GestureId> {
        match self {
            GestureState::Pending => None,
            GestureState::Confirmed(id) => Some(id),
        }
    }
}

/// One live gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActiveGesture {
    pub state: GestureState,
    /// Last absolute position delivered to the backend.
    pub last_point: ScreenPoint,
}

/// Table of live gestures keyed by external id.
///
/// Iteration order is ascending external id, which keeps flush output
/// deterministic.
#[derive(Debug, Default)]
pub struct GestureTable {
    entries: BTreeMap<ExternalId, ActiveGesture>,
}

impl GestureTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ExternalId) -> Option<&ActiveGesture> {
        self.entries.get(&id)
    }

    /// Returns the backend id if `id` has a confirmed gesture.
    pub fn confirmed_id(&self, id: ExternalId) -> Option<GestureId> {
        self.entries.get(&id).and_then(|g| g.state.gesture_id())
    }

    /// Looks up or creates the entry for a `began` at `point`.
    ///
    /// A new entry starts as [`GestureState::Pending`].  An existing entry keeps
    /// its state and only has its position refreshed.  Returns the entry's
    /// current backend id, if it has one.
    pub fn begin(&mut self, id: ExternalId, point: ScreenPoint) -> Option<GestureId> {
        let entry = self.entries.entry(id).or_insert(ActiveGesture {
            state: GestureState::Pending,
            last_point: point,
        });
        entry.last_point = point;
        entry.state.gesture_id()
    }

    /// Inserts a pending entry, replacing any existing one.
    pub fn insert_pending(&mut self, id: ExternalId, point: ScreenPoint) {
        self.entries.insert(
            id,
            ActiveGesture {
                state: GestureState::Pending,
                last_point: point,
            },
        );
    }

    /// Marks `id` as confirmed with the given backend id and position.
    pub fn confirm(&mut self, id: ExternalId, gesture_id: GestureId, point: ScreenPoint) {
        self.entries.insert(
            id,
            ActiveGesture {
                state: GestureState::Confirmed(gesture_id),
                last_point: point,
            },
        );
    }

    pub fn remove(&mut self, id: ExternalId) -> Option<ActiveGesture> {
        self.entries.remove(&id)
    }

    /// Empties the table in one step and returns everything that was in it.
    pub fn take_all(&mut self) -> BTreeMap<ExternalId, ActiveGesture> {
        std::mem::take(&mut self.entries)
    }

    /// External ids of all live entries, ascending.
    pub fn ids(&self) -> Vec<ExternalId> {
        self.entries.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> ScreenPoint {
        ScreenPoint::new(x, y)
    }

    #[test]
    fn test_begin_creates_pending_entry() {
        // Arrange
        let mut table = GestureTable::new();

        // Act
        let current = table.begin(7, p(10.0, 20.0));

        // Assert
        assert_eq!(current, None);
        let entry = table.get(7).unwrap();
        assert_eq!(entry.state, GestureState::Pending);
        assert_eq!(entry.last_point, p(10.0, 20.0));
    }

    #[test]
    fn test_begin_on_confirmed_entry_keeps_id_and_refreshes_point() {
        let mut table = GestureTable::new();
        table.confirm(7, GestureId(3), p(1.0, 1.0));

        let current = table.begin(7, p(5.0, 5.0));

        assert_eq!(current, Some(GestureId(3)));
        assert_eq!(table.get(7).unwrap().last_point, p(5.0, 5.0));
        assert_eq!(table.confirmed_id(7), Some(GestureId(3)));
    }

    #[test]
    fn test_confirmed_id_is_none_for_pending_and_missing() {
        let mut table = GestureTable::new();
        table.insert_pending(1, p(0.0, 0.0));

        assert_eq!(table.confirmed_id(1), None);
        assert_eq!(table.confirmed_id(2), None);
    }

    #[test]
    fn test_take_all_empties_table() {
        let mut table = GestureTable::new();
        table.confirm(2, GestureId(20), p(2.0, 2.0));
        table.insert_pending(1, p(1.0, 1.0));

        let taken = table.take_all();

        assert!(table.is_empty());
        assert_eq!(taken.keys().copied().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_ids_are_ascending() {
        let mut table = GestureTable::new();
        table.confirm(9, GestureId(1), p(0.0, 0.0));
        table.confirm(-4, GestureId(2), p(0.0, 0.0));
        table.confirm(3, GestureId(3), p(0.0, 0.0));

        assert_eq!(table.ids(), vec![-4, 3, 9]);
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn test_remove_returns_entry() {
        let mut table = GestureTable::new();
        table.confirm(1, GestureId(11), p(4.0, 4.0));

        let removed = table.remove(1).unwrap();

        assert_eq!(removed.state, GestureState::Confirmed(GestureId(11)));
        assert!(table.remove(1).is_none());
    }
}
