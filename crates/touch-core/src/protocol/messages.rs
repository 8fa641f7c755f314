//! Message types carried over the touch channel.
//!
//! The channel is receive-dominant: the remote event source pushes one JSON
//! text frame per touch event, and the relay only ever sends the fixed
//! heartbeat payload back.
//!
//! # Inbound frame
//!
//! ```json
//! {"id":5,"phase":"began","x":0.5,"y":0.25}
//! ```
//!
//! - `id` correlates the phases of a single gesture.  The source may reuse an
//!   id only after the previous gesture with that id has ended or cancelled.
//! - `x` and `y` are fractions of the screen in `[0, 1]`, so the source does not
//!   need to know the host resolution.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Text payload of the outbound keepalive frame.
///
/// No reply is expected; anything the peer sends back that is not a touch
/// record is dropped by the frame decoder.
pub const HEARTBEAT_PAYLOAD: &str = "ping";

/// Lifecycle phase of a single touch contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TouchPhase {
    /// A finger touched down.  Starts a new gesture for the external id.
    Began,
    /// The finger moved while still touching.
    Moved,
    /// The finger lifted normally.
    Ended,
    /// The gesture was aborted (by the source, or synthesized on transport loss).
    Cancelled,
}

impl TouchPhase {
    /// Returns the lowercase wire spelling of the phase.
    pub fn as_str(self) -> &'static str {
        match self {
            TouchPhase::Began => "began",
            TouchPhase::Moved => "moved",
            TouchPhase::Ended => "ended",
            TouchPhase::Cancelled => "cancelled",
        }
    }

    /// Parses a wire spelling.  Returns `None` for anything unrecognised.
    pub fn from_wire(s: &str) -> Option<Self> {
        match s {
            "began" => Some(TouchPhase::Began),
            "moved" => Some(TouchPhase::Moved),
            "ended" => Some(TouchPhase::Ended),
            "cancelled" => Some(TouchPhase::Cancelled),
            _ => None,
        }
    }

    /// `true` for the two phases that finish a gesture.
    pub fn is_terminal(self) -> bool {
        matches!(self, TouchPhase::Ended | TouchPhase::Cancelled)
    }
}

impl fmt::Display for TouchPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One touch event as decoded from an inbound frame.
///
/// Coordinates are normalised screen fractions; the gesture tracker resolves
/// them against the current screen size at apply time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TouchEventRecord {
    /// External event identifier chosen by the remote source.
    pub id: i64,
    /// Lifecycle phase of this event.
    pub phase: TouchPhase,
    /// Horizontal position as a fraction of screen width.
    pub x: f64,
    /// Vertical position as a fraction of screen height.
    pub y: f64,
}

impl TouchEventRecord {
    /// Convenience constructor used by tests, benches, and the demo tooling.
    pub fn new(id: i64, phase: TouchPhase, x: f64, y: f64) -> Self {
        Self { id, phase, x, y }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
