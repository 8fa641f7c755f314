//! JSON codec for touch-event frames.
//!
//! Wire format (one UTF-8 text frame per event):
//! ```text
//! {"id":<integer>,"phase":"began"|"moved"|"ended"|"cancelled","x":<0..1>,"y":<0..1>}
//! ```
//!
//! Decoding is strict: missing fields, extra fields, a non-integer `id`, an
//! unknown phase, or a coordinate outside `[0, 1]` all produce a
//! [`FrameError`].  Callers treat every `FrameError` as "drop this frame";
//! none of them close the channel.

use serde::Deserialize;
use thiserror::Error;

use crate::protocol::messages::{TouchEventRecord, TouchPhase};

/// Reasons an inbound frame could not be turned into a [`TouchEventRecord`].
#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    /// The text is not JSON, or does not have exactly the expected fields.
    #[error("malformed touch frame: {0}")]
    Json(String),

    /// The `phase` field holds a string that is not a known phase.
    #[error("unknown touch phase: {0:?}")]
    UnknownPhase(String),

    /// A coordinate is outside the normalised `[0, 1]` range.
    #[error("coordinate {axis}={value} is outside [0, 1]")]
    CoordinateOutOfRange { axis: char, value: f64 },
}

/// Shape of the frame as it appears on the wire.
///
/// `phase` is kept as a string here so an unrecognised phase can be reported
/// as [`FrameError::UnknownPhase`] rather than a generic JSON error.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct WireTouchEvent {
    id: i64,
    phase: String,
    x: f64,
    y: f64,
}

/// Decodes one inbound text frame.
///
/// # Errors
///
/// Returns [`FrameError`] for any frame that is not a well-formed touch
/// record.
///
/// # Examples
///
/// ```rust
/// use touch_core::protocol::{decode_frame, TouchPhase};
///
/// let record = decode_frame(r#"{"id":5,"phase":"moved","x":0.6,"y":0.5}"#).unwrap();
/// assert_eq!(record.id, 5);
/// assert_eq!(record.phase, TouchPhase::Moved);
/// ```
pub fn decode_frame(text: &str) -> Result<TouchEventRecord, FrameError> {
    let wire: WireTouchEvent =
        serde_json::from_str(text).map_err(|e| FrameError::Json(e.to_string()))?;

    let phase = TouchPhase::from_wire(&wire.phase).ok_or(FrameError::UnknownPhase(wire.phase))?;
    check_fraction('x', wire.x)?;
    check_fraction('y', wire.y)?;

    Ok(TouchEventRecord {
        id: wire.id,
        phase,
        x: wire.x,
        y: wire.y,
    })
}

/// Encodes a record into the wire format.
///
/// The relay itself never sends touch frames; this exists for test servers,
/// benches, and event-source tooling that need to produce valid frames.
pub fn encode_frame(record: &TouchEventRecord) -> String {
    serde_json::json!({
        "id": record.id,
        "phase": record.phase.as_str(),
        "x": record.x,
        "y": record.y,
    })
    .to_string()
}

fn check_fraction(axis: char, value: f64) -> Result<(), FrameError> {
    // `contains` is false for NaN as well, so non-finite values are rejected here.
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(FrameError::CoordinateOutOfRange { axis, value })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
