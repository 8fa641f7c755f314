//! Wire protocol: inbound touch-event frames and the outbound heartbeat.

pub mod codec;
pub mod messages;

pub use codec::{decode_frame, encode_frame, FrameError};
pub use messages::{TouchEventRecord, TouchPhase, HEARTBEAT_PAYLOAD};
