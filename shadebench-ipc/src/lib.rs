#![warn(missing_docs)]
//! Shadebench IPC Protocol
//!
//! Binary protocol for supervisor-worker communication, serialized with
//! rkyv over length-prefixed frames. One transform exchange carries a
//! whole pixel buffer in each direction: the sandbox boundary is
//! by-value, never shared-memory.

mod framing;
mod messages;

pub use framing::{FrameError, FrameReader, FrameWriter, MAX_FRAME_SIZE};
pub use messages::{SupervisorCommand, WorkerHello, WorkerReply};

/// Protocol version checked during the handshake.
pub const PROTOCOL_VERSION: u32 = 1;
