//! IPC Message Types
//!
//! The vocabulary is deliberately narrow: the worker exposes exactly one
//! entry point (transform a frame), plus lifecycle plumbing. Pixel
//! buffers are carried inside the messages, so each exchange copies the
//! frame in and the result out.

use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};

/// Worker identity advertised during the handshake.
#[derive(Debug, Clone, PartialEq, Eq, Archive, RkyvSerialize, RkyvDeserialize)]
#[archive(check_bytes)]
pub struct WorkerHello {
    /// Protocol version; a mismatch fails the handshake.
    pub protocol_version: u32,
}

impl Default for WorkerHello {
    fn default() -> Self {
        Self {
            protocol_version: crate::PROTOCOL_VERSION,
        }
    }
}

/// Commands sent from the supervisor to the worker.
#[derive(Debug, Clone, Archive, RkyvSerialize, RkyvDeserialize)]
#[archive(check_bytes)]
pub enum SupervisorCommand {
    /// Apply the grayscale transform to one frame.
    Transform {
        /// Frame width in pixels.
        width: u32,
        /// Frame height in pixels.
        height: u32,
        /// Interleaved RGBA bytes, `width * height * 4` of them.
        pixels: Vec<u8>,
    },

    /// Request graceful shutdown.
    Shutdown,
}

/// Replies sent from the worker to the supervisor.
#[derive(Debug, Clone, Archive, RkyvSerialize, RkyvDeserialize)]
#[archive(check_bytes)]
pub enum WorkerReply {
    /// Initial handshake; its arrival completes backend initialization.
    Hello(WorkerHello),

    /// A transformed frame, same dimensions as the command it answers.
    Frame {
        /// Interleaved RGBA bytes of the transformed frame.
        pixels: Vec<u8>,
    },

    /// The worker could not process the command.
    Failure {
        /// Human-readable reason, logged by the supervisor.
        message: String,
    },
}
