//! Sandbox Worker Entry Point
//!
//! The worker side of the supervisor-worker boundary. The supervisor
//! re-executes the shadebench binary with a hidden flag; this loop then
//! owns the process: announce the protocol version, read commands from
//! stdin, apply the kernel, write reply frames to stdout. Pixels cross
//! the boundary by copy in both directions — the supervisor may not
//! assume any aliasing with its own buffers.

use crate::filter::grayscale_in_place;
use crate::raster::BYTES_PER_PIXEL;
use shadebench_ipc::{FrameError, FrameReader, FrameWriter, SupervisorCommand, WorkerHello, WorkerReply};

/// Worker main loop over the process's stdio.
pub struct WorkerMain {
    reader: FrameReader<std::io::Stdin>,
    writer: FrameWriter<std::io::Stdout>,
}

impl WorkerMain {
    /// Create a worker speaking the frame protocol over stdin/stdout.
    pub fn new() -> Self {
        Self {
            reader: FrameReader::new(std::io::stdin()),
            writer: FrameWriter::new(std::io::stdout()),
        }
    }

    /// Run the command loop until shutdown or end of stream.
    pub fn run(&mut self) -> Result<(), FrameError> {
        // The handshake completes the backend's one-time initialization.
        self.writer.write(&WorkerReply::Hello(WorkerHello::default()))?;

        loop {
            let command: SupervisorCommand = match self.reader.read() {
                Ok(command) => command,
                // Supervisor went away; treat like a shutdown.
                Err(FrameError::EndOfStream) => break,
                Err(e) => return Err(e),
            };

            match command {
                SupervisorCommand::Transform {
                    width,
                    height,
                    pixels,
                } => {
                    let reply = transform_reply(width, height, pixels);
                    self.writer.write(&reply)?;
                }
                SupervisorCommand::Shutdown => break,
            }
        }

        Ok(())
    }
}

impl Default for WorkerMain {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle one transform command.
///
/// Malformed frames and panics become `Failure` replies so a bad request
/// cannot take the worker down mid-protocol.
fn transform_reply(width: u32, height: u32, pixels: Vec<u8>) -> WorkerReply {
    let expected = width as usize * height as usize * BYTES_PER_PIXEL;
    if width == 0 || height == 0 || pixels.len() != expected {
        return WorkerReply::Failure {
            message: format!(
                "malformed frame: {}x{} with {} pixel bytes",
                width,
                height,
                pixels.len()
            ),
        };
    }

    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        let mut pixels = pixels;
        grayscale_in_place(&mut pixels);
        pixels
    }));

    match result {
        Ok(pixels) => WorkerReply::Frame { pixels },
        Err(panic) => {
            let message = if let Some(s) = panic.downcast_ref::<&str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "unknown panic".to_string()
            };
            WorkerReply::Failure { message }
        }
    }
}
