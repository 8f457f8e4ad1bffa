//! Sandbox Worker Supervision
//!
//! Spawns the shadebench binary in worker mode and speaks the frame
//! protocol over its stdio. One worker is spawned per benchmark run and
//! reused for every frame; the handle owns the child process and kills
//! it on drop if a graceful shutdown never happened.

use shadebench_core::RasterImage;
use shadebench_ipc::{
    FrameError, FrameReader, FrameWriter, PROTOCOL_VERSION, SupervisorCommand, WorkerReply,
};
use std::os::unix::io::{AsRawFd, RawFd};
use std::path::Path;
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};
use std::time::{Duration, Instant};
use thiserror::Error;

/// Failures in worker lifecycle or protocol.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// The worker process could not be spawned.
    #[error("failed to spawn worker: {0}")]
    SpawnFailed(#[from] std::io::Error),

    /// A frame could not be read or written.
    #[error("ipc error: {0}")]
    Ipc(String),

    /// The worker process died mid-exchange.
    #[error("worker crashed: {0}")]
    WorkerCrashed(String),

    /// The worker reported it could not process a command.
    #[error("worker failure: {0}")]
    WorkerFailure(String),

    /// No reply arrived within the configured timeout.
    #[error("timed out waiting for worker reply")]
    Timeout,

    /// The worker spoke an unexpected protocol.
    #[error("worker protocol error: expected {expected}, got {got}")]
    Protocol {
        /// What the supervisor was waiting for.
        expected: String,
        /// What actually arrived.
        got: String,
    },
}

impl From<FrameError> for SupervisorError {
    fn from(e: FrameError) -> Self {
        SupervisorError::Ipc(e.to_string())
    }
}

/// Result of polling the worker's stdout for data.
#[derive(Debug)]
enum PollOutcome {
    Ready,
    TimedOut,
    Closed,
    Error(std::io::Error),
}

/// Wait for data on a file descriptor with a timeout.
fn wait_for_data(fd: RawFd, timeout_ms: i32) -> PollOutcome {
    let mut pollfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };

    let result = unsafe { libc::poll(&mut pollfd, 1, timeout_ms) };

    if result < 0 {
        PollOutcome::Error(std::io::Error::last_os_error())
    } else if result == 0 {
        PollOutcome::TimedOut
    } else if pollfd.revents & libc::POLLIN != 0 {
        // Data first: even a closing pipe may still hold a final frame.
        PollOutcome::Ready
    } else if pollfd.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
        PollOutcome::Closed
    } else {
        PollOutcome::TimedOut
    }
}

/// Handle to a running sandbox worker.
pub struct WorkerHandle {
    child: Child,
    reader: FrameReader<ChildStdout>,
    writer: FrameWriter<ChildStdin>,
    reply_timeout: Duration,
    stdout_fd: RawFd,
    shut_down: bool,
}

impl WorkerHandle {
    /// Spawn a worker from the current executable and complete the
    /// handshake.
    pub fn spawn(reply_timeout: Duration) -> Result<Self, SupervisorError> {
        let binary = std::env::current_exe()?;
        Self::spawn_binary(&binary, reply_timeout)
    }

    /// Spawn a worker from a specific binary (used by tests).
    pub fn spawn_binary(binary: &Path, reply_timeout: Duration) -> Result<Self, SupervisorError> {
        let mut child = Command::new(binary)
            .arg("--shade-worker")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| SupervisorError::Ipc("worker stdin unavailable".to_string()))?;
        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| SupervisorError::Ipc("worker stdout unavailable".to_string()))?;
        let stdout_fd = stdout.as_raw_fd();

        let mut handle = Self {
            child,
            reader: FrameReader::new(stdout),
            writer: FrameWriter::new(stdin),
            reply_timeout,
            stdout_fd,
            shut_down: false,
        };

        handle.wait_for_hello()?;
        Ok(handle)
    }

    /// Wait for the Hello frame and validate the protocol version.
    fn wait_for_hello(&mut self) -> Result<(), SupervisorError> {
        match self.read_reply()? {
            WorkerReply::Hello(hello) => {
                if hello.protocol_version != PROTOCOL_VERSION {
                    return Err(SupervisorError::Protocol {
                        expected: format!("protocol version {}", PROTOCOL_VERSION),
                        got: format!("protocol version {}", hello.protocol_version),
                    });
                }
                Ok(())
            }
            other => Err(SupervisorError::Protocol {
                expected: "Hello".to_string(),
                got: format!("{:?}", other),
            }),
        }
    }

    /// Run one grayscale transform in the worker.
    ///
    /// The frame is copied into the command and the result copied out of
    /// the reply; the returned pixels never alias `image`.
    pub fn transform(&mut self, image: &RasterImage) -> Result<Vec<u8>, SupervisorError> {
        self.writer.write(&SupervisorCommand::Transform {
            width: image.width(),
            height: image.height(),
            pixels: image.pixels().to_vec(),
        })?;

        match self.read_reply()? {
            WorkerReply::Frame { pixels } => Ok(pixels),
            WorkerReply::Failure { message } => Err(SupervisorError::WorkerFailure(message)),
            WorkerReply::Hello(_) => Err(SupervisorError::Protocol {
                expected: "Frame or Failure".to_string(),
                got: "Hello".to_string(),
            }),
        }
    }

    /// Read the next reply, polling so a hung worker cannot block the
    /// harness forever.
    fn read_reply(&mut self) -> Result<WorkerReply, SupervisorError> {
        let deadline = Instant::now() + self.reply_timeout;

        loop {
            // With buffered data we still verify the worker is alive —
            // the buffer might hold an incomplete frame that will never
            // be completed.
            if self.reader.has_buffered_data() {
                if !self.is_alive() {
                    return Err(SupervisorError::WorkerCrashed(
                        "worker exited with partial data buffered".to_string(),
                    ));
                }
            } else {
                let remaining = deadline.saturating_duration_since(Instant::now());
                if remaining.is_zero() {
                    let _ = self.child.kill();
                    let _ = self.child.wait();
                    return Err(SupervisorError::Timeout);
                }

                let slice = remaining.min(Duration::from_millis(100));
                match wait_for_data(self.stdout_fd, slice.as_millis() as i32) {
                    PollOutcome::Ready => {}
                    PollOutcome::TimedOut => {
                        if !self.is_alive() {
                            return Err(SupervisorError::WorkerCrashed(
                                "worker exited unexpectedly".to_string(),
                            ));
                        }
                        continue;
                    }
                    PollOutcome::Closed => {
                        return Err(SupervisorError::WorkerCrashed(
                            "worker pipe closed unexpectedly".to_string(),
                        ));
                    }
                    PollOutcome::Error(e) => {
                        return Err(SupervisorError::WorkerCrashed(format!("pipe error: {}", e)));
                    }
                }
            }

            // Poll confirmed data; the read may still block briefly for
            // the rest of a split frame.
            return match self.reader.read::<WorkerReply>() {
                Ok(reply) => Ok(reply),
                Err(FrameError::EndOfStream) => Err(SupervisorError::WorkerCrashed(
                    "worker closed the channel".to_string(),
                )),
                Err(e) => {
                    if !self.is_alive() {
                        return Err(SupervisorError::WorkerCrashed(
                            "worker crashed during read".to_string(),
                        ));
                    }
                    Err(SupervisorError::from(e))
                }
            };
        }
    }

    /// Check whether the worker process is still running.
    pub fn is_alive(&mut self) -> bool {
        matches!(self.child.try_wait(), Ok(None))
    }

    /// Shut the worker down gracefully and wait for it to exit.
    pub fn shutdown(mut self) -> Result<(), SupervisorError> {
        self.writer.write(&SupervisorCommand::Shutdown)?;
        let _ = self.child.wait();
        self.shut_down = true;
        Ok(())
    }
}

impl Drop for WorkerHandle {
    fn drop(&mut self) {
        if !self.shut_down && self.is_alive() {
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}
