//! Length-Prefixed Frame Encoding
//!
//! Provides reliable message boundaries over the worker's stdio streams.
//!
//! Frame format:
//! ```text
//! +----------------+------------------+
//! | length (4 LE)  | rkyv payload     |
//! +----------------+------------------+
//! ```

use rkyv::ser::serializers::AllocSerializer;
use rkyv::validation::validators::DefaultValidator;
use rkyv::{Archive, CheckBytes, Deserialize, Infallible, Serialize};
use std::io::{BufReader, BufWriter, Read, Write};
use thiserror::Error;

/// Maximum frame size. Frames carry whole RGBA buffers, so the cap is
/// sized for large photographs (a 8192x8192 RGBA frame is 256 MB), not
/// for small control messages.
pub const MAX_FRAME_SIZE: usize = 256 * 1024 * 1024;

/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, Error)]
pub enum FrameError {
    /// Underlying stream failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The outgoing message could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The incoming payload failed validation.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// A frame exceeded [`MAX_FRAME_SIZE`].
    #[error("frame too large: {size} bytes (max {max} bytes)")]
    FrameTooLarge {
        /// Announced payload size.
        size: usize,
        /// The configured cap.
        max: usize,
    },

    /// A structurally impossible frame (e.g. zero length).
    #[error("invalid frame: {0}")]
    InvalidFrame(String),

    /// The peer closed the stream between frames.
    #[error("end of stream")]
    EndOfStream,
}

/// Buffered frame writer.
pub struct FrameWriter<W: Write> {
    writer: BufWriter<W>,
}

impl<W: Write> FrameWriter<W> {
    /// Wrap a stream in a frame writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::with_capacity(64 * 1024, writer),
        }
    }

    /// Serialize one message and write it as a frame, flushing so the
    /// peer sees it immediately.
    pub fn write<T>(&mut self, message: &T) -> Result<(), FrameError>
    where
        T: Serialize<AllocSerializer<256>>,
    {
        let bytes = rkyv::to_bytes::<_, 256>(message)
            .map_err(|e| FrameError::Serialization(e.to_string()))?;

        let len = bytes.len();
        if len > MAX_FRAME_SIZE {
            return Err(FrameError::FrameTooLarge {
                size: len,
                max: MAX_FRAME_SIZE,
            });
        }

        self.writer.write_all(&(len as u32).to_le_bytes())?;
        self.writer.write_all(&bytes)?;
        self.writer.flush()?;

        Ok(())
    }
}

/// Buffered frame reader.
pub struct FrameReader<R: Read> {
    reader: BufReader<R>,
}

impl<R: Read> FrameReader<R> {
    /// Wrap a stream in a frame reader.
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::with_capacity(64 * 1024, reader),
        }
    }

    /// Read, validate and deserialize the next frame.
    pub fn read<T>(&mut self) -> Result<T, FrameError>
    where
        T: Archive,
        T::Archived: for<'a> CheckBytes<DefaultValidator<'a>> + Deserialize<T, Infallible>,
    {
        let mut len_buf = [0u8; 4];
        match self.reader.read_exact(&mut len_buf) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::UnexpectedEof => {
                return Err(FrameError::EndOfStream);
            }
            Err(e) => return Err(FrameError::Io(e)),
        }

        let len = u32::from_le_bytes(len_buf) as usize;
        if len > MAX_FRAME_SIZE {
            return Err(FrameError::FrameTooLarge {
                size: len,
                max: MAX_FRAME_SIZE,
            });
        }
        if len == 0 {
            return Err(FrameError::InvalidFrame("zero-length frame".to_string()));
        }

        // rkyv validation requires an aligned buffer.
        let mut buf = rkyv::AlignedVec::with_capacity(len);
        buf.resize(len, 0);
        self.reader.read_exact(&mut buf)?;

        let archived = rkyv::check_archived_root::<T>(&buf)
            .map_err(|e| FrameError::Deserialization(e.to_string()))?;

        let value: T = archived
            .deserialize(&mut Infallible)
            .expect("infallible deserialization");

        Ok(value)
    }

    /// Whether bytes are already buffered (a frame, or part of one, has
    /// arrived but not been consumed).
    pub fn has_buffered_data(&self) -> bool {
        !self.reader.buffer().is_empty()
    }
}
