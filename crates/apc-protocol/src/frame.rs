//! Record framing for the NIS wire protocol.
//!
//! Every record on the wire is a 2-byte big-endian length followed by that
//! many payload bytes. A zero length carries no payload and marks the end of
//! a reply.
//!
//! ```text
//! ┌────────┬──────────────────────┐
//! │ len:u16│ payload (len bytes)  │   ...   0x00 0x00
//! └────────┴──────────────────────┘
//! ```

use std::io;

use thiserror::Error;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::trace;

/// Largest payload a single record can carry.
pub const MAX_RECORD_LEN: usize = u16::MAX as usize;

/// Length of the record header.
pub const RECORD_HEADER_LEN: usize = 2;

/// Errors that can occur while framing records.
#[derive(Error, Debug)]
pub enum FrameError {
    /// The payload does not fit in one record. Nothing was written.
    #[error("buffer too large: {len} bytes (max {MAX_RECORD_LEN})")]
    BufferTooLarge { len: usize },

    /// I/O error from the underlying stream, unchanged.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for framing operations.
pub type Result<T> = std::result::Result<T, FrameError>;

/// A byte stream that speaks NIS records.
///
/// Reads strip record headers and hand out payload bytes; a payload larger
/// than the caller's buffer is delivered across several reads before the next
/// header is consumed. Writes wrap the whole buffer in one record.
#[derive(Debug)]
pub struct NisStream<S> {
    inner: S,
    /// Payload of the record being delivered.
    pending: Vec<u8>,
    /// Bytes of `pending` already handed out.
    cursor: usize,
}

impl<S> NisStream<S> {
    /// Wraps a byte stream.
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            pending: Vec::new(),
            cursor: 0,
        }
    }

    /// Borrows the underlying stream.
    pub fn get_ref(&self) -> &S {
        &self.inner
    }

    /// Unwraps the stream, dropping any undelivered payload.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Returns true if part of the current record has not been read yet.
    pub fn has_pending(&self) -> bool {
        self.cursor < self.pending.len()
    }

    fn remaining(&self) -> &[u8] {
        self.pending.get(self.cursor..).unwrap_or_default()
    }

    fn clear_pending(&mut self) {
        self.pending.clear();
        self.cursor = 0;
    }
}

impl<S: AsyncRead + Unpin> NisStream<S> {
    /// Reads payload bytes into `buf`.
    ///
    /// Returns `Ok(0)` when the end-of-reply record arrives, or when `buf` is
    /// empty. Short reads from the underlying stream surface as
    /// [`io::ErrorKind::UnexpectedEof`].
    pub async fn read(&mut self, buf: &mut [u8]) -> Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }

        if !self.has_pending() && !self.fill().await? {
            return Ok(0);
        }

        let mut n = 0;
        for (dst, src) in buf.iter_mut().zip(self.remaining()) {
            *dst = *src;
            n += 1;
        }
        self.cursor += n;

        if !self.has_pending() {
            self.clear_pending();
        }

        Ok(n)
    }

    /// Reads the rest of the current record, or the next whole record.
    ///
    /// Returns `Ok(None)` when the end-of-reply record arrives.
    pub async fn read_record(&mut self) -> Result<Option<Vec<u8>>> {
        if !self.has_pending() && !self.fill().await? {
            return Ok(None);
        }

        let record = self.remaining().to_vec();
        self.clear_pending();
        Ok(Some(record))
    }

    /// Consumes one record header and its payload into `pending`.
    ///
    /// Returns false on the zero-length end-of-reply record.
    async fn fill(&mut self) -> Result<bool> {
        self.clear_pending();

        let len = usize::from(self.inner.read_u16().await?);
        if len == 0 {
            trace!("Received end of reply");
            return Ok(false);
        }

        self.pending.resize(len, 0);
        if let Err(e) = self.inner.read_exact(&mut self.pending).await {
            self.clear_pending();
            return Err(e.into());
        }

        trace!(len, "Received record");
        Ok(true)
    }
}

impl<S: AsyncWrite + Unpin> NisStream<S> {
    /// Writes `buf` as a single record and flushes.
    ///
    /// Returns the number of payload bytes written; the header is not
    /// counted. Payloads over [`MAX_RECORD_LEN`] are rejected before anything
    /// reaches the stream.
    pub async fn write(&mut self, buf: &[u8]) -> Result<usize> {
        let len = u16::try_from(buf.len())
            .map_err(|_| FrameError::BufferTooLarge { len: buf.len() })?;

        let mut frame = Vec::with_capacity(RECORD_HEADER_LEN + buf.len());
        frame.extend_from_slice(&len.to_be_bytes());
        frame.extend_from_slice(buf);

        self.inner.write_all(&frame).await?;
        self.inner.flush().await?;

        trace!(len, "Sent record");
        Ok(buf.len())
    }

    /// Shuts down the underlying stream.
    pub async fn close(&mut self) -> Result<()> {
        self.inner.shutdown().await?;
        Ok(())
    }
}
