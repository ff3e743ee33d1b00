//! Async reading and writing of protocol frames.

use crate::error::SessionError;
use crate::protocol::Frame;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, instrument, trace};

/// Reads blank-line terminated frames from a buffered stream.
#[derive(Debug)]
pub struct FrameReader<R> {
    inner: R,
    line: String,
}

impl<R: AsyncBufRead + Unpin> FrameReader<R> {
    /// Wraps a buffered reader.
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            line: String::new(),
        }
    }

    /// Reads the next frame.
    ///
    /// Returns `Ok(None)` once the peer closes the stream. Blank lines
    /// between frames and lines that are neither `event:` nor `data:` are
    /// skipped. A frame cut short by end of stream is still returned.
    #[instrument(skip(self))]
    pub async fn read_frame(&mut self) -> Result<Option<Frame>, SessionError> {
        let mut event = None;
        let mut data = Vec::new();

        loop {
            self.line.clear();
            let read = self.inner.read_line(&mut self.line).await?;
            let line = self.line.trim_end_matches(['\r', '\n']);

            if read == 0 || line.is_empty() {
                if event.is_some() || !data.is_empty() {
                    let frame = Frame::new(event.unwrap_or_default(), data);
                    trace!(?frame, "Frame received");
                    return Ok(Some(frame));
                }
                if read == 0 {
                    debug!("Peer closed the stream");
                    return Ok(None);
                }
                continue;
            }

            if let Some(kind) = field(line, "event") {
                event = Some(kind.to_string());
            } else if let Some(payload) = field(line, "data") {
                data.push(payload.to_string());
            } else {
                trace!(line, "Skipping non-field line");
            }
        }
    }
}

/// Value of a `name: value` line, if the line carries that field.
fn field<'a>(line: &'a str, name: &str) -> Option<&'a str> {
    let rest = line.strip_prefix(name)?.strip_prefix(':')?;
    Some(rest.strip_prefix(' ').unwrap_or(rest))
}

/// Writes frames to a stream, flushing after each one.
#[derive(Debug)]
pub struct FrameWriter<W> {
    inner: W,
}

impl<W: AsyncWrite + Unpin> FrameWriter<W> {
    /// Wraps a writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Encodes and sends one frame.
    #[instrument(skip(self, frame), fields(event = %frame.event, lines = frame.data.len()))]
    pub async fn write_frame(&mut self, frame: &Frame) -> Result<(), SessionError> {
        self.inner.write_all(frame.to_string().as_bytes()).await?;
        self.inner.flush().await?;
        trace!("Frame sent");
        Ok(())
    }
}
