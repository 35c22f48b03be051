use std::io;

use thiserror::Error;
use tokio::io::{
    AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, ReadHalf, WriteHalf,
};

/// Default cap on one inbound message, in bytes. Overridable via config.
pub const DEFAULT_MAX_LINE: usize = 550;

#[derive(Debug, Error)]
pub enum NetError {
    #[error("i/o failure on connection: {0}")]
    Io(#[from] std::io::Error),
    #[error("peer closed the connection")]
    Closed,
    #[error("inbound message exceeds {0} bytes")]
    Oversized(usize),
}

/// Reading half of a connection. Yields one protocol message per call.
pub struct MessageSource<S> {
    reader: BufReader<ReadHalf<S>>,
    max_line: usize,
    buf: Vec<u8>,
    skip_to_newline: bool,
}

impl<S: AsyncRead + AsyncWrite + Unpin> MessageSource<S> {
    /// Reads one newline-terminated message, stripping the terminator.
    /// EOF is `NetError::Closed`. The `max_line` cap is enforced while
    /// reading: a peer streaming an endless unterminated line gets
    /// `Oversized` as soon as the cap is crossed, and the tail of that line
    /// is dropped on the next call rather than buffered.
    ///
    /// Partial progress lives in `self.buf` across calls, so this is safe
    /// to race inside `select!`: an interrupted read loses nothing.
    pub async fn receive(&mut self) -> Result<String, NetError> {
        loop {
            if self.skip_to_newline {
                // Discard the remainder of a line that breached the cap.
                let chunk = self.reader.fill_buf().await?;
                if chunk.is_empty() {
                    return Err(NetError::Closed);
                }
                let (consumed, found) = match chunk.iter().position(|&b| b == b'\n') {
                    Some(pos) => (pos + 1, true),
                    None => (chunk.len(), false),
                };
                self.reader.consume(consumed);
                self.skip_to_newline = !found;
                continue;
            }

            if let Some(pos) = self.buf.iter().position(|&b| b == b'\n') {
                let raw: Vec<u8> = self.buf.drain(..=pos).collect();
                let line = match String::from_utf8(raw) {
                    Ok(line) => line,
                    Err(e) => {
                        return Err(NetError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
                    }
                };
                let line = line.trim_end_matches(['\r', '\n']);
                if line.len() > self.max_line {
                    return Err(NetError::Oversized(self.max_line));
                }
                return Ok(line.to_string());
            }

            // Everything buffered belongs to the current line. One byte of
            // slack for a `\r` still waiting on its `\n`.
            if self.buf.len() > self.max_line + 1 {
                self.buf.clear();
                self.skip_to_newline = true;
                return Err(NetError::Oversized(self.max_line));
            }

            let chunk = self.reader.fill_buf().await?;
            if chunk.is_empty() {
                return Err(NetError::Closed);
            }
            let n = chunk.len();
            self.buf.extend_from_slice(chunk);
            self.reader.consume(n);
        }
    }
}

/// Writing half of a connection.
pub struct MessageSink<S> {
    writer: WriteHalf<S>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> MessageSink<S> {
    pub async fn send(&mut self, line: &str) -> Result<(), NetError> {
        self.writer.write_all(line.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        self.writer.flush().await?;
        Ok(())
    }

    pub async fn close(&mut self) {
        let _ = self.writer.shutdown().await;
    }
}

/// Newline-framed text codec over any byte stream. Production wraps a
/// `TcpStream`; tests drive sessions over `tokio::io::duplex`.
pub struct Connection<S> {
    pub source: MessageSource<S>,
    pub sink: MessageSink<S>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> Connection<S> {
    pub fn new(stream: S, max_line: usize) -> Self {
        let (read_half, write_half) = tokio::io::split(stream);
        Connection {
            source: MessageSource {
                reader: BufReader::new(read_half),
                max_line,
                buf: Vec::new(),
                skip_to_newline: false,
            },
            sink: MessageSink { writer: write_half },
        }
    }

    pub async fn receive(&mut self) -> Result<String, NetError> {
        self.source.receive().await
    }

    pub async fn send(&mut self, line: &str) -> Result<(), NetError> {
        self.sink.send(line).await
    }

    pub async fn close(mut self) {
        self.sink.close().await;
    }

    /// Splits into halves so a session can read and write concurrently.
    pub fn split(self) -> (MessageSource<S>, MessageSink<S>) {
        (self.source, self.sink)
    }
}
