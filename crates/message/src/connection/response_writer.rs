//! Writes a [`Response`] back to the hosting environment.
//!
//! The head (status line and headers) is serialized into one buffer. The
//! body follows in bounded chunks: exactly `Content-Length` bytes when the
//! header is present, otherwise the body's exact size if known, otherwise
//! everything until the end of the stream. A failed write means the
//! connection is gone, so copying stops with [`SendError::Io`].

use crate::protocol::{Response, SendError, is_empty_status};
use bytes::{BufMut, Bytes, BytesMut};
use http::response::Parts;
use http::{HeaderMap, Version, header};
use http_body::Body as HttpBody;
use http_body_util::BodyExt;
use std::io;
use std::io::Write;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, trace};

/// Default upper bound for one body write.
pub const DEFAULT_CHUNK_SIZE: usize = 4 * 1024;

/// Initial buffer size allocated for head serialization.
const INIT_HEADER_SIZE: usize = 1024;

/// How the status is announced to the host.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusLine {
    /// `HTTP/1.1 200 OK`, for hosts that pass the output straight to the client.
    #[default]
    Http,
    /// A `Status: 200 OK` header, for CGI hosts that build the status line themselves.
    Cgi,
}

#[derive(Debug, Clone)]
pub struct ResponseWriter {
    chunk_size: usize,
    status_line: StatusLine,
}

impl ResponseWriter {
    pub fn builder() -> ResponseWriterBuilder {
        ResponseWriterBuilder::new()
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    pub fn status_line(&self) -> StatusLine {
        self.status_line
    }

    /// Sends `response` to `writer`, flushing at the end.
    pub async fn send<W>(&self, writer: &mut W, response: Response) -> Result<(), SendError>
    where
        W: AsyncWrite + Unpin,
    {
        let (parts, mut body) = response.into_parts();

        let mut head = BytesMut::with_capacity(INIT_HEADER_SIZE);
        self.encode_head(&parts, &mut head)?;
        writer.write_all(&head).await?;

        if is_empty_status(parts.status) {
            debug!(status = parts.status.as_u16(), "empty response status, body skipped");
            writer.flush().await?;
            return Ok(());
        }

        let mut remaining = content_length(&parts.headers).or_else(|| body.size_hint().exact());
        let mut written = 0_u64;

        while remaining != Some(0) {
            let Some(frame) = body.frame().await else {
                break;
            };
            let Ok(data) = frame.map_err(SendError::invalid_body)?.into_data() else {
                continue;
            };
            written += self.write_chunks(writer, data, &mut remaining).await?;
        }

        trace!(written, "response body copied");
        writer.flush().await?;
        Ok(())
    }

    async fn write_chunks<W>(&self, writer: &mut W, mut data: Bytes, remaining: &mut Option<u64>) -> Result<u64, SendError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut written = 0_u64;
        while !data.is_empty() && *remaining != Some(0) {
            let mut len = self.chunk_size.min(data.len());
            if let Some(left) = *remaining {
                len = len.min(usize::try_from(left).unwrap_or(usize::MAX));
            }

            let chunk = data.split_to(len);
            writer.write_all(&chunk).await?;

            let len = chunk.len() as u64;
            written += len;
            if let Some(left) = remaining.as_mut() {
                *left -= len;
            }
        }
        Ok(written)
    }

    fn encode_head(&self, parts: &Parts, dst: &mut BytesMut) -> Result<(), SendError> {
        let status = parts.status;
        let reason = status.canonical_reason().unwrap_or_default();

        match self.status_line {
            StatusLine::Http => {
                write!(FastWrite(dst), "HTTP/{} {} {}\r\n", version_str(parts.version), status.as_str(), reason)?;
            }
            StatusLine::Cgi => {
                write!(FastWrite(dst), "Status: {} {}\r\n", status.as_str(), reason)?;
            }
        }

        for (header_name, header_value) in &parts.headers {
            dst.put_slice(header_name.as_ref());
            dst.put_slice(b": ");
            dst.put_slice(header_value.as_ref());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

impl Default for ResponseWriter {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Clone)]
pub struct ResponseWriterBuilder {
    chunk_size: usize,
    status_line: StatusLine,
}

impl ResponseWriterBuilder {
    fn new() -> Self {
        Self { chunk_size: DEFAULT_CHUNK_SIZE, status_line: StatusLine::Http }
    }

    /// Upper bound for one body write; zero falls back to [`DEFAULT_CHUNK_SIZE`].
    pub fn chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = if chunk_size == 0 { DEFAULT_CHUNK_SIZE } else { chunk_size };
        self
    }

    pub fn status_line(mut self, status_line: StatusLine) -> Self {
        self.status_line = status_line;
        self
    }

    pub fn build(self) -> ResponseWriter {
        ResponseWriter { chunk_size: self.chunk_size, status_line: self.status_line }
    }
}

fn content_length(headers: &HeaderMap) -> Option<u64> {
    headers.get(header::CONTENT_LENGTH)?.to_str().ok()?.trim().parse().ok()
}

fn version_str(version: Version) -> &'static str {
    match version {
        Version::HTTP_09 => "0.9",
        Version::HTTP_10 => "1.0",
        Version::HTTP_2 => "2",
        Version::HTTP_3 => "3",
        _ => "1.1",
    }
}

/// Writes formatted text straight into the head buffer.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
