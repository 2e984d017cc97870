//! Streaming response bodies
//!
//! A `StreamingResponseBody` owns the checkout of the connection its bytes
//! arrive on. Reading to the end, or `close`, returns the connection to the
//! pool when the server allows reuse. Dropping the body unread closes the
//! connection without draining it.

use std::fmt;
use std::io::{self, Read};

use bytes::{Bytes, BytesMut};
use url::Url;

use super::body::{BodyReader, Framing};
use crate::connect::Checkout;
use crate::error::{self, Result};

pub struct StreamingResponseBody {
    checkout: Option<Checkout>,
    reader: BodyReader,
    framing: Framing,
    reusable: bool,
    url: Url,
}

impl StreamingResponseBody {
    pub(crate) fn new(checkout: Checkout, framing: Framing, keep_alive: bool, url: Url) -> Self {
        Self {
            checkout: Some(checkout),
            reader: BodyReader::new(framing),
            framing,
            reusable: keep_alive && framing != Framing::Close,
            url,
        }
    }

    /// Whether the body has been fully read or closed
    pub fn is_closed(&self) -> bool {
        self.checkout.is_none()
    }

    pub fn is_chunked(&self) -> bool {
        self.framing == Framing::Chunked
    }

    /// Read up to `size` bytes, or everything that remains when `None`
    ///
    /// Returns fewer bytes than requested only at the end of the body. Once
    /// the body is exhausted the connection is released and further reads
    /// return empty buffers.
    ///
    /// # Errors
    ///
    /// Returns a transport error if the connection fails; the connection is
    /// then discarded.
    pub fn read(&mut self, size: Option<usize>) -> Result<Bytes> {
        let mut out = BytesMut::new();
        let mut scratch = [0u8; 8 * 1024];
        loop {
            let want = match size {
                Some(size) => size - out.len(),
                None => scratch.len(),
            };
            if want == 0 {
                break;
            }
            let len = want.min(scratch.len());
            let n = self.fill(&mut scratch[..len])?;
            if n == 0 {
                break;
            }
            out.extend_from_slice(&scratch[..n]);
        }
        Ok(out.freeze())
    }

    /// Iterate over the body's transfer chunks
    ///
    /// Iterating an exhausted body yields nothing.
    ///
    /// # Errors
    ///
    /// Returns a body error if the response is not chunked.
    pub fn iter_chunks(&mut self) -> Result<Chunks<'_>> {
        if !self.is_chunked() {
            return Err(error::body(
                "response body does not use chunked transfer encoding",
            ));
        }
        Ok(Chunks { body: self })
    }

    /// Drain any unread bytes and release the connection
    ///
    /// Closing an already closed body does nothing.
    ///
    /// # Errors
    ///
    /// Returns a transport error if draining fails; the connection is then
    /// discarded.
    pub fn close(&mut self) -> Result<()> {
        let Some(checkout) = self.checkout.as_mut() else {
            return Ok(());
        };
        let drained = checkout
            .stream()
            .and_then(|stream| self.reader.drain(stream));
        match drained {
            Ok(bytes) => {
                tracing::trace!(
                    target: "sofa_client::http::stream",
                    url = %self.url,
                    drained = bytes,
                    "Closed streaming body"
                );
                self.finish();
                Ok(())
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<usize> {
        let Some(checkout) = self.checkout.as_mut() else {
            return Ok(0);
        };
        let read = checkout
            .stream()
            .and_then(|stream| self.reader.read(stream, buf));
        match read {
            Ok(0) => {
                self.finish();
                Ok(0)
            }
            Ok(n) => {
                if self.reader.is_done() {
                    self.finish();
                }
                Ok(n)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn next_chunk(&mut self) -> Result<Option<Bytes>> {
        let Some(checkout) = self.checkout.as_mut() else {
            return Ok(None);
        };
        let chunk = checkout
            .stream()
            .and_then(|stream| self.reader.next_chunk(stream));
        match chunk {
            Ok(Some(bytes)) => Ok(Some(bytes)),
            Ok(None) => {
                self.finish();
                Ok(None)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn finish(&mut self) {
        if let Some(checkout) = self.checkout.take() {
            checkout.finish(self.reusable && self.reader.is_done());
        }
    }

    fn fail(&mut self, err: io::Error) -> crate::Error {
        if let Some(checkout) = self.checkout.take() {
            checkout.discard();
        }
        error::transport(err, self.url.clone())
    }
}

impl Read for StreamingResponseBody {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.fill(buf).map_err(io::Error::other)
    }
}

impl fmt::Debug for StreamingResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingResponseBody")
            .field("url", &self.url.as_str())
            .field("framing", &self.framing)
            .field("closed", &self.is_closed())
            .finish()
    }
}

/// Iterator over the chunks of a chunked response body
pub struct Chunks<'a> {
    body: &'a mut StreamingResponseBody,
}

impl Iterator for Chunks<'_> {
    type Item = Result<Bytes>;

    fn next(&mut self) -> Option<Self::Item> {
        self.body.next_chunk().transpose()
    }
}
