//! Request body encoding for the wire

use std::io::{self, Read, Write};

use bytes::Bytes;
use http::header::{CONTENT_LENGTH, CONTENT_TYPE, HeaderMap, HeaderValue, TRANSFER_ENCODING};
use http::Method;

use crate::error::{self, Result};
use crate::http::RequestBody;
use crate::http::wire;

/// A request body ready to be written, possibly more than once
pub(super) enum Payload {
    Empty,
    Bytes(Bytes),
    /// Taken on first send; a stream is never replayed
    Stream(Option<Box<dyn Read + Send>>),
}

impl Payload {
    /// Encode `body` and set the matching framing headers
    pub(super) fn prepare(body: RequestBody, method: &Method, headers: &mut HeaderMap) -> Result<Self> {
        let payload = match body {
            RequestBody::Empty => {
                if *method == Method::PUT || *method == Method::POST {
                    headers.insert(CONTENT_LENGTH, HeaderValue::from(0u64));
                }
                return Ok(Payload::Empty);
            }
            RequestBody::Bytes(bytes) => Payload::Bytes(bytes),
            RequestBody::Json(value) => {
                let encoded = serde_json::to_vec(&value).map_err(error::body)?;
                headers
                    .entry(CONTENT_TYPE)
                    .or_insert(HeaderValue::from_static("application/json"));
                Payload::Bytes(Bytes::from(encoded))
            }
            RequestBody::Stream(reader) => {
                headers.remove(CONTENT_LENGTH);
                headers.insert(TRANSFER_ENCODING, HeaderValue::from_static("chunked"));
                return Ok(Payload::Stream(Some(reader)));
            }
        };
        if let Payload::Bytes(bytes) = &payload {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(bytes.len() as u64));
        }
        Ok(payload)
    }

    pub(super) fn is_replayable(&self) -> bool {
        !matches!(self, Payload::Stream(_))
    }

    pub(super) fn write_to<W: Write>(&mut self, w: &mut W, chunk_size: usize) -> io::Result<()> {
        match self {
            Payload::Empty => Ok(()),
            Payload::Bytes(bytes) => w.write_all(bytes),
            Payload::Stream(reader) => {
                let mut reader = reader.take().ok_or_else(|| {
                    io::Error::new(io::ErrorKind::InvalidInput, "stream body already sent")
                })?;
                wire::write_chunked(w, &mut reader, chunk_size).map(drop)
            }
        }
    }
}
