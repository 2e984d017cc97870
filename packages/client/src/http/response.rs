//! Responses returned by `Session::request`

use std::fmt;

use bytes::Bytes;
use http::header::{self, AsHeaderName, HeaderMap};
use http::StatusCode;
use serde::de::DeserializeOwned;

use super::stream::StreamingResponseBody;
use crate::error::{self, Result};

/// Body of a response, chosen by size when the response is received
///
/// Bodies shorter than the session chunk size are read eagerly and the
/// connection is returned to the pool at once. Larger or chunked bodies
/// stay on the connection until read or closed.
pub enum ResponseBody {
    /// No body: HEAD, 204, 304 or zero length
    Absent,
    Buffered(Bytes),
    Streamed(StreamingResponseBody),
}

impl ResponseBody {
    pub fn is_absent(&self) -> bool {
        matches!(self, ResponseBody::Absent)
    }

    pub fn is_streamed(&self) -> bool {
        matches!(self, ResponseBody::Streamed(_))
    }

    /// Buffered bytes, if the body was read eagerly
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            ResponseBody::Buffered(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Collect the full body, reading a streamed body to its end
    ///
    /// # Errors
    ///
    /// Returns a transport error if the connection fails while reading.
    pub fn into_bytes(self) -> Result<Bytes> {
        match self {
            ResponseBody::Absent => Ok(Bytes::new()),
            ResponseBody::Buffered(bytes) => Ok(bytes),
            ResponseBody::Streamed(mut stream) => stream.read(None),
        }
    }
}

impl fmt::Debug for ResponseBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseBody::Absent => f.write_str("Absent"),
            ResponseBody::Buffered(bytes) => f.debug_tuple("Buffered").field(&bytes.len()).finish(),
            ResponseBody::Streamed(stream) => f.debug_tuple("Streamed").field(stream).finish(),
        }
    }
}

#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: ResponseBody,
}

impl Response {
    pub fn new(status: StatusCode, headers: HeaderMap, body: ResponseBody) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut ResponseBody {
        &mut self.body
    }

    pub fn into_body(self) -> ResponseBody {
        self.body
    }

    pub fn into_parts(self) -> (StatusCode, HeaderMap, ResponseBody) {
        (self.status, self.headers, self.body)
    }

    /// Header value as a string, if present and visible ASCII
    pub fn header<K: AsHeaderName>(&self, name: K) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    pub fn etag(&self) -> Option<&str> {
        self.header(header::ETAG)
    }

    /// Whether the media type is `application/json`, ignoring parameters
    pub fn is_json(&self) -> bool {
        self.header(header::CONTENT_TYPE)
            .and_then(|ct| ct.split(';').next())
            .is_some_and(|mime| mime.trim().eq_ignore_ascii_case("application/json"))
    }

    /// # Errors
    ///
    /// Returns a transport error if a streamed body fails mid-read.
    pub fn bytes(self) -> Result<Bytes> {
        self.body.into_bytes()
    }

    /// # Errors
    ///
    /// Returns a decode error if the body is not UTF-8.
    pub fn text(self) -> Result<String> {
        let bytes = self.bytes()?;
        String::from_utf8(bytes.to_vec()).map_err(error::decode)
    }

    /// Decode the body as JSON
    ///
    /// # Errors
    ///
    /// Returns a decode error if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(self) -> Result<T> {
        let bytes = self.bytes()?;
        serde_json::from_slice(&bytes).map_err(error::decode)
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    #[test]
    fn json_detection_ignores_parameters() {
        let mut headers = HeaderMap::new();
        headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json; charset=utf-8"));
        let resp = Response::new(StatusCode::OK, headers, ResponseBody::Absent);
        assert!(resp.is_json());

        let resp = Response::new(StatusCode::OK, HeaderMap::new(), ResponseBody::Absent);
        assert!(!resp.is_json());
    }

    #[test]
    fn buffered_body_decodes_json() {
        let resp = Response::new(
            StatusCode::OK,
            HeaderMap::new(),
            ResponseBody::Buffered(Bytes::from_static(br#"{"ok":true}"#)),
        );
        let value: serde_json::Value = resp.json().expect("json");
        assert_eq!(value["ok"], true);
    }

    #[test]
    fn invalid_json_is_decode_error() {
        let resp = Response::new(
            StatusCode::OK,
            HeaderMap::new(),
            ResponseBody::Buffered(Bytes::from_static(b"not json")),
        );
        let err = resp.json::<serde_json::Value>().expect_err("invalid");
        assert!(err.is_decode());
    }

    #[test]
    fn absent_body_is_empty_bytes() {
        let resp = Response::new(StatusCode::NO_CONTENT, HeaderMap::new(), ResponseBody::Absent);
        assert!(resp.bytes().expect("bytes").is_empty());
    }
}
