//! Cache entry holding a fully buffered response

use std::time::SystemTime;

use bytes::Bytes;
use http::{HeaderMap, StatusCode, header};

use crate::cache::http_date::httpdate;
use crate::http::response::{Response, ResponseBody};

/// Cached response entry with metadata
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
    /// Value of the `Date` response header, or the capture time when absent
    pub date: SystemTime,
}

impl CacheEntry {
    /// Capture a buffered response
    pub fn new(status: StatusCode, headers: HeaderMap, body: Option<Bytes>) -> Self {
        let date = headers
            .get(header::DATE)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| httpdate::parse_http_date(s).ok())
            .unwrap_or_else(SystemTime::now);

        Self {
            status,
            headers,
            body,
            date,
        }
    }

    /// The validator sent back as `If-None-Match`
    pub fn etag(&self) -> Option<&str> {
        self.headers
            .get(header::ETAG)
            .and_then(|v| v.to_str().ok())
    }

    /// Check if entry can be validated with conditional request
    pub fn can_validate(&self) -> bool {
        self.etag().is_some()
    }

    /// Rebuild the originally observed response
    pub fn to_response(&self) -> Response {
        let body = match &self.body {
            Some(bytes) => ResponseBody::Buffered(bytes.clone()),
            None => ResponseBody::Absent,
        };
        Response::new(self.status, self.headers.clone(), body)
    }
}
