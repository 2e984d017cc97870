//! HTTP date parsing and formatting utilities
//!
//! Provides HTTP date parsing following RFC 7231 with support for the
//! three historical formats.

use std::fmt;

/// HTTP date parsing error types
#[derive(Debug, Clone)]
pub enum HttpDateParseError {
    /// Date format was not recognized by any of the supported parsers
    UnrecognizedFormat(String),
}

impl fmt::Display for HttpDateParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpDateParseError::UnrecognizedFormat(date) => {
                write!(f, "Unrecognized HTTP date format: {date}")
            }
        }
    }
}

impl std::error::Error for HttpDateParseError {}

/// HTTP date parsing utilities
pub mod httpdate {
    use std::time::{Duration, SystemTime};

    use chrono::{DateTime, NaiveDateTime, Utc};

    use super::HttpDateParseError;

    fn from_timestamp(timestamp: i64) -> Option<SystemTime> {
        u64::try_from(timestamp)
            .ok()
            .map(|secs| SystemTime::UNIX_EPOCH + Duration::from_secs(secs))
    }

    /// Parse HTTP date string into SystemTime following RFC 7231 formats
    pub fn parse_http_date(date_str: &str) -> Result<SystemTime, HttpDateParseError> {
        let date_str = date_str.trim();

        // IMF-fixdate: "Sun, 06 Nov 1994 08:49:37 GMT"
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%a, %d %b %Y %H:%M:%S GMT") {
            if let Some(time) = from_timestamp(dt.and_utc().timestamp()) {
                return Ok(time);
            }
        }

        // RFC 850: "Sunday, 06-Nov-94 08:49:37 GMT"
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%A, %d-%b-%y %H:%M:%S GMT") {
            if let Some(time) = from_timestamp(dt.and_utc().timestamp()) {
                return Ok(time);
            }
        }

        // asctime: "Sun Nov  6 08:49:37 1994"
        if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%a %b %e %H:%M:%S %Y") {
            if let Some(time) = from_timestamp(dt.and_utc().timestamp()) {
                return Ok(time);
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc2822(date_str) {
            if let Some(time) = from_timestamp(dt.timestamp()) {
                return Ok(time);
            }
        }

        Err(HttpDateParseError::UnrecognizedFormat(date_str.to_string()))
    }

    /// Format SystemTime as HTTP date string in RFC 7231 IMF-fixdate format
    pub fn fmt_http_date(time: SystemTime) -> String {
        let duration = time
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap_or_default();
        let secs = i64::try_from(duration.as_secs()).unwrap_or(i64::MAX);

        let dt = DateTime::<Utc>::from_timestamp(secs, 0).unwrap_or_default();

        dt.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
    }
}
