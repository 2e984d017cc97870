//! Types needed to issue requests through a `Session`

pub use crate::auth::Credentials;
pub use crate::cache::{CacheEntry, ResponseCache};
pub use crate::config::{CacheConfig, ConfigError, SessionConfig};
pub use crate::connect::ConnectionPool;
pub use crate::error::{Error, ErrorPayload, Kind, Result};
pub use crate::http::{Chunks, Request, RequestBody, Response, ResponseBody, StreamingResponseBody};
pub use crate::session::Session;
pub use crate::telemetry::{SessionStats, SessionStatsSnapshot};

pub use ::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};

pub use url::Url;
