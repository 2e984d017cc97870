//! HTTP response caching for conditional requests
//!
//! This module provides the session's response cache:
//! - Entries keyed by request URL, holding status, headers and buffered body
//! - `If-None-Match` revalidation through each entry's `etag`
//! - Batched eviction by the response `Date`, oldest first
//! - A single mutex held only for the map operation itself

pub mod cache_entry;
pub mod http_date;
pub mod response_cache;

pub use cache_entry::CacheEntry;
pub use http_date::{HttpDateParseError, httpdate};
pub use response_cache::ResponseCache;
