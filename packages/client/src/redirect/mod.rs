//! Redirect decisions and permanent redirect memoization
//!
//! - `table`: 301 targets remembered for the lifetime of a session
//! - `headers`: per-hop header rewriting

pub mod headers;
pub mod table;

use http::{Method, StatusCode, header};
use url::Url;

use crate::error::{self, Result};
pub use table::PermanentRedirectTable;

/// Whether `status` sends a request with `method` somewhere else
///
/// 303 always redirects; 301, 302 and 307 only redirect GET and HEAD so
/// that writes are never silently re-sent.
pub fn is_redirect(method: &Method, status: StatusCode) -> bool {
    match status {
        StatusCode::SEE_OTHER => true,
        StatusCode::MOVED_PERMANENTLY | StatusCode::FOUND | StatusCode::TEMPORARY_REDIRECT => {
            *method == Method::GET || *method == Method::HEAD
        }
        _ => false,
    }
}

/// Resolve the `Location` header of a redirect against the request URL
///
/// # Errors
///
/// Returns a redirect error if `Location` is missing or unparseable.
pub fn location(current: &Url, headers: &http::HeaderMap) -> Result<Url> {
    let value = headers
        .get(header::LOCATION)
        .ok_or_else(|| error::redirect("redirect response without Location header", current.clone()))?;
    let value = value
        .to_str()
        .map_err(|e| error::redirect(e, current.clone()))?;
    current
        .join(value)
        .map_err(|e| error::redirect(e, current.clone()))
}
