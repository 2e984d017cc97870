//! Header rewriting between redirect hops

use http::HeaderMap;
use http::header::{AUTHORIZATION, CONTENT_LENGTH, CONTENT_TYPE, COOKIE, IF_NONE_MATCH, PROXY_AUTHORIZATION, TRANSFER_ENCODING};
use url::Url;

/// Remove credentials when the next hop leaves the original origin
pub(crate) fn remove_sensitive_headers(headers: &mut HeaderMap, next: &Url, original: &Url) {
    let cross_origin = next.scheme() != original.scheme()
        || next.host_str() != original.host_str()
        || next.port_or_known_default() != original.port_or_known_default();
    if cross_origin {
        headers.remove(AUTHORIZATION);
        headers.remove(COOKIE);
        headers.remove(PROXY_AUTHORIZATION);
    }
}

/// Headers that describe a body dropped by a 303
pub(crate) fn remove_body_headers(headers: &mut HeaderMap) {
    headers.remove(CONTENT_TYPE);
    headers.remove(CONTENT_LENGTH);
    headers.remove(TRANSFER_ENCODING);
}

/// Validators belong to the URL they were cached for
pub(crate) fn remove_conditional_headers(headers: &mut HeaderMap) {
    headers.remove(IF_NONE_MATCH);
}
