//! URL assembly for resources

use url::Url;
use url::form_urlencoded;

use sofa_client::auth::Credentials;
use sofa_client::error::{self, Result};

use super::query::Query;

/// Percent-encode one path segment, escaping every `/` inside it
pub fn quote(segment: &str) -> String {
    urlencoding::encode(segment).into_owned()
}

/// Append escaped path segments and a query string to `base`
///
/// A trailing slash on `base` is dropped first, so `"http://h/"` and
/// `"http://h"` join identically.
pub fn urljoin<S: AsRef<str>>(base: &str, segments: &[S], query: &Query) -> String {
    let mut out = base.strip_suffix('/').unwrap_or(base).to_owned();
    for segment in segments {
        out.push('/');
        out.push_str(&quote(segment.as_ref()));
    }

    let pairs = query.pairs();
    if !pairs.is_empty() {
        out.push('?');
        out.push_str(&form_urlencoded::Serializer::new(String::new()).extend_pairs(pairs).finish());
    }
    out
}

/// Split `user:pass@` out of a URL
///
/// Returns the URL without user info and the credentials it carried.
///
/// # Errors
///
/// Returns a builder error if `url` does not parse.
pub fn extract_credentials(url: &str) -> Result<(Url, Option<Credentials>)> {
    let mut parsed = Url::parse(url).map_err(error::invalid_url)?;
    let credentials = Credentials::take_from_url(&mut parsed);
    Ok((parsed, credentials))
}
