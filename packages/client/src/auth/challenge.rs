//! `WWW-Authenticate` challenge parsing

use std::sync::LazyLock;

use regex::Regex;

static CHALLENGE: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r#"^\s*(\w*)\s+realm=['"]([^'"]+)['"]"#).ok());

/// An authentication challenge sent with a 401 response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Challenge {
    pub scheme: String,
    pub realm: String,
}

impl Challenge {
    /// Only Basic challenges are answered.
    pub fn is_basic(&self) -> bool {
        self.scheme.eq_ignore_ascii_case("basic")
    }
}

/// Parse a `WWW-Authenticate` header value of the form `Scheme realm="..."`
pub fn parse_challenge(header: &str) -> Option<Challenge> {
    let captures = CHALLENGE.as_ref()?.captures(header)?;
    Some(Challenge {
        scheme: captures.get(1)?.as_str().to_string(),
        realm: captures.get(2)?.as_str().to_string(),
    })
}
