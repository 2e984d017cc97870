//! Basic authentication utilities

use std::fmt;
use std::io::Write;

use base64::prelude::BASE64_STANDARD;
use base64::{Engine, write::EncoderWriter};
use http::HeaderValue;
use url::Url;

use crate::error::{self, Result};

/// A user name and password pair for HTTP Basic authentication
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    /// Strip `user:pass@` from the URL authority and return it as credentials.
    ///
    /// The URL is left clean for transport. Percent-escapes in the user
    /// info are decoded.
    pub fn take_from_url(url: &mut Url) -> Option<Credentials> {
        if url.username().is_empty() && url.password().is_none() {
            return None;
        }

        let username = decode_userinfo(url.username());
        let password = url.password().map(decode_userinfo).unwrap_or_default();

        // Both setters only fail for cannot-be-a-base URLs, which carry no authority.
        let _ = url.set_username("");
        let _ = url.set_password(None);

        Some(Credentials { username, password })
    }

    /// `Authorization` header value for these credentials.
    pub fn header_value(&self) -> Result<HeaderValue> {
        basic_auth(&self.username, Some(&self.password))
    }
}

fn decode_userinfo(raw: &str) -> String {
    urlencoding::decode(raw)
        .map(std::borrow::Cow::into_owned)
        .unwrap_or_else(|_| raw.to_string())
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub fn basic_auth<U, P>(username: U, password: Option<P>) -> Result<HeaderValue>
where
    U: fmt::Display,
    P: fmt::Display,
{
    let mut buf = b"Basic ".to_vec();
    {
        let mut encoder = EncoderWriter::new(&mut buf, &BASE64_STANDARD);
        let _ = write!(encoder, "{username}:");
        if let Some(password) = password {
            let _ = write!(encoder, "{password}");
        }
    }
    let mut header = HeaderValue::from_bytes(&buf)
        .map_err(|_e| error::configuration("invalid authorization header"))?;
    header.set_sensitive(true);
    Ok(header)
}

/// Decode the credentials of a `Basic` authorization header value
pub fn decode_basic_auth(value: &str) -> Result<Credentials> {
    let encoded = value
        .strip_prefix("Basic ")
        .ok_or_else(|| error::configuration("authorization header is not Basic"))?;
    let decoded = BASE64_STANDARD
        .decode(encoded.trim())
        .map_err(|_| error::configuration("invalid base64 encoding in authorization header"))?;
    let credentials = String::from_utf8(decoded)
        .map_err(|_| error::configuration("invalid UTF-8 in authorization header"))?;

    match credentials.split_once(':') {
        Some((username, password)) => Ok(Credentials::new(username, password)),
        None => Err(error::configuration("invalid format in authorization header")),
    }
}
