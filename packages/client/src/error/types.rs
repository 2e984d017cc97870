use std::error::Error as StdError;
use std::fmt;

use http::StatusCode;

use super::payload::ErrorPayload;

/// A Result alias where the Err case is `sofa_client::Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents errors that can occur while talking to the server.
pub struct Error {
    pub inner: Box<Inner>,
}

pub struct Inner {
    pub kind: Kind,
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub url: Option<url::Url>,
}

#[derive(Debug, Clone)]
pub enum Kind {
    /// Invalid configuration, URL or unsupported scheme
    Builder,
    /// Socket-level failure that was not retryable or exhausted the retry budget
    Transport,
    /// 401
    Unauthorized(ErrorPayload),
    /// 404
    NotFound(ErrorPayload),
    /// 409
    Conflict(ErrorPayload),
    /// 412
    PreconditionFailed(ErrorPayload),
    /// Any other status >= 400
    Server {
        status: StatusCode,
        payload: ErrorPayload,
    },
    /// Redirect chain longer than the configured maximum
    RedirectLimit { limit: u32 },
    /// Redirect response that cannot be followed
    Redirect,
    /// Request or response body misuse
    Body,
    /// Error decoding a response body
    Decode,
}

impl Error {
    pub fn new(kind: Kind) -> Error {
        Error {
            inner: Box::new(Inner {
                kind,
                source: None,
                url: None,
            }),
        }
    }

    #[must_use = "Error builder methods return a new Error and should be used"]
    pub fn with<E: Into<Box<dyn StdError + Send + Sync>>>(mut self, source: E) -> Error {
        self.inner.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: url::Url) -> Self {
        self.inner.url = Some(url);
        self
    }

    #[must_use]
    pub fn kind(&self) -> &Kind {
        &self.inner.kind
    }

    /// Get the URL associated with this error, if any
    #[must_use]
    pub fn url(&self) -> Option<&url::Url> {
        self.inner.url.as_ref()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut f = f.debug_struct("sofa_client::Error");

        f.field("kind", &self.inner.kind);

        if let Some(ref source) = self.inner.source {
            f.field("source", source);
        }

        if let Some(ref url) = self.inner.url {
            f.field("url", &url.as_str());
        }

        f.finish()
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.inner.kind {
            Kind::Builder => f.write_str("builder error")?,
            Kind::Transport => f.write_str("error sending request")?,
            Kind::Unauthorized(payload) => write!(f, "unauthorized: {payload}")?,
            Kind::NotFound(payload) => write!(f, "resource not found: {payload}")?,
            Kind::Conflict(payload) => write!(f, "resource conflict: {payload}")?,
            Kind::PreconditionFailed(payload) => write!(f, "precondition failed: {payload}")?,
            Kind::Server { status, payload } => {
                let prefix = if status.is_client_error() {
                    "HTTP status client error"
                } else {
                    "HTTP status server error"
                };
                write!(f, "{prefix} ({status}): {payload}")?;
            }
            Kind::RedirectLimit { limit } => {
                write!(f, "redirection limit exceeded (max {limit})")?;
            }
            Kind::Redirect => f.write_str("error following redirect")?,
            Kind::Body => f.write_str("request or response body error")?,
            Kind::Decode => f.write_str("error decoding response body")?,
        }

        if let Some(ref url) = self.inner.url {
            write!(f, " for url ({url})")?;
        }

        if let Some(ref source) = self.inner.source {
            write!(f, ": {source}")?;
        }

        Ok(())
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .source
            .as_ref()
            .map(|err| &**err as &(dyn StdError + 'static))
    }
}
