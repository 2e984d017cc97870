use http::StatusCode;

use super::BoxError;
use super::payload::ErrorPayload;
use super::types::{Error, Kind};

/// Creates an `Error` for a builder error.
pub fn builder<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Builder).with(e.into())
}

/// Creates an `Error` for a socket-level failure.
pub fn transport<E: Into<BoxError>>(e: E, url: url::Url) -> Error {
    Error::new(Kind::Transport).with(e.into()).with_url(url)
}

/// Creates an `Error` for a redirect that could not be followed.
pub fn redirect<E: Into<BoxError>>(e: E, url: url::Url) -> Error {
    Error::new(Kind::Redirect).with(e.into()).with_url(url)
}

/// Creates an `Error` for an exceeded redirect limit.
pub fn redirect_limit(limit: u32, url: url::Url) -> Error {
    Error::new(Kind::RedirectLimit { limit }).with_url(url)
}

/// Creates an `Error` for a body error.
pub fn body<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Body).with(e.into())
}

/// Creates an `Error` for a decode error.
pub fn decode<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Decode).with(e.into())
}

pub fn url_bad_scheme(url: url::Url) -> Error {
    let scheme = url.scheme().to_string();
    Error::new(Kind::Builder)
        .with(format!("{scheme} is not a supported scheme"))
        .with_url(url)
}

pub fn invalid_url<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Builder).with(e.into())
}

pub fn configuration<E: Into<BoxError>>(e: E) -> Error {
    Error::new(Kind::Builder).with(e.into())
}

/// Maps an error response to its typed error.
pub fn status_code(url: url::Url, status: StatusCode, payload: ErrorPayload) -> Error {
    let kind = match status {
        StatusCode::UNAUTHORIZED => Kind::Unauthorized(payload),
        StatusCode::NOT_FOUND => Kind::NotFound(payload),
        StatusCode::CONFLICT => Kind::Conflict(payload),
        StatusCode::PRECONDITION_FAILED => Kind::PreconditionFailed(payload),
        status => Kind::Server { status, payload },
    };
    Error::new(kind).with_url(url)
}
