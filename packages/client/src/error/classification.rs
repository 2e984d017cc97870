use std::error::Error as StdError;
use std::io;

use http::StatusCode;

use super::payload::ErrorPayload;
use super::types::{Error, Kind};

impl Error {
    /// Returns true if the error is from a type Builder.
    #[must_use]
    pub fn is_builder(&self) -> bool {
        matches!(self.inner.kind, Kind::Builder)
    }

    /// Returns true for socket-level failures.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self.inner.kind, Kind::Transport)
    }

    #[must_use]
    pub fn is_unauthorized(&self) -> bool {
        matches!(self.inner.kind, Kind::Unauthorized(_))
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self.inner.kind, Kind::NotFound(_))
    }

    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self.inner.kind, Kind::Conflict(_))
    }

    #[must_use]
    pub fn is_precondition_failed(&self) -> bool {
        matches!(self.inner.kind, Kind::PreconditionFailed(_))
    }

    /// Returns true for any error derived from an HTTP status >= 400.
    #[must_use]
    pub fn is_status(&self) -> bool {
        self.status().is_some()
    }

    /// Returns true if the redirect chain exceeded the configured limit.
    #[must_use]
    pub fn is_redirect_limit(&self) -> bool {
        matches!(self.inner.kind, Kind::RedirectLimit { .. })
    }

    /// Returns true if a redirect could not be followed.
    #[must_use]
    pub fn is_redirect(&self) -> bool {
        matches!(self.inner.kind, Kind::Redirect | Kind::RedirectLimit { .. })
    }

    #[must_use]
    pub fn is_body(&self) -> bool {
        matches!(self.inner.kind, Kind::Body)
    }

    #[must_use]
    pub fn is_decode(&self) -> bool {
        matches!(self.inner.kind, Kind::Decode)
    }

    /// Returns true if the error is related to a timeout.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        let mut source = self.source();

        while let Some(err) = source {
            if let Some(io) = err.downcast_ref::<io::Error>() {
                if matches!(io.kind(), io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) {
                    return true;
                }
            }
            source = err.source();
        }

        false
    }

    /// Returns the status code, if the error was generated from a response.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self.inner.kind {
            Kind::Unauthorized(_) => Some(StatusCode::UNAUTHORIZED),
            Kind::NotFound(_) => Some(StatusCode::NOT_FOUND),
            Kind::Conflict(_) => Some(StatusCode::CONFLICT),
            Kind::PreconditionFailed(_) => Some(StatusCode::PRECONDITION_FAILED),
            Kind::Server { status, .. } => Some(status),
            _ => None,
        }
    }

    /// Returns the decoded error body, if the error was generated from a response.
    #[must_use]
    pub fn payload(&self) -> Option<&ErrorPayload> {
        match &self.inner.kind {
            Kind::Unauthorized(payload)
            | Kind::NotFound(payload)
            | Kind::Conflict(payload)
            | Kind::PreconditionFailed(payload)
            | Kind::Server { payload, .. } => Some(payload),
            _ => None,
        }
    }

    /// Returns the underlying I/O error for transport failures.
    #[must_use]
    pub fn io_error(&self) -> Option<&io::Error> {
        self.inner
            .source
            .as_ref()
            .and_then(|source| source.downcast_ref::<io::Error>())
    }
}

#[cfg(test)]
mod tests {
    use super::super::constructors::status_code;
    use super::*;

    fn url() -> url::Url {
        url::Url::parse("http://localhost:5984/db").expect("test URL should parse")
    }

    #[test]
    fn status_codes_map_to_kinds() {
        assert!(status_code(url(), StatusCode::UNAUTHORIZED, ErrorPayload::Empty).is_unauthorized());
        assert!(status_code(url(), StatusCode::NOT_FOUND, ErrorPayload::Empty).is_not_found());
        assert!(status_code(url(), StatusCode::CONFLICT, ErrorPayload::Empty).is_conflict());
        assert!(
            status_code(url(), StatusCode::PRECONDITION_FAILED, ErrorPayload::Empty)
                .is_precondition_failed()
        );

        let err = status_code(url(), StatusCode::BAD_GATEWAY, ErrorPayload::Text("x".into()));
        assert!(matches!(err.kind(), Kind::Server { .. }));
        assert_eq!(err.status(), Some(StatusCode::BAD_GATEWAY));
        assert_eq!(err.payload(), Some(&ErrorPayload::Text("x".into())));
    }

    #[test]
    fn timeout_is_found_through_source_chain() {
        let err = super::super::constructors::transport(
            io::Error::new(io::ErrorKind::TimedOut, "read timed out"),
            url(),
        );
        assert!(err.is_timeout());
        assert!(err.is_transport());
        assert!(err.io_error().is_some());
    }
}
