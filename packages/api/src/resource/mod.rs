//! Path-scoped handle onto a server URL
//!
//! A `Resource` pairs a base URL with the session that carries its
//! requests, the credentials that were embedded in the URL, and default
//! headers. Verbs join an optional path and query onto the base URL and
//! hand the request to `Session::request`.

pub mod join;
pub mod query;

use http::{HeaderMap, Method, StatusCode};
use serde::de::DeserializeOwned;

use sofa_client::auth::Credentials;
use sofa_client::error::{self, Result};
use sofa_client::{RequestBody, Response, Session, Url};

pub use self::query::{Query, QueryValue};
pub use self::join::{extract_credentials, quote, urljoin};

/// A response whose body was decoded from JSON
#[derive(Debug, Clone)]
pub struct JsonResponse<T> {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub data: T,
}

impl<T: DeserializeOwned> JsonResponse<T> {
    /// Decode `response`, which must declare a JSON content type
    ///
    /// # Errors
    ///
    /// Returns a decode error for non-JSON responses or invalid JSON.
    pub fn decode(response: Response) -> Result<Self> {
        if !response.is_json() {
            let content_type = response.header(http::header::CONTENT_TYPE).unwrap_or("none").to_owned();
            return Err(error::decode(format!("expected a JSON response, got content type {content_type}")));
        }
        let status = response.status();
        let headers = response.headers().clone();
        let data = response.json()?;
        Ok(Self { status, headers, data })
    }
}

#[derive(Debug, Clone)]
pub struct Resource {
    url: String,
    credentials: Option<Credentials>,
    session: Session,
    headers: HeaderMap,
}

impl Resource {
    /// Create a resource with its own session
    ///
    /// # Errors
    ///
    /// Returns a builder error if `url` does not parse.
    pub fn new(url: &str) -> Result<Self> {
        Self::with_session(url, Session::default())
    }

    /// Create a resource sharing `session`
    ///
    /// `user:pass@` in the URL is removed and kept as the resource's
    /// credentials.
    ///
    /// # Errors
    ///
    /// Returns a builder error if `url` does not parse.
    pub fn with_session(url: &str, session: Session) -> Result<Self> {
        let (url, credentials) = extract_credentials(url)?;
        Ok(Self {
            url: url.into(),
            credentials,
            session,
            headers: HeaderMap::new(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// A child resource with `segments` appended to the path
    ///
    /// Each segment is escaped on its own, slashes included. The child
    /// shares the session, credentials and default headers.
    #[must_use]
    pub fn derive<S: AsRef<str>>(&self, segments: &[S]) -> Resource {
        Resource {
            url: urljoin(&self.url, segments, &Query::new()),
            credentials: self.credentials.clone(),
            session: self.session.clone(),
            headers: self.headers.clone(),
        }
    }

    /// Issue a request against this resource
    ///
    /// `headers` are layered over the resource's default headers.
    ///
    /// # Errors
    ///
    /// See `Session::request`.
    pub fn request<S: AsRef<str>>(
        &self,
        method: Method,
        path: &[S],
        body: RequestBody,
        headers: Option<HeaderMap>,
        query: &Query,
    ) -> Result<Response> {
        let mut all_headers = self.headers.clone();
        if let Some(headers) = headers {
            all_headers.extend(headers);
        }
        let url = Url::parse(&urljoin(&self.url, path, query)).map_err(error::invalid_url)?;
        tracing::trace!(target: "sofa::resource", method = %method, url = %url, "Dispatching request");
        self.session
            .request(method, url, body, all_headers, self.credentials.as_ref())
    }

    pub fn get<S: AsRef<str>>(&self, path: &[S], query: &Query) -> Result<Response> {
        self.request(Method::GET, path, RequestBody::Empty, None, query)
    }

    pub fn head<S: AsRef<str>>(&self, path: &[S], query: &Query) -> Result<Response> {
        self.request(Method::HEAD, path, RequestBody::Empty, None, query)
    }

    pub fn delete<S: AsRef<str>>(&self, path: &[S], query: &Query) -> Result<Response> {
        self.request(Method::DELETE, path, RequestBody::Empty, None, query)
    }

    pub fn put<S: AsRef<str>>(&self, path: &[S], body: impl Into<RequestBody>, query: &Query) -> Result<Response> {
        self.request(Method::PUT, path, body.into(), None, query)
    }

    pub fn post<S: AsRef<str>>(&self, path: &[S], body: impl Into<RequestBody>, query: &Query) -> Result<Response> {
        self.request(Method::POST, path, body.into(), None, query)
    }

    /// Decode the response as JSON
    ///
    /// Fails with a decode error unless the response declares a JSON
    /// content type; use the plain verb to read other bodies.
    pub fn get_json<T: DeserializeOwned, S: AsRef<str>>(&self, path: &[S], query: &Query) -> Result<JsonResponse<T>> {
        JsonResponse::decode(self.get(path, query)?)
    }

    /// `DELETE` counterpart of [`Resource::get_json`]
    pub fn delete_json<T: DeserializeOwned, S: AsRef<str>>(&self, path: &[S], query: &Query) -> Result<JsonResponse<T>> {
        JsonResponse::decode(self.delete(path, query)?)
    }

    /// `PUT` counterpart of [`Resource::get_json`]
    pub fn put_json<T: DeserializeOwned, S: AsRef<str>>(
        &self,
        path: &[S],
        body: impl Into<RequestBody>,
        query: &Query,
    ) -> Result<JsonResponse<T>> {
        JsonResponse::decode(self.put(path, body, query)?)
    }

    /// `POST` counterpart of [`Resource::get_json`]
    pub fn post_json<T: DeserializeOwned, S: AsRef<str>>(
        &self,
        path: &[S],
        body: impl Into<RequestBody>,
        query: &Query,
    ) -> Result<JsonResponse<T>> {
        JsonResponse::decode(self.post(path, body, query)?)
    }
}
