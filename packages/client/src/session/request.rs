//! The request state machine
//!
//! One logical request runs as a loop over hops. Each hop applies the
//! permanent redirect table, sets default, conditional and credential
//! headers, and sends over a checked-out connection with transient
//! failures retried per the session's delay list. The response is then
//! checked for an authentication challenge, a 304 revalidation and a
//! redirect, in that order. Any other response is classified into a
//! buffered or streamed body, mapped to an error when its status is 400
//! or above, and cached when eligible.

use std::io::{self, Write};
use std::thread;

use http::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue, IF_NONE_MATCH, USER_AGENT, WWW_AUTHENTICATE};
use http::{Method, StatusCode};
use url::Url;

use super::core::Session;
use super::payload::Payload;
use crate::auth::{Credentials, parse_challenge};
use crate::cache::CacheEntry;
use crate::connect::{Checkout, Origin};
use crate::error::{self, ErrorPayload, Result};
use crate::http::body::BodyReader;
use crate::http::wire::{self, ResponseHead};
use crate::http::{Framing, Request, RequestBody, Response, ResponseBody, StreamingResponseBody};
use crate::redirect::{self, headers as redirect_headers};
use crate::retry::{self, RetrySchedule};
use crate::telemetry::SessionStats;

/// `path?query` as written on the request line
fn request_target(url: &Url) -> String {
    let mut target = url.path().to_owned();
    if target.is_empty() {
        target.push('/');
    }
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }
    target
}

fn same_origin(a: &Url, b: &Url) -> bool {
    a.scheme() == b.scheme()
        && a.host_str() == b.host_str()
        && a.port_or_known_default() == b.port_or_known_default()
}

impl Session {
    /// Execute a request end to end
    ///
    /// `credentials`, when given, are sent proactively as Basic
    /// authorization for as long as the request stays on the origin of
    /// `url`. Without them, a 401 carrying a Basic challenge is answered
    /// once with the session's configured credentials, if any.
    ///
    /// # Errors
    ///
    /// - status errors (`is_unauthorized`, `is_not_found`, `is_conflict`,
    ///   `is_precondition_failed`, `is_status`) for responses of 400 and above
    /// - `is_redirect_limit` once more than `max_redirects` redirects are followed
    /// - `is_transport` for socket failures that are not retryable or
    ///   exhausted the retry delays
    /// - `is_builder` for URLs with a scheme other than http or https
    /// - `is_body` if a JSON body cannot be encoded
    pub fn request(
        &self,
        method: Method,
        url: Url,
        body: RequestBody,
        headers: HeaderMap,
        credentials: Option<&Credentials>,
    ) -> Result<Response> {
        let inner = &self.inner;
        let config = &inner.config;
        SessionStats::incr(&inner.stats.requests);

        let original = url.clone();
        let mut method = method;
        let mut url = url;
        let mut headers = headers;
        let mut payload = Payload::prepare(body, &method, &mut headers)?;
        let mut redirects = 0u32;

        tracing::debug!(
            target: "sofa_client::session",
            method = %method,
            url = %url,
            "Starting request"
        );

        loop {
            if let Some(target) = inner.redirects.get(&url) {
                tracing::trace!(
                    target: "sofa_client::session",
                    from = %url,
                    to = %target,
                    "Applying permanent redirect"
                );
                url = target;
            }

            headers
                .entry(ACCEPT)
                .or_insert(HeaderValue::from_static("application/json"));
            headers.insert(USER_AGENT, inner.user_agent.clone());

            let cached = if method == Method::GET || method == Method::HEAD {
                inner.cache.lookup(url.as_str())
            } else {
                None
            };
            if let Some(etag) = cached.as_ref().and_then(CacheEntry::etag) {
                let etag = HeaderValue::from_str(etag).map_err(error::builder)?;
                headers.insert(IF_NONE_MATCH, etag);
            }

            if let Some(credentials) = credentials
                && same_origin(&url, &original)
            {
                headers.insert(AUTHORIZATION, credentials.header_value()?);
            }

            let (mut head, mut checkout) = self.exchange(&method, &url, &headers, &mut payload)?;

            if head.status == StatusCode::UNAUTHORIZED
                && !headers.contains_key(AUTHORIZATION)
                && payload.is_replayable()
                && let Some(auth) = self.challenge_response(&head)?
            {
                tracing::debug!(
                    target: "sofa_client::session",
                    url = %url,
                    "Answering Basic authentication challenge"
                );
                settle(checkout, &head, &method);
                headers.insert(AUTHORIZATION, auth);
                (head, checkout) = self.exchange(&method, &url, &headers, &mut payload)?;
            }

            let is_get_or_head = method == Method::GET || method == Method::HEAD;
            if head.status == StatusCode::NOT_MODIFIED
                && is_get_or_head
                && let Some(entry) = cached.as_ref()
            {
                settle(checkout, &head, &method);
                SessionStats::incr(&inner.stats.cache_hits);
                tracing::debug!(
                    target: "sofa_client::cache",
                    url = %url,
                    "Serving revalidated response from cache"
                );
                let response = entry.to_response();
                if method == Method::HEAD {
                    let (status, headers, _) = response.into_parts();
                    return Ok(Response::new(status, headers, ResponseBody::Absent));
                }
                return Ok(response);
            }
            if cached.is_some() {
                inner.cache.remove(url.as_str());
            }

            if redirect::is_redirect(&method, head.status) {
                let see_other = head.status == StatusCode::SEE_OTHER;
                if !see_other && !payload.is_replayable() {
                    return self.finish(&method, &url, head, checkout);
                }

                let next = redirect::location(&url, &head.headers)?;
                settle(checkout, &head, &method);

                redirects += 1;
                if redirects > config.max_redirects {
                    return Err(error::redirect_limit(config.max_redirects, url));
                }
                SessionStats::incr(&inner.stats.redirects);

                if head.status == StatusCode::MOVED_PERMANENTLY {
                    inner.redirects.insert(&url, next.clone());
                }
                if see_other {
                    if method != Method::HEAD {
                        method = Method::GET;
                    }
                    payload = Payload::Empty;
                    redirect_headers::remove_body_headers(&mut headers);
                }
                redirect_headers::remove_conditional_headers(&mut headers);
                redirect_headers::remove_sensitive_headers(&mut headers, &next, &original);

                tracing::debug!(
                    target: "sofa_client::session",
                    status = head.status.as_u16(),
                    from = %url,
                    to = %next,
                    hop = redirects,
                    "Following redirect"
                );
                url = next;
                continue;
            }

            return self.finish(&method, &url, head, checkout);
        }
    }

    /// Execute a prepared `Request`
    ///
    /// # Errors
    ///
    /// See [`Session::request`].
    pub fn send(&self, request: Request, credentials: Option<&Credentials>) -> Result<Response> {
        let Request {
            method,
            url,
            headers,
            body,
        } = request;
        self.request(method, url, body, headers, credentials)
    }

    /// Authorization to answer a Basic challenge with, if the session has credentials
    fn challenge_response(&self, head: &ResponseHead) -> Result<Option<HeaderValue>> {
        let Some(credentials) = self.inner.config.credentials.as_ref() else {
            return Ok(None);
        };
        let challenge = head
            .headers
            .get(WWW_AUTHENTICATE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_challenge);
        match challenge {
            Some(challenge) if challenge.is_basic() => credentials.header_value().map(Some),
            _ => Ok(None),
        }
    }

    /// Send one request and read the response head, retrying transient failures
    fn exchange(
        &self,
        method: &Method,
        url: &Url,
        headers: &HeaderMap,
        payload: &mut Payload,
    ) -> Result<(ResponseHead, Checkout)> {
        let inner = &self.inner;
        let origin = Origin::from_url(url)?;
        let target = request_target(url);
        let host = origin.host_header();
        let mut checkout = Checkout::new(inner.pool.clone(), inner.pool.acquire_origin(origin));
        let mut schedule = RetrySchedule::new(&inner.config.retry_delays);

        loop {
            match self.attempt(&mut checkout, method, &target, &host, headers, payload) {
                Ok(head) => return Ok((head, checkout)),
                Err(err) => {
                    if !retry::is_retryable(&err) || !payload.is_replayable() {
                        return Err(error::transport(err, url.clone()));
                    }
                    let Some(delay) = schedule.next_delay() else {
                        tracing::debug!(
                            target: "sofa_client::session",
                            url = %url,
                            error = %err,
                            "Retry delays exhausted"
                        );
                        return Err(error::transport(err, url.clone()));
                    };
                    tracing::warn!(
                        target: "sofa_client::session",
                        url = %url,
                        error = %err,
                        attempt = schedule.attempt(),
                        delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                        "Retrying after transient failure"
                    );
                    SessionStats::incr(&inner.stats.retries);
                    checkout.disconnect();
                    if !delay.is_zero() {
                        thread::sleep(delay);
                    }
                }
            }
        }
    }

    fn attempt(
        &self,
        checkout: &mut Checkout,
        method: &Method,
        target: &str,
        host: &str,
        headers: &HeaderMap,
        payload: &mut Payload,
    ) -> io::Result<ResponseHead> {
        let inner = &self.inner;
        if checkout.ensure_connected(&inner.connector)? {
            SessionStats::incr(&inner.stats.connections_opened);
            tracing::trace!(target: "sofa_client::pool", host = host, "Opened connection");
        }
        let stream = checkout.stream()?;
        let writer = stream.get_mut();
        wire::write_head(writer, method, target, host, headers)?;
        payload.write_to(writer, inner.config.chunk_size)?;
        writer.flush()?;
        wire::read_head(stream)
    }

    /// Pick the body strategy, raise status errors and populate the cache
    fn finish(&self, method: &Method, url: &Url, head: ResponseHead, mut checkout: Checkout) -> Result<Response> {
        let inner = &self.inner;
        let framing = head
            .framing(method)
            .map_err(|e| error::transport(e, url.clone()))?;
        let keep_alive = head.keep_alive();
        let chunk_size = inner.config.chunk_size as u64;

        let body = match framing {
            Framing::Empty => {
                checkout.finish(keep_alive);
                ResponseBody::Absent
            }
            Framing::Length(len) if len < chunk_size => {
                let mut reader = BodyReader::new(framing);
                let mut buf = Vec::with_capacity(usize::try_from(len).unwrap_or_default());
                checkout
                    .stream()
                    .and_then(|stream| reader.read_to_end(stream, &mut buf))
                    .map_err(|e| error::transport(e, url.clone()))?;
                checkout.finish(keep_alive);
                ResponseBody::Buffered(buf.into())
            }
            _ => ResponseBody::Streamed(StreamingResponseBody::new(checkout, framing, keep_alive, url.clone())),
        };

        let ResponseHead { status, headers, .. } = head;

        if status.as_u16() >= 400 {
            let payload = match body.into_bytes() {
                Ok(bytes) => ErrorPayload::from_body(&bytes),
                Err(err) => {
                    tracing::debug!(
                        target: "sofa_client::session",
                        url = %url,
                        error = %err,
                        "Failed to read error body"
                    );
                    ErrorPayload::Empty
                }
            };
            tracing::debug!(
                target: "sofa_client::session",
                url = %url,
                status = status.as_u16(),
                "Request failed with error status"
            );
            return Err(error::status_code(url.clone(), status, payload));
        }

        if *method == Method::GET && !body.is_streamed() && headers.contains_key(http::header::ETAG) {
            let entry = CacheEntry::new(status, headers.clone(), body.as_bytes().cloned());
            if inner.cache.store(url.as_str(), entry) {
                SessionStats::incr(&inner.stats.cache_stores);
                let evicted = inner.cache.evict_oldest_if_over_capacity();
                SessionStats::add(&inner.stats.cache_evictions, evicted as u64);
            }
        }

        Ok(Response::new(status, headers, body))
    }
}

/// Drain a response that is answered without its body and release the connection
///
/// A failed drain discards the connection instead; the outcome of the
/// request is already decided by the status.
fn settle(mut checkout: Checkout, head: &ResponseHead, method: &Method) {
    let framing = match head.framing(method) {
        Ok(framing) => framing,
        Err(_) => {
            checkout.discard();
            return;
        }
    };
    let mut reader = BodyReader::new(framing);
    match checkout.stream().and_then(|stream| reader.drain(stream)) {
        Ok(_) => checkout.finish(head.keep_alive() && framing != Framing::Close),
        Err(err) => {
            tracing::debug!(
                target: "sofa_client::session",
                error = %err,
                "Discarding connection after failed drain"
            );
            checkout.discard();
        }
    }
}
