//! # sofa_client
//!
//! Blocking HTTP/1.1 transport for CouchDB clients.
//!
//! ## Features
//!
//! - **Connection pooling** keyed by (scheme, host, port), with connections
//!   released only once their response has been fully read
//! - **Conditional caching** of GET responses carrying an `ETag`, revalidated
//!   with `If-None-Match` and evicted in batches by response `Date`
//! - **Redirects** bounded by a configurable limit, with 301 targets
//!   memoized for the lifetime of the session
//! - **Transient failure retry** driven by an explicit delay list
//! - **Basic authentication**, proactive or in answer to a challenge
//! - **Streaming** of large and chunked response bodies
//! - **Typed errors** keyed by HTTP status, carrying CouchDB's
//!   `{"error", "reason"}` payload
//!
//! ## Usage
//!
//! ```no_run
//! use sofa_client::{HeaderMap, Method, RequestBody, Session, SessionConfig, Url};
//!
//! # fn main() -> sofa_client::Result<()> {
//! let session = Session::new(SessionConfig::default())?;
//! let url = Url::parse("http://localhost:5984/_all_dbs").map_err(sofa_client::error::invalid_url)?;
//! let response = session.request(Method::GET, url, RequestBody::Empty, HeaderMap::new(), None)?;
//! let dbs: Vec<String> = response.json()?;
//! println!("{dbs:?}");
//! # Ok(())
//! # }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod auth;
pub mod cache;
pub mod config;
pub mod connect;
pub mod error;
pub mod http;
pub mod redirect;
pub mod retry;
pub mod session;
pub mod telemetry;

pub mod prelude;

pub use crate::prelude::*;
