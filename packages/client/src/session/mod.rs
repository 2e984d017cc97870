//! The HTTP session
//!
//! A `Session` owns the connection pool, the response cache and the
//! permanent redirect table, and runs each logical request through
//! retries, redirects, authentication challenges and conditional
//! revalidation.

mod core;
mod payload;
mod request;

pub use self::core::Session;
