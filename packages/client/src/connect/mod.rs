//! Connection establishment and pooling
//!
//! - `origin`: the (scheme, host, port) key connections are pooled under
//! - `transport`: plain TCP or rustls streams and the `Connector` that opens them
//! - `connection`: a lazily connected, buffered HTTP/1.1 connection
//! - `pool`: per-origin free-lists of idle connections
//! - `checkout`: exclusive ownership of a pooled connection for one request

pub mod checkout;
pub mod connection;
pub mod origin;
pub mod pool;
pub mod transport;

pub use checkout::Checkout;
pub use connection::Connection;
pub use origin::{Origin, Scheme};
pub use pool::ConnectionPool;
pub use transport::{Connector, Transport};
