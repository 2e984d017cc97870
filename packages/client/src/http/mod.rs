//! HTTP/1.1 request and response types
//!
//! - `request`: request bodies and the outgoing request
//! - `wire`: request serialization and response head parsing
//! - `body`: framing-aware body decoding (content-length, chunked, close-delimited)
//! - `response`: status, headers and the `ResponseBody` union
//! - `stream`: the lazily read, connection-owning `StreamingResponseBody`

pub mod body;
pub mod request;
pub mod response;
pub mod stream;
pub mod wire;

pub use body::Framing;
pub use request::{Request, RequestBody};
pub use response::{Response, ResponseBody};
pub use stream::{Chunks, StreamingResponseBody};
