pub mod basic_auth;
pub mod challenge;

pub use basic_auth::{Credentials, basic_auth, decode_basic_auth};
pub use challenge::{Challenge, parse_challenge};
