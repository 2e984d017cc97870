//! Response cache modules
//!
//! The functionality is organized into logical modules:
//!
//! - `core`: ResponseCache struct and basic initialization
//! - `operations`: lookup/store/remove keyed by URL
//! - `eviction`: batched eviction by response date

pub mod core;
pub mod eviction;
pub mod operations;

pub use self::core::ResponseCache;
