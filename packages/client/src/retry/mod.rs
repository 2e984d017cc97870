//! Transient socket failure retry
//!
//! Retries are driven by the session's `retry_delays` list: each entry is
//! the pause before one more attempt, so `[0s]` means a single immediate
//! retry and an empty list disables retrying.

pub mod policy;

pub use policy::{RetrySchedule, is_retryable};
