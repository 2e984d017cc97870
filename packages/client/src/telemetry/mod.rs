//! Session statistics

pub mod session_stats;

pub use session_stats::{SessionStats, SessionStatsSnapshot};
