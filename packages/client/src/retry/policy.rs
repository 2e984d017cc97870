//! Retry classification and delay schedule

use std::io;
use std::slice;
use std::time::Duration;

/// Whether a socket error is worth retrying on a fresh connection
///
/// Covers resets, broken pipes, timeouts and unreachable networks. An idle
/// connection the server closed before answering is reported by the wire
/// layer as `ConnectionReset`, so it lands here too.
pub fn is_retryable(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::BrokenPipe
            | io::ErrorKind::TimedOut
            | io::ErrorKind::WouldBlock
            | io::ErrorKind::UnexpectedEof
            | io::ErrorKind::HostUnreachable
            | io::ErrorKind::NetworkUnreachable
            | io::ErrorKind::NetworkDown
    )
}

/// Remaining retry budget for one logical request
#[derive(Debug, Clone)]
pub struct RetrySchedule<'a> {
    delays: slice::Iter<'a, Duration>,
    attempt: u32,
}

impl<'a> RetrySchedule<'a> {
    pub fn new(delays: &'a [Duration]) -> Self {
        Self {
            delays: delays.iter(),
            attempt: 0,
        }
    }

    /// Number of retries taken so far
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// Take the next delay, or `None` once the budget is spent
    pub fn next_delay(&mut self) -> Option<Duration> {
        let delay = self.delays.next().copied()?;
        self.attempt += 1;
        Some(delay)
    }

    pub fn remaining(&self) -> usize {
        self.delays.len()
    }
}
