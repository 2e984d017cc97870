//! Connection pool for HTTP clients.
//!
//! Per-origin free-lists with lazy creation and greedy most-recent reuse.
//! A connection is either checked out by exactly one in-flight request or
//! sitting in a free-list, never both.

use std::sync::{Mutex, MutexGuard, PoisonError};

use hashbrown::HashMap;
use url::Url;

use super::connection::Connection;
use super::origin::Origin;
use crate::error::Result;

/// Keyed store of reusable connections
#[derive(Debug, Default)]
pub struct ConnectionPool {
    idle: Mutex<HashMap<Origin, Vec<Connection>>>,
    max_idle_per_origin: Option<usize>,
}

impl ConnectionPool {
    /// Create a new pool, optionally bounding the idle connections per origin.
    pub fn new(max_idle_per_origin: Option<usize>) -> Self {
        Self {
            idle: Mutex::new(HashMap::new()),
            max_idle_per_origin,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Origin, Vec<Connection>>> {
        self.idle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check out a connection for the URL's origin.
    ///
    /// Pops the most recently returned idle connection, or creates a new
    /// unconnected one.
    ///
    /// # Errors
    ///
    /// Returns a builder error for unsupported schemes.
    pub fn acquire(&self, url: &Url) -> Result<Connection> {
        let origin = Origin::from_url(url)?;
        Ok(self.acquire_origin(origin))
    }

    pub fn acquire_origin(&self, origin: Origin) -> Connection {
        let reused = self.lock().get_mut(&origin).and_then(Vec::pop);
        match reused {
            Some(conn) => {
                tracing::trace!(target: "sofa_client::pool", id = conn.id(), origin = %origin, "reusing idle connection");
                conn
            }
            None => Connection::new(origin),
        }
    }

    /// Return a connection to its origin's free-list.
    ///
    /// Closed connections and connections beyond the per-origin bound are
    /// dropped instead.
    pub fn release(&self, conn: Connection) {
        if !conn.is_connected() {
            return;
        }

        let overflow = {
            let mut idle = self.lock();
            let list = idle.entry(conn.origin().clone()).or_default();
            match self.max_idle_per_origin {
                Some(max) if list.len() >= max => Some(conn),
                _ => {
                    list.push(conn);
                    None
                }
            }
        };

        if let Some(mut conn) = overflow {
            tracing::trace!(target: "sofa_client::pool", id = conn.id(), "pool full, closing connection");
            conn.close();
        }
    }

    /// Number of idle connections for an origin
    pub fn idle_count(&self, origin: &Origin) -> usize {
        self.lock().get(origin).map_or(0, Vec::len)
    }

    /// Total number of idle connections
    pub fn total_idle(&self) -> usize {
        self.lock().values().map(Vec::len).sum()
    }

    /// Close and drop all idle connections
    pub fn clear(&self) {
        let drained: Vec<Connection> = self.lock().drain().flat_map(|(_, list)| list).collect();
        for mut conn in drained {
            conn.close();
        }
    }
}
