//! Scoped ownership of a pooled connection
//!
//! A `Checkout` is the only handle to a connection taken from the pool.
//! It ends exactly once: `release` puts a cleanly read connection back on
//! the free-list, `discard` closes it, and dropping the handle on any other
//! path (errors, abandoned bodies) discards it, since the connection may
//! still hold unread response bytes.

use std::io::{self, BufReader};
use std::sync::Arc;

use super::connection::Connection;
use super::pool::ConnectionPool;
use super::transport::{Connector, Transport};

pub struct Checkout {
    conn: Option<Connection>,
    pool: Arc<ConnectionPool>,
}

impl Checkout {
    pub fn new(pool: Arc<ConnectionPool>, conn: Connection) -> Self {
        Self {
            conn: Some(conn),
            pool,
        }
    }

    fn conn(&mut self) -> io::Result<&mut Connection> {
        self.conn
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "connection already released"))
    }

    pub fn is_connected(&self) -> bool {
        self.conn.as_ref().is_some_and(Connection::is_connected)
    }

    /// Connect if the connection has no open socket yet. Returns whether a
    /// new socket was opened.
    pub fn ensure_connected(&mut self, connector: &Connector) -> io::Result<bool> {
        let conn = self.conn()?;
        if conn.is_connected() {
            return Ok(false);
        }
        conn.connect(connector)?;
        Ok(true)
    }

    /// Close the socket; the next `ensure_connected` opens a fresh one
    pub fn disconnect(&mut self) {
        if let Some(conn) = self.conn.as_mut() {
            conn.close();
        }
    }

    pub fn stream(&mut self) -> io::Result<&mut BufReader<Transport>> {
        self.conn()?.stream()
    }

    /// Return the connection to the pool
    pub fn release(mut self) {
        if let Some(conn) = self.conn.take() {
            self.pool.release(conn);
        }
    }

    /// Close the connection instead of pooling it
    pub fn discard(mut self) {
        if let Some(mut conn) = self.conn.take() {
            conn.close();
        }
    }

    /// Release when `reusable`, discard otherwise
    pub fn finish(self, reusable: bool) {
        if reusable {
            self.release();
        } else {
            self.discard();
        }
    }
}

impl Drop for Checkout {
    fn drop(&mut self) {
        if let Some(mut conn) = self.conn.take() {
            conn.close();
        }
    }
}
