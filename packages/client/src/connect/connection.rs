//! A single HTTP/1.1 connection to one origin

use std::io::{self, BufReader};
use std::sync::atomic::{AtomicU64, Ordering};

use super::origin::Origin;
use super::transport::{Connector, Transport};

static CONNECTION_IDS: AtomicU64 = AtomicU64::new(1);

/// A lazily connected connection
///
/// Created unconnected by the pool; the session connects it before the
/// first send and reconnects it after a transient failure.
pub struct Connection {
    id: u64,
    origin: Origin,
    stream: Option<BufReader<Transport>>,
}

impl Connection {
    pub fn new(origin: Origin) -> Self {
        Self {
            id: CONNECTION_IDS.fetch_add(1, Ordering::Relaxed),
            origin,
            stream: None,
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    pub fn connect(&mut self, connector: &Connector) -> io::Result<()> {
        let transport = connector.connect(&self.origin)?;
        self.stream = Some(BufReader::new(transport));
        Ok(())
    }

    /// Drop the underlying socket; the next send reconnects
    pub fn close(&mut self) {
        if let Some(stream) = self.stream.take() {
            let mut transport = stream.into_inner();
            transport.shutdown();
            tracing::trace!(target: "sofa_client::connect", id = self.id, origin = %self.origin, "closed connection");
        }
    }

    /// Buffered stream for reading responses and, through `get_mut`, writing requests
    pub fn stream(&mut self) -> io::Result<&mut BufReader<Transport>> {
        self.stream
            .as_mut()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotConnected, "connection is not open"))
    }
}

impl std::fmt::Debug for Connection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Connection")
            .field("id", &self.id)
            .field("origin", &self.origin)
            .field("connected", &self.is_connected())
            .finish()
    }
}
