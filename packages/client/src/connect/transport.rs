//! Byte streams underneath a connection

use std::io::{self, Read, Write};
use std::net::{Shutdown, TcpStream, ToSocketAddrs};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use rustls::pki_types::ServerName;
use rustls::{ClientConfig, ClientConnection, RootCertStore, StreamOwned};

use super::origin::{Origin, Scheme};
use crate::config::SessionConfig;

/// A connected plain or TLS stream
pub enum Transport {
    Plain(TcpStream),
    Tls(Box<StreamOwned<ClientConnection, TcpStream>>),
}

impl Transport {
    fn tcp(&self) -> &TcpStream {
        match self {
            Transport::Plain(stream) => stream,
            Transport::Tls(stream) => &stream.sock,
        }
    }

    pub fn shutdown(&mut self) {
        if let Transport::Tls(stream) = self {
            stream.conn.send_close_notify();
            let _ = stream.conn.complete_io(&mut stream.sock);
        }
        let _ = self.tcp().shutdown(Shutdown::Both);
    }
}

impl Read for Transport {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Transport::Plain(stream) => stream.read(buf),
            Transport::Tls(stream) => stream.read(buf),
        }
    }
}

impl Write for Transport {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Transport::Plain(stream) => stream.write(buf),
            Transport::Tls(stream) => stream.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Transport::Plain(stream) => stream.flush(),
            Transport::Tls(stream) => stream.flush(),
        }
    }
}

/// Opens transports for origins using the session's socket options
pub struct Connector {
    connect_timeout: Option<Duration>,
    timeout: Option<Duration>,
    nodelay: bool,
    keepalive: Option<Duration>,
    tls: OnceLock<Arc<ClientConfig>>,
}

impl Connector {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout,
            timeout: config.timeout,
            nodelay: config.tcp_nodelay,
            keepalive: config.tcp_keepalive,
            tls: OnceLock::new(),
        }
    }

    /// Resolve the origin and open a socket, then a TLS session for https
    pub fn connect(&self, origin: &Origin) -> io::Result<Transport> {
        let stream = self.tcp(origin)?;
        match origin.scheme() {
            Scheme::Http => Ok(Transport::Plain(stream)),
            Scheme::Https => {
                let server_name = ServerName::try_from(origin.host())
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;
                let client = ClientConnection::new(self.tls_config(), server_name)
                    .map_err(io::Error::other)?;
                Ok(Transport::Tls(Box::new(StreamOwned::new(client, stream))))
            }
        }
    }

    fn tcp(&self, origin: &Origin) -> io::Result<TcpStream> {
        let mut last_err = None;

        for addr in (origin.host().as_str(), origin.port()).to_socket_addrs()? {
            let attempt = match self.connect_timeout {
                Some(timeout) => TcpStream::connect_timeout(&addr, timeout),
                None => TcpStream::connect(addr),
            };
            match attempt {
                Ok(stream) => {
                    self.configure(&stream)?;
                    tracing::debug!(target: "sofa_client::connect", origin = %origin, %addr, "connected");
                    return Ok(stream);
                }
                Err(err) => {
                    tracing::trace!(target: "sofa_client::connect", %addr, error = %err, "connect attempt failed");
                    last_err = Some(err);
                }
            }
        }

        Err(last_err.unwrap_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("could not resolve {}", origin.host()),
            )
        }))
    }

    fn configure(&self, stream: &TcpStream) -> io::Result<()> {
        stream.set_nodelay(self.nodelay)?;
        stream.set_read_timeout(self.timeout)?;
        stream.set_write_timeout(self.timeout)?;
        if let Some(idle) = self.keepalive {
            let keepalive = socket2::TcpKeepalive::new().with_time(idle);
            socket2::SockRef::from(stream).set_tcp_keepalive(&keepalive)?;
        }
        Ok(())
    }

    fn tls_config(&self) -> Arc<ClientConfig> {
        self.tls
            .get_or_init(|| {
                let mut root_store = RootCertStore::empty();
                root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

                let config = ClientConfig::builder()
                    .with_root_certificates(root_store)
                    .with_no_client_auth();
                Arc::new(config)
            })
            .clone()
    }
}
