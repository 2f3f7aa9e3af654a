use std::fmt;
use std::io::Write;
use std::net::{SocketAddr, TcpStream, ToSocketAddrs};
use std::time::Duration;

use crate::settings::types::StreamSettings;
use crate::stream::error::ConnectionError;

/// Host and port of the streaming consumer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub host: String,
    pub port: u16,
}

impl Endpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl Default for Endpoint {
    fn default() -> Self {
        Self::new("127.0.0.1", 8888)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Opens the outbound byte stream a [`FrameStreamer`](super::FrameStreamer)
/// writes records to.
///
/// Implemented by [`TcpConnector`] in production and by in-memory fakes in
/// tests.
pub trait Connector {
    type Stream: Write;

    fn connect(&mut self, endpoint: &Endpoint) -> Result<Self::Stream, ConnectionError>;
}

/// TCP transport with optional connect/write timeouts.
#[derive(Debug, Clone, Default)]
pub struct TcpConnector {
    pub connect_timeout: Option<Duration>,
    pub write_timeout: Option<Duration>,
}

impl TcpConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_settings(settings: &StreamSettings) -> Self {
        Self {
            connect_timeout: settings.connect_timeout(),
            write_timeout: settings.write_timeout(),
        }
    }

    fn connect_addr(&self, addr: &SocketAddr) -> std::io::Result<TcpStream> {
        let stream = match self.connect_timeout {
            Some(timeout) => TcpStream::connect_timeout(addr, timeout)?,
            None => TcpStream::connect(addr)?,
        };
        stream.set_nodelay(true)?;
        stream.set_write_timeout(self.write_timeout)?;
        Ok(stream)
    }
}

impl Connector for TcpConnector {
    type Stream = TcpStream;

    fn connect(&mut self, endpoint: &Endpoint) -> Result<TcpStream, ConnectionError> {
        let addrs: Vec<SocketAddr> = (endpoint.host.as_str(), endpoint.port)
            .to_socket_addrs()
            .map_err(|source| ConnectionError::Resolve {
                endpoint: endpoint.to_string(),
                source,
            })?
            .collect();

        // Try each resolved address, keeping the last failure.
        let mut last_err = None;
        for addr in &addrs {
            match self.connect_addr(addr) {
                Ok(stream) => return Ok(stream),
                Err(e) => {
                    tracing::debug!("Connect to {addr} failed: {e}");
                    last_err = Some(e);
                }
            }
        }

        match last_err {
            Some(source) => Err(ConnectionError::Connect {
                endpoint: endpoint.to_string(),
                source,
            }),
            None => Err(ConnectionError::NoAddress {
                endpoint: endpoint.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    #[test]
    fn endpoint_displays_as_host_port() {
        assert_eq!(Endpoint::default().to_string(), "127.0.0.1:8888");
        assert_eq!(Endpoint::new("tracker.local", 9000).to_string(), "tracker.local:9000");
    }

    #[test]
    fn from_settings_copies_timeouts() {
        let settings = StreamSettings {
            connect_timeout_ms: Some(200),
            write_timeout_ms: Some(30),
            ..StreamSettings::default()
        };
        let connector = TcpConnector::from_settings(&settings);
        assert_eq!(connector.connect_timeout, Some(Duration::from_millis(200)));
        assert_eq!(connector.write_timeout, Some(Duration::from_millis(30)));
    }

    #[test]
    fn connects_to_listening_socket() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut connector = TcpConnector {
            connect_timeout: Some(Duration::from_secs(2)),
            write_timeout: Some(Duration::from_secs(2)),
        };
        let stream = connector.connect(&Endpoint::new("127.0.0.1", port)).unwrap();
        assert!(stream.nodelay().unwrap());
        assert_eq!(stream.write_timeout().unwrap(), Some(Duration::from_secs(2)));
    }

    #[test]
    fn zero_timeouts_from_settings_still_connect() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let settings = StreamSettings {
            connect_timeout_ms: Some(0),
            write_timeout_ms: Some(0),
            ..StreamSettings::default()
        };

        let mut connector = TcpConnector::from_settings(&settings);
        let stream = connector.connect(&Endpoint::new("127.0.0.1", port)).unwrap();
        assert_eq!(stream.write_timeout().unwrap(), None);
    }

    #[test]
    fn refused_connection_is_connect_error() {
        // Bind then drop to find a port nothing listens on.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };

        let mut connector = TcpConnector::new();
        let err = connector
            .connect(&Endpoint::new("127.0.0.1", port))
            .unwrap_err();
        assert!(matches!(err, ConnectionError::Connect { .. }));
        assert!(err.to_string().contains(&format!("127.0.0.1:{port}")));
    }

    #[test]
    fn unresolvable_host_is_resolve_error() {
        let mut connector = TcpConnector::new();
        let err = connector
            .connect(&Endpoint::new("not a valid host name", 8888))
            .unwrap_err();
        assert!(matches!(err, ConnectionError::Resolve { .. }));
    }
}
