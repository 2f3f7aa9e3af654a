use std::io::Write;

use pose_wire::{encode_frame, Frame};

use crate::settings::types::StreamSettings;
use crate::stream::error::{ConnectionError, SendError};
use crate::stream::transport::{Connector, Endpoint, TcpConnector};

/// Connection lifecycle of a [`FrameStreamer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connecting,
    Connected,
}

/// Pushes every frame to one consumer as a line-delimited JSON record.
///
/// The streamer owns its connection: it is opened by [`initialize`],
/// released by [`close`] or on drop, and dropped after the first failed
/// send. There is no reconnection; callers watch [`is_connected`] and
/// initialize again if they want to resume.
///
/// [`initialize`]: FrameStreamer::initialize
/// [`close`]: FrameStreamer::close
/// [`is_connected`]: FrameStreamer::is_connected
pub struct FrameStreamer<C: Connector = TcpConnector> {
    endpoint: Endpoint,
    connector: C,
    stream: Option<C::Stream>,
    state: ConnectionState,
    frames_sent: u64,
}

impl FrameStreamer<TcpConnector> {
    /// TCP streamer for `endpoint`.
    pub fn new(endpoint: Endpoint) -> Self {
        Self::with_connector(endpoint, TcpConnector::new())
    }

    pub fn from_settings(settings: &StreamSettings) -> Self {
        Self::with_connector(
            Endpoint::new(settings.host.clone(), settings.port),
            TcpConnector::from_settings(settings),
        )
    }
}

impl<C: Connector> FrameStreamer<C> {
    pub fn with_connector(endpoint: Endpoint, connector: C) -> Self {
        Self {
            endpoint,
            connector,
            stream: None,
            state: ConnectionState::Disconnected,
            frames_sent: 0,
        }
    }

    /// Open the connection. Does nothing if already connected.
    pub fn initialize(&mut self) -> Result<(), ConnectionError> {
        if self.state == ConnectionState::Connected {
            return Ok(());
        }

        self.state = ConnectionState::Connecting;
        match self.connector.connect(&self.endpoint) {
            Ok(stream) => {
                self.stream = Some(stream);
                self.state = ConnectionState::Connected;
                self.frames_sent = 0;
                tracing::info!("Connected to server at {}", self.endpoint);
                Ok(())
            }
            Err(e) => {
                self.stream = None;
                self.state = ConnectionState::Disconnected;
                tracing::warn!(
                    "Connection failed: {e}. Make sure the server is running at {}",
                    self.endpoint
                );
                Err(e)
            }
        }
    }

    /// Serialise `frame` and write it as one record, returning the bytes
    /// written.
    ///
    /// A write failure drops the connection; the frame is not retried.
    pub fn send(&mut self, frame: &Frame) -> Result<usize, SendError> {
        if self.state != ConnectionState::Connected {
            return Err(SendError::NotConnected);
        }
        let Some(stream) = self.stream.as_mut() else {
            self.state = ConnectionState::Disconnected;
            return Err(SendError::NotConnected);
        };

        let record = encode_frame(frame)?;
        if let Err(source) = stream.write_all(&record).and_then(|()| stream.flush()) {
            tracing::warn!("Send to {} failed: {source}", self.endpoint);
            self.stream = None;
            self.state = ConnectionState::Disconnected;
            return Err(SendError::Write {
                endpoint: self.endpoint.to_string(),
                source,
            });
        }

        self.frames_sent += 1;
        Ok(record.len())
    }

    /// Release the connection. Safe to call repeatedly.
    pub fn close(&mut self) {
        if self.stream.take().is_some() {
            tracing::debug!(
                frames_sent = self.frames_sent,
                "Closed connection to {}",
                self.endpoint
            );
        }
        self.state = ConnectionState::Disconnected;
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }

    /// Frames written on the current connection.
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }
}

impl<C: Connector> Drop for FrameStreamer<C> {
    fn drop(&mut self) {
        self.close();
    }
}
