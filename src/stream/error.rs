use thiserror::Error;

/// Failure to establish the streaming connection.
#[derive(Debug, Error)]
pub enum ConnectionError {
    #[error("could not resolve {endpoint}: {source}")]
    Resolve {
        endpoint: String,
        source: std::io::Error,
    },

    #[error("{endpoint} resolved to no addresses")]
    NoAddress { endpoint: String },

    #[error("connection to {endpoint} failed: {source}")]
    Connect {
        endpoint: String,
        source: std::io::Error,
    },
}

/// Failure to deliver one frame.
#[derive(Debug, Error)]
pub enum SendError {
    #[error("not connected")]
    NotConnected,

    #[error("could not encode frame: {0}")]
    Encode(#[from] pose_wire::RecordError),

    #[error("send to {endpoint} failed: {source}")]
    Write {
        endpoint: String,
        source: std::io::Error,
    },
}
