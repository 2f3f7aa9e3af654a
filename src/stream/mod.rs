// Streaming: one outbound connection per streamer, one record per frame.

pub mod error;
pub mod streamer;
pub mod transport;

pub use error::{ConnectionError, SendError};
pub use streamer::{ConnectionState, FrameStreamer};
pub use transport::{Connector, Endpoint, TcpConnector};
