//! Typed errors for the service driver.

use thiserror::Error;
use wavefront_bridge::BridgeError;
use wavefront_proto::ProtocolError;

use crate::driver::ClientId;

/// Errors raised while processing a server event.
#[derive(Debug, Error)]
pub enum ServerError {
    /// An event referenced a client connection the driver has no state for
    /// (arrived after disconnect, or was never registered).
    #[error("unknown client {0:?}")]
    UnknownClient(ClientId),

    /// A wire header or body failed to parse.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Framing or bridge processing failed.
    #[error(transparent)]
    Bridge(#[from] BridgeError),
}
