//! Typed errors for framing and client-bridge processing.

use thiserror::Error;
use wavefront_proto::ProtocolError;

/// Errors raised while framing, reassembling, or bridging client traffic.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// A wire header or body failed to parse.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// Convenience alias for bridge-crate results.
pub type Result<T> = std::result::Result<T, BridgeError>;
