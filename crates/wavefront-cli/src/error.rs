//! Client-side errors.

use thiserror::Error;
use wavefront_proto::ProtocolError;

/// Errors the CLI can surface to the user.
#[derive(Debug, Error)]
pub enum CliError {
    /// Reading the URL list file failed.
    #[error("failed to read url file {path}: {source}")]
    UrlFileRead {
        /// Path that failed to read.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The Unix socket connection to the service failed.
    #[error("failed to connect to service at {path}: {source}")]
    Connect {
        /// Socket path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The connection closed before a terminal response arrived.
    #[error("connection closed before a Done or final result")]
    ConnectionClosed,

    /// A unit failed to parse as a wire header.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Sending or receiving over the socket failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, CliError>;
