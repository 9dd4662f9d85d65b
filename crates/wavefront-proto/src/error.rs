//! Wire-level error types.
//!
//! Every variant here corresponds to a condition the core is required to
//! recover from locally (drop the offending unit or message) rather than
//! propagate. Callers match on the variant to decide *what* to drop; none of
//! these are meant to bubble up to a user-visible failure.

use thiserror::Error;

/// Errors raised while encoding or decoding a wire message.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// A unit was shorter than the header it claims to carry.
    #[error("unit too short: expected at least {expected} bytes, got {actual}")]
    ShortUnit {
        /// Minimum number of bytes required.
        expected: usize,
        /// Number of bytes actually present.
        actual: usize,
    },

    /// A command or response header's `size` field did not match the
    /// reassembled payload length.
    #[error("size mismatch: header declares {declared}, buffer holds {actual}")]
    SizeMismatch {
        /// Size declared in the header.
        declared: u64,
        /// Size actually observed.
        actual: usize,
    },

    /// A payload is larger than the transport's `max_message_size`.
    #[error("payload of {size} bytes exceeds maximum unit payload of {max}")]
    PayloadTooLarge {
        /// Requested payload size.
        size: usize,
        /// Maximum payload size the transport accepts.
        max: usize,
    },

    /// An unrecognized `action` byte in a `search_command` header.
    #[error("invalid command action: {0:#04x}")]
    InvalidAction(u8),

    /// An unrecognized `type` byte in a `search_response` header.
    #[error("invalid response type: {0:#04x}")]
    InvalidResponseType(u8),

    /// An unrecognized `type` byte in a flood header.
    #[error("invalid flood message type: {0:#04x}")]
    InvalidFloodType(u8),

    /// A body that should consist of NUL-terminated strings ended without a
    /// terminator for the final entry.
    #[error("malformed body: missing NUL terminator")]
    MalformedBody,
}

/// Convenience alias for results of wire encode/decode operations.
pub type Result<T> = std::result::Result<T, ProtocolError>;
