//! Typed errors for DHT announcement parsing and ingestion.

use thiserror::Error;

/// Errors raised while decoding a monitored DHT value or ingesting a
/// crawled URL.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DhtError {
    /// A monitored value did not carry the `search:url:` prefix this
    /// overlay announces under.
    #[error("value does not carry the search:url: prefix")]
    MissingPrefix,

    /// The value carried the prefix but was missing the `hops` or `url`
    /// segment (§4.6: "missing `:` separators → drop").
    #[error("malformed announcement: missing field separator")]
    MalformedAnnouncement,

    /// The `hops` segment was not a valid `u8`.
    #[error("malformed announcement: hops field is not a valid integer")]
    InvalidHops,
}

/// Convenience alias for `wavefront-dht` results.
pub type Result<T> = std::result::Result<T, DhtError>;
