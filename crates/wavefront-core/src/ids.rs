//! Newtype identifiers used across the workspace, so a `flow_id` and a
//! `request_id` (both plain integers on the wire) can't be swapped by
//! accident at a call site.

use std::fmt;

/// A peer identity as handed out by the transport abstraction (§6
/// `iterate_peers`). Opaque to the core beyond equality and hashing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId(pub u64);

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "peer-{}", self.0)
    }
}

/// The 64-bit identifier carried by every flood message, unique with high
/// probability per search flow across the overlay (§3, §9).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FlowId(pub u64);

impl fmt::Display for FlowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "flow-{:016x}", self.0)
    }
}

/// The 16-bit client-chosen correlation identifier from a `search_command`
/// (§3). `0` is reserved for "no correlation".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(pub u16);

impl RequestId {
    /// The reserved "uncorrelated" value.
    pub const UNCORRELATED: Self = Self(0);
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "req-{}", self.0)
    }
}
