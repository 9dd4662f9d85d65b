//! The abstract peer-to-peer transport interface (§6) that the flooding
//! engine is driven against. Concrete transports (a real UDP/QUIC socket, an
//! in-memory mesh for tests) live outside this crate.

use wavefront_core::PeerId;

/// The transport-level facts the flooding engine needs: who it's connected
/// to, and how large a unit it can carry.
pub trait PeerTransport {
    /// Peers currently connected, in iteration order. A flood visits peers
    /// in this order (§5's "within one flood invocation" ordering
    /// guarantee).
    fn connected_peers(&self) -> Vec<PeerId>;

    /// Hard upper bound on a single unit's size, headers included.
    fn max_message_size(&self) -> usize;
}
