//! Service configuration (§10.3): CLI flags parse into [`Args`], then
//! convert into the plain-data [`ServerConfig`] the driver consumes.
//!
//! The configuration handle itself is opaque to the core (§6) — only the
//! transport and DHT adapter read it; the driver takes the already-resolved
//! plain values.

use wavefront_bridge::{DEFAULT_CRAWL_HOPS, DEFAULT_FLOW_MAP_SIZE};
use wavefront_flood::DEFAULT_ROUTING_TABLE_SIZE;

/// Plain-data configuration consumed by [`crate::driver::ServerDriver`].
///
/// The initial TTL (§4.2) is not included here: it is a wire-protocol
/// constant (`wavefront_proto::INITIAL_TTL`), not a deployment tunable.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Capacity of the per-peer routing table (§3).
    pub routing_table_size: usize,
    /// Capacity of the client-bridge flow map (§3).
    pub flow_map_size: usize,
    /// Crawl-hops budget stamped on a freshly announced URL (§4.5).
    pub crawl_hops: u8,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            routing_table_size: DEFAULT_ROUTING_TABLE_SIZE,
            flow_map_size: DEFAULT_FLOW_MAP_SIZE,
            crawl_hops: DEFAULT_CRAWL_HOPS,
        }
    }
}
