//! TTL-bounded request flooding and reverse-path response routing (§4.2).

pub mod flooding;
pub mod routing_table;
pub mod transport;

pub use flooding::{FloodAction, Flooding};
pub use routing_table::{RoutingEntry, RoutingTable, DEFAULT_ROUTING_TABLE_SIZE};
pub use transport::PeerTransport;
