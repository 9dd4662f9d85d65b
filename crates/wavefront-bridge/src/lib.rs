//! Framing (§4.1) and the client-bridge (§4.3): fused into one crate
//! because the bridge is Framing's only caller and both share the
//! per-client reset lifecycle.

pub mod client_bridge;
pub mod error;
pub mod flow_map;
pub mod framer;

pub use client_bridge::{build_flood_response, BridgeAction, ClientBridge, DEFAULT_CRAWL_HOPS};
pub use error::{BridgeError, Result};
pub use flow_map::{FlowMap, DEFAULT_FLOW_MAP_SIZE};
pub use framer::Framer;
