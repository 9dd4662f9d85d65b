//! Deterministic simulation harness for the Wavefront search overlay:
//! ties several [`wavefront_server::ServerDriver`]s together over an
//! in-memory transport, driven by a seeded [`SimEnv`], so an overlay-wide
//! scenario can run reproducibly on one thread without sockets.

pub mod cluster;
pub mod mocks;
pub mod sim_env;

pub use cluster::{Cluster, SimDriver};
pub use mocks::{InMemoryPeerTransport, RecordingDht, StubCrawler};
pub use sim_env::SimEnv;
