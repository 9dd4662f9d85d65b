//! The Wavefront search overlay service.
//!
//! [`driver::ServerDriver`] is the pure, action-returning core; everything
//! else in this crate is I/O glue around it: a UDP peer transport, a
//! Unix-socket client transport, and stand-in DHT/crawler collaborators.

pub mod client;
pub mod collaborators;
pub mod config;
pub mod driver;
pub mod error;
pub mod system_env;
pub mod transport;

pub use client::ClientRegistry;
pub use collaborators::{LoggingDht, NullCrawler};
pub use config::ServerConfig;
pub use driver::{ClientId, ServerAction, ServerDriver, ServerEvent};
pub use error::ServerError;
pub use system_env::SystemEnv;
pub use transport::UdpPeerTransport;
