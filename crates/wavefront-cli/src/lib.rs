//! Command-building for the Wavefront CLI client.
//!
//! The connection and I/O loop live in `main.rs`: unlike the service, the
//! client has no reason to be library-shaped, but the wire-level command
//! construction is kept separate and unit-tested on its own.

pub mod command;
pub mod error;

pub use command::{build_add, build_search};
pub use error::{CliError, Result};
