//! Wire formats for the Wavefront search overlay.
//!
//! Three fixed-layout, packed headers, each documented in full in the
//! workspace specification:
//!
//! - [`framing::FramingHeader`] — one flag byte prefixed to every unit
//!   exchanged between a client and the service.
//! - [`command::SearchCommandHeader`] / [`command::SearchResponseHeader`] —
//!   the client-service application protocol.
//! - [`flood::FloodHeader`] — the inter-peer flood protocol.
//!
//! All headers are zero-copy parseable via `zerocopy` and carry their
//! multi-byte fields as raw byte arrays, since `#[repr(C, packed)]` makes a
//! reference to an unaligned field undefined behaviour.

pub mod body;
pub mod command;
pub mod error;
pub mod flood;
pub mod fragment;
pub mod framing;

pub use body::{encode_many, encode_one, parse_all, serialize_bounded};
pub use command::{Action, ResponseType, SearchCommandHeader, SearchResponseHeader};
pub use error::{ProtocolError, Result};
pub use flood::{FloodHeader, FloodMessageType, INITIAL_TTL};
pub use fragment::{Fragment, fragment_payload};
pub use framing::{FLAG_FRAGMENTED, FLAG_LAST_FRAGMENT, FramingHeader};
