//! Pure computation of the fragment sequence for a send (§4.1 send
//! contract). Stateless: the stateful reassembly side (per-sender buffers,
//! output queues, deferred-free) lives in `wavefront-bridge::Framer`, which
//! is the only consumer of this module.

use bytes::Bytes;

use crate::{
    error::{ProtocolError, Result},
    framing::FramingHeader,
};

/// One fragment ready to be written to the transport: a framing header
/// followed by its payload slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    /// The framing header for this fragment.
    pub header: FramingHeader,
    /// The payload slice carried by this fragment.
    pub payload: Bytes,
}

/// Split `payload` into the fragment sequence `transmit` would enqueue,
/// given a transport whose units carry at most `max_payload_per_unit` bytes
/// of framed payload.
///
/// A payload of zero length still yields exactly one whole fragment (an
/// empty `DONE` response body, for instance).
pub fn fragment_payload(payload: &Bytes, max_payload_per_unit: usize) -> Result<Vec<Fragment>> {
    if max_payload_per_unit == 0 {
        return Err(ProtocolError::PayloadTooLarge { size: payload.len(), max: 0 });
    }
    if payload.len() <= max_payload_per_unit {
        return Ok(vec![Fragment { header: FramingHeader::whole(), payload: payload.clone() }]);
    }

    let mut fragments = Vec::new();
    let mut offset = 0;
    while offset < payload.len() {
        let remaining = payload.len() - offset;
        let chunk_len = remaining.min(max_payload_per_unit);
        let chunk = payload.slice(offset..offset + chunk_len);
        let is_last = offset + chunk_len == payload.len();
        let header = if is_last { FramingHeader::last_fragment() } else { FramingHeader::fragment() };
        fragments.push(Fragment { header, payload: chunk });
        offset += chunk_len;
    }
    Ok(fragments)
}
