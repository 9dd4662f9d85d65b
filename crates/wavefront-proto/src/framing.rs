//! The framing header: a one-byte flag set prefixed to every unit exchanged
//! between a client and the service (§4.1, §6).

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::{ProtocolError, Result};

/// Set on every fragment of a message that was split across more than one
/// unit.
pub const FLAG_FRAGMENTED: u8 = 0x01;
/// Set on the final fragment of a split message; the sole reassembly
/// completion signal.
pub const FLAG_LAST_FRAGMENT: u8 = 0x02;

/// One-byte header prefixed to every framed unit.
///
/// Fixed layout, single field: no alignment concerns, but kept packed and
/// zero-copy for symmetry with the other wire headers.
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct FramingHeader {
    flags: u8,
}

impl FramingHeader {
    /// Size of the serialized header.
    pub const SIZE: usize = 1;

    /// A header for a non-fragmented unit: carries neither flag.
    #[must_use]
    pub fn whole() -> Self {
        Self { flags: 0 }
    }

    /// A header for a fragment that is not the last one.
    #[must_use]
    pub fn fragment() -> Self {
        Self { flags: FLAG_FRAGMENTED }
    }

    /// A header for the terminating fragment of a split message.
    #[must_use]
    pub fn last_fragment() -> Self {
        Self { flags: FLAG_FRAGMENTED | FLAG_LAST_FRAGMENT }
    }

    /// Parse a header from the front of a buffer.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let header =
            Self::ref_from_prefix(bytes)
                .map_err(|_| ProtocolError::ShortUnit { expected: Self::SIZE, actual: bytes.len() })?
                .0;
        Ok(*header)
    }

    /// Serialize this header to its wire form.
    #[must_use]
    pub fn encode(&self) -> [u8; Self::SIZE] {
        [self.flags]
    }

    /// True when `FRAGMENTED` is set (first or intermediate fragment, or the
    /// last one — `LAST_FRAGMENT` always implies `FRAGMENTED`).
    #[must_use]
    pub fn is_fragmented(&self) -> bool {
        self.flags & FLAG_FRAGMENTED != 0
    }

    /// True when this is the terminating fragment (or a non-fragmented unit
    /// is never "last" in the reassembly sense — callers should check
    /// [`FramingHeader::is_fragmented`] first).
    #[must_use]
    pub fn is_last_fragment(&self) -> bool {
        self.flags & FLAG_LAST_FRAGMENT != 0
    }

    /// Raw flag byte, for logging and tests.
    #[must_use]
    pub fn flags(&self) -> u8 {
        self.flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_message_carries_no_flags() {
        let header = FramingHeader::whole();
        assert!(!header.is_fragmented());
        assert!(!header.is_last_fragment());
    }

    #[test]
    fn fragment_without_last_is_fragmented_only() {
        let header = FramingHeader::fragment();
        assert!(header.is_fragmented());
        assert!(!header.is_last_fragment());
    }

    #[test]
    fn last_fragment_carries_both_flags() {
        let header = FramingHeader::last_fragment();
        assert!(header.is_fragmented());
        assert!(header.is_last_fragment());
    }

    #[test]
    fn round_trips_through_bytes() {
        let header = FramingHeader::last_fragment();
        let bytes = header.encode();
        let decoded = FramingHeader::decode(&bytes).expect("decode");
        assert_eq!(decoded, header);
    }

    #[test]
    fn rejects_empty_buffer() {
        assert!(FramingHeader::decode(&[]).is_err());
    }
}
