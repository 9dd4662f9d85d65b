//! The inter-peer flood header (§3, §6): `{u64 flow_id (big-endian); u8
//! ttl; u8 type}`. Unlike the client-service headers, `flow_id` is
//! explicitly big-endian on the wire since it crosses host boundaries.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::{ProtocolError, Result};

/// Initial TTL assigned to a freshly originated flood message (§4.2).
pub const INITIAL_TTL: u8 = 16;

/// `type` byte of a flood message.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FloodMessageType {
    /// A keyword search propagating outward from its origin.
    Request,
    /// An answer travelling back along the reverse path.
    Response,
}

impl FloodMessageType {
    /// Wire encoding of this message type.
    #[must_use]
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Request => 0,
            Self::Response => 1,
        }
    }

    /// Decode a wire message-type byte.
    pub fn from_u8(byte: u8) -> Result<Self> {
        match byte {
            0 => Ok(Self::Request),
            1 => Ok(Self::Response),
            other => Err(ProtocolError::InvalidFloodType(other)),
        }
    }
}

/// Header prefixed to every message exchanged between peers.
#[repr(C, packed)]
#[derive(Clone, Copy, PartialEq, Eq, Debug, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct FloodHeader {
    flow_id: [u8; 8],
    ttl: u8,
    message_type: u8,
}

impl FloodHeader {
    /// Size of the serialized header.
    pub const SIZE: usize = 10;

    /// Build a header for a freshly originated message (initial TTL).
    #[must_use]
    pub fn originate(flow_id: u64, message_type: FloodMessageType) -> Self {
        Self::new(flow_id, INITIAL_TTL, message_type)
    }

    /// Build a header with an explicit TTL, for relaying.
    #[must_use]
    pub fn new(flow_id: u64, ttl: u8, message_type: FloodMessageType) -> Self {
        Self { flow_id: flow_id.to_be_bytes(), ttl, message_type: message_type.to_u8() }
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
        let mut out = [0u8; Self::SIZE];
        out[0..8].copy_from_slice(&self.flow_id);
        out[8] = self.ttl;
        out[9] = self.message_type;
        out
    }

    /// The flow this message belongs to, in host byte order.
    #[must_use]
    pub fn flow_id(&self) -> u64 {
        u64::from_be_bytes(self.flow_id)
    }

    /// Remaining hop budget.
    #[must_use]
    pub fn ttl(&self) -> u8 {
        self.ttl
    }

    /// The message kind.
    pub fn message_type(&self) -> Result<FloodMessageType> {
        FloodMessageType::from_u8(self.message_type)
    }

    /// Return a copy of this header with the TTL decremented by one.
    ///
    /// Does not check for underflow; callers must check `ttl() > 0` before
    /// forwarding (§4.2 step 4 / RESPONSE path step 3).
    #[must_use]
    pub fn decremented(&self) -> Self {
        Self { flow_id: self.flow_id, ttl: self.ttl - 1, message_type: self.message_type }
    }
}
