//! The client-service application protocol: `search_command` and
//! `search_response` (§3, §6). Both headers use host byte order, per the
//! original client/service assumption of running on the same machine; this
//! is preserved verbatim rather than forced to network order, per the
//! byte-swap discipline called out in §9.

use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::error::{ProtocolError, Result};

/// `action` byte of a `search_command`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    /// Flood a keyword search.
    Search,
    /// Announce one or more URLs.
    Add,
}

impl Action {
    /// Wire encoding of this action.
    #[must_use]
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Search => 0x00,
            Self::Add => 0x01,
        }
    }

    /// Decode a wire action byte.
    pub fn from_u8(byte: u8) -> Result<Self> {
        match byte {
            0x00 => Ok(Self::Search),
            0x01 => Ok(Self::Add),
            other => Err(ProtocolError::InvalidAction(other)),
        }
    }
}

/// `type` byte of a `search_response`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResponseType {
    /// Carries zero or more matching URLs.
    Result,
    /// Acknowledges completion with no payload.
    Done,
}

impl ResponseType {
    /// Wire encoding of this response type.
    #[must_use]
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Result => 0x00,
            Self::Done => 0x01,
        }
    }

    /// Decode a wire response-type byte.
    pub fn from_u8(byte: u8) -> Result<Self> {
        match byte {
            0x00 => Ok(Self::Result),
            0x01 => Ok(Self::Done),
            other => Err(ProtocolError::InvalidResponseType(other)),
        }
    }
}

/// `{u8 action; u16 id; u64 size}` header of a `search_command`.
///
/// Fields are stored as raw byte arrays rather than native integers because
/// the struct is `#[repr(C, packed)]`: references to unaligned multi-byte
/// fields are undefined behaviour in Rust, so every access goes through
/// `from_ne_bytes`/`to_ne_bytes` on an owned copy.
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct SearchCommandHeader {
    action: u8,
    id: [u8; 2],
    size: [u8; 8],
}

impl SearchCommandHeader {
    /// Size of the serialized header.
    pub const SIZE: usize = 11;

    /// Build a header for a command whose total size (header + body) is
    /// `total_size`.
    #[must_use]
    pub fn new(action: Action, id: u16, total_size: u64) -> Self {
        Self { action: action.to_u8(), id: id.to_ne_bytes(), size: total_size.to_ne_bytes() }
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
        out[0] = self.action;
        out[1..3].copy_from_slice(&self.id);
        out[3..11].copy_from_slice(&self.size);
        out
    }

    /// The requested action.
    pub fn action(&self) -> Result<Action> {
        Action::from_u8(self.action)
    }

    /// Client-chosen correlation id; 0 means uncorrelated.
    #[must_use]
    pub fn id(&self) -> u16 {
        u16::from_ne_bytes(self.id)
    }

    /// Total declared size of the command, header included.
    #[must_use]
    pub fn size(&self) -> u64 {
        u64::from_ne_bytes(self.size)
    }
}

/// `{u8 type; u16 id; u64 size}` header of a `search_response`.
#[repr(C, packed)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, FromBytes, IntoBytes, KnownLayout, Immutable)]
pub struct SearchResponseHeader {
    response_type: u8,
    id: [u8; 2],
    size: [u8; 8],
}

impl SearchResponseHeader {
    /// Size of the serialized header.
    pub const SIZE: usize = 11;

    /// Build a header for a response whose total size (header + body) is
    /// `total_size`.
    #[must_use]
    pub fn new(response_type: ResponseType, id: u16, total_size: u64) -> Self {
        Self { response_type: response_type.to_u8(), id: id.to_ne_bytes(), size: total_size.to_ne_bytes() }
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
        out[0] = self.response_type;
        out[1..3].copy_from_slice(&self.id);
        out[3..11].copy_from_slice(&self.size);
        out
    }

    /// The response kind.
    pub fn response_type(&self) -> Result<ResponseType> {
        ResponseType::from_u8(self.response_type)
    }

    /// Correlation id echoing the request, or 0 for uncorrelated.
    #[must_use]
    pub fn id(&self) -> u16 {
        u16::from_ne_bytes(self.id)
    }

    /// Total declared size of the response, header included.
    #[must_use]
    pub fn size(&self) -> u64 {
        u64::from_ne_bytes(self.size)
    }
}
