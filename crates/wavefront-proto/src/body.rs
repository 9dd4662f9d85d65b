//! NUL-terminated string packing, shared by `search_command`/`search_response`
//! bodies and flood message bodies (§3): one keyword, or one-or-more URLs,
//! packed end-to-end with no length prefix (confirmed against the original
//! `url-processor.c`'s body reader, which walks the buffer until its declared
//! size is exhausted).

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{ProtocolError, Result};

/// Append `value` followed by a NUL terminator to `out`.
pub fn push_nul_terminated(out: &mut BytesMut, value: &str) {
    out.put_slice(value.as_bytes());
    out.put_u8(0);
}

/// Pack a single NUL-terminated string into a fresh buffer.
#[must_use]
pub fn encode_one(value: &str) -> Bytes {
    let mut out = BytesMut::with_capacity(value.len() + 1);
    push_nul_terminated(&mut out, value);
    out.freeze()
}

/// Pack zero or more NUL-terminated strings end-to-end into a fresh buffer.
#[must_use]
pub fn encode_many<'a>(values: impl IntoIterator<Item = &'a str>) -> Bytes {
    let mut out = BytesMut::new();
    for value in values {
        push_nul_terminated(&mut out, value);
    }
    out.freeze()
}

/// Parse a body of NUL-terminated strings, exhausting the entire buffer.
///
/// Returns every NUL-delimited substring in order. An empty buffer yields an
/// empty vector. A buffer whose final entry is missing its terminator is
/// [`ProtocolError::MalformedBody`].
pub fn parse_all(body: &[u8]) -> Result<Vec<String>> {
    if body.is_empty() {
        return Ok(Vec::new());
    }
    if body.last() != Some(&0) {
        return Err(ProtocolError::MalformedBody);
    }

    body[..body.len() - 1]
        .split(|&byte| byte == 0)
        .map(|chunk| Ok(String::from_utf8_lossy(chunk).into_owned()))
        .collect()
}

/// Serialize as many `values` (in iteration order) as fit within `max_bytes`,
/// stopping before any entry that would exceed the budget (§4.4, §8
/// "round trips"). Deterministic for a fixed input ordering.
#[must_use]
pub fn serialize_bounded<'a>(values: impl IntoIterator<Item = &'a str>, max_bytes: usize) -> Bytes {
    let mut out = BytesMut::new();
    for value in values {
        let entry_size = value.len() + 1;
        if out.len() + entry_size > max_bytes {
            break;
        }
        push_nul_terminated(&mut out, value);
    }
    out.freeze()
}
