//! Builds the two `search_command` shapes the CLI can send (§3, §6).

use bytes::{Bytes, BytesMut};
use wavefront_proto::{encode_many, encode_one, Action, SearchCommandHeader};

/// Build a `SEARCH` command requesting `keyword`.
#[must_use]
pub fn build_search(keyword: &str, id: u16) -> Bytes {
    build(Action::Search, &encode_one(keyword), id)
}

/// Build an `ADD` command announcing every URL in `urls`.
#[must_use]
pub fn build_add(urls: &[String], id: u16) -> Bytes {
    let body = encode_many(urls.iter().map(String::as_str));
    build(Action::Add, &body, id)
}

fn build(action: Action, body: &Bytes, id: u16) -> Bytes {
    let total_size = (SearchCommandHeader::SIZE + body.len()) as u64;
    let header = SearchCommandHeader::new(action, id, total_size);
    let mut out = BytesMut::with_capacity(SearchCommandHeader::SIZE + body.len());
    out.extend_from_slice(&header.encode());
    out.extend_from_slice(body);
    out.freeze()
}
