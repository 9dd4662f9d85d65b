//! DHT-Adapter (§4.5): encodes announcements into the key-value shape the
//! overlay uses, and the external collaborator traits a driver wires up to
//! a real distributed hash table.

use crate::error::{DhtError, Result};

/// Prefix every announcement's key and value carry (§4.5, §4.6).
pub const ANNOUNCEMENT_PREFIX: &str = "search:url:";

/// Replication factor used for every announcement put (§4.5).
pub const REPLICATION: u32 = 2;

/// Content type tag the overlay announces under (§4.5). The original
/// service's DHT carries an opaque block-type identifier; this overlay
/// only ever uses one kind, so it is exposed as a named constant rather
/// than a numeric one the adapter would have no other use for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockType;

impl BlockType {
    /// Human-readable tag, for logging.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        "TEST"
    }
}

/// One decoded `search:url:<hops>:<url>` announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Announcement {
    /// Remaining crawl budget.
    pub hops: u8,
    /// The announced URL.
    pub url: String,
}

/// Build the identical key/value string for announcing `url` with
/// `hops` remaining crawl budget (§4.5: "both key and value are identical
/// strings").
#[must_use]
pub fn encode_announcement(url: &str, hops: u8) -> String {
    format!("{ANNOUNCEMENT_PREFIX}{hops}:{url}")
}

/// Parse an announcement string produced by [`encode_announcement`].
///
/// Errors on a missing prefix, a missing `hops:url` separator, or a
/// non-numeric `hops` field (§4.6 "Robustness": malformed prefix or
/// missing `:` separators → drop).
pub fn parse_announcement(value: &str) -> Result<Announcement> {
    let rest = value.strip_prefix(ANNOUNCEMENT_PREFIX).ok_or(DhtError::MissingPrefix)?;
    let (hops_str, url) = rest.split_once(':').ok_or(DhtError::MalformedAnnouncement)?;
    let hops = hops_str.parse::<u8>().map_err(|_| DhtError::InvalidHops)?;
    Ok(Announcement { hops, url: url.to_string() })
}

/// External key-value overlay the adapter puts announcements into.
///
/// Implemented by a production client binding to a real DHT, or an
/// in-memory mock in tests (§6: treated as an external collaborator, no
/// semantics specified beyond "put" and "subscribe to puts passing through
/// this peer").
pub trait DhtClient {
    /// Store `value` under the hash of `key`, with the given replication
    /// and block type.
    fn put(&mut self, key: &str, value: &str, replication: u32, block_type: BlockType);
}

/// Extracts keywords and further URLs from a crawled page (§4.6, §6: an
/// external collaborator — crawling logic itself is out of scope).
pub trait Crawler {
    /// Fetch and parse `url`, returning the keywords found on the page and
    /// the outbound links discovered. An empty result on failure is
    /// treated as a no-op by the URL-Processor (§4.6 "Robustness").
    fn crawl(&mut self, url: &str) -> CrawlResult;
}

/// What a crawl of one URL produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResult {
    /// Keywords extracted from the page (pre-normalization).
    pub keywords: Vec<String>,
    /// Outbound URLs discovered on the page.
    pub outbound_urls: Vec<String>,
}

/// Announce `url` into the DHT with `hops` remaining crawl budget.
pub fn announce<D: DhtClient>(dht: &mut D, url: &str, hops: u8) {
    let encoded = encode_announcement(url, hops);
    dht.put(&encoded, &encoded, REPLICATION, BlockType);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_then_parse_roundtrips() {
        let encoded = encode_announcement("https://r.example", 2);
        assert_eq!(encoded, "search:url:2:https://r.example");
        let parsed = parse_announcement(&encoded).unwrap();
        assert_eq!(parsed, Announcement { hops: 2, url: "https://r.example".to_string() });
    }

    #[test]
    fn missing_prefix_is_rejected() {
        assert_eq!(parse_announcement("not-an-announcement"), Err(DhtError::MissingPrefix));
    }

    #[test]
    fn missing_separator_is_rejected() {
        assert_eq!(parse_announcement("search:url:nohopseparator"), Err(DhtError::MalformedAnnouncement));
    }

    #[test]
    fn non_numeric_hops_is_rejected() {
        assert_eq!(parse_announcement("search:url:abc:https://r.example"), Err(DhtError::InvalidHops));
    }

    #[test]
    fn url_containing_colons_is_preserved_whole() {
        let parsed = parse_announcement("search:url:1:https://r.example/path?x=1:2").unwrap();
        assert_eq!(parsed.url, "https://r.example/path?x=1:2");
    }

    struct RecordingDht {
        puts: Vec<(String, String, u32)>,
    }

    impl DhtClient for RecordingDht {
        fn put(&mut self, key: &str, value: &str, replication: u32, _block_type: BlockType) {
            self.puts.push((key.to_string(), value.to_string(), replication));
        }
    }

    #[test]
    fn announce_puts_identical_key_and_value_with_replication_two() {
        let mut dht = RecordingDht { puts: Vec::new() };
        announce(&mut dht, "https://r.example", 2);
        assert_eq!(dht.puts, vec![(
            "search:url:2:https://r.example".to_string(),
            "search:url:2:https://r.example".to_string(),
            2,
        )]);
    }
}
