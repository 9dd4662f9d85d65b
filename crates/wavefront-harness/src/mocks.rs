//! In-memory stand-ins for the external collaborators §6 leaves out of
//! scope, for use under [`crate::cluster::Cluster`].

use wavefront_core::PeerId;
use wavefront_dht::{BlockType, Crawler, CrawlResult, DhtClient};
use wavefront_flood::PeerTransport;

/// A fixed, static peer list and a configurable maximum datagram size.
#[derive(Debug, Clone)]
pub struct InMemoryPeerTransport {
    peers: Vec<PeerId>,
    max_message_size: usize,
}

impl InMemoryPeerTransport {
    /// Build a transport whose connected peers are exactly `peers`.
    #[must_use]
    pub fn new(peers: Vec<PeerId>, max_message_size: usize) -> Self {
        Self { peers, max_message_size }
    }
}

impl PeerTransport for InMemoryPeerTransport {
    fn connected_peers(&self) -> Vec<PeerId> {
        self.peers.clone()
    }

    fn max_message_size(&self) -> usize {
        self.max_message_size
    }
}

/// Records every `put` instead of reaching a real DHT.
#[derive(Debug, Clone, Default)]
pub struct RecordingDht {
    /// Every `(key, value, replication)` triple passed to [`DhtClient::put`].
    pub puts: Vec<(String, String, u32)>,
}

impl DhtClient for RecordingDht {
    fn put(&mut self, key: &str, value: &str, replication: u32, _block_type: BlockType) {
        self.puts.push((key.to_string(), value.to_string(), replication));
    }
}

/// Returns a fixed [`CrawlResult`] for every URL, regardless of its content.
#[derive(Debug, Clone, Default)]
pub struct StubCrawler {
    /// The result every call to [`Crawler::crawl`] returns.
    pub result: CrawlResult,
}

impl Crawler for StubCrawler {
    fn crawl(&mut self, _url: &str) -> CrawlResult {
        self.result.clone()
    }
}
