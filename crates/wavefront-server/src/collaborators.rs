//! Stand-in implementations of the external collaborators §6 leaves out of
//! scope: a real distributed hash table and a real page crawler. Wiring
//! either to an actual backend is deployment-specific and not part of this
//! overlay; these log what would have happened and nothing more.

use tracing::debug;
use wavefront_dht::{BlockType, Crawler, CrawlResult, DhtClient};

/// Logs every `put` instead of reaching a real DHT.
#[derive(Debug, Clone, Default)]
pub struct LoggingDht;

impl DhtClient for LoggingDht {
    fn put(&mut self, key: &str, value: &str, replication: u32, block_type: BlockType) {
        debug!(key, value, replication, block_type = block_type.as_str(), "dht put");
    }
}

/// Never finds anything; a real crawler is an external deployment concern.
#[derive(Debug, Clone, Default)]
pub struct NullCrawler;

impl Crawler for NullCrawler {
    fn crawl(&mut self, url: &str) -> CrawlResult {
        debug!(url, "crawl skipped, no crawler backend configured");
        CrawlResult::default()
    }
}
