//! URL-Processor (§4.6): turns one monitored DHT announcement into Storage
//! entries and further DHT announcements.

use tracing::{debug, trace};
use wavefront_core::normalize_keyword;

use crate::adapter::{announce, parse_announcement, CrawlResult, DhtClient};
use crate::storage::Storage;

/// Process one value observed on the DHT monitor subscription.
///
/// Malformed announcements and crawl failures are silently dropped
/// (§4.6 "Robustness"): this function never returns an error, it either
/// does the work or does nothing.
pub fn process_announcement<D: DhtClient, C: crate::adapter::Crawler>(
    storage: &mut Storage,
    dht: &mut D,
    crawler: &mut C,
    monitored_value: &str,
) {
    let Ok(announcement) = parse_announcement(monitored_value) else {
        trace!(value = monitored_value, "dropping malformed announcement");
        return;
    };

    let CrawlResult { keywords, outbound_urls } = crawler.crawl(&announcement.url);
    if keywords.is_empty() && outbound_urls.is_empty() {
        debug!(url = %announcement.url, "crawl produced nothing, no-op");
        return;
    }

    for keyword in &keywords {
        storage.put(&normalize_keyword(keyword), &announcement.url);
    }

    if announcement.hops > 0 {
        for outbound in &outbound_urls {
            announce(dht, outbound, announcement.hops - 1);
        }
    }
}
