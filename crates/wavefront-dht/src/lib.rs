//! Storage (§4.4), DHT-Adapter (§4.5), and URL-Processor (§4.6).

pub mod adapter;
pub mod error;
pub mod storage;
pub mod url_processor;

pub use adapter::{
    announce, encode_announcement, parse_announcement, Announcement, BlockType, CrawlResult, Crawler, DhtClient,
    ANNOUNCEMENT_PREFIX, REPLICATION,
};
pub use error::{DhtError, Result};
pub use storage::Storage;
pub use url_processor::process_announcement;
