//! The client-bridge (§4.3): translates client `SEARCH`/`ADD` commands into
//! flood and DHT actions, and flood notifications back into client
//! responses.
//!
//! One bridge serves exactly one connected client (§4.3 invariants: "one
//! client at a time"); the driver holds one instance per connection and
//! calls [`ClientBridge::reset`] on disconnect.

use bytes::Bytes;
use wavefront_core::{Environment, FlowId, RequestId, normalize_keyword};
use wavefront_proto::{ResponseType, SearchResponseHeader, encode_one, serialize_bounded};

use crate::flow_map::FlowMap;

/// Crawl-hops budget stamped on a freshly announced URL when the client
/// itself supplied no deeper context (§3, §4.5 default).
pub const DEFAULT_CRAWL_HOPS: u8 = 2;

/// Something the driver must do after a bridge call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BridgeAction {
    /// Originate a REQUEST flood for `flow_id` carrying the keyword body.
    FloodRequest { flow_id: FlowId, body: Bytes },
    /// Originate a RESPONSE flood for `flow_id` carrying matching URLs.
    FloodResponse { flow_id: FlowId, body: Bytes },
    /// Announce `url` into the DHT with the given remaining crawl-hops.
    AnnounceUrl { url: String, hops: u8 },
    /// Hand a response header and body to Framing for delivery to the
    /// connected client.
    RespondToClient { response: SearchResponseHeader, body: Bytes },
}

/// Per-client bridge state: the flow map and the configured crawl-hops
/// default.
#[derive(Debug, Clone)]
pub struct ClientBridge {
    flow_map: FlowMap,
    crawl_hops: u8,
}

impl ClientBridge {
    /// A bridge with the spec default flow map capacity and crawl-hops.
    #[must_use]
    pub fn new() -> Self {
        Self { flow_map: FlowMap::new(), crawl_hops: DEFAULT_CRAWL_HOPS }
    }

    /// A bridge with explicit flow map capacity and crawl-hops default.
    #[must_use]
    pub fn with_config(flow_map_capacity: usize, crawl_hops: u8) -> Self {
        Self { flow_map: FlowMap::with_capacity(flow_map_capacity), crawl_hops }
    }

    /// Handle a client `SEARCH(keyword, id)` command (§4.3 step 1-3).
    ///
    /// Generic over [`Environment`] only here: this is the sole bridge
    /// operation that needs a fresh random flow-id.
    pub fn handle_search<E: Environment>(
        &mut self,
        keyword: &str,
        id: RequestId,
        env: &E,
    ) -> Vec<BridgeAction> {
        let normalized = normalize_keyword(keyword);
        let flow_id = FlowId(env.random_u64());
        self.flow_map.insert(id, flow_id);
        vec![BridgeAction::FloodRequest { flow_id, body: encode_one(&normalized) }]
    }

    /// Handle a client `ADD(urls…)` command (§4.3: one DHT put per URL,
    /// then a `DONE`).
    #[must_use]
    pub fn handle_add(&self, urls: &[String], id: RequestId) -> Vec<BridgeAction> {
        let mut actions: Vec<BridgeAction> = urls
            .iter()
            .map(|url| BridgeAction::AnnounceUrl { url: url.clone(), hops: self.crawl_hops })
            .collect();
        let response = SearchResponseHeader::new(ResponseType::Done, id.0, SearchResponseHeader::SIZE as u64);
        actions.push(BridgeAction::RespondToClient { response, body: Bytes::new() });
        actions
    }

    /// Handle a flooding RESPONSE notification for our own request
    /// (§4.3: recover `request_id`, deliver `RESULT` to the client).
    #[must_use]
    pub fn handle_flood_response(&self, flow_id: FlowId, body: Bytes) -> Vec<BridgeAction> {
        let request_id = self.flow_map.request_for_flow(flow_id).unwrap_or(RequestId::UNCORRELATED);
        let total_size = SearchResponseHeader::SIZE as u64 + body.len() as u64;
        let response = SearchResponseHeader::new(ResponseType::Result, request_id.0, total_size);
        vec![BridgeAction::RespondToClient { response, body }]
    }

    /// Reset per-client state on disconnect (§4.3, §5: "Client disconnect
    /// resets the flow mapping").
    pub fn reset(&mut self) {
        self.flow_map = FlowMap::with_capacity(self.flow_map.capacity());
    }
}

impl Default for ClientBridge {
    fn default() -> Self {
        Self::new()
    }
}

/// Build the RESPONSE-flood action for a REQUEST notification answered
/// from local storage (§4.3: look up Storage, answer if anything matches).
///
/// Not a `ClientBridge` method: answering a remote peer's flood is a
/// node-level operation, not scoped to any one client connection.
#[must_use]
pub fn build_flood_response(flow_id: FlowId, urls: &[String], max_body_bytes: usize) -> Vec<BridgeAction> {
    if urls.is_empty() {
        return Vec::new();
    }
    let body = serialize_bounded(urls.iter().map(String::as_str), max_body_bytes);
    vec![BridgeAction::FloodResponse { flow_id, body }]
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[derive(Clone)]
    struct FixedEnv {
        random: u64,
    }

    impl Environment for FixedEnv {
        type Instant = std::time::Instant;

        fn now(&self) -> Self::Instant {
            std::time::Instant::now()
        }

        async fn sleep(&self, _duration: Duration) {}

        fn random_bytes(&self, buffer: &mut [u8]) {
            buffer.copy_from_slice(&self.random.to_be_bytes()[..buffer.len()]);
        }
    }

    #[test]
    fn search_normalizes_keyword_and_floods() {
        let env = FixedEnv { random: 0xABCD };
        let mut bridge = ClientBridge::new();
        let actions = bridge.handle_search("RuSt", RequestId(5), &env);

        let BridgeAction::FloodRequest { flow_id, body } = &actions[0] else {
            unreachable!("expected a FloodRequest action");
        };
        assert_eq!(*flow_id, FlowId(0xABCD));
        assert_eq!(wavefront_proto::parse_all(body).unwrap(), vec!["rust".to_string()]);
    }

    #[test]
    fn add_announces_each_url_then_done() {
        let bridge = ClientBridge::new();
        let urls = vec!["https://a.example".to_string(), "https://b.example".to_string()];
        let actions = bridge.handle_add(&urls, RequestId(3));

        assert_eq!(actions.len(), 3);
        assert_eq!(
            actions[0],
            BridgeAction::AnnounceUrl { url: "https://a.example".to_string(), hops: DEFAULT_CRAWL_HOPS }
        );
        assert_eq!(
            actions[2],
            BridgeAction::RespondToClient {
                response: SearchResponseHeader::new(ResponseType::Done, 3, SearchResponseHeader::SIZE as u64),
                body: Bytes::new(),
            }
        );
    }

    #[test]
    fn flood_request_with_no_matches_produces_nothing() {
        assert!(build_flood_response(FlowId(1), &[], 1024).is_empty());
    }

    #[test]
    fn flood_request_with_matches_responds_with_serialized_urls() {
        let urls = vec!["https://r.example".to_string()];
        let actions = build_flood_response(FlowId(1), &urls, 1024);
        let BridgeAction::FloodResponse { flow_id, body } = &actions[0] else {
            unreachable!("expected a FloodResponse action");
        };
        assert_eq!(*flow_id, FlowId(1));
        assert_eq!(wavefront_proto::parse_all(body).unwrap(), urls);
    }

    #[test]
    fn flood_response_recovers_request_id_from_flow_map() {
        let env = FixedEnv { random: 77 };
        let mut bridge = ClientBridge::new();
        bridge.handle_search("rust", RequestId(9), &env);

        let actions = bridge.handle_flood_response(FlowId(77), wavefront_proto::encode_one("https://r.example"));
        let BridgeAction::RespondToClient { response, .. } = &actions[0] else {
            unreachable!("expected a RespondToClient action");
        };
        assert_eq!(response.id(), 9);
        assert_eq!(response.response_type().unwrap(), ResponseType::Result);
    }

    #[test]
    fn flood_response_with_unknown_flow_uses_uncorrelated_id() {
        let bridge = ClientBridge::new();
        let actions = bridge.handle_flood_response(FlowId(404), Bytes::new());
        let BridgeAction::RespondToClient { response, .. } = &actions[0] else {
            unreachable!("expected a RespondToClient action");
        };
        assert_eq!(response.id(), RequestId::UNCORRELATED.0);
    }

    #[test]
    fn reset_clears_flow_mapping() {
        let env = FixedEnv { random: 1 };
        let mut bridge = ClientBridge::new();
        bridge.handle_search("rust", RequestId(1), &env);
        bridge.reset();
        let actions = bridge.handle_flood_response(FlowId(1), Bytes::new());
        let BridgeAction::RespondToClient { response, .. } = &actions[0] else {
            unreachable!("expected a RespondToClient action");
        };
        assert_eq!(response.id(), RequestId::UNCORRELATED.0);
    }
}
