//! The flooding engine (§4.2): loop-suppressed REQUEST propagation and
//! reverse-path RESPONSE routing over the routing table.
//!
//! This engine owns no clock and no randomness. Flow-id generation and
//! deferred-free deadlines belong to whichever layer owns an [`Environment`]
//! (the bridge and the driver, respectively); this keeps the engine a pure
//! function of routing-table state, easy to drive from tests.
//!
//! [`Environment`]: wavefront_core::Environment

use bytes::Bytes;
use tracing::{debug, trace};
use wavefront_core::{FlowId, PeerId};
use wavefront_proto::{FloodHeader, FloodMessageType};

use crate::routing_table::{RoutingEntry, RoutingTable};

/// Something the driver must do as a result of feeding a message (or a
/// local origination request) into the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FloodAction {
    /// Deliver a REQUEST or RESPONSE body to the client-bridge layer.
    Notify { flow_id: FlowId, message_type: FloodMessageType, body: Bytes },
    /// Send a framed flood message to one connected peer.
    SendToPeer { peer: PeerId, header: FloodHeader, body: Bytes },
}

/// TTL-bounded flooding over a fixed-capacity routing table.
#[derive(Debug, Clone, Default)]
pub struct Flooding {
    routing_table: RoutingTable,
}

impl Flooding {
    /// A flooding engine with the spec default routing table capacity.
    #[must_use]
    pub fn new() -> Self {
        Self { routing_table: RoutingTable::new() }
    }

    /// A flooding engine with an explicit routing table capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self { routing_table: RoutingTable::with_capacity(capacity) }
    }

    /// The underlying routing table, for inspection and metrics.
    #[must_use]
    pub fn routing_table(&self) -> &RoutingTable {
        &self.routing_table
    }

    /// Handle a flood message that arrived from `sender`.
    pub fn handle_inbound(
        &mut self,
        sender: PeerId,
        header: FloodHeader,
        body: Bytes,
        connected_peers: &[PeerId],
    ) -> Vec<FloodAction> {
        let Ok(message_type) = header.message_type() else {
            return Vec::new();
        };
        match message_type {
            FloodMessageType::Request => self.process_request(
                Some(sender),
                FlowId(header.flow_id()),
                header.ttl(),
                body,
                connected_peers,
            ),
            FloodMessageType::Response => {
                self.process_response(FlowId(header.flow_id()), header.ttl(), body)
            }
        }
    }

    /// Originate a new REQUEST flood for `flow_id`, carrying `body`.
    pub fn send_request(
        &mut self,
        flow_id: FlowId,
        body: Bytes,
        connected_peers: &[PeerId],
    ) -> Vec<FloodAction> {
        self.process_request(None, flow_id, wavefront_proto::INITIAL_TTL, body, connected_peers)
    }

    /// Originate a RESPONSE for `flow_id`, carrying `body`.
    pub fn send_response(&mut self, flow_id: FlowId, body: Bytes) -> Vec<FloodAction> {
        self.process_response(flow_id, wavefront_proto::INITIAL_TTL, body)
    }

    fn process_request(
        &mut self,
        sender: Option<PeerId>,
        flow_id: FlowId,
        ttl: u8,
        body: Bytes,
        connected_peers: &[PeerId],
    ) -> Vec<FloodAction> {
        if self.routing_table.contains(flow_id) {
            trace!(%flow_id, "suppressing duplicate request");
            return Vec::new();
        }
        self.routing_table.insert(RoutingEntry {
            flow_id,
            own_request: sender.is_none(),
            next_hop: sender,
        });
        debug!(%flow_id, ?sender, ttl, "admitting request");

        let mut actions =
            vec![FloodAction::Notify { flow_id, message_type: FloodMessageType::Request, body: body.clone() }];

        if ttl > 0 {
            let header = FloodHeader::new(flow_id.0, ttl, FloodMessageType::Request).decremented();
            if header.ttl() > 0 {
                actions.extend(connected_peers.iter().copied().filter(|peer| Some(*peer) != sender).map(
                    |peer| FloodAction::SendToPeer { peer, header, body: body.clone() },
                ));
            }
        }
        actions
    }

    fn process_response(&mut self, flow_id: FlowId, ttl: u8, body: Bytes) -> Vec<FloodAction> {
        let Some(entry) = self.routing_table.get(flow_id) else {
            debug!(%flow_id, "dropping response, no routing entry");
            return Vec::new();
        };

        if entry.own_request {
            return vec![FloodAction::Notify { flow_id, message_type: FloodMessageType::Response, body }];
        }

        if ttl == 0 {
            return Vec::new();
        }
        let header = FloodHeader::new(flow_id.0, ttl, FloodMessageType::Response).decremented();
        match (header.ttl() > 0, entry.next_hop) {
            (true, Some(next_hop)) => vec![FloodAction::SendToPeer { peer: next_hop, header, body }],
            _ => Vec::new(),
        }
    }
}
