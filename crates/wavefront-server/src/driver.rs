//! The service driver: ties Flooding, the client-bridge, Storage and the
//! DHT adapter into one event loop (§2, §5).
//!
//! Action-pattern throughout: [`ServerDriver::process_event`] takes one
//! [`ServerEvent`] and returns the [`ServerAction`]s the runtime (production
//! or simulation) must execute. The driver itself performs no I/O.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use tracing::{debug, warn};
use wavefront_bridge::{build_flood_response, BridgeAction, ClientBridge, Framer};
use wavefront_core::{Environment, FlowId, PeerId};
use wavefront_dht::{announce, process_announcement, Crawler, DhtClient, Storage};
use wavefront_flood::{FloodAction, Flooding, PeerTransport};
use wavefront_proto::{
    Action, FloodHeader, FloodMessageType, FramingHeader, ProtocolError, SearchCommandHeader, SearchResponseHeader,
};

use crate::config::ServerConfig;
use crate::error::ServerError;

/// Local identity the driver assigns a connected client (opaque to the
/// protocol; assigned by whatever runtime accepts the connection).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClientId(pub u64);

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "client-{}", self.0)
    }
}

/// Events the runtime feeds into the driver.
#[derive(Debug, Clone)]
pub enum ServerEvent {
    /// A new client connection was accepted.
    ClientConnected {
        /// The newly accepted client.
        client: ClientId,
    },
    /// A client connection was closed.
    ClientDisconnected {
        /// The client that disconnected.
        client: ClientId,
    },
    /// One framed unit (`FramingHeader` + payload) arrived from a client.
    ClientUnitReceived {
        /// The sending client.
        client: ClientId,
        /// The raw unit, framing header included.
        unit: Bytes,
    },
    /// One flood unit (`FloodHeader` + payload) arrived from a peer.
    PeerUnitReceived {
        /// The sending peer.
        peer: PeerId,
        /// The raw unit, flood header included.
        unit: Bytes,
    },
    /// A value was observed on the DHT monitor subscription.
    DhtAnnouncementObserved {
        /// The raw monitored value.
        value: String,
    },
    /// Periodic tick, for deferred-free expiry and other time-based
    /// housekeeping.
    Tick,
}

/// Actions the runtime must execute after a call to
/// [`ServerDriver::process_event`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerAction {
    /// Send a framed unit to a connected client.
    SendToClient {
        /// Destination client.
        client: ClientId,
        /// The framed unit (framing header + payload) to send.
        unit: Bytes,
    },
    /// Send a flood unit to a connected peer.
    SendToPeer {
        /// Destination peer.
        peer: PeerId,
        /// The flood unit (flood header + payload) to send.
        unit: Bytes,
    },
}

/// Ties the overlay's components into one event-driven service.
///
/// Generic over [`Environment`] (time, randomness), the peer
/// [`PeerTransport`] (connected-peer facts), the external [`DhtClient`],
/// and the external [`Crawler`] — the same four seams §6 names as outside
/// the core's concern.
pub struct ServerDriver<E: Environment, T: PeerTransport, D: DhtClient, C: Crawler> {
    flooding: Flooding,
    bridges: HashMap<ClientId, ClientBridge>,
    framer: Framer<ClientId>,
    storage: Storage,
    flow_owner: HashMap<FlowId, ClientId>,
    transport: T,
    dht: D,
    crawler: C,
    env: E,
    config: ServerConfig,
}

impl<E: Environment, T: PeerTransport, D: DhtClient, C: Crawler> ServerDriver<E, T, D, C> {
    /// Build a driver from its external collaborators and configuration.
    pub fn new(env: E, transport: T, dht: D, crawler: C, config: ServerConfig) -> Self {
        Self {
            flooding: Flooding::with_capacity(config.routing_table_size),
            bridges: HashMap::new(),
            framer: Framer::new(),
            storage: Storage::new(),
            flow_owner: HashMap::new(),
            transport,
            dht,
            crawler,
            env,
            config,
        }
    }

    /// The keyword index, for read-only inspection (metrics, tests).
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// The keyword index, for direct seeding in tests.
    pub fn storage_mut(&mut self) -> &mut Storage {
        &mut self.storage
    }

    /// The flooding engine's routing table, for inspection in tests.
    #[must_use]
    pub fn flooding(&self) -> &Flooding {
        &self.flooding
    }

    /// The external DHT collaborator, for inspection in tests.
    #[must_use]
    pub fn dht(&self) -> &D {
        &self.dht
    }

    /// Process one event, returning the actions the runtime must execute.
    pub fn process_event(&mut self, event: ServerEvent) -> Result<Vec<ServerAction>, ServerError> {
        match event {
            ServerEvent::ClientConnected { client } => {
                self.bridges.insert(client, ClientBridge::with_config(self.config.flow_map_size, self.config.crawl_hops));
                debug!(%client, "client connected");
                Ok(Vec::new())
            }
            ServerEvent::ClientDisconnected { client } => {
                self.bridges.remove(&client);
                self.framer.reset(&client);
                self.flow_owner.retain(|_, owner| *owner != client);
                debug!(%client, "client disconnected");
                Ok(Vec::new())
            }
            ServerEvent::ClientUnitReceived { client, unit } => self.handle_client_unit(client, &unit),
            ServerEvent::PeerUnitReceived { peer, unit } => self.handle_peer_unit(peer, &unit),
            ServerEvent::DhtAnnouncementObserved { value } => {
                process_announcement(&mut self.storage, &mut self.dht, &mut self.crawler, &value);
                Ok(Vec::new())
            }
            ServerEvent::Tick => Ok(Vec::new()),
        }
    }

    fn handle_client_unit(&mut self, client: ClientId, unit: &[u8]) -> Result<Vec<ServerAction>, ServerError> {
        let header = FramingHeader::decode(unit)?;
        let payload = Bytes::copy_from_slice(&unit[FramingHeader::SIZE..]);
        let Some(command_bytes) = self.framer.ingest(client, header, payload) else {
            return Ok(Vec::new());
        };

        let command_header = SearchCommandHeader::decode(&command_bytes)?;
        if command_header.size() != command_bytes.len() as u64 {
            return Err(ProtocolError::SizeMismatch {
                declared: command_header.size(),
                actual: command_bytes.len(),
            }
            .into());
        }
        let body = command_bytes.slice(SearchCommandHeader::SIZE..);
        let request_id = wavefront_core::RequestId(command_header.id());

        let bridge = self.bridges.get_mut(&client).ok_or(ServerError::UnknownClient(client))?;
        let bridge_actions = match command_header.action()? {
            Action::Search => {
                let keywords = wavefront_proto::parse_all(&body)?;
                let keyword = keywords.first().map_or("", String::as_str);
                let actions = bridge.handle_search(keyword, request_id, &self.env);
                if let [BridgeAction::FloodRequest { flow_id, .. }] = actions.as_slice() {
                    self.flow_owner.insert(*flow_id, client);
                }
                actions
            }
            Action::Add => {
                let urls = wavefront_proto::parse_all(&body)?;
                bridge.handle_add(&urls, request_id)
            }
        };

        Ok(self.apply_bridge_actions(client, bridge_actions))
    }

    fn handle_peer_unit(&mut self, peer: PeerId, unit: &[u8]) -> Result<Vec<ServerAction>, ServerError> {
        let header = FloodHeader::decode(unit)?;
        let body = Bytes::copy_from_slice(&unit[FloodHeader::SIZE..]);
        let connected_peers = self.transport.connected_peers();
        let flood_actions = self.flooding.handle_inbound(peer, header, body, &connected_peers);
        Ok(self.apply_flood_actions(flood_actions))
    }

    fn apply_flood_actions(&mut self, flood_actions: Vec<FloodAction>) -> Vec<ServerAction> {
        let mut server_actions = Vec::new();
        for action in flood_actions {
            match action {
                FloodAction::SendToPeer { peer, header, body } => {
                    server_actions.push(ServerAction::SendToPeer { peer, unit: flood_unit(&header, &body) });
                }
                FloodAction::Notify { flow_id, message_type, body } => {
                    server_actions.extend(self.handle_flood_notify(flow_id, message_type, &body));
                }
            }
        }
        server_actions
    }

    /// A REQUEST notification may answer locally (feeding a RESPONSE back
    /// into flooding, which can itself resolve immediately if the REQUEST
    /// was our own); a RESPONSE notification delivers to the owning
    /// client. Both paths bottom out in further `ServerAction`s, so this
    /// recurses through `apply_flood_actions` rather than returning
    /// `BridgeAction`s the caller would have to re-dispatch.
    fn handle_flood_notify(&mut self, flow_id: FlowId, message_type: FloodMessageType, body: &Bytes) -> Vec<ServerAction> {
        match message_type {
            FloodMessageType::Request => {
                let Ok(keywords) = wavefront_proto::parse_all(body) else {
                    return Vec::new();
                };
                let Some(keyword) = keywords.first() else {
                    return Vec::new();
                };
                let urls = self.storage.get(keyword).to_vec();
                let max_body_bytes = self.transport.max_message_size().saturating_sub(FloodHeader::SIZE);
                let Some(BridgeAction::FloodResponse { flow_id, body }) =
                    build_flood_response(flow_id, &urls, max_body_bytes).into_iter().next()
                else {
                    return Vec::new();
                };
                let flood_actions = self.flooding.send_response(flow_id, body);
                self.apply_flood_actions(flood_actions)
            }
            FloodMessageType::Response => {
                let Some(client) = self.flow_owner.remove(&flow_id) else {
                    warn!(%flow_id, "flood response with no known owning client, dropping");
                    return Vec::new();
                };
                let bridge_actions = self
                    .bridges
                    .get(&client)
                    .map(|bridge| bridge.handle_flood_response(flow_id, body.clone()))
                    .unwrap_or_default();
                self.apply_bridge_actions(client, bridge_actions)
            }
        }
    }

    fn apply_bridge_actions(&mut self, client: ClientId, actions: Vec<BridgeAction>) -> Vec<ServerAction> {
        let mut server_actions = Vec::new();
        let connected_peers = self.transport.connected_peers();
        for action in actions {
            match action {
                BridgeAction::FloodRequest { flow_id, body } => {
                    let flood_actions = self.flooding.send_request(flow_id, body, &connected_peers);
                    server_actions.extend(self.apply_flood_actions(flood_actions));
                }
                BridgeAction::FloodResponse { flow_id, body } => {
                    let flood_actions = self.flooding.send_response(flow_id, body);
                    server_actions.extend(self.apply_flood_actions(flood_actions));
                }
                BridgeAction::AnnounceUrl { url, hops } => {
                    announce(&mut self.dht, &url, hops);
                }
                BridgeAction::RespondToClient { response, body } => {
                    server_actions.extend(self.framed_client_response(client, &response, &body));
                }
            }
        }
        server_actions
    }

    /// Fragment a `search_response` (header + body) over the client's
    /// transport and produce one `SendToClient` action per unit (§4.1).
    fn framed_client_response(
        &self,
        client: ClientId,
        response: &SearchResponseHeader,
        body: &Bytes,
    ) -> Vec<ServerAction> {
        let mut command = Vec::with_capacity(SearchResponseHeader::SIZE + body.len());
        command.extend_from_slice(&response.encode());
        command.extend_from_slice(body);
        let command = Bytes::from(command);

        let max_payload_per_unit =
            self.transport.max_message_size().saturating_sub(FramingHeader::SIZE).max(1);
        let Ok(fragments) = self.framer.split(&command, max_payload_per_unit) else {
            warn!(client = %client, "response too large for transport, dropping");
            return Vec::new();
        };
        fragments
            .into_iter()
            .map(|fragment| {
                let mut unit = Vec::with_capacity(FramingHeader::SIZE + fragment.payload.len());
                unit.extend_from_slice(&fragment.header.encode());
                unit.extend_from_slice(&fragment.payload);
                ServerAction::SendToClient { client, unit: Bytes::from(unit) }
            })
            .collect()
    }
}

fn flood_unit(header: &FloodHeader, body: &Bytes) -> Bytes {
    let mut unit = Vec::with_capacity(FloodHeader::SIZE + body.len());
    unit.extend_from_slice(&header.encode());
    unit.extend_from_slice(body);
    Bytes::from(unit)
}
