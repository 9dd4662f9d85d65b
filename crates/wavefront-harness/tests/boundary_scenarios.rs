//! The six boundary scenarios: single fragment, two-fragment reassembly,
//! a search round trip on a two-node overlay, loop suppression on three
//! nodes, the TTL floor, and add-then-done.

use bytes::Bytes;
use wavefront_bridge::Framer;
use wavefront_core::PeerId;
use wavefront_dht::Storage;
use wavefront_harness::Cluster;
use wavefront_proto::{
    encode_one, Action, FloodHeader, FloodMessageType, FramingHeader, ResponseType, SearchCommandHeader,
    SearchResponseHeader,
};
use wavefront_server::driver::{ClientId, ServerAction, ServerEvent};

const MAX_PAYLOAD_PER_UNIT: usize = 64;

#[test]
fn single_fragment_round_trips_whole() {
    let payload = Bytes::from(vec![0xAB; MAX_PAYLOAD_PER_UNIT]);
    let fragments = wavefront_proto::fragment_payload(&payload, MAX_PAYLOAD_PER_UNIT).unwrap();
    assert_eq!(fragments.len(), 1);

    let mut framer: Framer<()> = Framer::new();
    let delivered = framer.ingest((), fragments[0].header, fragments[0].payload.clone());
    assert_eq!(delivered, Some(payload));
    assert_eq!(framer.pending_senders(), 0);
}

#[test]
fn two_fragment_message_reassembles_to_the_original() {
    let payload = Bytes::from(vec![0xCD; MAX_PAYLOAD_PER_UNIT + 1]);
    let fragments = wavefront_proto::fragment_payload(&payload, MAX_PAYLOAD_PER_UNIT).unwrap();
    assert_eq!(fragments.len(), 2);
    assert_eq!(fragments[0].payload.len(), MAX_PAYLOAD_PER_UNIT);
    assert!(fragments[0].header.is_fragmented());
    assert!(!fragments[0].header.is_last_fragment());
    assert_eq!(fragments[1].payload.len(), 1);
    assert!(fragments[1].header.is_last_fragment());

    let mut framer: Framer<()> = Framer::new();
    assert!(framer.ingest((), fragments[0].header, fragments[0].payload.clone()).is_none());
    let delivered = framer.ingest((), fragments[1].header, fragments[1].payload.clone());
    assert_eq!(delivered, Some(payload));
}

fn client_search_unit(keyword: &str, id: u16) -> Bytes {
    let body = encode_one(keyword);
    let header = SearchCommandHeader::new(Action::Search, id, (SearchCommandHeader::SIZE + body.len()) as u64);
    let mut command = Vec::new();
    command.extend_from_slice(&header.encode());
    command.extend_from_slice(&body);

    let mut unit = Vec::new();
    unit.extend_from_slice(&FramingHeader::whole().encode());
    unit.extend_from_slice(&command);
    Bytes::from(unit)
}

#[test]
fn search_round_trip_on_a_two_node_overlay() {
    let mut cluster = Cluster::new(2, 1, 1400);
    cluster.node(0).storage_mut().put("rust", "https://r.example");

    let client = ClientId(1);
    cluster.dispatch(1, ServerEvent::ClientConnected { client }).unwrap();

    let unit = client_search_unit("rust", 7);
    let actions = cluster.dispatch(1, ServerEvent::ClientUnitReceived { client, unit }).unwrap();

    let client_responses: Vec<_> = actions
        .into_iter()
        .filter_map(|(node, action)| match action {
            ServerAction::SendToClient { unit, .. } => Some((node, unit)),
            ServerAction::SendToPeer { .. } => None,
        })
        .collect();
    assert_eq!(client_responses.len(), 1);

    let (node, unit) = &client_responses[0];
    assert_eq!(*node, 1);
    let framing = FramingHeader::decode(unit).unwrap();
    assert!(!framing.is_fragmented());
    let response_bytes = &unit[FramingHeader::SIZE..];
    let response_header = SearchResponseHeader::decode(response_bytes).unwrap();
    assert_eq!(response_header.id(), 7);
    assert_eq!(response_header.response_type().unwrap(), ResponseType::Result);
    let body = &response_bytes[SearchResponseHeader::SIZE..];
    assert_eq!(wavefront_proto::parse_all(body).unwrap(), vec!["https://r.example".to_string()]);
}

#[test]
fn loop_suppression_on_three_fully_connected_nodes() {
    let mut cluster = Cluster::new(3, 2, 1400);
    let body = encode_one("rust");
    let header = FloodHeader::new(42, wavefront_proto::INITIAL_TTL, FloodMessageType::Request);
    let mut unit = Vec::new();
    unit.extend_from_slice(&header.encode());
    unit.extend_from_slice(&body);

    cluster
        .dispatch(0, ServerEvent::PeerUnitReceived { peer: PeerId(99), unit: Bytes::from(unit) })
        .unwrap();

    for index in 0..3 {
        assert_eq!(cluster.node(index).flooding().routing_table().len(), 1);
    }
}

#[test]
fn ttl_floor_is_accepted_locally_but_not_relayed_further() {
    // Three nodes so node 1 has a connected peer (node 2) distinct from the
    // sender (node 0): TTL=1 must stop the relay even toward that peer, not
    // merely skip relaying back to whoever sent it.
    let mut cluster = Cluster::new(3, 3, 1400);
    cluster.node(1).storage_mut().put("rust", "https://r.example");

    let body = encode_one("rust");
    let header = FloodHeader::new(99, 1, FloodMessageType::Request);
    let mut unit = Vec::new();
    unit.extend_from_slice(&header.encode());
    unit.extend_from_slice(&body);

    cluster
        .dispatch(1, ServerEvent::PeerUnitReceived { peer: PeerId(0), unit: Bytes::from(unit) })
        .unwrap();

    assert_eq!(cluster.node(1).flooding().routing_table().len(), 1, "accepted at the first hop");
    assert_eq!(cluster.node(2).flooding().routing_table().len(), 0, "never relayed past the TTL floor");
}

#[test]
fn add_then_done_announces_every_url_and_acknowledges() {
    let mut cluster = Cluster::new(1, 4, 1400);
    let client = ClientId(1);
    cluster.dispatch(0, ServerEvent::ClientConnected { client }).unwrap();

    let urls = ["u1".to_string(), "u2".to_string()];
    let body = wavefront_proto::encode_many(urls.iter().map(String::as_str));
    let header = SearchCommandHeader::new(Action::Add, 3, (SearchCommandHeader::SIZE + body.len()) as u64);
    let mut command = Vec::new();
    command.extend_from_slice(&header.encode());
    command.extend_from_slice(&body);
    let mut unit = Vec::new();
    unit.extend_from_slice(&FramingHeader::whole().encode());
    unit.extend_from_slice(&command);

    let actions = cluster
        .dispatch(0, ServerEvent::ClientUnitReceived { client, unit: Bytes::from(unit) })
        .unwrap();

    let responses: Vec<Bytes> = actions
        .into_iter()
        .filter_map(|(_, action)| match action {
            ServerAction::SendToClient { unit, .. } => Some(unit),
            ServerAction::SendToPeer { .. } => None,
        })
        .collect();
    assert_eq!(responses.len(), 1);
    let response_bytes = &responses[0][FramingHeader::SIZE..];
    let response_header = SearchResponseHeader::decode(response_bytes).unwrap();
    assert_eq!(response_header.id(), 3);
    assert_eq!(response_header.response_type().unwrap(), ResponseType::Done);
    assert!(response_bytes[SearchResponseHeader::SIZE..].is_empty());

    let puts = &cluster.node(0).dht().puts;
    assert_eq!(puts.len(), 2);
    assert_eq!(puts[0].1, "search:url:2:u1");
    assert_eq!(puts[1].1, "search:url:2:u2");
}
