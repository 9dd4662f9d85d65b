//! Property-based tests for wire encode/decode round trips.
//!
//! These check that every header survives an encode/decode cycle for
//! arbitrary field values, and that the body packing helpers' round trip
//! matches the "longest prefix that fits" property from the specification.

use bytes::Bytes;
use proptest::prelude::*;
use wavefront_proto::{
    Action, FloodHeader, FloodMessageType, FramingHeader, ResponseType, SearchCommandHeader,
    SearchResponseHeader, fragment_payload, parse_all, serialize_bounded,
};

#[test]
fn prop_flood_header_roundtrip() {
    proptest!(|(flow_id in any::<u64>(), ttl in any::<u8>(), is_request in any::<bool>())| {
        let message_type = if is_request { FloodMessageType::Request } else { FloodMessageType::Response };
        let header = FloodHeader::new(flow_id, ttl, message_type);
        let bytes = header.encode();
        let decoded = FloodHeader::decode(&bytes).expect("decode");
        prop_assert_eq!(decoded.flow_id(), flow_id);
        prop_assert_eq!(decoded.ttl(), ttl);
        prop_assert_eq!(decoded.message_type().unwrap(), message_type);
    });
}

#[test]
fn prop_search_command_header_roundtrip() {
    proptest!(|(id in any::<u16>(), size in any::<u64>(), is_search in any::<bool>())| {
        let action = if is_search { Action::Search } else { Action::Add };
        let header = SearchCommandHeader::new(action, id, size);
        let bytes = header.encode();
        let decoded = SearchCommandHeader::decode(&bytes).expect("decode");
        prop_assert_eq!(decoded.action().unwrap(), action);
        prop_assert_eq!(decoded.id(), id);
        prop_assert_eq!(decoded.size(), size);
    });
}

#[test]
fn prop_search_response_header_roundtrip() {
    proptest!(|(id in any::<u16>(), size in any::<u64>(), is_result in any::<bool>())| {
        let response_type = if is_result { ResponseType::Result } else { ResponseType::Done };
        let header = SearchResponseHeader::new(response_type, id, size);
        let bytes = header.encode();
        let decoded = SearchResponseHeader::decode(&bytes).expect("decode");
        prop_assert_eq!(decoded.response_type().unwrap(), response_type);
        prop_assert_eq!(decoded.id(), id);
        prop_assert_eq!(decoded.size(), size);
    });
}

#[test]
fn prop_framing_header_roundtrip() {
    proptest!(|(fragmented in any::<bool>(), last in any::<bool>())| {
        let header = if !fragmented {
            FramingHeader::whole()
        } else if last {
            FramingHeader::last_fragment()
        } else {
            FramingHeader::fragment()
        };
        let bytes = header.encode();
        let decoded = FramingHeader::decode(&bytes).expect("decode");
        prop_assert_eq!(decoded, header);
    });
}

#[test]
fn prop_fragmentation_reassembles_to_original_payload() {
    proptest!(|(payload in prop::collection::vec(any::<u8>(), 0..4096), unit_size in 1usize..512)| {
        let payload = Bytes::from(payload);
        let fragments = fragment_payload(&payload, unit_size).expect("fragment");

        let mut reassembled = Vec::new();
        for fragment in &fragments {
            reassembled.extend_from_slice(&fragment.payload);
        }
        prop_assert_eq!(reassembled, payload.to_vec());

        // Exactly the last fragment carries LAST_FRAGMENT; every earlier one
        // (if any) carries FRAGMENTED without LAST_FRAGMENT, per §9's labeling.
        let (last, rest) = fragments.split_last().expect("at least one fragment");
        prop_assert!(rest.iter().all(|f| f.header.is_fragmented() && !f.header.is_last_fragment()));
        if rest.is_empty() {
            prop_assert!(!last.header.is_fragmented());
        } else {
            prop_assert!(last.header.is_last_fragment());
        }
    });
}

#[test]
fn prop_serialize_bounded_is_longest_fitting_prefix() {
    proptest!(|(values in prop::collection::vec("[a-z]{1,12}", 0..20), max_bytes in 0usize..200)| {
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let bounded = serialize_bounded(refs.iter().copied(), max_bytes);
        let decoded = parse_all(&bounded).expect("parse");

        let mut expected = Vec::new();
        let mut used = 0usize;
        for value in &values {
            let entry_size = value.len() + 1;
            if used + entry_size > max_bytes {
                break;
            }
            expected.push(value.clone());
            used += entry_size;
        }
        prop_assert_eq!(decoded, expected);
    });
}
