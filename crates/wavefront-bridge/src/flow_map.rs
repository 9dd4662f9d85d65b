//! The client-bridge's flow map (§4.3): a fixed-capacity ring buffer
//! correlating a client's `request_id` with the `flow_id` flooded on its
//! behalf, so an arriving flood RESPONSE notification can be matched back to
//! the waiting client. Same ring-buffer-with-overwrite technique as
//! `wavefront_flood::RoutingTable`, sized independently per §9.

use wavefront_core::{FlowId, RequestId};

/// Default flow map capacity (§3).
pub const DEFAULT_FLOW_MAP_SIZE: usize = 15;

/// One flow-map entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct FlowMapping {
    request_id: RequestId,
    flow_id: FlowId,
}

/// Fixed-capacity ring buffer correlating `request_id` and `flow_id`.
#[derive(Debug, Clone)]
pub struct FlowMap {
    entries: Vec<Option<FlowMapping>>,
    capacity: usize,
    next_index: usize,
    len: usize,
}

impl FlowMap {
    /// A flow map with the given fixed capacity. Capacity must be at least
    /// 1.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "flow map capacity must be at least 1");
        Self { entries: vec![None; capacity], capacity, next_index: 0, len: 0 }
    }

    /// A flow map with the spec default capacity of 15.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_FLOW_MAP_SIZE)
    }

    /// Record that `request_id` flooded `flow_id`, overwriting the oldest
    /// mapping if the map is at capacity.
    pub fn insert(&mut self, request_id: RequestId, flow_id: FlowId) {
        self.entries[self.next_index] = Some(FlowMapping { request_id, flow_id });
        self.next_index = (self.next_index + 1) % self.capacity;
        self.len = (self.len + 1).min(self.capacity);
    }

    /// Find the `request_id` that originated `flow_id`, if still tracked.
    #[must_use]
    pub fn request_for_flow(&self, flow_id: FlowId) -> Option<RequestId> {
        self.entries.iter().flatten().find(|m| m.flow_id == flow_id).map(|m| m.request_id)
    }

    /// Number of mappings currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no mappings are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fixed capacity of this map.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for FlowMap {
    fn default() -> Self {
        Self::new()
    }
}
