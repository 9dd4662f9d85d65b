//! The per-node routing table (§3, §4.2): a fixed-capacity ring buffer
//! mapping `flow_id` to the information needed to route a RESPONSE back
//! along the REQUEST's path, or to recognize the REQUEST as our own.

use wavefront_core::{FlowId, PeerId};

/// One routing table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingEntry {
    /// The flow this entry tracks.
    pub flow_id: FlowId,
    /// True if the REQUEST that created this entry originated locally.
    pub own_request: bool,
    /// The peer a RESPONSE should be forwarded to; meaningful only when
    /// `own_request` is false.
    pub next_hop: Option<PeerId>,
}

/// Fixed-capacity ring buffer of routing entries.
///
/// Entries are never explicitly deleted: once the table is full, inserting
/// a new entry overwrites the oldest one (FIFO replacement), per §9's
/// deliberate "bounded memory over completeness" design.
#[derive(Debug, Clone)]
pub struct RoutingTable {
    entries: Vec<Option<RoutingEntry>>,
    capacity: usize,
    next_index: usize,
    len: usize,
}

/// Default routing table capacity (§3).
pub const DEFAULT_ROUTING_TABLE_SIZE: usize = 25;

impl RoutingTable {
    /// A routing table with the given fixed capacity. Capacity must be at
    /// least 1.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        assert!(capacity > 0, "routing table capacity must be at least 1");
        Self { entries: vec![None; capacity], capacity, next_index: 0, len: 0 }
    }

    /// A routing table with the spec default capacity of 25.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ROUTING_TABLE_SIZE)
    }

    /// True if `flow_id` is already tracked — the cycle-suppression check
    /// on the REQUEST path (§4.2 step 1).
    #[must_use]
    pub fn contains(&self, flow_id: FlowId) -> bool {
        self.entries.iter().flatten().any(|entry| entry.flow_id == flow_id)
    }

    /// Look up the entry for `flow_id`, used on the RESPONSE path.
    #[must_use]
    pub fn get(&self, flow_id: FlowId) -> Option<RoutingEntry> {
        self.entries.iter().flatten().find(|entry| entry.flow_id == flow_id).copied()
    }

    /// Insert a new entry, overwriting the oldest slot if the table is at
    /// capacity. Caller is responsible for having already checked
    /// `contains()` (loop suppression happens one level up).
    pub fn insert(&mut self, entry: RoutingEntry) {
        self.entries[self.next_index] = Some(entry);
        self.next_index = (self.next_index + 1) % self.capacity;
        self.len = (self.len + 1).min(self.capacity);
    }

    /// Number of entries currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if no entries are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Fixed capacity of this table.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::new()
    }
}
