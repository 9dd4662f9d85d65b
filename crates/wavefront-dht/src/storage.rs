//! The keyword index (§4.4): an in-memory, unbounded keyword→URL-set map.
//!
//! Unbounded by design — the original service never evicts (`storage.c`
//! keeps every entry for the process lifetime) and §4.4 carries that
//! through unchanged. Values are deduplicated by string equality within a
//! key; insertion order is preserved so `serialize` is deterministic for a
//! fixed sequence of `put` calls.

use std::collections::HashMap;

use wavefront_proto::serialize_bounded;

/// In-memory keyword→URL-set map.
#[derive(Debug, Clone, Default)]
pub struct Storage {
    entries: HashMap<String, Vec<String>>,
}

impl Storage {
    /// An empty keyword index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `value` under `key`, creating the key's entry if needed.
    /// No-op if `value` is already present (string equality).
    pub fn put(&mut self, key: &str, value: &str) {
        let values = self.entries.entry(key.to_string()).or_default();
        if !values.iter().any(|existing| existing == value) {
            values.push(value.to_string());
        }
    }

    /// Every value stored under `key`, in insertion order. Empty if the key
    /// is unknown.
    #[must_use]
    pub fn get(&self, key: &str) -> &[String] {
        self.entries.get(key).map_or(&[], Vec::as_slice)
    }

    /// Serialize `values` (typically the result of [`Storage::get`]) as
    /// NUL-terminated strings packed end-to-end, stopping before any entry
    /// that would push the total above `max_bytes`.
    #[must_use]
    pub fn serialize(values: &[String], max_bytes: usize) -> bytes::Bytes {
        serialize_bounded(values.iter().map(String::as_str), max_bytes)
    }

    /// Number of distinct keys held.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_then_get_roundtrips() {
        let mut storage = Storage::new();
        storage.put("rust", "https://r.example");
        assert_eq!(storage.get("rust"), ["https://r.example".to_string()]);
    }

    #[test]
    fn duplicate_values_are_not_stored_twice() {
        let mut storage = Storage::new();
        storage.put("rust", "https://r.example");
        storage.put("rust", "https://r.example");
        assert_eq!(storage.get("rust").len(), 1);
    }

    #[test]
    fn unknown_key_returns_empty_slice() {
        let storage = Storage::new();
        assert!(storage.get("missing").is_empty());
    }

    #[test]
    fn insertion_order_is_preserved_across_keys() {
        let mut storage = Storage::new();
        storage.put("rust", "https://a.example");
        storage.put("rust", "https://b.example");
        assert_eq!(storage.get("rust"), ["https://a.example".to_string(), "https://b.example".to_string()]);
    }

    #[test]
    fn serialize_stops_before_budget_exceeded() {
        let mut storage = Storage::new();
        storage.put("rust", "aa");
        storage.put("rust", "bb");
        storage.put("rust", "cc");
        let serialized = Storage::serialize(storage.get("rust"), 6);
        assert_eq!(wavefront_proto::parse_all(&serialized).unwrap(), vec!["aa", "bb"]);
    }
}
