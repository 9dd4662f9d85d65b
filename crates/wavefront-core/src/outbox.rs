//! A generic per-direction output queue with deferred-free semantics
//! (§4.1, §4.2, §5).
//!
//! Both Framing's client-facing output queue and Flooding's per-peer output
//! queues follow the same discipline: entries wait for the transport's
//! transmit-ready callback, and a "deferred free" deadline bounds memory
//! when that callback never fires. Factored out here so both crates share
//! one implementation instead of two copies of the same ring logic.

use std::collections::VecDeque;
use std::time::Duration;

use crate::ids::PeerId;

/// Default max-delay a transmit request carries before its deferred-free
/// timer fires (§5: "default one minute").
pub const DEFAULT_MAX_DELAY: Duration = Duration::from_secs(60);

/// Slack added on top of `max_delay` before the deferred-free task actually
/// runs, so it never races the transmit-ready callback (§5, §9 — the
/// original source schedules this "a minute and a second" out).
pub const DEFERRED_FREE_SLACK: Duration = Duration::from_secs(1);

/// One entry awaiting the transport's transmit-ready callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedSend<T, I> {
    /// The payload to hand the transport once it signals availability.
    pub payload: T,
    /// The peer this send targets, or `None` for a send to the connected
    /// client (Framing has exactly one direction per connection).
    pub peer: Option<PeerId>,
    /// The instant at which this entry's deferred-free task fires if the
    /// transmit-ready callback has not already drained it.
    pub deadline: I,
}

/// FIFO of entries awaiting transmission, bounded only by the
/// deferred-free deadline on each entry.
#[derive(Debug, Clone)]
pub struct OutputQueue<T, I> {
    entries: VecDeque<QueuedSend<T, I>>,
}

impl<T, I> Default for OutputQueue<T, I> {
    fn default() -> Self {
        Self { entries: VecDeque::new() }
    }
}

impl<T, I: Copy + Ord> OutputQueue<T, I> {
    /// A fresh, empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a payload awaiting transmission, with a deferred-free
    /// deadline already computed by the caller (typically
    /// `env.now() + DEFAULT_MAX_DELAY + DEFERRED_FREE_SLACK`).
    pub fn push(&mut self, payload: T, peer: Option<PeerId>, deadline: I) {
        self.entries.push_back(QueuedSend { payload, peer, deadline });
    }

    /// Dequeue the next entry for the transport to attempt transmission on.
    pub fn pop_front(&mut self) -> Option<QueuedSend<T, I>> {
        self.entries.pop_front()
    }

    /// Remove and return every entry whose deferred-free deadline has
    /// passed as of `now`, regardless of queue position — the transport's
    /// transmit-ready callback never fired for them. This is the sole
    /// defense against a transport silently dropping a queued message.
    pub fn expire_before(&mut self, now: I) -> Vec<QueuedSend<T, I>> {
        let mut expired = Vec::new();
        self.entries.retain(|entry| {
            if entry.deadline <= now {
                expired.push(entry.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    /// Discard every entry unconditionally (Framing's `reset()` on
    /// disconnect, §4.1, §4.3).
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries currently queued.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if no entries are queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fifo_order_preserved() {
        let mut queue: OutputQueue<u8, u32> = OutputQueue::new();
        queue.push(1, None, 100);
        queue.push(2, None, 100);
        assert_eq!(queue.pop_front().unwrap().payload, 1);
        assert_eq!(queue.pop_front().unwrap().payload, 2);
        assert!(queue.pop_front().is_none());
    }

    #[test]
    fn expire_before_drains_only_past_deadline_entries() {
        let mut queue: OutputQueue<u8, u32> = OutputQueue::new();
        queue.push(1, None, 10);
        queue.push(2, None, 20);
        queue.push(3, None, 30);

        let expired = queue.expire_before(20);
        let expired_payloads: Vec<_> = expired.iter().map(|e| e.payload).collect();
        assert_eq!(expired_payloads, vec![1, 2]);
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.pop_front().unwrap().payload, 3);
    }

    #[test]
    fn clear_discards_everything() {
        let mut queue: OutputQueue<u8, u32> = OutputQueue::new();
        queue.push(1, None, 10);
        queue.push(2, None, 10);
        queue.clear();
        assert!(queue.is_empty());
    }
}
