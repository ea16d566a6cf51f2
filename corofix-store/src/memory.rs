/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Bounded in-memory message store.

use crate::StoreStats;
use bytes::Bytes;
use tracing::warn;

/// Default maximum number of retained messages.
pub const DEFAULT_MAX_MESSAGES: usize = 10_000;

/// In-memory message store.
///
/// Messages are kept in insertion order as `(sequence, bytes)` pairs;
/// storing an existing sequence updates the entry in place. Not persistent:
/// everything is lost when the process exits.
#[derive(Debug)]
pub struct MemoryStore {
    session_id: String,
    messages: Vec<(u64, Bytes)>,
    max_messages: usize,
    next_sender_seq: u64,
    next_target_seq: u64,
    stats: StoreStats,
}

impl MemoryStore {
    /// Creates a store with the default capacity.
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> Self {
        Self::with_capacity(session_id, DEFAULT_MAX_MESSAGES)
    }

    /// Creates a store bounded to `max_messages` entries.
    #[must_use]
    pub fn with_capacity(session_id: impl Into<String>, max_messages: usize) -> Self {
        Self {
            session_id: session_id.into(),
            messages: Vec::with_capacity(max_messages.min(1_000)),
            max_messages,
            next_sender_seq: 1,
            next_target_seq: 1,
            stats: StoreStats::default(),
        }
    }

    /// Returns the number of retained messages.
    #[must_use]
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if a message with the given sequence number is retained.
    #[must_use]
    pub fn contains(&self, seq_num: u64) -> bool {
        self.messages.iter().any(|(seq, _)| *seq == seq_num)
    }

    /// Stores a message, updating in place if the sequence already exists.
    ///
    /// Returns false (and counts a store failure) when the store is full.
    pub fn store(&mut self, seq_num: u64, message: &[u8]) -> bool {
        if let Some((_, data)) = self.messages.iter_mut().find(|(seq, _)| *seq == seq_num) {
            *data = Bytes::copy_from_slice(message);
            return true;
        }

        if self.messages.len() >= self.max_messages {
            self.stats.store_failures += 1;
            warn!(
                session_id = %self.session_id,
                seq_num,
                capacity = self.max_messages,
                "memory store full, message dropped"
            );
            return false;
        }

        self.messages
            .push((seq_num, Bytes::copy_from_slice(message)));
        self.stats.messages_stored += 1;
        self.stats.bytes_stored += message.len() as u64;
        true
    }

    /// Retrieves a single message by sequence number.
    pub fn retrieve(&mut self, seq_num: u64) -> Option<Bytes> {
        let found = self
            .messages
            .iter()
            .find(|(seq, _)| *seq == seq_num)
            .map(|(_, data)| data.clone());
        if found.is_some() {
            self.stats.messages_retrieved += 1;
        }
        found
    }

    /// Retrieves every message whose sequence lies in `[begin, end]`, in
    /// insertion order. `end == 0` means "through the highest available".
    pub fn retrieve_range(&mut self, begin: u64, end: u64) -> Vec<Bytes> {
        let actual_end = if end == 0 { u64::MAX } else { end };
        let mut result = Vec::new();
        for (seq, data) in &self.messages {
            if *seq >= begin && *seq <= actual_end {
                result.push(data.clone());
                self.stats.messages_retrieved += 1;
            }
        }
        result
    }

    /// Sets the next sender sequence number.
    pub fn set_next_sender_seq_num(&mut self, seq: u64) {
        self.next_sender_seq = seq;
    }

    /// Sets the next target sequence number.
    pub fn set_next_target_seq_num(&mut self, seq: u64) {
        self.next_target_seq = seq;
    }

    /// Returns the next sender sequence number.
    #[must_use]
    pub const fn next_sender_seq_num(&self) -> u64 {
        self.next_sender_seq
    }

    /// Returns the next target sequence number.
    #[must_use]
    pub const fn next_target_seq_num(&self) -> u64 {
        self.next_target_seq
    }

    /// Clears all messages, counters and sequence numbers.
    pub fn reset(&mut self) {
        self.messages.clear();
        self.next_sender_seq = 1;
        self.next_target_seq = 1;
        self.stats = StoreStats::default();
    }

    /// No-op; nothing to flush for an in-memory store.
    pub fn flush(&mut self) {}

    /// Returns the session identifier.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Returns operation counters.
    #[must_use]
    pub const fn stats(&self) -> StoreStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_and_retrieve() {
        let mut store = MemoryStore::new("TEST");

        assert!(store.store(1, b"message1"));
        assert!(store.store(2, b"message2"));
        assert!(store.store(3, b"message3"));

        assert_eq!(store.message_count(), 3);
        assert!(store.contains(2));
        assert!(!store.contains(4));
        assert_eq!(store.retrieve(2).as_deref(), Some(&b"message2"[..]));
        assert!(store.retrieve(4).is_none());
    }

    #[test]
    fn test_store_updates_in_place() {
        let mut store = MemoryStore::new("TEST");

        assert!(store.store(1, b"original"));
        assert!(store.store(1, b"updated"));

        assert_eq!(store.message_count(), 1);
        assert_eq!(store.retrieve(1).as_deref(), Some(&b"updated"[..]));
    }

    #[test]
    fn test_retrieve_range_insertion_order() {
        let mut store = MemoryStore::new("TEST");

        store.store(5, b"msg5");
        store.store(7, b"msg7");
        store.store(6, b"msg6");
        store.store(9, b"msg9");

        let range = store.retrieve_range(5, 7);
        assert_eq!(range.len(), 3);
        // Insertion order, not sequence order.
        assert_eq!(&range[0][..], b"msg5");
        assert_eq!(&range[1][..], b"msg7");
        assert_eq!(&range[2][..], b"msg6");
    }

    #[test]
    fn test_retrieve_range_end_zero_is_unbounded() {
        let mut store = MemoryStore::new("TEST");

        store.store(1, b"msg1");
        store.store(100, b"msg100");

        let range = store.retrieve_range(1, 0);
        assert_eq!(range.len(), 2);
    }

    #[test]
    fn test_capacity_overflow_counts_failure() {
        let mut store = MemoryStore::with_capacity("TEST", 2);

        assert!(store.store(1, b"msg1"));
        assert!(store.store(2, b"msg2"));
        assert!(!store.store(3, b"msg3"));

        assert_eq!(store.message_count(), 2);
        assert_eq!(store.stats().store_failures, 1);

        // Updating an existing entry still works at capacity.
        assert!(store.store(1, b"msg1b"));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut store = MemoryStore::new("TEST");

        store.store(1, b"msg1");
        store.set_next_sender_seq_num(10);
        store.set_next_target_seq_num(20);

        store.reset();

        assert_eq!(store.message_count(), 0);
        assert_eq!(store.next_sender_seq_num(), 1);
        assert_eq!(store.next_target_seq_num(), 1);
        assert_eq!(store.stats(), StoreStats::default());
    }
}
