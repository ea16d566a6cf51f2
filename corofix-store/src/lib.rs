/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! # Corofix Store
//!
//! Message persistence for resend support.
//!
//! [`MessageStore`] is a sum type over the concrete store implementations,
//! dispatched with `match` rather than dynamic dispatch, which keeps store
//! calls on the hot send path free of indirect calls. Adding a store kind
//! means adding a variant and extending the dispatch arms; external stores
//! can be wrapped behind an adapter variant if open extensibility is ever
//! needed.
//!
//! Both variants carry a session identifier and the pair of sequence-number
//! fields used for externally persisted sequence recovery.

pub mod memory;
pub mod null;

use bytes::Bytes;

pub use memory::MemoryStore;
pub use null::NullStore;

/// Operation counters shared by all store variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Messages successfully stored.
    pub messages_stored: u64,
    /// Messages returned by retrieve operations.
    pub messages_retrieved: u64,
    /// Total bytes stored.
    pub bytes_stored: u64,
    /// Stores rejected (capacity exhausted).
    pub store_failures: u64,
}

/// Unified message store over the available implementations.
#[derive(Debug)]
pub enum MessageStore {
    /// No-op sink: accepts every store, returns nothing.
    Null(NullStore),
    /// Bounded in-memory buffer.
    Memory(MemoryStore),
}

impl MessageStore {
    /// Creates a null store.
    #[must_use]
    pub fn null(session_id: impl Into<String>) -> Self {
        Self::Null(NullStore::new(session_id))
    }

    /// Creates an in-memory store with the default capacity.
    #[must_use]
    pub fn memory(session_id: impl Into<String>) -> Self {
        Self::Memory(MemoryStore::new(session_id))
    }

    /// Stores a message keyed by its sequence number.
    ///
    /// Returns false if the store rejected the message.
    pub fn store(&mut self, seq_num: u64, message: &[u8]) -> bool {
        match self {
            Self::Null(s) => s.store(seq_num, message),
            Self::Memory(s) => s.store(seq_num, message),
        }
    }

    /// Retrieves a single message by sequence number.
    pub fn retrieve(&mut self, seq_num: u64) -> Option<Bytes> {
        match self {
            Self::Null(s) => s.retrieve(seq_num),
            Self::Memory(s) => s.retrieve(seq_num),
        }
    }

    /// Retrieves every stored message whose sequence lies in
    /// `[begin, end]`, in insertion order. `end == 0` means unbounded.
    pub fn retrieve_range(&mut self, begin: u64, end: u64) -> Vec<Bytes> {
        match self {
            Self::Null(s) => s.retrieve_range(begin, end),
            Self::Memory(s) => s.retrieve_range(begin, end),
        }
    }

    /// Sets the next sender sequence number.
    pub fn set_next_sender_seq_num(&mut self, seq: u64) {
        match self {
            Self::Null(s) => s.set_next_sender_seq_num(seq),
            Self::Memory(s) => s.set_next_sender_seq_num(seq),
        }
    }

    /// Sets the next target sequence number.
    pub fn set_next_target_seq_num(&mut self, seq: u64) {
        match self {
            Self::Null(s) => s.set_next_target_seq_num(seq),
            Self::Memory(s) => s.set_next_target_seq_num(seq),
        }
    }

    /// Returns the next sender sequence number.
    #[must_use]
    pub fn next_sender_seq_num(&self) -> u64 {
        match self {
            Self::Null(s) => s.next_sender_seq_num(),
            Self::Memory(s) => s.next_sender_seq_num(),
        }
    }

    /// Returns the next target sequence number.
    #[must_use]
    pub fn next_target_seq_num(&self) -> u64 {
        match self {
            Self::Null(s) => s.next_target_seq_num(),
            Self::Memory(s) => s.next_target_seq_num(),
        }
    }

    /// Clears stored messages and resets sequence numbers to 1.
    pub fn reset(&mut self) {
        match self {
            Self::Null(s) => s.reset(),
            Self::Memory(s) => s.reset(),
        }
    }

    /// Flushes buffered state to the backing medium. No-op for both
    /// in-process variants.
    pub fn flush(&mut self) {
        match self {
            Self::Null(s) => s.flush(),
            Self::Memory(s) => s.flush(),
        }
    }

    /// Returns the session identifier this store belongs to.
    #[must_use]
    pub fn session_id(&self) -> &str {
        match self {
            Self::Null(s) => s.session_id(),
            Self::Memory(s) => s.session_id(),
        }
    }

    /// Returns operation counters.
    #[must_use]
    pub fn stats(&self) -> StoreStats {
        match self {
            Self::Null(s) => s.stats(),
            Self::Memory(s) => s.stats(),
        }
    }

    /// Returns true if this is the null variant.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null(_))
    }
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::null("NULL")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variant_dispatch() {
        let mut store = MessageStore::memory("FIX.4.4:SENDER->TARGET");
        assert!(!store.is_null());
        assert_eq!(store.session_id(), "FIX.4.4:SENDER->TARGET");

        assert!(store.store(1, b"msg1"));
        assert_eq!(store.retrieve(1).as_deref(), Some(&b"msg1"[..]));

        let mut null = MessageStore::null("NULL");
        assert!(null.is_null());
        assert!(null.store(1, b"msg1"));
        assert!(null.retrieve(1).is_none());
    }

    #[test]
    fn test_sequence_fields_roundtrip() {
        let mut store = MessageStore::null("NULL");
        store.set_next_sender_seq_num(10);
        store.set_next_target_seq_num(20);
        assert_eq!(store.next_sender_seq_num(), 10);
        assert_eq!(store.next_target_seq_num(), 20);

        store.reset();
        assert_eq!(store.next_sender_seq_num(), 1);
        assert_eq!(store.next_target_seq_num(), 1);
    }
}
