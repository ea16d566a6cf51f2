/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! No-op message store.

use crate::StoreStats;
use bytes::Bytes;

/// Store that accepts every message and retains nothing.
///
/// Used when resend support is not required: a ResendRequest against a
/// session backed by this store always falls back to a SequenceReset
/// gap fill. The sequence-number fields are still tracked so external
/// sequence recovery keeps working.
#[derive(Debug)]
pub struct NullStore {
    session_id: String,
    next_sender_seq: u64,
    next_target_seq: u64,
}

impl NullStore {
    /// Creates a null store for the given session.
    #[must_use]
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            next_sender_seq: 1,
            next_target_seq: 1,
        }
    }

    /// Accepts the message without retaining it. Always returns true.
    #[allow(clippy::unused_self)]
    pub fn store(&mut self, _seq_num: u64, _message: &[u8]) -> bool {
        true
    }

    /// Always returns `None`.
    #[allow(clippy::unused_self)]
    pub fn retrieve(&mut self, _seq_num: u64) -> Option<Bytes> {
        None
    }

    /// Always returns an empty sequence.
    #[allow(clippy::unused_self)]
    pub fn retrieve_range(&mut self, _begin: u64, _end: u64) -> Vec<Bytes> {
        Vec::new()
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

    /// Resets sequence numbers to 1.
    pub fn reset(&mut self) {
        self.next_sender_seq = 1;
        self.next_target_seq = 1;
    }

    /// No-op.
    pub fn flush(&mut self) {}

    /// Returns the session identifier.
    #[must_use]
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Returns zeroed counters.
    #[must_use]
    pub const fn stats(&self) -> StoreStats {
        StoreStats {
            messages_stored: 0,
            messages_retrieved: 0,
            bytes_stored: 0,
            store_failures: 0,
        }
    }
}

impl Default for NullStore {
    fn default() -> Self {
        Self::new("NULL")
    }
}
