/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Session traffic counters.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters accumulated over a session's lifetime.
///
/// Atomics, so every cooperative loop can bump them through a shared
/// reference.
#[derive(Debug, Default)]
pub struct SessionStats {
    /// Messages transmitted.
    pub messages_sent: AtomicU64,
    /// Messages received.
    pub messages_received: AtomicU64,
    /// Bytes transmitted.
    pub bytes_sent: AtomicU64,
    /// Bytes received.
    pub bytes_received: AtomicU64,
    /// Heartbeats transmitted.
    pub heartbeats_sent: AtomicU64,
    /// Heartbeats received.
    pub heartbeats_received: AtomicU64,
    /// TestRequests transmitted.
    pub test_requests_sent: AtomicU64,
    /// ResendRequests received from the counterparty.
    pub resend_requests_received: AtomicU64,
    /// SequenceResets applied.
    pub sequence_resets: AtomicU64,
}

impl SessionStats {
    /// Creates zeroed counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a point-in-time copy of all counters.
    #[must_use]
    pub fn snapshot(&self) -> SessionStatsSnapshot {
        SessionStatsSnapshot {
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            bytes_sent: self.bytes_sent.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
            heartbeats_sent: self.heartbeats_sent.load(Ordering::Relaxed),
            heartbeats_received: self.heartbeats_received.load(Ordering::Relaxed),
            test_requests_sent: self.test_requests_sent.load(Ordering::Relaxed),
            resend_requests_received: self.resend_requests_received.load(Ordering::Relaxed),
            sequence_resets: self.sequence_resets.load(Ordering::Relaxed),
        }
    }
}

/// Plain-value copy of [`SessionStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStatsSnapshot {
    /// Messages transmitted.
    pub messages_sent: u64,
    /// Messages received.
    pub messages_received: u64,
    /// Bytes transmitted.
    pub bytes_sent: u64,
    /// Bytes received.
    pub bytes_received: u64,
    /// Heartbeats transmitted.
    pub heartbeats_sent: u64,
    /// Heartbeats received.
    pub heartbeats_received: u64,
    /// TestRequests transmitted.
    pub test_requests_sent: u64,
    /// ResendRequests received from the counterparty.
    pub resend_requests_received: u64,
    /// SequenceResets applied.
    pub sequence_resets: u64,
}
