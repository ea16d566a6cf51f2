/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Heartbeat and TestRequest timing.
//!
//! This module tracks when the session last sent and received anything and
//! answers the three questions the heartbeat loop asks every step:
//! - should a Heartbeat go out (nothing sent for a full interval)?
//! - should a TestRequest go out (nothing received for an interval plus
//!   grace)?
//! - has the peer gone silent for good (TestRequest pending for another
//!   full interval)?

use std::time::{Duration, Instant};

/// Grace period added on top of the interval before probing the peer.
const TEST_REQUEST_GRACE: Duration = Duration::from_secs(1);

/// Tracks heartbeat timing for a session.
#[derive(Debug)]
pub struct HeartbeatTimer {
    /// Configured heartbeat interval.
    interval: Duration,
    /// Instant of the last outbound message.
    last_sent: Instant,
    /// Instant of the last inbound message.
    last_received: Instant,
    /// Instant the pending TestRequest was sent, if one is outstanding.
    test_request_sent_at: Option<Instant>,
}

impl HeartbeatTimer {
    /// Creates a timer with the given interval, considering "now" as both
    /// last-sent and last-received.
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        let now = Instant::now();
        Self {
            interval,
            last_sent: now,
            last_received: now,
            test_request_sent_at: None,
        }
    }

    /// Replaces the interval; used when the peer's Logon carries its own
    /// HeartBtInt (tag 108).
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Returns the configured interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Records an outbound message.
    #[inline]
    pub fn message_sent(&mut self) {
        self.last_sent = Instant::now();
    }

    /// Records an inbound message. Any traffic proves liveness, so an
    /// outstanding TestRequest is cleared.
    #[inline]
    pub fn message_received(&mut self) {
        self.last_received = Instant::now();
        self.test_request_sent_at = None;
    }

    /// Records that a TestRequest was sent.
    pub fn test_request_sent(&mut self) {
        let now = Instant::now();
        self.test_request_sent_at = Some(now);
        self.last_sent = now;
    }

    /// True if nothing was sent within the interval.
    #[must_use]
    pub fn should_send_heartbeat(&self) -> bool {
        self.last_sent.elapsed() >= self.interval
    }

    /// True if nothing was received within the interval plus grace and no
    /// TestRequest is already outstanding.
    #[must_use]
    pub fn should_send_test_request(&self) -> bool {
        self.test_request_sent_at.is_none()
            && self.last_received.elapsed() >= self.interval + TEST_REQUEST_GRACE
    }

    /// True if an outstanding TestRequest went unanswered for a full
    /// interval.
    #[must_use]
    pub fn has_timed_out(&self) -> bool {
        self.test_request_sent_at
            .is_some_and(|sent_at| sent_at.elapsed() >= self.interval)
    }

    /// Returns true if a TestRequest is outstanding.
    #[must_use]
    pub const fn test_request_pending(&self) -> bool {
        self.test_request_sent_at.is_some()
    }

    /// Resets all timing state to "now".
    pub fn reset(&mut self) {
        let now = Instant::now();
        self.last_sent = now;
        self.last_received = now;
        self.test_request_sent_at = None;
    }
}
