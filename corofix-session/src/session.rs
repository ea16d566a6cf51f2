/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Coroutine-based FIX session lifecycle.
//!
//! [`Session::run`] drives the four phases in order: connect, logon, active,
//! logout. The active phase runs three cooperative loops (heartbeat driver,
//! receiver, shutdown waiter) as child tasks under a `when_any` and
//! interprets the winner. Everything runs on one thread of control; session
//! fields use single-threaded interior mutability and the only cross-loop
//! serialization point is the send mutex, which orders outbound bytes and
//! store writes.

use crate::config::SessionConfig;
use crate::handler::SessionHandler;
use crate::heartbeat::HeartbeatTimer;
use crate::messages;
use crate::sequence::{SequenceManager, SequenceStatus};
use crate::state::{SessionEvent, SessionState, next_state};
use crate::stats::SessionStats;
use corofix_core::error::{SessionError, TransportError};
use corofix_core::message::{MsgType, ParsedMessage};
use corofix_core::tags;
use corofix_core::types::Timestamp;
use corofix_coro::{AsyncMutex, Event, Task, when_any, yield_now};
use corofix_store::MessageStore;
use corofix_tagvalue::{Decoder, Encoder};
use corofix_transport::{AsyncTransport, Transport};
use std::cell::{Cell, Ref, RefCell, RefMut};
use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// Receive buffer size for the receiver and handshake loops.
const RECV_BUFFER_SIZE: usize = 4096;

/// A FIX session over a cooperative coroutine runtime.
///
/// The config and transport are borrowed and outlive the session; the
/// message store is borrowed separately so callers can pre-seed and inspect
/// it. The handler is owned and can be inspected through
/// [`handler`](Self::handler) after a run.
pub struct Session<'a, H: SessionHandler, T: Transport> {
    config: &'a SessionConfig,
    handler: RefCell<H>,
    transport: &'a AsyncTransport<T>,
    state: Cell<SessionState>,
    heartbeat: RefCell<HeartbeatTimer>,
    sequences: SequenceManager,
    stats: SessionStats,
    message_store: Cell<Option<&'a RefCell<MessageStore>>>,
    send_mutex: AsyncMutex,
    shutdown_event: Event,
}

impl<'a, H: SessionHandler, T: Transport> Session<'a, H, T> {
    /// Creates a session in the `Disconnected` state.
    pub fn new(config: &'a SessionConfig, handler: H, transport: &'a AsyncTransport<T>) -> Self {
        Self {
            config,
            handler: RefCell::new(handler),
            transport,
            state: Cell::new(SessionState::Disconnected),
            heartbeat: RefCell::new(HeartbeatTimer::new(config.heartbeat_interval)),
            sequences: SequenceManager::new(),
            stats: SessionStats::new(),
            message_store: Cell::new(None),
            send_mutex: AsyncMutex::new(),
            shutdown_event: Event::new(),
        }
    }

    /// Attaches a message store for resend support.
    pub fn set_message_store(&self, store: &'a RefCell<MessageStore>) {
        self.message_store.set(Some(store));
    }

    /// Requests a graceful shutdown; the active phase observes this and
    /// winds the session down through logout.
    pub fn request_shutdown(&self) {
        self.shutdown_event.set();
    }

    /// Returns the current session state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &'a SessionConfig {
        self.config
    }

    /// Returns the session's traffic counters.
    #[must_use]
    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    /// Returns the sequence manager.
    #[must_use]
    pub fn sequences(&self) -> &SequenceManager {
        &self.sequences
    }

    /// Borrows the handler, e.g. to inspect recorded callbacks after a run.
    #[must_use]
    pub fn handler(&self) -> Ref<'_, H> {
        self.handler.borrow()
    }

    /// Mutably borrows the handler.
    #[must_use]
    pub fn handler_mut(&self) -> RefMut<'_, H> {
        self.handler.borrow_mut()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Runs the full session lifecycle: connect, logon, active, logout.
    ///
    /// A run always starts a fresh lifecycle from `Disconnected`, so the
    /// reconnect supervisor can call it again after a failure.
    ///
    /// # Errors
    /// Returns the first phase error; the active phase still attempts a
    /// graceful logout on the way out.
    pub async fn run(&self, host: &str, port: u16) -> Result<(), SessionError> {
        self.state.set(SessionState::Disconnected);
        self.heartbeat.borrow_mut().reset();

        self.connect_phase(host, port).await?;
        self.logon_phase().await?;

        match self.active_phase().await {
            Ok(()) => self.logout_phase().await,
            Err(err) => {
                let _ = self.logout_phase().await;
                Err(err)
            }
        }
    }

    async fn connect_phase(&self, host: &str, port: u16) -> Result<(), SessionError> {
        match self.transport.connect_async(host, port).await {
            Ok(()) => {
                info!(host, port, session_id = %self.config.session_id(), "connected");
                self.transition(SessionEvent::Connect);
                Ok(())
            }
            Err(err) => {
                warn!(host, port, %err, "connect failed");
                self.transition(SessionEvent::Error);
                Err(SessionError::NotConnected)
            }
        }
    }

    async fn logon_phase(&self) -> Result<(), SessionError> {
        let seq = self.sequences.allocate_outbound();
        let msg = messages::build_logon(self.config, seq, &self.sending_time());
        self.send_message(seq, &msg)
            .await
            .map_err(|_| SessionError::NotConnected)?;
        self.transition(SessionEvent::LogonSent);

        let deadline = Instant::now() + self.config.logon_timeout;
        self.await_logon_response(deadline).await;

        if self.state.get() != SessionState::Active {
            self.transition(SessionEvent::HeartbeatTimeout);
            return Err(SessionError::LogonTimeout);
        }

        self.heartbeat.borrow_mut().reset();
        self.handler.borrow_mut().on_logon();
        info!(session_id = %self.config.session_id(), "logon complete");
        Ok(())
    }

    /// Polls for the Logon response until the deadline.
    async fn await_logon_response(&self, deadline: Instant) {
        let mut buf = [0u8; RECV_BUFFER_SIZE];

        while self.state.get() == SessionState::LogonSent {
            if Instant::now() >= deadline {
                return;
            }

            let received = match self.transport.receive_async(&mut buf).await {
                Ok(n) => n,
                Err(_) => {
                    self.transition(SessionEvent::Disconnect);
                    return;
                }
            };
            if received == 0 {
                yield_now().await;
                continue;
            }

            self.note_inbound(received);
            let Ok(parsed) = self.decode(&buf[..received]) else {
                yield_now().await;
                continue;
            };

            match parsed.msg_type() {
                MsgType::Logon => {
                    // The peer's HeartBtInt overrides ours.
                    if let Some(interval) = parsed.get_int(tags::HEART_BT_INT) {
                        self.heartbeat
                            .borrow_mut()
                            .set_interval(Duration::from_secs(interval.max(0) as u64));
                    }
                    self.transition(SessionEvent::LogonReceived);
                }
                MsgType::Logout => self.transition(SessionEvent::LogonRejected),
                _ => {}
            }
        }
    }

    async fn active_phase(&self) -> Result<(), SessionError> {
        let tasks = vec![
            Task::new(self.heartbeat_loop()),
            Task::new(self.receiver_loop()),
            Task::new(self.wait_for_shutdown()),
        ];

        match when_any(tasks).await {
            // Heartbeat loop exited: liveness lost.
            0 => Err(SessionError::HeartbeatTimeout),
            // Receiver exited while still nominally active: transport died.
            1 if self.state.get() == SessionState::Active => Err(SessionError::Disconnected),
            // Receiver exited after a logout, or shutdown was requested.
            _ => Ok(()),
        }
    }

    /// Sends heartbeats and test requests, and detects liveness loss.
    async fn heartbeat_loop(&self) {
        while self.state.get() == SessionState::Active {
            let (timed_out, probe, beat) = {
                let hb = self.heartbeat.borrow();
                (
                    hb.has_timed_out(),
                    hb.should_send_test_request(),
                    hb.should_send_heartbeat(),
                )
            };

            if timed_out {
                warn!(session_id = %self.config.session_id(), "heartbeat timeout");
                self.transition(SessionEvent::HeartbeatTimeout);
                return;
            }

            if probe {
                let _ = self.send_test_request().await;
            } else if beat {
                let _ = self.send_heartbeat(None).await;
            }

            yield_now().await;
        }
    }

    /// Receives, validates and routes inbound messages.
    async fn receiver_loop(&self) {
        let mut buf = [0u8; RECV_BUFFER_SIZE];

        while self.state.get() == SessionState::Active {
            let received = match self.transport.receive_async(&mut buf).await {
                Ok(n) => n,
                Err(err) => {
                    debug!(%err, "receive failed, disconnecting");
                    self.transition(SessionEvent::Disconnect);
                    return;
                }
            };
            if received == 0 {
                yield_now().await;
                continue;
            }

            self.note_inbound(received);
            let parsed = match self.decode(&buf[..received]) {
                Ok(parsed) => parsed,
                Err(err) => {
                    debug!(%err, "dropping unparseable message");
                    self.handler.borrow_mut().on_error(SessionError::InvalidState);
                    continue;
                }
            };

            match self.sequences.validate_inbound(parsed.msg_seq_num()) {
                SequenceStatus::Expected => {}
                SequenceStatus::GapDetected => {
                    // Request the gap, then still route the message we have.
                    let _ = self.send_resend_request(parsed.msg_seq_num()).await;
                }
                SequenceStatus::TooLow => {
                    if !parsed.header().poss_dup_flag {
                        self.handler.borrow_mut().on_error(SessionError::SequenceGap {
                            expected: self.sequences.expected_inbound(),
                            received: parsed.msg_seq_num(),
                        });
                    }
                    continue;
                }
            }

            if parsed.msg_type().is_admin() {
                self.handler.borrow_mut().on_admin_message(&parsed);
                self.handle_admin_message(&parsed).await;
            } else {
                trace!(msg_type = %parsed.msg_type(), seq = parsed.msg_seq_num(), "app message");
                self.handler.borrow_mut().on_app_message(&parsed);
            }
        }
    }

    async fn wait_for_shutdown(&self) {
        self.shutdown_event.wait().await;
    }

    async fn logout_phase(&self) -> Result<(), SessionError> {
        let state = self.state.get();
        if state != SessionState::Active && state != SessionState::LogoutReceived {
            return Ok(());
        }

        let mut send_result = Ok(());
        if self.state.get() == SessionState::Active {
            let seq = self.sequences.allocate_outbound();
            let msg = messages::build_logout(self.config, seq, &self.sending_time());
            send_result = self
                .send_message(seq, &msg)
                .await
                .map(|_| ())
                .map_err(|_| SessionError::NotConnected);
            self.transition(SessionEvent::LogoutSent);

            let deadline = Instant::now() + self.config.logout_timeout;
            self.await_logout_response(deadline).await;
        }

        // Tear down regardless of whether the reply arrived.
        self.handler.borrow_mut().on_logout("Session ended");
        self.transport.disconnect();
        self.transition(SessionEvent::Disconnect);
        info!(session_id = %self.config.session_id(), "session ended");
        send_result
    }

    /// Polls for the Logout reply until the deadline.
    async fn await_logout_response(&self, deadline: Instant) {
        let mut buf = [0u8; RECV_BUFFER_SIZE];

        while self.state.get() == SessionState::LogoutPending {
            if Instant::now() >= deadline {
                return;
            }

            let received = match self.transport.receive_async(&mut buf).await {
                Ok(n) => n,
                Err(_) => return,
            };
            if received == 0 {
                yield_now().await;
                continue;
            }

            match self.decode(&buf[..received]) {
                Ok(parsed) if *parsed.msg_type() == MsgType::Logout => {
                    self.transition(SessionEvent::LogoutReceived);
                }
                _ => yield_now().await,
            }
        }
    }

    // ========================================================================
    // Admin message handling
    // ========================================================================

    async fn handle_admin_message(&self, msg: &ParsedMessage<'_>) {
        match msg.msg_type() {
            MsgType::Heartbeat => {
                self.stats.heartbeats_received.fetch_add(1, Ordering::Relaxed);
            }
            MsgType::TestRequest => {
                let test_req_id = msg.get_string(tags::TEST_REQ_ID);
                let _ = self.send_heartbeat(test_req_id).await;
            }
            MsgType::Logout => {
                let text = msg.get_string(tags::TEXT).unwrap_or("");
                self.transition(SessionEvent::LogoutReceived);
                self.handler.borrow_mut().on_logout(text);
            }
            MsgType::ResendRequest => {
                self.handle_resend_request(msg).await;
            }
            MsgType::SequenceReset => {
                self.stats.sequence_resets.fetch_add(1, Ordering::Relaxed);
                if let Some(new_seq) = msg.get_int(tags::NEW_SEQ_NO) {
                    debug!(new_seq, "applying sequence reset");
                    self.sequences.set_inbound(new_seq.max(0) as u64);
                }
            }
            MsgType::Reject => {
                let reason = msg.get_string(tags::TEXT).unwrap_or("").to_string();
                self.handler
                    .borrow_mut()
                    .on_error(SessionError::MessageRejected { reason });
            }
            _ => {}
        }
    }

    /// Replays the requested range from the store, or falls back to a
    /// SequenceReset gap fill when nothing is retained.
    async fn handle_resend_request(&self, msg: &ParsedMessage<'_>) {
        self.stats
            .resend_requests_received
            .fetch_add(1, Ordering::Relaxed);

        let Some(begin) = msg.get_int(tags::BEGIN_SEQ_NO) else {
            return;
        };
        let Some(end) = msg.get_int(tags::END_SEQ_NO) else {
            return;
        };
        let (begin, end) = (begin.max(0) as u64, end.max(0) as u64);
        debug!(begin, end, "resend requested");

        // One lock for the whole reply keeps the replay contiguous.
        let _lock = self.send_mutex.scoped_lock().await;

        if let Some(store) = self.message_store.get() {
            let stored = store.borrow_mut().retrieve_range(begin, end);
            if !stored.is_empty() {
                for message in &stored {
                    // Already stored under its own sequence at build time.
                    let _ = self.transmit(message).await;
                }
                return;
            }
        }

        let reset = messages::build_sequence_reset(
            self.config,
            begin,
            &self.sending_time(),
            self.sequences.next_outbound(),
            true,
        );
        let _ = self.transmit(&reset).await;
    }

    // ========================================================================
    // Send helpers
    // ========================================================================

    /// Sends an application message once the session is active.
    ///
    /// The standard header (with a freshly allocated sequence number) is
    /// written first; `body` appends the type-specific fields.
    ///
    /// # Errors
    /// Returns `InvalidState` outside the active phase, `NotConnected` on a
    /// transport failure.
    pub async fn send_app_message(
        &self,
        msg_type: &MsgType,
        body: impl FnOnce(&mut Encoder),
    ) -> Result<(), SessionError> {
        if self.state.get() != SessionState::Active {
            return Err(SessionError::InvalidState);
        }

        let _lock = self.send_mutex.scoped_lock().await;
        let seq = self.sequences.allocate_outbound();
        let mut enc = messages::header(self.config, msg_type, seq, &self.sending_time());
        body(&mut enc);
        let msg = enc.finish();

        self.store_outbound(seq, &msg);
        self.transmit(&msg)
            .await
            .map(|_| ())
            .map_err(|_| SessionError::NotConnected)
    }

    /// Acquires the send mutex, stores and transmits one built message.
    async fn send_message(&self, seq: u64, bytes: &[u8]) -> Result<usize, TransportError> {
        let _lock = self.send_mutex.scoped_lock().await;
        self.store_outbound(seq, bytes);
        self.transmit(bytes).await
    }

    /// Transmits with the send mutex already held.
    async fn transmit(&self, bytes: &[u8]) -> Result<usize, TransportError> {
        if !self.handler.borrow_mut().on_send(bytes) {
            trace!("send suppressed by handler");
            return Ok(0);
        }

        let result = self.transport.send_async(bytes).await;
        if let Ok(sent) = result {
            self.heartbeat.borrow_mut().message_sent();
            self.stats.messages_sent.fetch_add(1, Ordering::Relaxed);
            self.stats
                .bytes_sent
                .fetch_add(sent as u64, Ordering::Relaxed);
        }
        result
    }

    fn store_outbound(&self, seq: u64, bytes: &[u8]) {
        if let Some(store) = self.message_store.get() {
            if !store.borrow_mut().store(seq, bytes) {
                warn!(seq, "message store rejected outbound message");
            }
        }
    }

    async fn send_heartbeat(&self, test_req_id: Option<&str>) -> Result<(), TransportError> {
        let _lock = self.send_mutex.scoped_lock().await;
        let seq = self.sequences.allocate_outbound();
        let msg = messages::build_heartbeat(self.config, seq, &self.sending_time(), test_req_id);
        self.store_outbound(seq, &msg);
        self.transmit(&msg).await?;
        self.stats.heartbeats_sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn send_test_request(&self) -> Result<(), TransportError> {
        let _lock = self.send_mutex.scoped_lock().await;
        let seq = self.sequences.allocate_outbound();
        let count = self.stats.test_requests_sent.load(Ordering::Relaxed);
        let test_req_id = format!("TEST{}", count + 1);
        let msg = messages::build_test_request(self.config, seq, &self.sending_time(), &test_req_id);

        self.store_outbound(seq, &msg);
        self.transmit(&msg).await?;

        self.heartbeat.borrow_mut().test_request_sent();
        self.stats.test_requests_sent.fetch_add(1, Ordering::Relaxed);
        debug!(%test_req_id, "test request sent");
        Ok(())
    }

    async fn send_resend_request(&self, received: u64) -> Result<(), TransportError> {
        let (begin, end) = self.sequences.gap_range(received);
        warn!(begin, end, received, "sequence gap detected, requesting resend");

        let _lock = self.send_mutex.scoped_lock().await;
        let seq = self.sequences.allocate_outbound();
        let msg = messages::build_resend_request(self.config, seq, &self.sending_time(), begin, end);
        self.store_outbound(seq, &msg);
        self.transmit(&msg).await?;
        Ok(())
    }

    // ========================================================================
    // Utilities
    // ========================================================================

    fn decode<'b>(
        &self,
        data: &'b [u8],
    ) -> Result<ParsedMessage<'b>, corofix_core::error::DecodeError> {
        Decoder::new(data)
            .with_checksum_validation(self.config.validate_checksum)
            .decode()
    }

    fn note_inbound(&self, bytes: usize) {
        self.heartbeat.borrow_mut().message_received();
        self.stats.messages_received.fetch_add(1, Ordering::Relaxed);
        self.stats
            .bytes_received
            .fetch_add(bytes as u64, Ordering::Relaxed);
    }

    fn sending_time(&self) -> arrayvec::ArrayString<21> {
        Timestamp::now().format_millis()
    }

    fn transition(&self, event: SessionEvent) {
        let prev = self.state.get();
        let next = next_state(prev, event);
        if next != prev {
            self.state.set(next);
            debug!(%prev, %next, "session state change");
            self.handler.borrow_mut().on_state_change(prev, next);
        }
    }
}

impl<H: SessionHandler, T: Transport> std::fmt::Debug for Session<'_, H, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("session_id", &self.config.session_id())
            .field("state", &self.state.get())
            .finish()
    }
}
