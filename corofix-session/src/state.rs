/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Session state machine: states, events and the transition table.
//!
//! The session coroutine is the only mutator; every observable change goes
//! through [`next_state`] and is reported via the handler's
//! `on_state_change` callback. Transitions not in the table leave the state
//! unchanged, except that the `Error` event is absorbing from every state.

use std::fmt;

/// Session lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// No connection established.
    Disconnected,
    /// TCP connection established, Logon not yet sent.
    SocketConnected,
    /// Logon sent, awaiting the response.
    LogonSent,
    /// Session fully established.
    Active,
    /// Logout sent, awaiting confirmation.
    LogoutPending,
    /// Counterparty initiated or confirmed logout.
    LogoutReceived,
    /// Unrecoverable failure.
    Error,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Disconnected => "Disconnected",
            Self::SocketConnected => "SocketConnected",
            Self::LogonSent => "LogonSent",
            Self::Active => "Active",
            Self::LogoutPending => "LogoutPending",
            Self::LogoutReceived => "LogoutReceived",
            Self::Error => "Error",
        };
        write!(f, "{}", name)
    }
}

/// Events driving the session state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionEvent {
    /// Transport connected.
    Connect,
    /// Logon message transmitted.
    LogonSent,
    /// Logon response received.
    LogonReceived,
    /// Counterparty rejected the logon.
    LogonRejected,
    /// Logout message transmitted.
    LogoutSent,
    /// Logout received from the counterparty.
    LogoutReceived,
    /// Liveness lost: no answer to a TestRequest in time.
    HeartbeatTimeout,
    /// Transport dropped or session torn down.
    Disconnect,
    /// Unrecoverable failure.
    Error,
}

/// Computes the successor state for `(state, event)`.
///
/// Pairs outside the table return the current state unchanged.
#[must_use]
pub fn next_state(state: SessionState, event: SessionEvent) -> SessionState {
    use SessionEvent as E;
    use SessionState as S;

    match (state, event) {
        (_, E::Error) => S::Error,
        (S::Disconnected, E::Connect) => S::SocketConnected,
        (S::SocketConnected, E::LogonSent) => S::LogonSent,
        (S::LogonSent, E::LogonReceived) => S::Active,
        (S::LogonSent, E::LogonRejected) => S::Disconnected,
        (S::LogonSent, E::HeartbeatTimeout) => S::Error,
        (S::Active, E::LogoutSent) => S::LogoutPending,
        (S::Active, E::LogoutReceived) => S::LogoutReceived,
        (S::Active, E::HeartbeatTimeout) => S::Error,
        (S::Active, E::Disconnect) => S::Disconnected,
        (S::LogoutPending, E::LogoutReceived) => S::LogoutReceived,
        // A logout reply may never arrive; teardown still disconnects.
        (S::LogoutPending, E::Disconnect) => S::Disconnected,
        (S::LogoutReceived, E::Disconnect) => S::Disconnected,
        (current, _) => current,
    }
}
