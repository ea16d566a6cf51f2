/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Session callback interface.

use corofix_core::error::SessionError;
use corofix_core::message::ParsedMessage;
use crate::state::SessionState;

/// Callbacks consumed by the session core.
///
/// Implement this trait to observe session lifecycle events and receive
/// application messages. All callbacks run inline on the session's
/// cooperative thread between suspension points, so they must return
/// promptly and must not call back into the session.
pub trait SessionHandler {
    /// Called for every application-level message routed by the receiver.
    fn on_app_message(&mut self, message: &ParsedMessage<'_>);

    /// Called for every administrative message before the session's own
    /// handling. Optional.
    fn on_admin_message(&mut self, message: &ParsedMessage<'_>) {
        let _ = message;
    }

    /// Called on every state change.
    fn on_state_change(&mut self, from: SessionState, to: SessionState);

    /// Called with the encoded bytes before transmission. Returning false
    /// suppresses the send.
    fn on_send(&mut self, bytes: &[u8]) -> bool {
        let _ = bytes;
        true
    }

    /// Called when the session encounters a recoverable protocol error.
    fn on_error(&mut self, error: SessionError);

    /// Called once the logon handshake completes.
    fn on_logon(&mut self);

    /// Called when the session ends, with the Logout text if one arrived.
    fn on_logout(&mut self, text: &str);
}

/// Handler that ignores every callback; useful for tests and tooling.
#[derive(Debug, Default)]
pub struct NullHandler;

impl SessionHandler for NullHandler {
    fn on_app_message(&mut self, _message: &ParsedMessage<'_>) {}

    fn on_state_change(&mut self, _from: SessionState, _to: SessionState) {}

    fn on_error(&mut self, _error: SessionError) {}

    fn on_logon(&mut self) {}

    fn on_logout(&mut self, _text: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_handler_defaults() {
        let mut handler = NullHandler;
        assert!(handler.on_send(b"8=FIX.4.4\x01"));
        handler.on_logon();
        handler.on_logout("bye");
        handler.on_error(SessionError::Disconnected);
    }
}
