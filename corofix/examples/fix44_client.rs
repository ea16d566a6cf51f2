/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Minimal FIX 4.4 initiator: connects, logs on, stays alive on heartbeats
//! until Ctrl-C-free shutdown via counterparty logout or liveness timeout.
//!
//! Run against any FIX acceptor listening locally:
//!
//! ```sh
//! cargo run --example fix44_client -- 127.0.0.1 9876
//! ```

use corofix::prelude::*;
use std::cell::RefCell;
use tracing::info;

#[derive(Debug, Default)]
struct LoggingHandler;

impl SessionHandler for LoggingHandler {
    fn on_app_message(&mut self, message: &ParsedMessage<'_>) {
        info!(msg_type = %message.msg_type(), seq = message.msg_seq_num(), "app message");
    }

    fn on_state_change(&mut self, from: SessionState, to: SessionState) {
        info!(%from, %to, "state change");
    }

    fn on_error(&mut self, error: SessionError) {
        tracing::warn!(%error, "session error");
    }

    fn on_logon(&mut self) {
        info!("logged on");
    }

    fn on_logout(&mut self, text: &str) {
        info!(text, "logged out");
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let mut args = std::env::args().skip(1);
    let host = args.next().unwrap_or_else(|| "127.0.0.1".to_string());
    let port: u16 = args
        .next()
        .and_then(|p| p.parse().ok())
        .unwrap_or(9876);

    let config = SessionConfig::new(
        CompId::new("SENDER").unwrap(),
        CompId::new("TARGET").unwrap(),
        "FIX.4.4",
    )
    .with_max_reconnect_attempts(3);

    let store = RefCell::new(MessageStore::memory(config.session_id()));
    let transport = AsyncTransport::new(TcpTransport::new());
    let session = Session::new(&config, LoggingHandler, &transport);
    session.set_message_store(&store);

    match Task::new(session_with_recovery(&session, &host, port)).get() {
        Ok(()) => info!("session closed gracefully"),
        Err(err) => tracing::error!(%err, "session failed"),
    }
}
