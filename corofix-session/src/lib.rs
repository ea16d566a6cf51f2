/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! # Corofix Session
//!
//! FIX session layer on the corofix cooperative coroutine runtime.
//!
//! This crate provides:
//! - **Lifecycle**: [`Session`] drives connect, logon, active and logout
//!   phases; the active phase runs the heartbeat driver, receiver and
//!   shutdown waiter as concurrent cooperative loops
//! - **State machine**: Runtime state enum with an explicit transition table
//! - **Sequence management**: Monotonic outbound allocation, inbound
//!   validation with gap detection and resend handling
//! - **Heartbeats**: Heartbeat/TestRequest timing and liveness timeout
//! - **Recovery**: [`session_with_recovery`] retries with capped exponential
//!   backoff

pub mod config;
pub mod handler;
pub mod heartbeat;
pub mod messages;
pub mod recovery;
pub mod sequence;
pub mod session;
pub mod state;
pub mod stats;

pub use config::{SessionConfig, SessionConfigBuilder};
pub use handler::{NullHandler, SessionHandler};
pub use heartbeat::HeartbeatTimer;
pub use recovery::session_with_recovery;
pub use sequence::{SequenceManager, SequenceStatus};
pub use session::Session;
pub use state::{SessionEvent, SessionState, next_state};
pub use stats::{SessionStats, SessionStatsSnapshot};
