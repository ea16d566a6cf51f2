/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! # Corofix
//!
//! A cooperative coroutine FIX session engine for Rust.
//!
//! Corofix implements the FIX session layer (logon handshake, sequence
//! discipline, heartbeat liveness, gap detection with resend, graceful
//! logout) on top of its own single-threaded coroutine runtime: lazy tasks
//! driven by explicit `resume` calls, lock-free `AsyncMutex`/`Event`
//! primitives, and `when_all`/`when_any`/`with_timeout` combinators. No
//! executor thread is ever spawned; all blocking is layered as `WouldBlock`
//! plus a cooperative yield.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use corofix::prelude::*;
//!
//! let config = SessionConfig::new(
//!     CompId::new("SENDER").unwrap(),
//!     CompId::new("TARGET").unwrap(),
//!     "FIX.4.4",
//! );
//! let transport = AsyncTransport::new(TcpTransport::new());
//! let session = Session::new(&config, MyHandler::default(), &transport);
//!
//! Task::new(session_with_recovery(&session, "localhost", 9876)).get()?;
//! ```
//!
//! ## Crate Organization
//!
//! - [`core`]: Fundamental types, tags and error definitions
//! - [`coro`]: Coroutine substrate and async primitives
//! - [`tagvalue`]: Zero-copy tag=value encoding and decoding
//! - [`session`]: Session lifecycle, state machine and recovery
//! - [`store`]: Message persistence for resend support
//! - [`transport`]: Non-blocking transport contract and adapter

pub mod core {
    //! Fundamental types, tags and error definitions.
    pub use corofix_core::*;
}

pub mod coro {
    //! Coroutine substrate and async primitives.
    pub use corofix_coro::*;
}

pub mod tagvalue {
    //! Zero-copy tag=value encoding and decoding.
    pub use corofix_tagvalue::*;
}

pub mod session {
    //! Session lifecycle, state machine and recovery.
    pub use corofix_session::*;
}

pub mod store {
    //! Message persistence for resend support.
    pub use corofix_store::*;
}

pub mod transport {
    //! Non-blocking transport contract and adapter.
    pub use corofix_transport::*;
}

/// Convenience re-exports for the common client surface.
pub mod prelude {
    pub use corofix_core::error::{FixError, SessionError, TransportError};
    pub use corofix_core::message::{MsgType, ParsedMessage};
    pub use corofix_core::types::{CompId, SeqNum, Timestamp};
    pub use corofix_coro::{
        AsyncMutex, Event, Task, when_all, when_any, with_timeout, yield_now,
    };
    pub use corofix_session::{
        Session, SessionConfig, SessionConfigBuilder, SessionHandler, SessionState,
        session_with_recovery,
    };
    pub use corofix_store::MessageStore;
    pub use corofix_transport::{AsyncTransport, TcpTransport, Transport};
}
