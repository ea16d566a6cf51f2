/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! # Corofix Core
//!
//! Core types for the corofix FIX session engine.
//!
//! This crate provides:
//! - **Errors**: Unified `thiserror`-based hierarchy for decode, session and
//!   transport failures
//! - **Types**: Sequence numbers, component identifiers, FIX timestamps
//! - **Messages**: Message type enumeration and the zero-copy
//!   [`ParsedMessage`](message::ParsedMessage) view
//! - **Tags**: Field tag constants used by the session layer

pub mod error;
pub mod field;
pub mod message;
pub mod tags;
pub mod types;

pub use error::{DecodeError, FixError, Result, SessionError, TransportError};
pub use field::FieldRef;
pub use message::{Header, MsgType, ParsedMessage};
pub use types::{CompId, SeqNum, Timestamp};
