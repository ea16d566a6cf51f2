/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! # Corofix Tagvalue
//!
//! Zero-copy tag=value encoding and decoding for the corofix session engine.
//!
//! This crate provides:
//! - **Decoder**: Parses a message buffer into a
//!   [`ParsedMessage`](corofix_core::message::ParsedMessage) without copying
//!   field values, validating the checksum trailer
//! - **Encoder**: Builds messages, framing BeginString, BodyLength and
//!   CheckSum automatically
//! - **Checksum**: FIX modulo-256 checksum helpers

pub mod checksum;
pub mod decoder;
pub mod encoder;

pub use checksum::{calculate_checksum, format_checksum, parse_checksum};
pub use decoder::{Decoder, SOH};
pub use encoder::Encoder;
