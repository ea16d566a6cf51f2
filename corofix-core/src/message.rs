/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Message types for the FIX session layer.
//!
//! This module provides:
//! - [`MsgType`]: Enumeration of FIX message types
//! - [`Header`]: Session-relevant standard header fields
//! - [`ParsedMessage`]: Zero-copy view into a decoded FIX message buffer

use crate::field::FieldRef;
use crate::tags;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

/// FIX message types.
///
/// The administrative types drive the session state machine; a handful of
/// common application types are named, everything else is `Custom`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MsgType {
    /// Heartbeat (0) - session level.
    #[default]
    Heartbeat,
    /// Test Request (1) - session level.
    TestRequest,
    /// Resend Request (2) - session level.
    ResendRequest,
    /// Reject (3) - session level.
    Reject,
    /// Sequence Reset (4) - session level.
    SequenceReset,
    /// Logout (5) - session level.
    Logout,
    /// Logon (A) - session level.
    Logon,
    /// Execution Report (8).
    ExecutionReport,
    /// Order Cancel Reject (9).
    OrderCancelReject,
    /// News (B).
    News,
    /// New Order Single (D).
    NewOrderSingle,
    /// Order Cancel Request (F).
    OrderCancelRequest,
    /// Order Cancel/Replace Request (G).
    OrderCancelReplaceRequest,
    /// Market Data Request (V).
    MarketDataRequest,
    /// Market Data Snapshot/Full Refresh (W).
    MarketDataSnapshotFullRefresh,
    /// Custom or unknown message type.
    Custom(String),
}

impl std::str::FromStr for MsgType {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "0" => Self::Heartbeat,
            "1" => Self::TestRequest,
            "2" => Self::ResendRequest,
            "3" => Self::Reject,
            "4" => Self::SequenceReset,
            "5" => Self::Logout,
            "A" => Self::Logon,
            "8" => Self::ExecutionReport,
            "9" => Self::OrderCancelReject,
            "B" => Self::News,
            "D" => Self::NewOrderSingle,
            "F" => Self::OrderCancelRequest,
            "G" => Self::OrderCancelReplaceRequest,
            "V" => Self::MarketDataRequest,
            "W" => Self::MarketDataSnapshotFullRefresh,
            other => Self::Custom(other.to_string()),
        })
    }
}

impl MsgType {
    /// Returns the wire representation of this message type.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Heartbeat => "0",
            Self::TestRequest => "1",
            Self::ResendRequest => "2",
            Self::Reject => "3",
            Self::SequenceReset => "4",
            Self::Logout => "5",
            Self::Logon => "A",
            Self::ExecutionReport => "8",
            Self::OrderCancelReject => "9",
            Self::News => "B",
            Self::NewOrderSingle => "D",
            Self::OrderCancelRequest => "F",
            Self::OrderCancelReplaceRequest => "G",
            Self::MarketDataRequest => "V",
            Self::MarketDataSnapshotFullRefresh => "W",
            Self::Custom(s) => s.as_str(),
        }
    }

    /// Returns true if this is an administrative (session-level) message.
    #[must_use]
    pub fn is_admin(&self) -> bool {
        matches!(
            self,
            Self::Heartbeat
                | Self::TestRequest
                | Self::ResendRequest
                | Self::Reject
                | Self::SequenceReset
                | Self::Logout
                | Self::Logon
        )
    }

    /// Returns true if this is an application message.
    #[must_use]
    pub fn is_app(&self) -> bool {
        !self.is_admin()
    }
}

impl fmt::Display for MsgType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Session-relevant fields of the standard message header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Header {
    /// MsgSeqNum (34). Zero if the field was absent.
    pub msg_seq_num: u64,
    /// PossDupFlag (43).
    pub poss_dup_flag: bool,
}

/// Zero-copy view into a decoded FIX message buffer.
///
/// Produced by the tagvalue decoder. Field values reference the original
/// receive buffer; nothing is copied during parsing.
#[derive(Debug, Clone)]
pub struct ParsedMessage<'a> {
    /// The complete message buffer.
    buffer: &'a [u8],
    /// The parsed message type.
    msg_type: MsgType,
    /// Session-relevant header fields.
    header: Header,
    /// Parsed field references in wire order.
    fields: SmallVec<[FieldRef<'a>; 32]>,
}

impl<'a> ParsedMessage<'a> {
    /// Creates a new ParsedMessage from decoded components.
    #[must_use]
    pub fn new(
        buffer: &'a [u8],
        msg_type: MsgType,
        header: Header,
        fields: SmallVec<[FieldRef<'a>; 32]>,
    ) -> Self {
        Self {
            buffer,
            msg_type,
            header,
            fields,
        }
    }

    /// Returns the complete message buffer.
    #[inline]
    #[must_use]
    pub const fn buffer(&self) -> &'a [u8] {
        self.buffer
    }

    /// Returns the message type.
    #[inline]
    #[must_use]
    pub fn msg_type(&self) -> &MsgType {
        &self.msg_type
    }

    /// Returns the message sequence number (tag 34).
    #[inline]
    #[must_use]
    pub const fn msg_seq_num(&self) -> u64 {
        self.header.msg_seq_num
    }

    /// Returns the session-relevant header fields.
    #[inline]
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// Returns the BeginString value (e.g., "FIX.4.4").
    #[must_use]
    pub fn begin_string(&self) -> &'a str {
        self.get_string(tags::BEGIN_STRING).unwrap_or("")
    }

    /// Returns an iterator over all fields in wire order.
    #[inline]
    pub fn fields(&self) -> impl Iterator<Item = &FieldRef<'a>> {
        self.fields.iter()
    }

    /// Returns the number of fields in the message.
    #[inline]
    #[must_use]
    pub fn field_count(&self) -> usize {
        self.fields.len()
    }

    /// Gets the first field with the given tag, or `None` if not present.
    #[must_use]
    pub fn get_field(&self, tag: u32) -> Option<&FieldRef<'a>> {
        self.fields.iter().find(|f| f.tag == tag)
    }

    /// Gets a field value as a string slice.
    #[must_use]
    pub fn get_string(&self, tag: u32) -> Option<&'a str> {
        self.get_field(tag).and_then(|f| f.as_str().ok())
    }

    /// Gets a field value parsed as an integer.
    #[must_use]
    pub fn get_int(&self, tag: u32) -> Option<i64> {
        self.get_field(tag).and_then(|f| f.as_i64().ok())
    }

    /// Returns the message length in bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if the message is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msg_type_from_str() {
        assert_eq!("0".parse::<MsgType>().unwrap(), MsgType::Heartbeat);
        assert_eq!("A".parse::<MsgType>().unwrap(), MsgType::Logon);
        assert_eq!("8".parse::<MsgType>().unwrap(), MsgType::ExecutionReport);
    }

    #[test]
    fn test_msg_type_as_str() {
        assert_eq!(MsgType::Heartbeat.as_str(), "0");
        assert_eq!(MsgType::Logon.as_str(), "A");
        assert_eq!(MsgType::SequenceReset.as_str(), "4");
    }

    #[test]
    fn test_msg_type_is_admin() {
        assert!(MsgType::Heartbeat.is_admin());
        assert!(MsgType::Logon.is_admin());
        assert!(MsgType::Logout.is_admin());
        assert!(!MsgType::NewOrderSingle.is_admin());
        assert!(!MsgType::ExecutionReport.is_admin());
    }

    #[test]
    fn test_msg_type_custom() {
        let custom: MsgType = "XX".parse().unwrap();
        assert!(matches!(custom, MsgType::Custom(_)));
        assert_eq!(custom.as_str(), "XX");
    }

    #[test]
    fn test_parsed_message_accessors() {
        let buffer = b"8=FIX.4.4\x0135=0\x0134=7\x01112=PING\x01";
        let fields: SmallVec<[FieldRef<'_>; 32]> = smallvec::smallvec![
            FieldRef::new(8, &buffer[2..9]),
            FieldRef::new(35, &buffer[13..14]),
            FieldRef::new(34, &buffer[18..19]),
            FieldRef::new(112, &buffer[24..28]),
        ];
        let header = Header {
            msg_seq_num: 7,
            poss_dup_flag: false,
        };
        let msg = ParsedMessage::new(buffer, MsgType::Heartbeat, header, fields);

        assert_eq!(msg.msg_seq_num(), 7);
        assert!(!msg.header().poss_dup_flag);
        assert_eq!(msg.get_string(112), Some("PING"));
        assert_eq!(msg.get_int(34), Some(7));
        assert_eq!(msg.get_int(999), None);
        assert_eq!(msg.begin_string(), "FIX.4.4");
    }
}
