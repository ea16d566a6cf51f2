/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Error types for the corofix session engine.
//!
//! This module provides a unified error hierarchy using `thiserror` for typed,
//! domain-specific errors across all corofix operations.

use thiserror::Error;

/// Result type alias using [`FixError`] as the error type.
pub type Result<T> = std::result::Result<T, FixError>;

/// Top-level error type for all corofix operations.
#[derive(Debug, Error)]
pub enum FixError {
    /// Error during message decoding.
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Error in session layer operations.
    #[error("session error: {0}")]
    Session(#[from] SessionError),

    /// Error in the transport layer.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// I/O error from the operating system.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors that occur during FIX message decoding.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Message buffer is incomplete, need more data.
    #[error("incomplete message, need more data")]
    Incomplete,

    /// Invalid BeginString field (tag 8).
    #[error("invalid begin string: expected 8=FIX.x.y")]
    InvalidBeginString,

    /// Missing BodyLength field (tag 9).
    #[error("missing body length field (tag 9)")]
    MissingBodyLength,

    /// Invalid BodyLength value.
    #[error("invalid body length value")]
    InvalidBodyLength,

    /// Missing MsgType field (tag 35).
    #[error("missing msg type field (tag 35)")]
    MissingMsgType,

    /// Checksum mismatch between calculated and declared values.
    #[error("checksum mismatch: calculated {calculated}, declared {declared}")]
    ChecksumMismatch {
        /// Calculated checksum value.
        calculated: u8,
        /// Declared checksum value in message.
        declared: u8,
    },

    /// Missing required field.
    #[error("missing required field: tag {tag}")]
    MissingRequiredField {
        /// The tag number of the missing field.
        tag: u32,
    },

    /// Invalid field value for the expected type.
    #[error("invalid field value for tag {tag}: {reason}")]
    InvalidFieldValue {
        /// The tag number of the field.
        tag: u32,
        /// Description of why the value is invalid.
        reason: String,
    },

    /// Invalid UTF-8 in string field.
    #[error("invalid utf-8 in field: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),
}

/// Errors in FIX session layer operations.
///
/// This is the taxonomy surfaced to callers of the session lifecycle;
/// phases map transport failures onto it before returning.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The transport is not connected.
    #[error("not connected")]
    NotConnected,

    /// Session is not in a state that permits the operation.
    #[error("invalid session state for operation")]
    InvalidState,

    /// No Logon response arrived within the configured logon timeout.
    #[error("logon timed out")]
    LogonTimeout,

    /// No Logout response arrived within the configured logout timeout.
    #[error("logout timed out")]
    LogoutTimeout,

    /// No response to a TestRequest within the heartbeat interval.
    #[error("heartbeat timeout")]
    HeartbeatTimeout,

    /// Inbound sequence number ahead of what was expected.
    #[error("sequence gap detected: expected {expected}, received {received}")]
    SequenceGap {
        /// Expected sequence number.
        expected: u64,
        /// Received sequence number.
        received: u64,
    },

    /// Inbound sequence number behind what was expected, without PossDup.
    #[error("sequence too low: expected >= {expected}, received {received}")]
    SequenceTooLow {
        /// Minimum expected sequence number.
        expected: u64,
        /// Received sequence number.
        received: u64,
    },

    /// The counterparty rejected a message.
    #[error("message rejected by counterparty: {reason}")]
    MessageRejected {
        /// Rejection reason.
        reason: String,
    },

    /// The connection dropped while the session was active.
    #[error("disconnected")]
    Disconnected,
}

/// Errors surfaced by the non-blocking transport contract.
///
/// `WouldBlock` is not a failure: the async adapter converts it into a
/// cooperative yield and retries. Every other kind terminates its phase.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// The operation would block; retry after yielding.
    #[error("operation would block")]
    WouldBlock,

    /// The peer closed the connection.
    #[error("connection closed by peer")]
    ConnectionClosed,

    /// The peer refused the connection.
    #[error("connection refused")]
    ConnectionRefused,

    /// The connection was reset.
    #[error("connection reset")]
    ConnectionReset,

    /// The operation timed out.
    #[error("operation timed out")]
    Timeout,

    /// No connection has been established.
    #[error("not connected")]
    NotConnected,

    /// Other I/O failure.
    #[error("io error: {0}")]
    Io(String),
}

impl TransportError {
    /// Returns true if the operation should be retried after a yield.
    #[inline]
    #[must_use]
    pub const fn is_would_block(&self) -> bool {
        matches!(self, Self::WouldBlock)
    }
}

impl From<std::io::Error> for TransportError {
    fn from(err: std::io::Error) -> Self {
        use std::io::ErrorKind;
        match err.kind() {
            ErrorKind::WouldBlock => Self::WouldBlock,
            ErrorKind::ConnectionRefused => Self::ConnectionRefused,
            ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::BrokenPipe => {
                Self::ConnectionReset
            }
            ErrorKind::TimedOut => Self::Timeout,
            ErrorKind::NotConnected => Self::NotConnected,
            ErrorKind::UnexpectedEof => Self::ConnectionClosed,
            _ => Self::Io(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::ChecksumMismatch {
            calculated: 100,
            declared: 200,
        };
        assert_eq!(
            err.to_string(),
            "checksum mismatch: calculated 100, declared 200"
        );
    }

    #[test]
    fn test_session_error_display() {
        let err = SessionError::SequenceGap {
            expected: 5,
            received: 10,
        };
        assert_eq!(
            err.to_string(),
            "sequence gap detected: expected 5, received 10"
        );
    }

    #[test]
    fn test_fix_error_from_decode() {
        let decode_err = DecodeError::Incomplete;
        let fix_err: FixError = decode_err.into();
        assert!(matches!(fix_err, FixError::Decode(DecodeError::Incomplete)));
    }

    #[test]
    fn test_transport_error_from_io() {
        let io_err = std::io::Error::from(std::io::ErrorKind::WouldBlock);
        let err = TransportError::from(io_err);
        assert!(err.is_would_block());

        let io_err = std::io::Error::from(std::io::ErrorKind::ConnectionRefused);
        assert_eq!(
            TransportError::from(io_err),
            TransportError::ConnectionRefused
        );
    }
}
