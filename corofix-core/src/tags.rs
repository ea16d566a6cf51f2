/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! FIX field tag constants used by the session layer.

/// BeginSeqNo (7) - first sequence of a resend range.
pub const BEGIN_SEQ_NO: u32 = 7;
/// BeginString (8) - FIX version identifier.
pub const BEGIN_STRING: u32 = 8;
/// BodyLength (9).
pub const BODY_LENGTH: u32 = 9;
/// CheckSum (10).
pub const CHECK_SUM: u32 = 10;
/// EndSeqNo (16) - last sequence of a resend range, 0 means "to the end".
pub const END_SEQ_NO: u32 = 16;
/// MsgSeqNum (34).
pub const MSG_SEQ_NUM: u32 = 34;
/// MsgType (35).
pub const MSG_TYPE: u32 = 35;
/// NewSeqNo (36) - next expected sequence carried by a SequenceReset.
pub const NEW_SEQ_NO: u32 = 36;
/// PossDupFlag (43).
pub const POSS_DUP_FLAG: u32 = 43;
/// SenderCompID (49).
pub const SENDER_COMP_ID: u32 = 49;
/// SendingTime (52).
pub const SENDING_TIME: u32 = 52;
/// TargetCompID (56).
pub const TARGET_COMP_ID: u32 = 56;
/// Text (58) - free-form text, e.g. a logout reason.
pub const TEXT: u32 = 58;
/// EncryptMethod (98) - always 0, encryption is not supported.
pub const ENCRYPT_METHOD: u32 = 98;
/// HeartBtInt (108) - heartbeat interval in seconds.
pub const HEART_BT_INT: u32 = 108;
/// TestReqID (112).
pub const TEST_REQ_ID: u32 = 112;
/// GapFillFlag (123).
pub const GAP_FILL_FLAG: u32 = 123;
/// ResetSeqNumFlag (141).
pub const RESET_SEQ_NUM_FLAG: u32 = 141;
