/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Administrative message builders.
//!
//! Each builder lays the standard header down in wire order (35, 49, 56,
//! 34, 52) followed by the type-specific body; the encoder frames
//! BeginString, BodyLength and CheckSum. The sequence number is allocated
//! by the caller at build time, which is also the store key for resend.

use crate::config::SessionConfig;
use bytes::BytesMut;
use corofix_core::message::MsgType;
use corofix_core::tags;
use corofix_tagvalue::Encoder;

pub(crate) fn header(
    config: &SessionConfig,
    msg_type: &MsgType,
    seq: u64,
    sending_time: &str,
) -> Encoder {
    let mut enc = Encoder::new(config.begin_string.clone());
    enc.put_str(tags::MSG_TYPE, msg_type.as_str());
    enc.put_str(tags::SENDER_COMP_ID, config.sender_comp_id.as_str());
    enc.put_str(tags::TARGET_COMP_ID, config.target_comp_id.as_str());
    enc.put_uint(tags::MSG_SEQ_NUM, seq);
    enc.put_str(tags::SENDING_TIME, sending_time);
    enc
}

/// Builds a Logon (35=A) with EncryptMethod 0, the configured HeartBtInt
/// and, when configured, the ResetSeqNumFlag.
#[must_use]
pub fn build_logon(config: &SessionConfig, seq: u64, sending_time: &str) -> BytesMut {
    let mut enc = header(config, &MsgType::Logon, seq, sending_time);
    enc.put_uint(tags::ENCRYPT_METHOD, 0);
    enc.put_uint(tags::HEART_BT_INT, config.heartbeat_interval_secs());
    if config.reset_seq_on_logon {
        enc.put_bool(tags::RESET_SEQ_NUM_FLAG, true);
    }
    enc.finish()
}

/// Builds a Logout (35=5).
#[must_use]
pub fn build_logout(config: &SessionConfig, seq: u64, sending_time: &str) -> BytesMut {
    header(config, &MsgType::Logout, seq, sending_time).finish()
}

/// Builds a Heartbeat (35=0), echoing a TestReqID when replying to a
/// TestRequest.
#[must_use]
pub fn build_heartbeat(
    config: &SessionConfig,
    seq: u64,
    sending_time: &str,
    test_req_id: Option<&str>,
) -> BytesMut {
    let mut enc = header(config, &MsgType::Heartbeat, seq, sending_time);
    if let Some(id) = test_req_id {
        enc.put_str(tags::TEST_REQ_ID, id);
    }
    enc.finish()
}

/// Builds a TestRequest (35=1) with the given TestReqID.
#[must_use]
pub fn build_test_request(
    config: &SessionConfig,
    seq: u64,
    sending_time: &str,
    test_req_id: &str,
) -> BytesMut {
    let mut enc = header(config, &MsgType::TestRequest, seq, sending_time);
    enc.put_str(tags::TEST_REQ_ID, test_req_id);
    enc.finish()
}

/// Builds a ResendRequest (35=2) covering `[begin, end]`.
#[must_use]
pub fn build_resend_request(
    config: &SessionConfig,
    seq: u64,
    sending_time: &str,
    begin: u64,
    end: u64,
) -> BytesMut {
    let mut enc = header(config, &MsgType::ResendRequest, seq, sending_time);
    enc.put_uint(tags::BEGIN_SEQ_NO, begin);
    enc.put_uint(tags::END_SEQ_NO, end);
    enc.finish()
}

/// Builds a SequenceReset (35=4) gap fill: `MsgSeqNum` is the first gapped
/// sequence, `NewSeqNo` the next outbound number the peer should expect.
#[must_use]
pub fn build_sequence_reset(
    config: &SessionConfig,
    seq: u64,
    sending_time: &str,
    new_seq_no: u64,
    gap_fill: bool,
) -> BytesMut {
    let mut enc = header(config, &MsgType::SequenceReset, seq, sending_time);
    enc.put_uint(tags::NEW_SEQ_NO, new_seq_no);
    if gap_fill {
        enc.put_bool(tags::GAP_FILL_FLAG, true);
    }
    enc.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use corofix_core::types::CompId;
    use corofix_tagvalue::Decoder;

    fn config() -> SessionConfig {
        SessionConfig::new(
            CompId::new("SENDER").unwrap(),
            CompId::new("TARGET").unwrap(),
            "FIX.4.4",
        )
    }

    #[test]
    fn test_build_logon() {
        let msg = build_logon(&config(), 1, "20231215-10:30:00.000");
        let parsed = Decoder::new(&msg).decode().unwrap();

        assert_eq!(*parsed.msg_type(), MsgType::Logon);
        assert_eq!(parsed.msg_seq_num(), 1);
        assert_eq!(parsed.get_string(49), Some("SENDER"));
        assert_eq!(parsed.get_string(56), Some("TARGET"));
        assert_eq!(parsed.get_int(98), Some(0));
        assert_eq!(parsed.get_int(108), Some(30));
        assert_eq!(parsed.get_string(141), None);
    }

    #[test]
    fn test_build_logon_with_reset_flag() {
        let cfg = config().with_reset_seq_on_logon(true);
        let msg = build_logon(&cfg, 1, "20231215-10:30:00.000");
        let parsed = Decoder::new(&msg).decode().unwrap();
        assert_eq!(parsed.get_string(141), Some("Y"));
    }

    #[test]
    fn test_build_heartbeat_echoes_test_req_id() {
        let msg = build_heartbeat(&config(), 3, "20231215-10:30:00.000", Some("TEST7"));
        let parsed = Decoder::new(&msg).decode().unwrap();

        assert_eq!(*parsed.msg_type(), MsgType::Heartbeat);
        assert_eq!(parsed.get_string(112), Some("TEST7"));
    }

    #[test]
    fn test_build_resend_request_range() {
        let msg = build_resend_request(&config(), 4, "20231215-10:30:00.000", 5, 8);
        let parsed = Decoder::new(&msg).decode().unwrap();

        assert_eq!(*parsed.msg_type(), MsgType::ResendRequest);
        assert_eq!(parsed.get_int(7), Some(5));
        assert_eq!(parsed.get_int(16), Some(8));
    }

    #[test]
    fn test_build_sequence_reset_gap_fill() {
        let msg = build_sequence_reset(&config(), 5, "20231215-10:30:00.000", 12, true);
        let parsed = Decoder::new(&msg).decode().unwrap();

        assert_eq!(*parsed.msg_type(), MsgType::SequenceReset);
        assert_eq!(parsed.msg_seq_num(), 5);
        assert_eq!(parsed.get_int(36), Some(12));
        assert_eq!(parsed.get_string(123), Some("Y"));
    }
}
