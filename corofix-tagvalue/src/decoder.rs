/******************************************************************************
   Author: Joaquín Béjar García
   Email: jb@taunais.com
   Date: 2/8/26
******************************************************************************/

//! Zero-copy FIX message decoder.
//!
//! Parses a tag=value message buffer into a [`ParsedMessage`] without
//! allocating for field values: every value is a reference into the
//! original receive buffer. The session-relevant header fields (MsgSeqNum,
//! PossDupFlag) are extracted eagerly so the receiver loop reads them
//! without re-scanning.

use corofix_core::error::DecodeError;
use corofix_core::field::FieldRef;
use corofix_core::message::{Header, MsgType, ParsedMessage};
use corofix_core::tags;
use memchr::memchr;
use smallvec::SmallVec;

/// SOH (Start of Header) delimiter used in FIX messages.
pub const SOH: u8 = 0x01;

/// Equals sign delimiter between tag and value.
pub const EQUALS: u8 = b'=';

/// Zero-copy FIX message decoder.
#[derive(Debug)]
pub struct Decoder<'a> {
    /// Input buffer.
    input: &'a [u8],
    /// Current position in the buffer.
    offset: usize,
    /// Whether to validate the checksum trailer.
    validate_checksum: bool,
}

impl<'a> Decoder<'a> {
    /// Creates a new decoder for the given input buffer.
    #[inline]
    #[must_use]
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            input,
            offset: 0,
            validate_checksum: true,
        }
    }

    /// Sets whether to validate checksums during decoding.
    #[inline]
    #[must_use]
    pub const fn with_checksum_validation(mut self, validate: bool) -> Self {
        self.validate_checksum = validate;
        self
    }

    /// Decodes a complete FIX message from the buffer.
    ///
    /// # Errors
    /// Returns `DecodeError` if the message is malformed or incomplete.
    pub fn decode(&mut self) -> Result<ParsedMessage<'a>, DecodeError> {
        let start_offset = self.offset;

        // BeginString (tag 8) must come first.
        let begin_string_field = self.next_field().ok_or(DecodeError::Incomplete)?;
        if begin_string_field.tag != tags::BEGIN_STRING {
            return Err(DecodeError::InvalidBeginString);
        }

        // BodyLength (tag 9).
        let body_length_field = self.next_field().ok_or(DecodeError::MissingBodyLength)?;
        if body_length_field.tag != tags::BODY_LENGTH {
            return Err(DecodeError::MissingBodyLength);
        }
        let _body_length: usize = body_length_field
            .as_str()?
            .parse()
            .map_err(|_| DecodeError::InvalidBodyLength)?;

        // MsgType (tag 35) is the first field of the body.
        let msg_type_field = self.next_field().ok_or(DecodeError::MissingMsgType)?;
        if msg_type_field.tag != tags::MSG_TYPE {
            return Err(DecodeError::MissingMsgType);
        }
        let msg_type: MsgType = msg_type_field
            .as_str()?
            .parse()
            .unwrap_or(MsgType::Custom(String::new()));

        let mut fields: SmallVec<[FieldRef<'a>; 32]> = SmallVec::new();
        fields.push(begin_string_field);
        fields.push(body_length_field);
        fields.push(msg_type_field);

        // Remaining fields up to the checksum trailer.
        let mut header = Header::default();
        let mut checksum_field: Option<FieldRef<'a>> = None;
        while let Some(field) = self.next_field() {
            match field.tag {
                tags::CHECK_SUM => {
                    checksum_field = Some(field);
                    break;
                }
                tags::MSG_SEQ_NUM => {
                    header.msg_seq_num = field.as_u64().unwrap_or(0);
                }
                tags::POSS_DUP_FLAG => {
                    header.poss_dup_flag = field.as_bytes() == b"Y";
                }
                _ => {}
            }
            fields.push(field);
        }

        if self.validate_checksum {
            let checksum_ref = checksum_field.ok_or(DecodeError::Incomplete)?;
            let declared =
                parse_declared_checksum(&checksum_ref).ok_or(DecodeError::InvalidFieldValue {
                    tag: tags::CHECK_SUM,
                    reason: "invalid checksum format".to_string(),
                })?;

            // Everything before "10=" participates in the sum.
            let checksum_start =
                checksum_ref.value.as_ptr() as usize - self.input.as_ptr() as usize - 3;
            let calculated =
                crate::checksum::calculate_checksum(&self.input[start_offset..checksum_start]);

            if calculated != declared {
                return Err(DecodeError::ChecksumMismatch {
                    calculated,
                    declared,
                });
            }
        }

        Ok(ParsedMessage::new(
            &self.input[start_offset..self.offset],
            msg_type,
            header,
            fields,
        ))
    }

    /// Parses the next `tag=value` field, or `None` if the buffer is exhausted.
    #[inline]
    pub fn next_field(&mut self) -> Option<FieldRef<'a>> {
        if self.offset >= self.input.len() {
            return None;
        }

        let remaining = &self.input[self.offset..];

        let eq_pos = memchr(EQUALS, remaining)?;
        let tag = parse_tag(&remaining[..eq_pos])?;

        let value_start = eq_pos + 1;
        let soh_pos = memchr(SOH, &remaining[value_start..])?;
        let value = &remaining[value_start..value_start + soh_pos];

        self.offset += value_start + soh_pos + 1;

        Some(FieldRef::new(tag, value))
    }

    /// Returns the current offset in the buffer.
    #[inline]
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Returns true if the buffer has been fully consumed.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.offset >= self.input.len()
    }
}

/// Parses a tag number from ASCII digits.
#[inline]
fn parse_tag(bytes: &[u8]) -> Option<u32> {
    if bytes.is_empty() || bytes.len() > 10 {
        return None;
    }

    let mut result: u32 = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        result = result.checked_mul(10)?.checked_add(u32::from(b - b'0'))?;
    }

    Some(result)
}

#[inline]
fn parse_declared_checksum(field: &FieldRef<'_>) -> Option<u8> {
    crate::checksum::parse_checksum(field.value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checksum::calculate_checksum;

    fn make_message(body: &str) -> Vec<u8> {
        let without_checksum = format!("8=FIX.4.4\x019={}\x01{}", body.len(), body);
        let checksum = calculate_checksum(without_checksum.as_bytes());
        format!("{}10={:03}\x01", without_checksum, checksum).into_bytes()
    }

    #[test]
    fn test_parse_tag() {
        assert_eq!(parse_tag(b"8"), Some(8));
        assert_eq!(parse_tag(b"35"), Some(35));
        assert_eq!(parse_tag(b"12345"), Some(12345));
        assert_eq!(parse_tag(b""), None);
        assert_eq!(parse_tag(b"abc"), None);
        assert_eq!(parse_tag(b"12a"), None);
    }

    #[test]
    fn test_next_field() {
        let input = b"8=FIX.4.4\x019=5\x0135=0\x01";
        let mut decoder = Decoder::new(input);

        let field1 = decoder.next_field().unwrap();
        assert_eq!(field1.tag, 8);
        assert_eq!(field1.as_str().unwrap(), "FIX.4.4");

        let field2 = decoder.next_field().unwrap();
        assert_eq!(field2.tag, 9);

        let field3 = decoder.next_field().unwrap();
        assert_eq!(field3.tag, 35);

        assert!(decoder.next_field().is_none());
    }

    #[test]
    fn test_decode_heartbeat() {
        let msg = make_message("35=0\x0149=SENDER\x0156=TARGET\x0134=2\x01");
        let parsed = Decoder::new(&msg).decode().unwrap();

        assert_eq!(*parsed.msg_type(), MsgType::Heartbeat);
        assert_eq!(parsed.msg_seq_num(), 2);
        assert!(!parsed.header().poss_dup_flag);
        assert_eq!(parsed.get_string(49), Some("SENDER"));
        assert_eq!(parsed.begin_string(), "FIX.4.4");
    }

    #[test]
    fn test_decode_logon_fixture() {
        // The canonical logon response fixture.
        let msg = b"8=FIX.4.4\x019=63\x0135=A\x0149=TARGET\x0156=SENDER\x0134=1\x01\
                    52=20231215-10:30:00\x0198=0\x01108=30\x0110=173\x01";
        let parsed = Decoder::new(msg).decode().unwrap();

        assert_eq!(*parsed.msg_type(), MsgType::Logon);
        assert_eq!(parsed.msg_seq_num(), 1);
        assert_eq!(parsed.get_int(108), Some(30));
        assert_eq!(parsed.get_int(98), Some(0));
    }

    #[test]
    fn test_decode_poss_dup_flag() {
        let msg = make_message("35=8\x0134=5\x0143=Y\x01");
        let parsed = Decoder::new(&msg).decode().unwrap();
        assert!(parsed.header().poss_dup_flag);
        assert_eq!(parsed.msg_seq_num(), 5);
    }

    #[test]
    fn test_decode_checksum_mismatch() {
        let msg = b"8=FIX.4.4\x019=5\x0135=0\x0110=000\x01";
        let result = Decoder::new(msg).decode();
        assert!(matches!(result, Err(DecodeError::ChecksumMismatch { .. })));
    }

    #[test]
    fn test_decode_missing_begin_string() {
        let msg = b"9=5\x0135=0\x0110=000\x01";
        let result = Decoder::new(msg).decode();
        assert!(matches!(result, Err(DecodeError::InvalidBeginString)));
    }

    #[test]
    fn test_decode_empty_buffer() {
        let result = Decoder::new(b"").decode();
        assert!(matches!(result, Err(DecodeError::Incomplete)));
    }
}
