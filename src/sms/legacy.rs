//! `+CMGR` reply of stock A6 firmware in text mode.
//!
//! ```text
//! +CMGR: "REC UNREAD","+447911123456",,"17/10/01,12:30:00+04"
//! Hello there
//!
//! OK
//! ```
//!
//! Fields are located by position only. Every offset lives in a constant
//! below.

use core::ops::Range;

use super::{bounded, local_number, MessageStatus, SmsRecord};
use crate::error::Error;

pub const HEADER: &str = "+CMGR: ";
pub const UNREAD_MARKER: &str = "UNREAD";
pub const INTERNATIONAL_PREFIX: &str = "\"+";
pub const LOCAL_PREFIX: &str = "0";

pub const STATUS_FIELD: usize = 0;
pub const SENDER_FIELD: usize = 1;
pub const DATE_FIELD: usize = 3;
pub const TIME_FIELD: usize = 4;

/// Characters of the quoted sender field kept after the country code.
pub const SENDER_DIGITS: Range<usize> = 4..14;

/// Leading `\r\n` in front of the body.
pub const BODY_LEAD_TRIM: usize = 2;
/// Blank line and final `OK` closing the body. Unsolicited lines may follow.
pub const RECORD_END: &str = "\r\n\r\nOK\r\n";

const LINE_END: &str = "\r\n";

/// Header line and everything after it.
fn split_reply(text: &str) -> Option<(&str, &str)> {
    let reply = &text[text.find(HEADER)?..];
    let header_end = reply.find(LINE_END)?;
    Some(reply.split_at(header_end))
}

/// A header line followed by the closing `OK` has arrived.
pub fn is_complete(text: &str) -> bool {
    split_reply(text).is_some_and(|(_, rest)| rest.contains(RECORD_END))
}

pub fn decode(index: u8, text: &str) -> Result<SmsRecord, Error> {
    let (header, rest) = split_reply(text).ok_or(Error::MalformedResponse)?;

    let mut fields = [""; TIME_FIELD + 1];
    let mut split = header.splitn(TIME_FIELD + 1, ',');
    for field in fields.iter_mut() {
        *field = split.next().ok_or(Error::MalformedResponse)?;
    }

    let status = if fields[STATUS_FIELD].contains(UNREAD_MARKER) {
        MessageStatus::Unread
    } else {
        MessageStatus::Read
    };

    let sender_field = fields[SENDER_FIELD];
    let sender = if sender_field.starts_with(INTERNATIONAL_PREFIX) {
        local_number(sender_field.trim_matches('"'))
    } else {
        bounded(sender_field.trim_matches('"'))
    };

    let date = fields[DATE_FIELD].strip_prefix('"').unwrap_or(fields[DATE_FIELD]);
    let time = fields[TIME_FIELD].strip_suffix('"').unwrap_or(fields[TIME_FIELD]);
    let mut timestamp = bounded(date);
    let _ = timestamp.push(',');
    let _ = timestamp.push_str(time);

    let body_end = rest.find(RECORD_END).unwrap_or(0);
    let body = rest.get(BODY_LEAD_TRIM..body_end).unwrap_or_default();

    Ok(SmsRecord {
        index,
        status,
        sender,
        timestamp,
        body: bounded(body),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn fixed_offsets() {
        let text = "AT+CMGR=2\r\n\r\n+CMGR: \"REC READ\",\"+447911123456\",,\"17/10/01,12:30:00+04\"\r\nLine one\r\nLine two\r\n\r\nOK\r\n";
        assert!(is_complete(text));

        let record = decode(2, text).unwrap();
        assert_eq!(record.status, MessageStatus::Read);
        assert_eq!(record.sender.as_str(), "07911123456");
        assert_eq!(record.timestamp.as_str(), "17/10/01,12:30:00+04");
        assert_eq!(record.body.as_str(), "Line one\r\nLine two");
    }

    #[test]
    fn national_sender_is_kept() {
        let text = "\r\n+CMGR: \"REC UNREAD\",\"Vodafone\",,\"17/10/01,12:30:00+04\"\r\nTop up\r\n\r\nOK\r\n";
        let record = decode(0, text).unwrap();
        assert_eq!(record.sender.as_str(), "Vodafone");
        assert_eq!(record.body.as_str(), "Top up");
    }

    #[test]
    fn empty_body() {
        let text = "\r\n+CMGR: \"REC UNREAD\",\"+447911123456\",,\"17/10/01,12:30:00+04\"\r\n\r\n\r\nOK\r\n";
        assert_eq!(decode(0, text).unwrap().body.as_str(), "");
    }

    #[test]
    fn notification_after_final_ok() {
        let text = "\r\n+CMGR: \"REC UNREAD\",\"+447911123456\",,\"17/10/01,12:30:00+04\"\r\nHello\r\n\r\nOK\r\n\r\n+CMTI: \"SM\",3\r\n";
        assert!(is_complete(text));
        assert_eq!(decode(1, text).unwrap().body.as_str(), "Hello");
    }

    #[test]
    fn body_line_reading_ok_is_not_the_end() {
        let text = "\r\n+CMGR: \"REC READ\",\"+447911123456\",,\"17/10/01,12:30:00+04\"\r\nOK\r\n";
        assert!(!is_complete(text));
    }

    #[test]
    fn truncated_header() {
        assert_eq!(
            decode(0, "\r\n+CMGR: \"REC UNREAD\",\"+4479\r\n\r\nOK\r\n"),
            Err(Error::MalformedResponse)
        );
        assert!(!is_complete("\r\n+CMGR: \"REC UNREAD\",\"+447911123456\""));
    }
}
