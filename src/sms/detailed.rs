//! `+CMGR` reply in text mode with parameters shown (`+CSDH=1`).
//!
//! ```text
//! +CMGR: "REC UNREAD","+447911123456","","17/10/01,12:30:00+04",145,4,0,0,"+447785016005",145,11
//! Hello there
//!
//! OK
//! ```
//!
//! Fields are comma separated, commas inside quotes do not split. The body is
//! exactly `<length>` characters following the header line.

use super::{bounded, legacy::HEADER, local_number, MessageStatus, SmsRecord};
use crate::error::Error;

pub const STATUS_FIELD: usize = 0;
pub const SENDER_FIELD: usize = 1;
pub const TIMESTAMP_FIELD: usize = 3;
pub const ADDRESS_TYPE_FIELD: usize = 4;
pub const LENGTH_FIELD: usize = 10;

/// `<tooa>` of a number that includes the international `+`.
pub const INTERNATIONAL_ADDRESS_TYPE: u8 = 145;

const FIELD_COUNT: usize = LENGTH_FIELD + 1;
const UNREAD_MARKER: &str = "UNREAD";
const LINE_END: &str = "\r\n";
const FINAL_OK: &str = "\r\nOK\r\n";

struct Header<'a> {
    fields: [&'a str; FIELD_COUNT],
    /// Text following the header line terminator.
    rest: &'a str,
}

fn split_header(text: &str) -> Option<Header<'_>> {
    let start = text.find(HEADER)?;
    let reply = &text[start + HEADER.len()..];
    let line_end = reply.find(LINE_END)?;
    let line = &reply[..line_end];

    let mut fields = [""; FIELD_COUNT];
    let mut count = 0;
    let mut field_start = 0;
    let mut quoted = false;
    for (idx, c) in line.char_indices() {
        match c {
            '"' => quoted = !quoted,
            ',' if !quoted => {
                *fields.get_mut(count)? = &line[field_start..idx];
                count += 1;
                field_start = idx + 1;
            }
            _ => {}
        }
    }
    *fields.get_mut(count)? = &line[field_start..];
    if count + 1 < FIELD_COUNT {
        return None;
    }

    Some(Header {
        fields,
        rest: &reply[line_end + LINE_END.len()..],
    })
}

fn unquote(field: &str) -> &str {
    field.trim().trim_matches('"')
}

/// Byte offset in `rest` where a body of `length` characters ends.
fn body_end(rest: &str, length: usize) -> Option<usize> {
    rest.char_indices()
        .map(|(idx, _)| idx)
        .chain(core::iter::once(rest.len()))
        .nth(length)
}

/// The header line, the announced body and the final `OK` after it have
/// arrived. Unsolicited lines may follow.
pub fn is_complete(text: &str) -> bool {
    let Some(header) = split_header(text) else {
        return false;
    };
    let Ok(length) = header.fields[LENGTH_FIELD].trim().parse::<usize>() else {
        // Unusable header, let the decoder report it.
        return header.rest.contains(FINAL_OK);
    };
    body_end(header.rest, length).is_some_and(|end| header.rest[end..].contains(FINAL_OK))
}

pub fn decode(index: u8, text: &str) -> Result<SmsRecord, Error> {
    let header = split_header(text).ok_or(Error::MalformedResponse)?;
    let fields = &header.fields;

    let status = if fields[STATUS_FIELD].contains(UNREAD_MARKER) {
        MessageStatus::Unread
    } else {
        MessageStatus::Read
    };

    let address_type: u8 = fields[ADDRESS_TYPE_FIELD]
        .trim()
        .parse()
        .map_err(|_| Error::MalformedResponse)?;
    let number = unquote(fields[SENDER_FIELD]);
    let sender = if address_type == INTERNATIONAL_ADDRESS_TYPE {
        local_number(number)
    } else {
        bounded(number)
    };

    let length: usize = fields[LENGTH_FIELD]
        .trim()
        .parse()
        .map_err(|_| Error::MalformedResponse)?;
    let body_end = body_end(header.rest, length).unwrap_or(header.rest.len());

    Ok(SmsRecord {
        index,
        status,
        sender,
        timestamp: bounded(unquote(fields[TIMESTAMP_FIELD])),
        body: bounded(&header.rest[..body_end]),
    })
}

#[cfg(test)]
mod test {
    use super::*;

    const REPLY: &str = "\r\n+CMGR: \"REC UNREAD\",\"+447911123456\",\"\",\"17/10/01,12:30:00+04\",145,4,0,0,\"+447785016005\",145,11\r\nHello there\r\n\r\nOK\r\n";

    #[test]
    fn quoted_commas_do_not_split() {
        let header = split_header(REPLY).unwrap();
        assert_eq!(header.fields[TIMESTAMP_FIELD], "\"17/10/01,12:30:00+04\"");
        assert_eq!(header.fields[LENGTH_FIELD], "11");
        assert!(header.rest.starts_with("Hello there"));
    }

    #[test]
    fn decodes_by_declared_length() {
        assert!(is_complete(REPLY));
        let record = decode(3, REPLY).unwrap();
        assert_eq!(record.index, 3);
        assert_eq!(record.status, MessageStatus::Unread);
        assert_eq!(record.sender.as_str(), "07911123456");
        assert_eq!(record.timestamp.as_str(), "17/10/01,12:30:00+04");
        assert_eq!(record.body.as_str(), "Hello there");
    }

    #[test]
    fn national_address_type_is_kept() {
        let reply = "\r\n+CMGR: \"REC READ\",\"07911123456\",\"\",\"17/10/01,12:30:00+04\",129,4,0,0,\"+447785016005\",145,2\r\nHi\r\n\r\nOK\r\n";
        let record = decode(0, reply).unwrap();
        assert_eq!(record.sender.as_str(), "07911123456");
        assert_eq!(record.body.as_str(), "Hi");
    }

    #[test]
    fn waits_for_announced_body() {
        let partial = "\r\n+CMGR: \"REC READ\",\"+447911123456\",\"\",\"17/10/01,12:30:00+04\",145,4,0,0,\"+447785016005\",145,40\r\nShort\r\n\r\nOK\r\n";
        assert!(!is_complete(partial));
    }

    #[test]
    fn notification_after_final_ok() {
        let reply = "\r\n+CMGR: \"REC UNREAD\",\"+447911123456\",\"\",\"17/10/01,12:30:00+04\",145,4,0,0,\"+447785016005\",145,5\r\nHello\r\n\r\nOK\r\n\r\n+CMTI: \"SM\",3\r\n";
        assert!(is_complete(reply));
        assert_eq!(decode(1, reply).unwrap().body.as_str(), "Hello");
    }

    #[test]
    fn ok_inside_body_is_not_the_end() {
        let partial = "\r\n+CMGR: \"REC READ\",\"+447911123456\",\"\",\"17/10/01,12:30:00+04\",145,4,0,0,\"+447785016005\",145,12\r\n\r\nOK\r\n and";
        assert!(!is_complete(partial));
    }

    #[test]
    fn legacy_header_is_rejected() {
        let legacy = "\r\n+CMGR: \"REC UNREAD\",\"+447911123456\",,\"17/10/01,12:30:00+04\"\r\nHello\r\n\r\nOK\r\n";
        assert_eq!(decode(0, legacy), Err(Error::MalformedResponse));
    }
}
