use embedded_io::{Read, ReadReady, Write};

use super::SmsRecord;
use crate::{client::Modem, error::Error, observer::Observer, transport::Clock};

const NOT_STARTED: u8 = u8::MAX;

/// Walks the messages in SIM storage.
///
/// The cursor belongs to the caller and holds nothing but the last index
/// read; every call queries the modem again, so messages arriving while
/// iterating are picked up.
///
/// ```ignore
/// let mut cursor = MessageCursor::new();
/// cursor.start();
/// while cursor.has_next(&mut modem)? {
///     let sms = cursor.next(&mut modem)?;
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageCursor {
    position: u8,
}

impl Default for MessageCursor {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageCursor {
    pub const fn new() -> Self {
        Self {
            position: NOT_STARTED,
        }
    }

    /// Rewind to the first message.
    pub fn start(&mut self) {
        self.position = 0;
    }

    /// Index of the last message read, `None` before [`MessageCursor::start`].
    pub fn position(&self) -> Option<u8> {
        (self.position != NOT_STARTED).then_some(self.position)
    }

    /// `true` while fewer messages were read than the storage holds.
    pub fn has_next<T, C, O>(&self, modem: &mut Modem<T, C, O>) -> Result<bool, Error>
    where
        T: Read + ReadReady + Write,
        C: Clock,
        O: Observer,
    {
        if self.position == NOT_STARTED {
            return Ok(false);
        }
        Ok(self.position < modem.message_count()?)
    }

    /// Read the message after the current one.
    ///
    /// The cursor only advances when the read succeeded.
    pub fn next<T, C, O>(&mut self, modem: &mut Modem<T, C, O>) -> Result<SmsRecord, Error>
    where
        T: Read + ReadReady + Write,
        C: Clock,
        O: Observer,
    {
        if self.position == NOT_STARTED {
            return Err(Error::CursorNotStarted);
        }
        let index = self.position.checked_add(1).ok_or(Error::NoMessage)?;
        if index == NOT_STARTED {
            return Err(Error::NoMessage);
        }

        let record = modem.read_sms(index)?;
        self.position = index;
        Ok(record)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_helpers::{mock_modem, MockClock, MockSerial};

    fn inbox() -> MockSerial {
        MockSerial::new(|line, _| match line {
            "AT+CPMS=\"SM\",\"SM\",\"SM\"" => vec!["\r\nOK\r\n".into()],
            "AT+CPMS?" => vec!["\r\n+CPMS: \"SM\",2,20,\"SM\",2,20,\"SM\",2,20\r\n\r\nOK\r\n".into()],
            "AT+CMGR=1" => vec!["\r\n+CMGR: \"REC READ\",\"+447911123456\",,\"17/10/01,12:30:00+04\"\r\nFirst\r\n\r\nOK\r\n".into()],
            "AT+CMGR=2" => vec!["\r\n+CMGR: \"REC UNREAD\",\"+447911654321\",,\"17/10/02,08:00:00+04\"\r\nSecond\r\n\r\nOK\r\n".into()],
            _ => vec![],
        })
    }

    #[test]
    fn walks_every_message() {
        let mut modem = mock_modem(inbox(), MockClock::new());
        let mut cursor = MessageCursor::new();
        cursor.start();

        let mut bodies = Vec::new();
        while cursor.has_next(&mut modem).unwrap() {
            bodies.push(cursor.next(&mut modem).unwrap().body);
        }
        assert_eq!(bodies, ["First", "Second"]);
        assert_eq!(cursor.position(), Some(2));
    }

    #[test]
    fn next_requires_start() {
        let mut modem = mock_modem(inbox(), MockClock::new());
        let mut cursor = MessageCursor::default();

        assert_eq!(cursor.position(), None);
        assert!(!cursor.has_next(&mut modem).unwrap());
        assert_eq!(cursor.next(&mut modem), Err(Error::CursorNotStarted));
        assert!(modem.transport().lines().is_empty());
    }

    #[test]
    fn failed_read_does_not_advance() {
        let mut modem = mock_modem(inbox(), MockClock::new());
        let mut cursor = MessageCursor::new();
        cursor.start();
        cursor.next(&mut modem).unwrap();
        cursor.next(&mut modem).unwrap();

        assert_eq!(cursor.next(&mut modem), Err(Error::NoResponse));
        assert_eq!(cursor.position(), Some(2));
    }
}
