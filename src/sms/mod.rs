//! Text messages stored on the SIM.
//!
//! The A6 has no message memory of its own, so every operation here works on
//! SIM storage (`"SM"`). Stored messages are read one index at a time with
//! `+CMGR`; the layout of its reply depends on the firmware and on
//! `+CSDH`, see [`SmsFormat`].

pub mod detailed;
pub mod legacy;
mod session;

pub use session::MessageCursor;

use embedded_io::{Read, ReadReady, Write};
use heapless::String;
use serde::Serialize;

use crate::{
    buffer::{find_after_start, ReceiveBuffer},
    classifier::{Outcome, FATAL, OK, RECOVERABLE},
    client::Modem,
    command::sms::{
        types::{DeleteFlag, MessageFormat},
        DeleteMessage, GetPreferredStorage, ReadMessage, SendMessage, SetMessageFormat,
        SetPreferredStorage,
    },
    config::SmsFormat,
    error::Error,
    module_timing,
    observer::Observer,
    transport::Clock,
};

pub const SENDER_LEN: usize = 24;
pub const TIMESTAMP_LEN: usize = 24;
pub const BODY_LEN: usize = 480;

/// Longest destination number accepted by [`Modem::send_sms`].
pub const MAX_NUMBER_LEN: usize = 24;

const STORAGE: &str = "SM";
const STORAGE_HEADER: &str = "+CPMS: ";
/// Confirmation of a submitted message. The colon keeps the echo of
/// `AT+CMGS=` from matching.
const SENT_MARKER: &str = "+CMGS: ";
const TERMINATOR: &[u8] = b"\x1a\r\n";
const SMS_ATTEMPTS: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageStatus {
    Read,
    Unread,
}

/// One stored message. The driver keeps no copy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmsRecord {
    pub index: u8,
    pub status: MessageStatus,
    /// International numbers are shown in local form, `+447911123456` as
    /// `07911123456`.
    pub sender: String<SENDER_LEN>,
    pub timestamp: String<TIMESTAMP_LEN>,
    pub body: String<BODY_LEN>,
}

/// Copy `text` into a bounded string, cutting at a character boundary when
/// it does not fit.
pub(crate) fn bounded<const N: usize>(text: &str) -> String<N> {
    let mut out = String::new();
    for c in text.chars() {
        if out.push(c).is_err() {
            break;
        }
    }
    out
}

/// `"0"` followed by the national part of an international number, for
/// numbers shaped like `+44xxxxxxxxxx`.
pub(crate) fn local_number(international: &str) -> String<SENDER_LEN> {
    let national = international
        .get(legacy::SENDER_DIGITS.start - 1..)
        .unwrap_or_default();
    let national = national
        .get(..legacy::SENDER_DIGITS.len())
        .unwrap_or(national);

    let mut out: String<SENDER_LEN> = bounded(legacy::LOCAL_PREFIX);
    let _ = out.push_str(national);
    out
}

enum Fetch {
    Record(Result<SmsRecord, Error>),
    Empty,
    Fatal,
    Abandoned,
}

enum Count {
    Value(Option<u8>),
    Fatal,
    Abandoned,
}

impl<T, C, O> Modem<T, C, O>
where
    T: Read + ReadReady + Write,
    C: Clock,
    O: Observer,
{
    fn ensure_sms_storage(&mut self) -> Result<(), Error> {
        if !self.sms_storage_ready {
            self.send(&SetPreferredStorage {
                read: STORAGE,
                write: STORAGE,
                receive: STORAGE,
            })?;
            self.sms_storage_ready = true;
        }
        Ok(())
    }

    /// Number of messages in SIM storage.
    ///
    /// Reads as `0` when the module does not answer within either attempt.
    pub fn message_count(&mut self) -> Result<u8, Error> {
        self.ensure_sms_storage()?;
        let timeout = self.config.sms_timeout;

        for _ in 0..SMS_ATTEMPTS {
            self.serial.write_command(&GetPreferredStorage)?;
            let count = self.read_until(timeout, |buf: &ReceiveBuffer| {
                let text = buf.as_str();
                if let Some(idx) = text.find(STORAGE_HEADER) {
                    let fields = &text[idx + STORAGE_HEADER.len()..];
                    // Complete once the field after the used count started.
                    let mut split = fields.splitn(3, ',');
                    let (_storage, used, rest) = (split.next(), split.next(), split.next());
                    if rest.is_some() {
                        return Some(Count::Value(used.and_then(parse_count)));
                    }
                    None
                } else if text.contains(FATAL) {
                    Some(Count::Fatal)
                } else if RECOVERABLE.iter().any(|phrase| text.contains(phrase)) {
                    Some(Count::Abandoned)
                } else {
                    None
                }
            })?;

            match count {
                Some(Count::Value(Some(count))) => return Ok(count),
                Some(Count::Value(None)) => return Err(Error::MalformedResponse),
                Some(Count::Fatal) => return Err(Error::Fatal),
                Some(Count::Abandoned) | None => {}
            }
        }
        Ok(0)
    }

    /// Read the message stored at `index`.
    ///
    /// Fails with [`Error::NoMessage`] when the slot is empty.
    pub fn read_sms(&mut self, index: u8) -> Result<SmsRecord, Error> {
        self.ensure_sms_storage()?;
        let timeout = self.config.sms_timeout;
        let format = self.config.sms_format;

        for _ in 0..SMS_ATTEMPTS {
            self.serial.write_command(&ReadMessage { index })?;
            let fetched = self.read_until(timeout, |buf: &ReceiveBuffer| {
                let text = buf.as_str();
                if text.contains(legacy::HEADER) {
                    let complete = match format {
                        SmsFormat::Legacy => legacy::is_complete(text),
                        SmsFormat::Detailed => detailed::is_complete(text),
                    };
                    complete.then(|| {
                        Fetch::Record(match format {
                            SmsFormat::Legacy => legacy::decode(index, text),
                            SmsFormat::Detailed => detailed::decode(index, text),
                        })
                    })
                } else if find_after_start(text, OK).is_some() {
                    Some(Fetch::Empty)
                } else if text.contains(FATAL) {
                    Some(Fetch::Fatal)
                } else if RECOVERABLE.iter().any(|phrase| text.contains(phrase)) {
                    Some(Fetch::Abandoned)
                } else {
                    None
                }
            })?;

            match fetched {
                Some(Fetch::Record(record)) => {
                    self.clock.wait(module_timing::sms_read_settle_time());
                    return record;
                }
                Some(Fetch::Empty) => return Err(Error::NoMessage),
                Some(Fetch::Fatal) => return Err(Error::Fatal),
                Some(Fetch::Abandoned) | None => {}
            }
        }

        self.clock.wait(module_timing::sms_read_settle_time());
        Err(Error::NoResponse)
    }

    /// Send a text message to `number`.
    ///
    /// Succeeds once the module confirmed the submission with `+CMGS`.
    pub fn send_sms(&mut self, number: &str, text: &str) -> Result<(), Error> {
        if number.len() > MAX_NUMBER_LEN {
            return Err(Error::CommandTooLong);
        }

        self.send(&SetMessageFormat {
            format: MessageFormat::Text,
        })?;
        self.clock.wait(module_timing::sms_prompt_time());

        self.serial.write_command(&SendMessage { number })?;
        self.clock.wait(module_timing::sms_prompt_time());
        // Prompt and echo say nothing about the submission.
        self.serial.discard_input()?;

        self.write_raw(text.as_bytes())?;
        self.clock.wait(module_timing::sms_body_time());
        self.write_raw(TERMINATOR)?;

        match self.wait_for(SENT_MARKER, self.config.sms_timeout)? {
            Outcome::Matched => {
                debug!("Message sent");
                Ok(())
            }
            Outcome::Fatal => Err(Error::Fatal),
            Outcome::Recoverable => Err(Error::Exhausted),
        }
    }

    /// Delete every message in SIM storage.
    pub fn delete_all_sms(&mut self) -> Result<(), Error> {
        self.send(&DeleteMessage {
            index: 1,
            flag: DeleteFlag::All,
        })
    }
}

fn parse_count(field: &str) -> Option<u8> {
    let field = field.trim();
    let start = field
        .rfind(|c: char| !c.is_ascii_digit())
        .map_or(0, |idx| idx + 1);
    field[start..].parse().ok()
}
