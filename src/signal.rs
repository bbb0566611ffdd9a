use embedded_io::{Read, ReadReady, Write};
use serde::Serialize;

use crate::{
    buffer::ReceiveBuffer,
    classifier::{FATAL, OK, RECOVERABLE},
    client::Modem,
    command::mobile_control::GetSignalQuality,
    error::Error,
    observer::Observer,
    transport::Clock,
};

/// Raw value reported when the module cannot measure.
pub const NOT_KNOWN: u8 = 99;

const CSQ_ATTEMPTS: u8 = 2;

/// Rating of a `+CSQ` received signal strength.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SignalQuality {
    Excellent = 0,
    VeryGood = 1,
    Good = 2,
    Okay = 3,
    NotGood = 4,
    VeryBad = 5,
    Unusable = 7,
    NotKnown = 99,
}

impl TryFrom<u8> for SignalQuality {
    type Error = Error;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        Ok(match raw {
            0..=10 => Self::Unusable,
            11..=12 => Self::VeryBad,
            13..=15 => Self::NotGood,
            16..=20 => Self::Okay,
            21 => Self::Good,
            22..=26 => Self::VeryGood,
            27..=31 => Self::Excellent,
            NOT_KNOWN => Self::NotKnown,
            other => return Err(Error::Unmapped(other)),
        })
    }
}

enum Reading {
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
    /// Received signal strength as reported by `+CSQ`: `0..=31`, or
    /// [`NOT_KNOWN`] when the module cannot tell or reported a fatal error.
    pub fn signal_strength_raw(&mut self) -> Result<u8, Error> {
        self.query_signal(rssi_field)
    }

    pub fn signal_strength(&mut self) -> Result<SignalQuality, Error> {
        SignalQuality::try_from(self.signal_strength_raw()?)
    }

    /// Channel bit error rate as reported by `+CSQ`: `0..=7`, or
    /// [`NOT_KNOWN`].
    pub fn bit_error_rate(&mut self) -> Result<u8, Error> {
        match self.query_signal(ber_field)? {
            ber @ (0..=7 | NOT_KNOWN) => Ok(ber),
            other => Err(Error::Unmapped(other)),
        }
    }

    fn query_signal(&mut self, pick: fn(&str) -> Option<u8>) -> Result<u8, Error> {
        let timeout = self.config.signal_timeout;
        for _ in 0..CSQ_ATTEMPTS {
            self.serial.write_command(&GetSignalQuality)?;
            let reading = self.read_until(timeout, |buf: &ReceiveBuffer| {
                if buf.contains_after_start(OK) {
                    Some(Reading::Value(pick(buf.as_str())))
                } else if buf.contains(FATAL) {
                    Some(Reading::Fatal)
                } else if RECOVERABLE.iter().any(|phrase| buf.contains(phrase)) {
                    Some(Reading::Abandoned)
                } else {
                    None
                }
            })?;

            match reading {
                Some(Reading::Value(Some(value))) => return Ok(value),
                Some(Reading::Value(None)) => return Err(Error::MalformedResponse),
                Some(Reading::Fatal) => return Ok(NOT_KNOWN),
                Some(Reading::Abandoned) | None => {}
            }
        }
        Err(Error::NoResponse)
    }
}

/// The two characters in front of the first comma: `+CSQ: 18,0` gives 18.
fn rssi_field(text: &str) -> Option<u8> {
    let comma = text.find(',')?;
    text.get(comma.saturating_sub(2)..comma)?.trim().parse().ok()
}

/// Up to two digits after the first comma: `+CSQ: 18,0` gives 0.
fn ber_field(text: &str) -> Option<u8> {
    let field = &text[text.find(',')? + 1..];
    let digits = field
        .bytes()
        .take(2)
        .take_while(u8::is_ascii_digit)
        .count();
    field[..digits].parse().ok()
}
