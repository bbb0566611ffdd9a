//! Turns drip-fed serial text into one of three outcomes.
//!
//! The A6 answers every command with an arbitrary number of chunks, possibly
//! preceded by the echo of the command itself. A read pass keeps appending
//! chunks to a fresh [`ReceiveBuffer`] until it can tell success from failure,
//! or until the pass times out.

use embassy_time::Duration;
use embedded_io::{Read, ReadReady, Write};

use crate::buffer::{find_after_start, ReceiveBuffer};
use crate::client::Modem;
use crate::error::Error;
use crate::module_timing;
use crate::observer::Observer;
use crate::transport::Clock;

/// Acknowledgement of a completed command.
pub const OK: &str = "OK";

/// Unrecoverable failure of the module, never retried.
pub const FATAL: &str = "FATAL ERROR";

/// Soft failures reported by the A6 firmware with `+CMEE=2`. The misspelling
/// of the first phrase is what the firmware actually sends.
pub const RECOVERABLE: [&str; 3] = [
    "Excute command failure",
    "Unknown error",
    "invalid command line",
];

/// Any other error result code.
pub const ERROR: &str = "ERROR";

/// Result of one read pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Outcome {
    Fatal,
    Recoverable,
    Matched,
}

/// Classify the text received so far.
///
/// `None` means the reply is not complete yet. A `Recoverable` result from
/// this function always stems from an error phrase, never from a timeout.
pub fn classify(text: &str, expected: &str) -> Option<Outcome> {
    if find_after_start(text, expected).is_some() {
        Some(Outcome::Matched)
    } else if text.contains(FATAL) {
        Some(Outcome::Fatal)
    } else if is_soft_error(text) {
        Some(Outcome::Recoverable)
    } else {
        None
    }
}

/// `true` when `text` holds a recoverable phrase or a bare `ERROR` result.
pub fn is_soft_error(text: &str) -> bool {
    RECOVERABLE.iter().any(|phrase| text.contains(phrase))
        || find_after_start(text, ERROR).is_some()
}

impl<T, C, O> Modem<T, C, O>
where
    T: Read + ReadReady + Write,
    C: Clock,
    O: Observer,
{
    /// Read until `scan` yields a value or `timeout` elapses.
    ///
    /// `scan` sees the whole text of the pass after every new chunk. The pass
    /// is reported to the observer either way.
    pub(crate) fn read_until<R>(
        &mut self,
        timeout: Duration,
        mut scan: impl FnMut(&ReceiveBuffer) -> Option<R>,
    ) -> Result<Option<R>, Error> {
        let started = self.clock.now();
        let deadline = started + timeout;
        let mut buf = ReceiveBuffer::new();

        let found = loop {
            let n = self.serial.read_available(&mut buf)?;
            if n > 0 {
                if let Some(found) = scan(&buf) {
                    break Some(found);
                }
            }
            if self.clock.now() >= deadline {
                break None;
            }
            if n == 0 {
                self.clock.wait(self.config.poll_interval);
            }
        };

        let elapsed = self
            .clock
            .now()
            .checked_duration_since(started)
            .unwrap_or(Duration::from_ticks(0));
        self.observer.record(buf.as_str(), elapsed);

        Ok(found)
    }

    /// One classification pass for `expected`.
    ///
    /// Error phrases resynchronize the module before returning
    /// [`Outcome::Recoverable`]; a timeout returns it without touching the
    /// line.
    pub fn wait_for(&mut self, expected: &str, timeout: Duration) -> Result<Outcome, Error> {
        match self.read_until(timeout, |buf| classify(buf.as_str(), expected))? {
            Some(Outcome::Matched) => Ok(Outcome::Matched),
            Some(Outcome::Fatal) => {
                error!("Module reported a fatal error");
                Ok(Outcome::Fatal)
            }
            Some(Outcome::Recoverable) => {
                warn!("Module reported a soft error, resynchronizing");
                self.resync()?;
                Ok(Outcome::Recoverable)
            }
            None => {
                trace!("No {:?} within {} ms", expected, timeout.as_millis());
                Ok(Outcome::Recoverable)
            }
        }
    }

    /// Write a bare `AT`, give the module time to answer and drop the answer.
    pub(crate) fn resync(&mut self) -> Result<(), Error> {
        self.probe()?;
        self.clock.wait(module_timing::resync_time());
        self.serial.discard_input()?;
        Ok(())
    }
}
