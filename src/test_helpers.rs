//! Scripted serial port, virtual clock and recording observer for unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;
use std::string::String;
use std::vec::Vec;

use embassy_time::{Duration, Instant};

use crate::client::Modem;
use crate::config::Config;
use crate::observer::Observer;
use crate::transport::{BaudRateControl, Clock};

type Responder = Box<dyn FnMut(&str, u32) -> Vec<String>>;

const CTRL_Z: u8 = 0x1a;

/// Serial port that answers every complete line written to it.
///
/// A line ends with `\r\n` or with Ctrl-Z, which stays part of the line. The
/// responder gets the line and the current baud rate, and returns the reply
/// as chunks; each read hands out at most one chunk. Empty lines are
/// ignored.
pub struct MockSerial {
    responder: Responder,
    pending: VecDeque<Vec<u8>>,
    partial_line: Vec<u8>,
    written: Vec<u8>,
    lines: Vec<String>,
    baud: u32,
    baud_history: Vec<u32>,
}

impl MockSerial {
    pub fn new(responder: impl FnMut(&str, u32) -> Vec<String> + 'static) -> Self {
        init_logger();
        Self {
            responder: Box::new(responder),
            pending: VecDeque::new(),
            partial_line: Vec::new(),
            written: Vec::new(),
            lines: Vec::new(),
            baud: 9_600,
            baud_history: Vec::new(),
        }
    }

    /// Never answers anything.
    pub fn silent() -> Self {
        Self::new(|_, _| Vec::new())
    }

    /// Queue unsolicited text.
    pub fn queue(&mut self, chunk: &str) {
        self.queue_bytes(chunk.as_bytes());
    }

    pub fn queue_bytes(&mut self, chunk: &[u8]) {
        self.pending.push_back(chunk.to_vec());
    }

    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Every byte written so far.
    pub fn written(&self) -> &[u8] {
        &self.written
    }

    /// Every complete line written so far, without terminator.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// How often exactly `line` was written.
    pub fn count(&self, line: &str) -> usize {
        self.lines.iter().filter(|l| l.as_str() == line).count()
    }

    pub fn baud(&self) -> u32 {
        self.baud
    }

    pub fn baud_history(&self) -> &[u32] {
        &self.baud_history
    }

    fn complete_line(&mut self) {
        let line = String::from_utf8_lossy(&self.partial_line).into_owned();
        self.partial_line.clear();
        if line.is_empty() {
            return;
        }
        for chunk in (self.responder)(&line, self.baud) {
            self.pending.push_back(chunk.into_bytes());
        }
        self.lines.push(line);
    }
}

impl embedded_io::ErrorType for MockSerial {
    type Error = Infallible;
}

impl embedded_io::Read for MockSerial {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        let Some(mut chunk) = self.pending.pop_front() else {
            return Ok(0);
        };
        let n = chunk.len().min(buf.len());
        buf[..n].copy_from_slice(&chunk[..n]);
        if n < chunk.len() {
            chunk.drain(..n);
            self.pending.push_front(chunk);
        }
        Ok(n)
    }
}

impl embedded_io::ReadReady for MockSerial {
    fn read_ready(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.pending.is_empty())
    }
}

impl embedded_io::Write for MockSerial {
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.written.extend_from_slice(buf);
        for &byte in buf {
            match byte {
                b'\n' if self.partial_line.last() == Some(&b'\r') => {
                    self.partial_line.pop();
                    self.complete_line();
                }
                CTRL_Z => {
                    self.partial_line.push(byte);
                    self.complete_line();
                }
                _ => self.partial_line.push(byte),
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl BaudRateControl for MockSerial {
    type Error = Infallible;

    fn set_baud_rate(&mut self, baud: u32) -> Result<(), Self::Error> {
        self.baud = baud;
        self.baud_history.push(baud);
        Ok(())
    }
}

/// Virtual clock starting at zero, advanced only by `wait`. Clones share the
/// same time.
#[derive(Clone, Default)]
pub struct MockClock {
    now_ms: Rc<Cell<u64>>,
}

impl MockClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

impl Clock for MockClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.now_ms.get())
    }

    fn wait(&mut self, duration: Duration) {
        self.now_ms.set(self.now_ms.get() + duration.as_millis());
    }
}

/// Keeps every read pass as `(text, elapsed ms)`. Clones share the record.
#[derive(Clone, Default)]
pub struct RecordingObserver {
    passes: Rc<RefCell<Vec<(String, u64)>>>,
}

impl RecordingObserver {
    pub fn passes(&self) -> Vec<(String, u64)> {
        self.passes.borrow().clone()
    }
}

impl Observer for RecordingObserver {
    fn record(&mut self, raw: &str, elapsed: Duration) {
        self.passes
            .borrow_mut()
            .push((raw.into(), elapsed.as_millis()));
    }
}

pub fn mock_modem(serial: MockSerial, clock: MockClock) -> Modem<MockSerial, MockClock> {
    mock_modem_with(serial, clock, Config::new())
}

pub fn mock_modem_with(
    serial: MockSerial,
    clock: MockClock,
    config: Config,
) -> Modem<MockSerial, MockClock> {
    Modem::new(serial, clock, config)
}

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
