//! The serial boundary: byte transport, wall clock and line-speed control.

use atat::AtatCmd;
use embassy_time::{Duration, Instant};
use embedded_io::{Read, ReadReady, Write};
use heapless::Vec;

use crate::buffer::ReceiveBuffer;
use crate::error::Error;

/// Largest formatted command accepted by [`LineReader::write_command`].
pub const MAX_COMMAND_LEN: usize = 256;

const CHUNK_LEN: usize = 128;

/// Wall clock used for every timeout and settle delay.
pub trait Clock {
    fn now(&self) -> Instant;

    /// Block the calling thread for `duration`.
    fn wait(&mut self, duration: Duration);
}

/// [`Clock`] backed by the global embassy-time driver.
#[cfg(feature = "std")]
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

#[cfg(feature = "std")]
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn wait(&mut self, duration: Duration) {
        embassy_time::block_for(duration)
    }
}

/// Serial ports that can change their line speed at runtime, required for
/// baud rate auto detection.
pub trait BaudRateControl {
    type Error: core::fmt::Debug;

    fn set_baud_rate(&mut self, baud: u32) -> Result<(), Self::Error>;
}

/// Leaf of the driver: moves bytes in and out of the serial port.
///
/// Reads never block; whatever the port has buffered is handed back as text.
/// A multi-byte character split across two reads is held back until its tail
/// arrives.
pub struct LineReader<T> {
    io: T,
    partial: Vec<u8, 4>,
}

impl<T> LineReader<T>
where
    T: Read + ReadReady + Write,
{
    pub fn new(io: T) -> Self {
        Self {
            io,
            partial: Vec::new(),
        }
    }

    pub fn get_ref(&self) -> &T {
        &self.io
    }

    pub fn get_mut(&mut self) -> &mut T {
        &mut self.io
    }

    pub fn into_inner(self) -> T {
        self.io
    }

    /// Append whatever is currently available to `buf`.
    ///
    /// Returns the number of bytes taken from the port, `0` when nothing was
    /// pending.
    pub fn read_available(&mut self, buf: &mut ReceiveBuffer) -> Result<usize, Error> {
        if !self.io.read_ready().map_err(|_| Error::Io)? {
            return Ok(0);
        }

        let mut chunk = [0u8; CHUNK_LEN + 4];
        let carried = self.partial.len();
        chunk[..carried].copy_from_slice(&self.partial);
        self.partial.clear();

        let n = self
            .io
            .read(&mut chunk[carried..carried + CHUNK_LEN])
            .map_err(|_| Error::Io)?;

        self.decode(&chunk[..carried + n], buf);
        Ok(n)
    }

    /// Read and throw away everything the port has buffered.
    pub fn discard_input(&mut self) -> Result<usize, Error> {
        let mut discarded = 0;
        let mut scratch = [0u8; CHUNK_LEN];
        while self.io.read_ready().map_err(|_| Error::Io)? {
            let n = self.io.read(&mut scratch).map_err(|_| Error::Io)?;
            if n == 0 {
                break;
            }
            discarded += n;
        }
        self.partial.clear();
        Ok(discarded)
    }

    /// Write raw bytes and flush.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.io.write_all(bytes).map_err(|_| Error::Io)?;
        self.io.flush().map_err(|_| Error::Io)
    }

    /// Format `cmd` as `AT<body>\r\n`, write it and flush.
    pub fn write_command<Cmd: AtatCmd>(&mut self, cmd: &Cmd) -> Result<(), Error> {
        if Cmd::MAX_LEN > MAX_COMMAND_LEN {
            return Err(Error::CommandTooLong);
        }
        let mut scratch = [0u8; MAX_COMMAND_LEN];
        let len = cmd.write(&mut scratch);

        debug!(
            "Sending command: {:?}",
            core::str::from_utf8(&scratch[..len])
                .map(str::trim_end)
                .unwrap_or("<non-utf8>")
        );

        self.write_bytes(&scratch[..len])
    }

    fn decode(&mut self, mut bytes: &[u8], buf: &mut ReceiveBuffer) {
        loop {
            match core::str::from_utf8(bytes) {
                Ok(text) => {
                    buf.push_str(text);
                    return;
                }
                Err(e) => {
                    let (valid, rest) = bytes.split_at(e.valid_up_to());
                    if let Ok(text) = core::str::from_utf8(valid) {
                        buf.push_str(text);
                    }
                    match e.error_len() {
                        Some(bad) => {
                            buf.push(char::REPLACEMENT_CHARACTER);
                            bytes = &rest[bad..];
                        }
                        None => {
                            // Incomplete sequence at the end of the read.
                            let _ = self.partial.extend_from_slice(rest);
                            return;
                        }
                    }
                }
            }
        }
    }
}
