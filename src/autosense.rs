//! Getting in step with a module that may have just powered up.
//!
//! The A6 locks onto the host's line speed from a train of `AT` probes. A
//! single `OK` right after power-up is often noise, so synchronization only
//! counts once two consecutive probes are acknowledged.

use embedded_io::{Read, ReadReady, Write};

use crate::{
    classifier::{Outcome, OK},
    client::Modem,
    error::Error,
    module_timing,
    observer::Observer,
    transport::{BaudRateControl, Clock},
};

/// Line speeds the A6 auto-bauds on, slowest first.
pub const BAUD_RATES: [u32; 10] = [
    300, 1_200, 2_400, 4_800, 9_600, 19_200, 38_400, 57_600, 74_880, 115_200,
];

/// Speed restored when detection fails.
pub const FALLBACK_BAUD_RATE: u32 = 9_600;

const SWEEPS: u8 = 2;

impl<T, C, O> Modem<T, C, O>
where
    T: Read + ReadReady + Write,
    C: Clock,
    O: Observer,
{
    /// Probe until the module acknowledges twice in a row.
    pub fn synchronize(&mut self) -> Result<(), Error> {
        for _ in 0..self.config.sync_burst {
            self.probe()?;
            self.clock.wait(module_timing::sync_burst_gap());
        }
        // Acknowledgements of the burst say nothing about the current state.
        self.serial.discard_input()?;

        for cycle in 0..self.config.sync_cycles {
            if self.acknowledged_probe()? && self.acknowledged_probe()? {
                debug!("Synchronized after {} cycles", cycle + 1);
                return Ok(());
            }
        }
        Err(Error::NotSynchronized)
    }

    fn acknowledged_probe(&mut self) -> Result<bool, Error> {
        self.clock.wait(module_timing::sync_probe_gap());
        self.probe()?;
        let probe_timeout = self.config.sync_probe_timeout;
        match self.wait_for(OK, probe_timeout)? {
            Outcome::Matched => Ok(true),
            Outcome::Fatal => Err(Error::Fatal),
            Outcome::Recoverable => Ok(false),
        }
    }
}

impl<T, C, O> Modem<T, C, O>
where
    T: Read + ReadReady + Write + BaudRateControl,
    C: Clock,
    O: Observer,
{
    /// Find the line speed the module answers at.
    ///
    /// Sweeps [`BAUD_RATES`] twice, synchronizing at every speed. On failure
    /// the port is left at [`FALLBACK_BAUD_RATE`].
    pub fn auto_baud(&mut self) -> Result<u32, Error> {
        for _ in 0..SWEEPS {
            for &baud in BAUD_RATES.iter() {
                self.set_baud_rate(baud)?;
                match self.synchronize() {
                    Ok(()) => {
                        info!("Module answers at {} baud", baud);
                        return Ok(baud);
                    }
                    Err(Error::NotSynchronized) => {}
                    Err(e) => return Err(e),
                }
            }
        }

        warn!("Baud rate not found");
        self.set_baud_rate(FALLBACK_BAUD_RATE)?;
        Err(Error::BaudDetection)
    }

    fn set_baud_rate(&mut self, baud: u32) -> Result<(), Error> {
        self.serial.get_mut().set_baud_rate(baud).map_err(|_e| {
            error!("Failed to set baud rate {}", baud);
            Error::Io
        })
    }
}
