use atat::AtatCmd;
use embedded_io::{Read, ReadReady, Write};

use crate::{
    classifier::{Outcome, OK},
    command::{
        control::{
            types::{Echo, TerminationErrorMode},
            FactoryResetConfig, SetEcho, SetReportMobileTerminationError,
        },
        sms::{
            types::{MessageFormat, TextModeParameters},
            SetMessageFormat, SetPreferredStorage, SetShowTextModeParameters,
        },
        AT,
    },
    config::{Config, SmsFormat},
    error::Error,
    observer::{NoopObserver, Observer},
    transport::{BaudRateControl, Clock, LineReader},
};

/// SIM storage, used for every message memory.
const SIM_STORAGE: &str = "SM";

/// Synchronous driver for an A6 module on a serial line.
///
/// Every operation takes `&mut self` and blocks until the module answered or
/// the attempt budget ran out.
pub struct Modem<T, C, O = NoopObserver> {
    pub(crate) serial: LineReader<T>,
    pub(crate) clock: C,
    pub(crate) observer: O,
    pub(crate) config: Config,
    pub(crate) sms_storage_ready: bool,
}

impl<T, C> Modem<T, C, NoopObserver>
where
    T: Read + ReadReady + Write,
    C: Clock,
{
    pub fn new(transport: T, clock: C, config: Config) -> Self {
        Modem {
            serial: LineReader::new(transport),
            clock,
            observer: NoopObserver,
            config,
            sms_storage_ready: false,
        }
    }
}

impl<T, C, O> Modem<T, C, O>
where
    T: Read + ReadReady + Write,
    C: Clock,
    O: Observer,
{
    /// Replace the observer that receives every read pass.
    pub fn with_observer<O2: Observer>(self, observer: O2) -> Modem<T, C, O2> {
        Modem {
            serial: self.serial,
            clock: self.clock,
            observer,
            config: self.config,
            sms_storage_ready: self.sms_storage_ready,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn transport(&self) -> &T {
        self.serial.get_ref()
    }

    pub fn transport_mut(&mut self) -> &mut T {
        self.serial.get_mut()
    }

    /// `true` once `init` selected the SIM as message storage.
    pub fn sms_storage_ready(&self) -> bool {
        self.sms_storage_ready
    }

    /// Give back the transport, clock and observer.
    pub fn release(self) -> (T, C, O) {
        (self.serial.into_inner(), self.clock, self.observer)
    }

    /// Send `cmd` and wait for `OK`, with the configured attempt budget.
    pub fn send<Cmd: AtatCmd>(&mut self, cmd: &Cmd) -> Result<(), Error> {
        self.send_with(cmd, OK, self.config.attempts)
    }

    /// Send `cmd` and wait for `OK`, up to `attempts` times.
    pub fn send_attempts<Cmd: AtatCmd>(&mut self, cmd: &Cmd, attempts: u8) -> Result<(), Error> {
        self.send_with(cmd, OK, attempts)
    }

    /// Send `cmd` until the reply contains `expected`.
    ///
    /// Every attempt writes the command again and waits up to the configured
    /// command timeout. `FATAL ERROR` ends the exchange at once; soft errors
    /// and timeouts consume one attempt each. Blocks for at most
    /// `attempts` times the command timeout, plus resynchronization pauses.
    pub fn send_with<Cmd: AtatCmd>(
        &mut self,
        cmd: &Cmd,
        expected: &str,
        attempts: u8,
    ) -> Result<(), Error> {
        for attempt in 1..=attempts {
            self.serial.write_command(cmd)?;
            match self.wait_for(expected, self.config.command_timeout)? {
                Outcome::Matched => return Ok(()),
                Outcome::Fatal => return Err(Error::Fatal),
                Outcome::Recoverable => {
                    debug!("Attempt {} of {} failed", attempt, attempts);
                }
            }
        }
        Err(Error::Exhausted)
    }

    /// Write the bare `AT` probe without waiting for the answer.
    pub fn probe(&mut self) -> Result<(), Error> {
        self.serial.write_command(&AT)
    }

    pub(crate) fn write_raw(&mut self, bytes: &[u8]) -> Result<(), Error> {
        self.serial.write_bytes(bytes)
    }

    /// Bring the module into a known state.
    ///
    /// Synchronizes with the module, restores the factory profile, turns off
    /// echo, enables verbose error phrases and selects SIM storage and text
    /// mode for messages.
    pub fn init(&mut self) -> Result<(), Error> {
        self.synchronize()?;
        info!("In sync with module");
        self.configure()
    }

    fn configure(&mut self) -> Result<(), Error> {
        self.send(&FactoryResetConfig)?;
        self.send(&SetEcho { enabled: Echo::Off })?;
        self.send(&SetReportMobileTerminationError {
            n: TerminationErrorMode::Verbose,
        })?;

        self.send(&SetPreferredStorage {
            read: SIM_STORAGE,
            write: SIM_STORAGE,
            receive: SIM_STORAGE,
        })?;
        self.sms_storage_ready = true;

        self.send(&SetMessageFormat {
            format: MessageFormat::Text,
        })?;
        if self.config.sms_format == SmsFormat::Detailed {
            self.send(&SetShowTextModeParameters {
                show: TextModeParameters::Show,
            })?;
        }
        Ok(())
    }
}

impl<T, C, O> Modem<T, C, O>
where
    T: Read + ReadReady + Write + BaudRateControl,
    C: Clock,
    O: Observer,
{
    /// Like [`Modem::init`], for a module whose line speed is not known.
    ///
    /// Synchronization is tried twice at the current speed before sweeping
    /// every supported baud rate. Returns the speed the module answered at,
    /// `None` when it answered at the current one.
    pub fn init_auto_baud(&mut self) -> Result<Option<u32>, Error> {
        let detected = match self.synchronize() {
            Ok(()) => None,
            Err(Error::NotSynchronized) => match self.synchronize() {
                Ok(()) => None,
                Err(Error::NotSynchronized) => Some(self.auto_baud()?),
                Err(e) => return Err(e),
            },
            Err(e) => return Err(e),
        };
        info!("In sync with module");
        self.configure()?;
        Ok(detected)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::command::mobile_control::GetSignalQuality;
    use crate::test_helpers::{mock_modem, mock_modem_with, MockClock, MockSerial};
    use embassy_time::Duration;

    fn fast() -> Config {
        Config::new().with_command_timeout(Duration::from_millis(200))
    }

    #[test]
    fn fatal_ends_after_one_attempt() {
        let serial = MockSerial::new(|line, _| match line {
            "AT+CSQ" => vec!["\r\nFATAL ERROR\r\n".into()],
            _ => vec![],
        });
        let mut modem = mock_modem_with(serial, MockClock::new(), fast());

        assert_eq!(modem.send_attempts(&GetSignalQuality, 5), Err(Error::Fatal));
        assert_eq!(modem.transport().count("AT+CSQ"), 1);
    }

    #[test]
    fn recoverable_then_matched() {
        let mut replies = 0;
        let serial = MockSerial::new(move |line, _| match line {
            "AT+CSQ" => {
                replies += 1;
                if replies < 3 {
                    vec!["\r\n+CME ERROR: Excute command failure\r\n".into()]
                } else {
                    vec!["\r\n+CSQ: 18,0\r\n\r\nOK\r\n".into()]
                }
            }
            "AT" => vec!["\r\nOK\r\n".into()],
            _ => vec![],
        });
        let mut modem = mock_modem_with(serial, MockClock::new(), fast());

        assert_eq!(modem.send_attempts(&GetSignalQuality, 3), Ok(()));
        assert_eq!(modem.transport().count("AT+CSQ"), 3);
        assert_eq!(modem.transport().count("AT"), 2);
    }

    #[test]
    fn silence_exhausts_every_attempt() {
        let clock = MockClock::new();
        let mut modem = mock_modem_with(MockSerial::silent(), clock.clone(), fast());

        assert_eq!(
            modem.send_attempts(&GetSignalQuality, 3),
            Err(Error::Exhausted)
        );
        assert_eq!(modem.transport().count("AT+CSQ"), 3);
        assert_eq!(clock.elapsed_ms(), 3 * 200);
    }

    #[test]
    fn expected_token_other_than_ok() {
        let serial = MockSerial::new(|line, _| match line {
            "AT+CSQ" => vec!["\r\n+CSQ: 18,0\r\n".into()],
            _ => vec![],
        });
        let mut modem = mock_modem(serial, MockClock::new());

        assert_eq!(modem.send_with(&GetSignalQuality, "+CSQ", 1), Ok(()));
    }

    #[test]
    fn init_configures_storage_and_format() {
        let serial = MockSerial::new(|_, _| vec!["\r\nOK\r\n".into()]);
        let config = Config::new().with_sms_format(SmsFormat::Detailed);
        let mut modem = mock_modem_with(serial, MockClock::new(), config);

        assert_eq!(modem.init(), Ok(()));
        assert!(modem.sms_storage_ready());

        let lines = modem.transport().lines();
        let setup: Vec<&str> = lines
            .iter()
            .map(String::as_str)
            .filter(|l| *l != "AT")
            .collect();
        assert_eq!(
            setup,
            [
                "AT&F0",
                "ATE0",
                "AT+CMEE=2",
                "AT+CPMS=\"SM\",\"SM\",\"SM\"",
                "AT+CMGF=1",
                "AT+CSDH=1"
            ]
        );
    }

    #[test]
    fn init_fails_without_acknowledgement() {
        let mut modem = mock_modem(MockSerial::silent(), MockClock::new());

        assert_eq!(modem.init(), Err(Error::NotSynchronized));
        assert!(!modem.sms_storage_ready());
        let lines = modem.transport().lines();
        assert!(lines.iter().all(|l| l == "AT"));
        // Burst plus one unanswered probe per cycle.
        assert_eq!(lines.len(), 20 + 10);
    }

    #[test]
    fn init_auto_baud_falls_back_to_sweep() {
        let serial = MockSerial::new(|line, baud| match (line, baud) {
            (_, 57_600) => vec!["\r\nOK\r\n".into()],
            _ => vec![],
        });
        let mut modem = mock_modem(serial, MockClock::new());

        assert_eq!(modem.init_auto_baud(), Ok(Some(57_600)));
        assert!(modem.sms_storage_ready());
        assert_eq!(modem.transport().baud(), 57_600);
    }
}
