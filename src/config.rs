use embassy_time::Duration;

use crate::error::Error;

/// Capacity of the per-pass receive buffer, in bytes.
pub const RX_BUFFER_LEN: usize = 1024;

/// Which `+CMGR` reply layout the modem firmware produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SmsFormat {
    /// Stock A6 firmware: header fields at fixed offsets, body framed by
    /// `\r\n` and `\r\n\r\nOK`.
    #[default]
    Legacy,
    /// Text mode parameters shown (`AT+CSDH=1`): quoted fields, address type
    /// and an explicit body length.
    Detailed,
}

#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub(crate) command_timeout: Duration,
    pub(crate) attempts: u8,
    pub(crate) poll_interval: Duration,
    pub(crate) sync_burst: u8,
    pub(crate) sync_cycles: u8,
    pub(crate) sync_probe_timeout: Duration,
    pub(crate) signal_timeout: Duration,
    pub(crate) registration_attempts: u8,
    pub(crate) registration_timeout: Duration,
    pub(crate) sms_timeout: Duration,
    pub(crate) sms_format: SmsFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub const fn new() -> Self {
        Config {
            command_timeout: Duration::from_millis(15_000),
            attempts: 2,
            poll_interval: Duration::from_millis(10),
            sync_burst: 20,
            sync_cycles: 10,
            sync_probe_timeout: Duration::from_millis(150),
            signal_timeout: Duration::from_millis(9_000),
            registration_attempts: 40,
            registration_timeout: Duration::from_millis(20_000),
            sms_timeout: Duration::from_millis(20_000),
            sms_format: SmsFormat::Legacy,
        }
    }

    pub const fn with_command_timeout(self, timeout: Duration) -> Self {
        Config {
            command_timeout: timeout,
            ..self
        }
    }

    /// Attempts used by [`crate::Modem::send`].
    pub const fn with_attempts(self, attempts: u8) -> Self {
        Config { attempts, ..self }
    }

    pub const fn with_poll_interval(self, interval: Duration) -> Self {
        Config {
            poll_interval: interval,
            ..self
        }
    }

    pub const fn with_sync_cycles(self, cycles: u8) -> Self {
        Config {
            sync_cycles: cycles,
            ..self
        }
    }

    pub const fn with_signal_timeout(self, timeout: Duration) -> Self {
        Config {
            signal_timeout: timeout,
            ..self
        }
    }

    pub const fn with_registration(self, attempts: u8, timeout: Duration) -> Self {
        Config {
            registration_attempts: attempts,
            registration_timeout: timeout,
            ..self
        }
    }

    pub const fn with_sms_timeout(self, timeout: Duration) -> Self {
        Config {
            sms_timeout: timeout,
            ..self
        }
    }

    pub const fn with_sms_format(self, format: SmsFormat) -> Self {
        Config {
            sms_format: format,
            ..self
        }
    }

    pub fn sms_format(&self) -> SmsFormat {
        self.sms_format
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Apn<'a> {
    /// Let the network pick; sends empty credentials.
    None,
    Given {
        name: &'a str,
        username: Option<&'a str>,
        password: Option<&'a str>,
    },
}

impl Default for Apn<'_> {
    fn default() -> Self {
        Self::None
    }
}

impl<'a> Apn<'a> {
    pub fn name(&self) -> &'a str {
        match self {
            Apn::None => "",
            Apn::Given { name, .. } => *name,
        }
    }

    pub fn username(&self) -> &'a str {
        match self {
            Apn::Given {
                username: Some(u), ..
            } => *u,
            _ => "",
        }
    }

    pub fn password(&self) -> &'a str {
        match self {
            Apn::Given {
                password: Some(p), ..
            } => *p,
            _ => "",
        }
    }
}

/// UK network providers with a known APN profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Provider {
    GiffGaff = 0,
    Three = 1,
    Asda = 2,
}

impl TryFrom<u8> for Provider {
    type Error = Error;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(Self::GiffGaff),
            1 => Ok(Self::Three),
            2 => Ok(Self::Asda),
            other => Err(Error::UnknownProvider(other)),
        }
    }
}

impl Provider {
    pub const fn apn(self) -> Apn<'static> {
        match self {
            Provider::GiffGaff => Apn::Given {
                name: "giffgaff.com",
                username: Some("giffgaff"),
                password: None,
            },
            Provider::Three => Apn::Given {
                name: "three.co.uk",
                username: None,
                password: None,
            },
            Provider::Asda => Apn::Given {
                name: "everywhere",
                username: Some("eesecure"),
                password: Some("secure"),
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn provider_table() {
        assert_eq!(Provider::try_from(0), Ok(Provider::GiffGaff));
        assert_eq!(Provider::try_from(2), Ok(Provider::Asda));
        assert_eq!(Provider::try_from(3), Err(Error::UnknownProvider(3)));

        let apn = Provider::Asda.apn();
        assert_eq!(apn.name(), "everywhere");
        assert_eq!(apn.username(), "eesecure");
        assert_eq!(apn.password(), "secure");

        let apn = Provider::Three.apn();
        assert_eq!(apn.username(), "");
        assert_eq!(apn.password(), "");
    }

    #[test]
    fn builder_keeps_defaults() {
        let config = Config::new()
            .with_sms_format(SmsFormat::Detailed)
            .with_attempts(4);
        assert_eq!(config.sms_format(), SmsFormat::Detailed);
        assert_eq!(config.attempts, 4);
        assert_eq!(config.sync_burst, 20);
        assert_eq!(config.registration_attempts, 40);
        assert_eq!(config.command_timeout, Duration::from_millis(15_000));
    }
}
