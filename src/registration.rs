use embedded_io::{Read, ReadReady, Write};

use crate::{
    buffer::find_after_start,
    classifier::ERROR,
    client::Modem,
    command::network_service::GetNetworkRegistrationStatus,
    error::Error,
    module_timing,
    observer::Observer,
    transport::Clock,
};

const HOME: &str = "+CREG: 1,1";
const ROAMING: &str = "+CREG: 1,5";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RegistrationState {
    Home,
    Roaming,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Poll {
    Registered(RegistrationState),
    /// The status field carries more digits than a final state, e.g.
    /// `+CREG: 1,10` while the module is still scanning.
    Settling,
    Failed,
}

fn scan(text: &str) -> Option<Poll> {
    for (pattern, state) in [
        (HOME, RegistrationState::Home),
        (ROAMING, RegistrationState::Roaming),
    ] {
        if let Some(idx) = find_after_start(text, pattern) {
            return match text[idx + pattern.len()..].chars().next() {
                // Wait for the character after the status.
                None => None,
                Some(c) if c.is_ascii_digit() => Some(Poll::Settling),
                Some(_) => Some(Poll::Registered(state)),
            };
        }
    }

    find_after_start(text, ERROR).map(|_| Poll::Failed)
}

impl<T, C, O> Modem<T, C, O>
where
    T: Read + ReadReady + Write,
    C: Clock,
    O: Observer,
{
    /// Poll `+CREG?` until the module is registered on its home network or
    /// roaming.
    pub fn wait_for_network(&mut self) -> Result<RegistrationState, Error> {
        let timeout = self.config.registration_timeout;
        for cycle in 0..self.config.registration_attempts {
            self.serial.write_command(&GetNetworkRegistrationStatus)?;
            match self.read_until(timeout, |buf| scan(buf.as_str()))? {
                Some(Poll::Registered(state)) => {
                    info!("Registered on network after {} polls", cycle + 1);
                    return Ok(state);
                }
                Some(Poll::Settling) => {
                    self.clock.wait(module_timing::registration_settle_time());
                }
                Some(Poll::Failed) => {
                    warn!("Registration query failed, resynchronizing");
                    self.resync()?;
                }
                None => {
                    debug!("No registration status within {} ms", timeout.as_millis());
                }
            }
        }

        warn!("Not registered on any network");
        Err(Error::NetworkUnreachable)
    }
}
