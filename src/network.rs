//! GPRS bring-up: attach, define the PDP context and open the IP stack.

use embedded_io::{Read, ReadReady, Write};

use crate::{
    client::Modem,
    command::{
        ip_transport_layer::{BringUpWireless, GetConnectionStatus, GetLocalAddress, StartTask},
        psn::{
            types::{GPRSAttachedState, PDPContextStatus},
            GetGPRSAttached, SetGPRSAttached, SetPDPContextDefinition, SetPDPContextState,
        },
    },
    config::{Apn, Provider},
    error::Error,
    module_timing,
    observer::Observer,
    transport::Clock,
};

const CONTEXT_ID: u8 = 1;
const PDP_TYPE: &str = "IP";

const STATE_INITIAL: &str = "IP INITIAL";
const STATE_GPRS_ACTIVE: &str = "IP GPRSACT";
const STATE_START: &str = "IP START";

const MAX_APN_LEN: usize = 64;
const MAX_CREDENTIAL_LEN: usize = 32;

const STATUS_ATTEMPTS: u8 = 2;
const ATTACH_ATTEMPTS: u8 = 4;

/// How the module reported its IP stack after context activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FirmwareGeneration {
    /// Reports `IP GPRSACT` right after `+CGACT`.
    Legacy,
    /// Reports `IP START` and needs `+CIICR` to bring up the wireless link.
    Current,
    /// Reported neither state; the bring-up continued regardless.
    Unknown,
}

impl<T, C, O> Modem<T, C, O>
where
    T: Read + ReadReady + Write,
    C: Clock,
    O: Observer,
{
    /// Connect to the network with the APN profile of `provider`.
    pub fn set_mobile_network(&mut self, provider: Provider) -> Result<FirmwareGeneration, Error> {
        self.connect_apn(&provider.apn())
    }

    /// Attach to GPRS and activate a PDP context on `apn`.
    ///
    /// Returns once the module handed out a local IP address.
    pub fn connect_apn(&mut self, apn: &Apn<'_>) -> Result<FirmwareGeneration, Error> {
        if apn.name().len() > MAX_APN_LEN
            || apn.username().len() > MAX_CREDENTIAL_LEN
            || apn.password().len() > MAX_CREDENTIAL_LEN
        {
            return Err(Error::CommandTooLong);
        }

        // Only informative, a module that was connected before reports
        // another state.
        match self.send_with(&GetConnectionStatus, STATE_INITIAL, STATUS_ATTEMPTS) {
            Ok(()) | Err(Error::Exhausted) => {}
            Err(e) => return Err(e),
        }

        self.send_attempts(
            &SetGPRSAttached {
                state: GPRSAttachedState::Attached,
            },
            ATTACH_ATTEMPTS,
        )?;
        self.clock.wait(module_timing::attach_time());

        self.send_attempts(&GetGPRSAttached, ATTACH_ATTEMPTS)?;
        self.clock.wait(module_timing::attach_time());

        self.send(&SetPDPContextDefinition {
            cid: CONTEXT_ID,
            pdp_type: PDP_TYPE,
            apn: apn.name(),
        })?;
        self.clock.wait(module_timing::attach_time());

        self.send(&StartTask {
            apn: apn.name(),
            username: apn.username(),
            password: apn.password(),
        })?;
        self.clock.wait(module_timing::context_activation_time());

        self.send_attempts(
            &SetPDPContextState {
                status: PDPContextStatus::Activated,
                cid: CONTEXT_ID,
            },
            ATTACH_ATTEMPTS,
        )?;
        self.clock.wait(module_timing::context_activation_time());

        let generation = self.detect_generation()?;
        debug!("IP stack state: {:?}", generation);

        self.send_attempts(&GetLocalAddress, ATTACH_ATTEMPTS)?;
        info!("APN connection established");
        Ok(generation)
    }

    /// Probe the legacy state first, it is the common one in the field.
    fn detect_generation(&mut self) -> Result<FirmwareGeneration, Error> {
        match self.send_with(&GetConnectionStatus, STATE_GPRS_ACTIVE, STATUS_ATTEMPTS) {
            Ok(()) => return Ok(FirmwareGeneration::Legacy),
            Err(Error::Exhausted) => {}
            Err(e) => return Err(e),
        }

        match self.send_with(&GetConnectionStatus, STATE_START, STATUS_ATTEMPTS) {
            Ok(()) => {
                self.send_attempts(&BringUpWireless, ATTACH_ATTEMPTS)?;
                self.clock.wait(module_timing::wireless_bring_up_time());
                Ok(FirmwareGeneration::Current)
            }
            Err(Error::Exhausted) => {
                warn!("Unrecognized IP stack state");
                Ok(FirmwareGeneration::Unknown)
            }
            Err(e) => Err(e),
        }
    }
}
