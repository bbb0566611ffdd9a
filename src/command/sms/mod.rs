//! ### Short Messages Service

pub mod types;

use super::NoResponse;
use atat::atat_derive::AtatCmd;
use types::*;

/// Preferred message storage +CPMS
///
/// Selects the memories used for reading, writing and receiving. The A6 only
/// knows `"SM"` (SIM) and `"ME"` (module).
#[derive(Clone, AtatCmd)]
#[at_cmd("+CPMS", NoResponse)]
pub struct SetPreferredStorage<'a> {
    #[at_arg(position = 0, len = 2)]
    pub read: &'a str,
    #[at_arg(position = 1, len = 2)]
    pub write: &'a str,
    #[at_arg(position = 2, len = 2)]
    pub receive: &'a str,
}

/// Preferred message storage +CPMS
///
/// Answers `+CPMS: "<mem1>",<used1>,<total1>,...`.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CPMS?", NoResponse)]
pub struct GetPreferredStorage;

/// Message format +CMGF
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMGF", NoResponse)]
pub struct SetMessageFormat {
    #[at_arg(position = 0)]
    pub format: MessageFormat,
}

/// Show text mode parameters +CSDH
///
/// Adds address type, first octet, data coding and body length to the
/// `+CMGR` header in text mode.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CSDH", NoResponse)]
pub struct SetShowTextModeParameters {
    #[at_arg(position = 0)]
    pub show: TextModeParameters,
}

/// Read message +CMGR
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMGR", NoResponse)]
pub struct ReadMessage {
    #[at_arg(position = 0)]
    pub index: u8,
}

/// Delete message +CMGD
///
/// `index` is ignored by the modem for every flag but
/// [`DeleteFlag::Single`].
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMGD", NoResponse)]
pub struct DeleteMessage {
    #[at_arg(position = 0)]
    pub index: u8,
    #[at_arg(position = 1)]
    pub flag: DeleteFlag,
}

/// Send message +CMGS
///
/// The modem answers with the `>` text prompt; the body and a Ctrl-Z follow as
/// raw bytes.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMGS", NoResponse)]
pub struct SendMessage<'a> {
    #[at_arg(position = 0, len = 24)]
    pub number: &'a str,
}
