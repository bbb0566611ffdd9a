//! ### Network service

use super::NoResponse;
use atat::atat_derive::AtatCmd;

/// Network registration status +CREG
///
/// The read form answers `+CREG: <n>,<stat>`. The driver enables the URC mode
/// (`<n>` = 1) implicitly; `<stat>` 1 is home and 5 is roaming.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CREG?", NoResponse)]
pub struct GetNetworkRegistrationStatus;
