//! ### Mobile equipment control and status

use super::NoResponse;
use atat::atat_derive::AtatCmd;

/// Signal quality +CSQ
///
/// Answers `+CSQ: <rssi>,<ber>` followed by `OK`. `<rssi>` is `0..=31` or
/// `99` when not known, `<ber>` is `0..=7` or `99`.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CSQ", NoResponse)]
pub struct GetSignalQuality;
