//! ### V.25ter control
//!
//! Profile, echo and error reporting settings applied during bring-up.
pub mod types;

use super::NoResponse;
use atat::atat_derive::AtatCmd;
use types::{Echo, TerminationErrorMode};

/// Set to factory defined configuration &F
///
/// Restores profile 0 of the factory settings. The A6 answers `OK` before the
/// profile is fully loaded.
#[derive(Clone, AtatCmd)]
#[at_cmd("&F0", NoResponse)]
pub struct FactoryResetConfig;

/// Command echo E
#[derive(Clone, AtatCmd)]
#[at_cmd("E", NoResponse, value_sep = false)]
pub struct SetEcho {
    #[at_arg(position = 0)]
    pub enabled: Echo,
}

/// Report mobile termination error +CMEE
///
/// With [`TerminationErrorMode::Verbose`] the A6 reports the textual phrases
/// (`Unknown error`, `invalid command line`, ...) the driver classifies.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CMEE", NoResponse)]
pub struct SetReportMobileTerminationError {
    #[at_arg(position = 0)]
    pub n: TerminationErrorMode,
}
