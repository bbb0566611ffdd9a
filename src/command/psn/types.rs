//! Argument types used by the packet switched data commands

use atat::atat_derive::AtatEnum;

#[derive(Clone, PartialEq, Eq, AtatEnum)]
pub enum GPRSAttachedState {
    Detached = 0,
    Attached = 1,
}

#[derive(Clone, PartialEq, Eq, AtatEnum)]
pub enum PDPContextStatus {
    Deactivated = 0,
    Activated = 1,
}
