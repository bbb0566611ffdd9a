//! AT commands understood by the AI-Thinker A6 module family.
//!
//! Replies are never parsed through `atat`: the driver classifies raw text
//! itself, so every command carries [`NoResponse`].

pub mod control;
pub mod ip_transport_layer;
pub mod mobile_control;
pub mod network_service;
pub mod psn;
pub mod sms;

use atat::atat_derive::{AtatCmd, AtatResp};

#[derive(Clone, AtatResp)]
pub struct NoResponse;

/// Bare attention probe, used for synchronization and resynchronization.
#[derive(Clone, AtatCmd)]
#[at_cmd("", NoResponse)]
pub struct AT;
