#![cfg_attr(not(test), no_std)]

//! # AI-Thinker A6
//!
//! Blocking driver for the AI-Thinker A6 GSM/GPRS module over its AT command
//! interface. It can be used both on `no_std` and `std` platforms.
//!
//! The driver talks to any serial port implementing the blocking
//! [`embedded_io`] traits and keeps time through the [`Clock`] trait. With the
//! `std` feature, [`SystemClock`] uses the embassy-time std driver.
//!
//! Every command is answered by one of three outcomes: matched, a soft error
//! that is retried, or `FATAL ERROR` which ends the call. Soft errors make the
//! driver send a bare `AT` so the module drops whatever it was doing.
//!
//! ## Example
//!
//! ```ignore
//! use gsm_a6::{Config, Modem, Provider, SystemClock};
//!
//! let mut modem = Modem::new(serial, SystemClock, Config::new());
//! modem.init()?;
//! modem.wait_for_network()?;
//! modem.set_mobile_network(Provider::GiffGaff)?;
//! modem.http_get("api.example.com", "/ping")?;
//! ```
//!
//! ### Logging
//!
//! Enable either the `log` or the `defmt` feature to get driver output.
//! Raw module replies go to an [`Observer`]; [`LogObserver`] forwards them to
//! the same logger.

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

mod autosense;
mod buffer;
mod classifier;
mod client;
pub mod command;
pub mod config;
pub mod error;
mod module_timing;
mod network;
mod observer;
mod registration;
mod signal;
pub mod sms;
mod tcp;
mod transport;

#[cfg(test)]
mod test_helpers;

pub use autosense::{BAUD_RATES, FALLBACK_BAUD_RATE};
pub use buffer::ReceiveBuffer;
pub use classifier::{classify, Outcome};
pub use client::Modem;
pub use config::{Apn, Config, Provider, SmsFormat};
pub use error::Error;
pub use network::FirmwareGeneration;
pub use observer::{LogObserver, NoopObserver, Observer};
pub use registration::RegistrationState;
pub use signal::{SignalQuality, NOT_KNOWN};
pub use sms::{MessageCursor, MessageStatus, SmsRecord};
pub use tcp::HTTP_PORT;
#[cfg(feature = "std")]
pub use transport::SystemClock;
pub use transport::{BaudRateControl, Clock};

// Re-export atat
pub use atat;

pub mod prelude;
