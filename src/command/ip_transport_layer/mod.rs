//! ### Internet protocol transport layer
//!
//! The A6 runs a single-connection TCP/IP stack driven by the `+CIP*` family.
//! Connection state is reported as plain text (`IP INITIAL`, `IP START`,
//! `IP GPRSACT`, ...) rather than through a numeric status.

use super::NoResponse;
use atat::atat_derive::AtatCmd;

/// Connection mode argument of [`StartConnection`] for TCP.
pub const MODE_TCP: &str = "TCP";

/// Query current connection status +CIPSTATUS
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSTATUS", NoResponse)]
pub struct GetConnectionStatus;

/// Start task and set APN, user name and password +CSTT
#[derive(Clone, AtatCmd)]
#[at_cmd("+CSTT", NoResponse)]
pub struct StartTask<'a> {
    #[at_arg(position = 0, len = 64)]
    pub apn: &'a str,
    #[at_arg(position = 1, len = 32)]
    pub username: &'a str,
    #[at_arg(position = 2, len = 32)]
    pub password: &'a str,
}

/// Bring up wireless connection with GPRS +CIICR
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIICR", NoResponse)]
pub struct BringUpWireless;

/// Get local IP address +CIFSR
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIFSR", NoResponse)]
pub struct GetLocalAddress;

/// Start up a connection +CIPSTART
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSTART", NoResponse)]
pub struct StartConnection<'a> {
    #[at_arg(position = 0, len = 3)]
    pub mode: &'a str,
    #[at_arg(position = 1, len = 64)]
    pub server: &'a str,
    #[at_arg(position = 2)]
    pub port: u16,
}

/// Send data through the connection +CIPSEND
///
/// Without arguments the modem opens the `>` prompt; data ends with Ctrl-Z.
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPSEND", NoResponse)]
pub struct SendData;

/// Close the connection +CIPCLOSE
#[derive(Clone, AtatCmd)]
#[at_cmd("+CIPCLOSE", NoResponse)]
pub struct CloseConnection;
