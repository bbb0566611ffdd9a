//! Argument types used by the SMS commands

use atat::atat_derive::AtatEnum;

#[derive(Clone, PartialEq, Eq, AtatEnum)]
pub enum MessageFormat {
    Pdu = 0,
    Text = 1,
}

#[derive(Clone, PartialEq, Eq, AtatEnum)]
pub enum TextModeParameters {
    Hide = 0,
    Show = 1,
}

#[derive(Clone, PartialEq, Eq, AtatEnum)]
pub enum DeleteFlag {
    /// Delete the message at the given index
    Single = 0,
    /// Delete all read messages
    Read = 1,
    /// Delete all read and sent messages
    ReadAndSent = 2,
    /// Delete all read, sent and unsent messages
    ReadSentAndUnsent = 3,
    /// Delete every message in storage
    All = 4,
}
