/// Errors surfaced by every driver operation.
///
/// The modem reports three severities on the wire. `Fatal` is never retried,
/// soft failures are retried until the attempt budget runs out and then
/// surface as [`Error::Exhausted`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Error {
    // Classification results
    /// The modem answered with `FATAL ERROR`.
    Fatal,
    /// Every attempt ended in a recoverable failure or a soft timeout.
    Exhausted,
    /// A decoder saw neither a value nor a terminal phrase on any attempt.
    NoResponse,

    // Decoding errors
    /// A measurement outside every known band, e.g. `+CSQ: 45,0`.
    Unmapped(u8),
    /// The reply was recognized but its fields could not be extracted.
    MalformedResponse,
    /// `+CMGR` answered `OK` without a record: the storage slot is empty.
    NoMessage,
    /// [`crate::MessageCursor::next`] called before `start`.
    CursorNotStarted,

    // Bring-up and network errors
    /// No two consecutive acknowledgements during synchronization.
    NotSynchronized,
    /// The baud rate sweep found no speed the modem answers at.
    BaudDetection,
    /// The modem never reported a home or roaming registration.
    NetworkUnreachable,
    /// Network provider id outside the APN table.
    UnknownProvider(u8),

    // Generic
    /// The formatted command does not fit the command scratch buffer.
    CommandTooLong,
    /// The serial transport failed a read, write or flush.
    Io,
}

#[cfg(feature = "defmt")]
impl defmt::Format for Error {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            Self::Fatal => defmt::write!(f, "Fatal"),
            Self::Exhausted => defmt::write!(f, "Exhausted"),
            Self::NoResponse => defmt::write!(f, "NoResponse"),
            Self::Unmapped(v) => defmt::write!(f, "Unmapped({})", v),
            Self::MalformedResponse => defmt::write!(f, "MalformedResponse"),
            Self::NoMessage => defmt::write!(f, "NoMessage"),
            Self::CursorNotStarted => defmt::write!(f, "CursorNotStarted"),
            Self::NotSynchronized => defmt::write!(f, "NotSynchronized"),
            Self::BaudDetection => defmt::write!(f, "BaudDetection"),
            Self::NetworkUnreachable => defmt::write!(f, "NetworkUnreachable"),
            Self::UnknownProvider(id) => defmt::write!(f, "UnknownProvider({})", id),
            Self::CommandTooLong => defmt::write!(f, "CommandTooLong"),
            Self::Io => defmt::write!(f, "Io"),
        }
    }
}
