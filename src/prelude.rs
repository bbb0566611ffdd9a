//! Prelude - Include traits
pub use crate::observer::Observer;
pub use crate::transport::{BaudRateControl, Clock};
pub use embedded_io::{Read, ReadReady, Write};
