//! Single TCP connection through the module's internal IP stack.
//!
//! Data is written in the `+CIPSEND` prompt and sent when the prompt is
//! closed with Ctrl-Z. Nothing received from the server is returned.

use embedded_io::{Read, ReadReady, Write};

use crate::{
    classifier::{Outcome, OK},
    client::Modem,
    command::ip_transport_layer::{CloseConnection, SendData, StartConnection, MODE_TCP},
    error::Error,
    module_timing,
    observer::Observer,
    transport::Clock,
};

pub const HTTP_PORT: u16 = 80;

const MAX_SERVER_LEN: usize = 64;
const PROMPT: &str = ">";
const END_OF_DATA: &[u8] = &[0x1a];

impl<T, C, O> Modem<T, C, O>
where
    T: Read + ReadReady + Write,
    C: Clock,
    O: Observer,
{
    /// Connect to `server` and open the send prompt.
    ///
    /// `server` is a host name or an IP address.
    pub fn start_tcp_connection(&mut self, server: &str, port: u16) -> Result<(), Error> {
        if server.len() > MAX_SERVER_LEN {
            return Err(Error::CommandTooLong);
        }

        self.send(&StartConnection {
            mode: MODE_TCP,
            server,
            port,
        })?;
        self.clock.wait(module_timing::tcp_open_time());

        let attempts = self.config.attempts;
        self.send_with(&SendData, PROMPT, attempts)
    }

    /// Write payload into an open send prompt.
    pub fn write_tcp_data(&mut self, data: &[u8]) -> Result<(), Error> {
        self.write_raw(data)
    }

    /// Send everything written since [`Modem::start_tcp_connection`] and
    /// close the connection.
    pub fn close_tcp_connection(&mut self) -> Result<(), Error> {
        self.write_raw(END_OF_DATA)?;
        let timeout = self.config.command_timeout;
        match self.wait_for(OK, timeout)? {
            Outcome::Fatal => return Err(Error::Fatal),
            Outcome::Recoverable => warn!("Data not acknowledged"),
            Outcome::Matched => {}
        }

        self.send(&CloseConnection)
    }

    /// Fire a `GET` request for `resource` on `server`, port 80.
    ///
    /// The response body is not read.
    pub fn http_get(&mut self, server: &str, resource: &str) -> Result<(), Error> {
        self.start_tcp_connection(server, HTTP_PORT)?;

        for part in [
            "GET ",
            resource,
            " HTTP/1.1\r\nHost: ",
            server,
            "\r\nConnection: close\r\n\r\n",
        ] {
            self.write_tcp_data(part.as_bytes())?;
        }

        self.close_tcp_connection()
    }
}
