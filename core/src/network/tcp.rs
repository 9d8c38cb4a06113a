//! Request/response client for the line-oriented rig control protocol.
//!
//! Every exchange opens a fresh TCP connection, writes one request line, reads
//! one reply line and closes the connection. The client keeps no state beyond
//! its target, so it never has a session to lose or to share.

use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{SocketAddr, TcpStream};
use std::time::Duration;

use rigscan_common::{Modulation, RigEndpoint};
use rigscan_protocols::command::{Command, Func, Parm, ParmValue, ResetKind, Vfo};
use rigscan_protocols::response;
use tracing::trace;

use crate::rig::{RigControl, RigError};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Clone)]
pub struct RigClient {
    endpoint: RigEndpoint,
    timeout: Duration,
}

impl RigClient {
    pub fn new(endpoint: RigEndpoint) -> Self {
        Self {
            endpoint,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Bounds connecting, writing and reading separately.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &RigEndpoint {
        &self.endpoint
    }

    /// Sends one raw request line and returns the reply with its line ending
    /// stripped.
    pub fn send(&self, command_line: &str) -> Result<String, RigError> {
        self.exchange(&format!("{command_line}\n"))
    }

    /// `line` must carry its own newline.
    fn exchange(&self, line: &str) -> Result<String, RigError> {
        let mut stream: TcpStream = self.connect()?;
        let io_err = |source: std::io::Error| RigError::Io {
            target: self.target(),
            source,
        };

        stream.set_read_timeout(Some(self.timeout)).map_err(io_err)?;
        stream.set_write_timeout(Some(self.timeout)).map_err(io_err)?;

        trace!("{} <- {:?}", self.endpoint, line.trim_end());
        stream.write_all(line.as_bytes()).map_err(io_err)?;

        let mut reply: String = String::new();
        let read: usize = BufReader::new(&stream)
            .read_line(&mut reply)
            .map_err(io_err)?;
        if read == 0 {
            return Err(io_err(std::io::Error::new(
                ErrorKind::UnexpectedEof,
                "connection closed before a reply was sent",
            )));
        }

        let reply: String = reply.trim_end_matches(['\r', '\n']).to_string();
        trace!("{} -> {reply:?}", self.endpoint);
        Ok(reply)
    }

    fn connect(&self) -> Result<TcpStream, RigError> {
        let conn_err = |source: std::io::Error| RigError::Connection {
            target: self.target(),
            source,
        };

        let addrs: Vec<SocketAddr> = self.endpoint.socket_addrs().map_err(conn_err)?;
        let mut last_err: std::io::Error =
            std::io::Error::new(ErrorKind::NotFound, "hostname resolved to no address");

        for addr in addrs {
            match TcpStream::connect_timeout(&addr, self.timeout) {
                Ok(stream) => return Ok(stream),
                Err(e) => last_err = e,
            }
        }
        Err(conn_err(last_err))
    }

    fn target(&self) -> String {
        format!("{}:{}", self.endpoint.hostname(), self.endpoint.port())
    }

    fn query(&self, command: &Command) -> Result<String, RigError> {
        self.exchange(&command.to_line())
    }

    fn execute(&self, command: Command) -> Result<(), RigError> {
        let reply: String = self.query(&command)?;
        response::parse_ack(&command, &reply)?;
        Ok(())
    }

    pub fn set_vfo(&self, vfo: Vfo) -> Result<(), RigError> {
        self.execute(Command::SetVfo(vfo))
    }

    pub fn get_vfo(&self) -> Result<Vfo, RigError> {
        let command: Command = Command::GetVfo;
        let text: String = response::parse_text(&command, &self.query(&command)?)?;
        Ok(text.parse::<Vfo>()?)
    }

    pub fn set_rit(&self, hz: i32) -> Result<(), RigError> {
        self.execute(Command::SetRit(hz))
    }

    pub fn get_rit(&self) -> Result<i64, RigError> {
        let command: Command = Command::GetRit;
        Ok(response::parse_int(&command, &self.query(&command)?)?)
    }

    pub fn set_xit(&self, hz: i32) -> Result<(), RigError> {
        self.execute(Command::SetXit(hz))
    }

    pub fn get_xit(&self) -> Result<i64, RigError> {
        let command: Command = Command::GetXit;
        Ok(response::parse_int(&command, &self.query(&command)?)?)
    }

    pub fn set_split_frequency(&self, hz: u64) -> Result<(), RigError> {
        self.execute(Command::SetSplitFrequency(hz))
    }

    pub fn get_split_frequency(&self) -> Result<u64, RigError> {
        let command: Command = Command::GetSplitFrequency;
        Ok(response::parse_frequency(&command, &self.query(&command)?)?)
    }

    pub fn set_split_mode(&self, mode: Modulation) -> Result<(), RigError> {
        self.execute(Command::SetSplitMode(mode))
    }

    pub fn get_split_mode(&self) -> Result<Modulation, RigError> {
        let command: Command = Command::GetSplitMode;
        Ok(response::parse_mode(&command, &self.query(&command)?)?)
    }

    pub fn set_func(&self, func: Func, enabled: bool) -> Result<(), RigError> {
        self.execute(Command::SetFunc(func, enabled))
    }

    pub fn get_func(&self, func: Func) -> Result<bool, RigError> {
        let command: Command = Command::GetFunc(func);
        Ok(response::parse_bool(&command, &self.query(&command)?)?)
    }

    pub fn set_parm(&self, parm: Parm, value: ParmValue) -> Result<(), RigError> {
        self.execute(Command::SetParm(parm, value))
    }

    pub fn get_parm(&self, parm: Parm) -> Result<String, RigError> {
        let command: Command = Command::GetParm(parm);
        Ok(response::parse_text(&command, &self.query(&command)?)?)
    }

    pub fn set_antenna(&self, antenna: u8) -> Result<(), RigError> {
        self.execute(Command::SetAntenna(antenna))
    }

    pub fn get_antenna(&self) -> Result<i64, RigError> {
        let command: Command = Command::GetAntenna;
        Ok(response::parse_int(&command, &self.query(&command)?)?)
    }

    pub fn reset(&self, kind: ResetKind) -> Result<(), RigError> {
        self.execute(Command::Reset(kind))
    }
}

impl RigControl for RigClient {
    fn set_frequency(&self, hz: u64) -> Result<(), RigError> {
        self.execute(Command::SetFrequency(hz))
    }

    fn get_frequency(&self) -> Result<u64, RigError> {
        let command: Command = Command::GetFrequency;
        Ok(response::parse_frequency(&command, &self.query(&command)?)?)
    }

    fn set_mode(&self, mode: Modulation) -> Result<(), RigError> {
        self.execute(Command::SetMode(mode))
    }

    fn get_mode(&self) -> Result<Modulation, RigError> {
        let command: Command = Command::GetMode;
        Ok(response::parse_mode(&command, &self.query(&command)?)?)
    }

    fn get_level(&self) -> Result<i64, RigError> {
        let command: Command = Command::GetLevel;
        Ok(response::parse_level(&command, &self.query(&command)?)?)
    }

    fn start_recording(&self) -> Result<(), RigError> {
        self.execute(Command::StartRecording)
    }

    fn stop_recording(&self) -> Result<(), RigError> {
        self.execute(Command::StopRecording)
    }
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝

#[cfg(test)]
mod tests {
    use super::*;
    use rigscan_protocols::ProtocolError;
    use std::net::TcpListener;
    use std::thread::{self, JoinHandle};

    /// Answers `replies.len()` connections in order and returns the request
    /// lines it received.
    fn canned_rig(replies: Vec<&'static str>) -> (RigClient, JoinHandle<Vec<String>>) {
        let listener: TcpListener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port: u16 = listener.local_addr().unwrap().port();

        let handle = thread::spawn(move || {
            let mut requests: Vec<String> = Vec::new();
            for reply in replies {
                let (mut stream, _) = listener.accept().unwrap();
                let mut line: String = String::new();
                BufReader::new(&stream).read_line(&mut line).unwrap();
                requests.push(line);
                stream.write_all(reply.as_bytes()).unwrap();
            }
            requests
        });

        let endpoint: RigEndpoint = RigEndpoint::new("127.0.0.1", port, 1).unwrap();
        (RigClient::new(endpoint), handle)
    }

    #[test]
    fn send_should_write_one_line_per_connection() {
        let (client, server) = canned_rig(vec!["145500000\n", "RPRT 0\n"]);

        assert_eq!(client.get_frequency().unwrap(), 145_500_000);
        client.set_frequency(7_074_000).unwrap();

        let requests: Vec<String> = server.join().unwrap();
        assert_eq!(requests, vec!["f\n", "F 7074000\n"]);
    }

    #[test]
    fn scan_operations_decode_replies() {
        let (client, server) = canned_rig(vec!["-45.3\n", "USB\n", "RPRT 0\n", "RPRT 0\n"]);

        assert_eq!(client.get_level().unwrap(), -453);
        assert_eq!(client.get_mode().unwrap(), Modulation::Usb);
        client.start_recording().unwrap();
        client.stop_recording().unwrap();

        let requests: Vec<String> = server.join().unwrap();
        assert_eq!(requests, vec!["l\n", "m\n", "AOS\n", "LOS\n"]);
    }

    #[test]
    fn auxiliary_operations_validate_replies() {
        let (client, server) = canned_rig(vec!["VFOB\n", "1\n", "RPRT 0\n", "-200\n", "VFOZ\n"]);

        assert_eq!(client.get_vfo().unwrap(), Vfo::VfoB);
        assert!(client.get_func(Func::Nb).unwrap());
        client.reset(ResetKind::Software).unwrap();
        assert_eq!(client.get_rit().unwrap(), -200);
        assert!(matches!(
            client.get_vfo(),
            Err(RigError::Protocol(ProtocolError::NotAllowed { .. }))
        ));

        let requests: Vec<String> = server.join().unwrap();
        assert_eq!(requests[1], "u NB\n");
        assert_eq!(requests[2], "* 1\n");
    }

    #[test]
    fn malformed_reply_is_a_protocol_error() {
        let (client, server) = canned_rig(vec!["loud\n", "RPRT -1\n"]);

        assert!(matches!(client.get_level(), Err(RigError::Protocol(_))));
        assert!(matches!(
            client.set_mode(Modulation::Am),
            Err(RigError::Protocol(ProtocolError::Rejected { code: -1, .. }))
        ));
        server.join().unwrap();
    }

    #[test]
    fn refused_connection_is_a_connection_error() {
        let listener: TcpListener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port: u16 = listener.local_addr().unwrap().port();
        drop(listener);

        let endpoint: RigEndpoint = RigEndpoint::new("127.0.0.1", port, 2).unwrap();
        let client: RigClient = RigClient::new(endpoint).with_timeout(Duration::from_millis(200));

        assert!(matches!(
            client.set_frequency(100_000),
            Err(RigError::Connection { .. })
        ));
    }

    #[test]
    fn send_appends_the_newline() {
        let (client, server) = canned_rig(vec!["RPRT 0\n"]);

        assert_eq!(client.send("F 7074000").unwrap(), "RPRT 0");

        let requests: Vec<String> = server.join().unwrap();
        assert_eq!(requests, vec!["F 7074000\n"]);
    }

    #[test]
    fn closed_connection_without_reply_is_an_io_error() {
        let (client, server) = canned_rig(vec![""]);
        assert!(matches!(client.get_frequency(), Err(RigError::Io { .. })));
        server.join().unwrap();
    }
}
