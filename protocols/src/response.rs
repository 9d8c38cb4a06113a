//! Response side of the rig control protocol.
//!
//! Each decoder checks the shape of the reply and reports a
//! [`ProtocolError::UnexpectedResponse`] naming the request it belonged to.

use rigscan_common::Modulation;

use crate::command::Command;
use crate::error::ProtocolError;

const ACK_PREFIX: &str = "RPRT";

fn unexpected(command: &Command, response: &str) -> ProtocolError {
    ProtocolError::UnexpectedResponse {
        command: command.to_string(),
        response: response.to_string(),
    }
}

fn first_line(response: &str) -> &str {
    response.lines().next().unwrap_or("").trim()
}

/// Setter acknowledgement: `RPRT 0` on success, `RPRT <code>` on failure.
pub fn parse_ack(command: &Command, response: &str) -> Result<(), ProtocolError> {
    let line: &str = first_line(response);
    let code: i32 = line
        .strip_prefix(ACK_PREFIX)
        .and_then(|code| code.trim().parse::<i32>().ok())
        .ok_or_else(|| unexpected(command, response))?;

    match code {
        0 => Ok(()),
        code => Err(ProtocolError::Rejected {
            command: command.to_string(),
            code,
        }),
    }
}

/// Frequencies come back as whole Hz, some rigs append a decimal part.
pub fn parse_frequency(command: &Command, response: &str) -> Result<u64, ProtocolError> {
    let line: &str = first_line(response);
    if let Ok(hz) = line.parse::<u64>() {
        return Ok(hz);
    }
    match line.parse::<f64>() {
        Ok(hz) if hz.is_finite() && hz >= 0.0 => Ok(hz.round() as u64),
        _ => Err(unexpected(command, response)),
    }
}

/// Older firmware replies with the mode alone, newer firmware appends the
/// passband on a second line. Only the first line names the mode.
pub fn parse_mode(command: &Command, response: &str) -> Result<Modulation, ProtocolError> {
    first_line(response)
        .parse::<Modulation>()
        .map_err(|_| unexpected(command, response))
}

/// Signal strength in tenths of the rig's dBFS reading (`-45.3` -> `-453`).
pub fn parse_level(command: &Command, response: &str) -> Result<i64, ProtocolError> {
    match first_line(response).parse::<f64>() {
        Ok(level) if level.is_finite() => Ok((level * 10.0).round() as i64),
        _ => Err(unexpected(command, response)),
    }
}

pub fn parse_int(command: &Command, response: &str) -> Result<i64, ProtocolError> {
    first_line(response)
        .parse::<i64>()
        .map_err(|_| unexpected(command, response))
}

pub fn parse_bool(command: &Command, response: &str) -> Result<bool, ProtocolError> {
    match first_line(response) {
        "0" => Ok(false),
        "1" => Ok(true),
        _ => Err(unexpected(command, response)),
    }
}

/// Free text replies must be non-empty printable ASCII.
pub fn parse_text(command: &Command, response: &str) -> Result<String, ProtocolError> {
    let line: &str = first_line(response);
    let printable: bool = line.chars().all(|c| c.is_ascii_graphic() || c == ' ');
    if line.is_empty() || !printable || line.starts_with(ACK_PREFIX) {
        return Err(unexpected(command, response));
    }
    Ok(line.to_string())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
