//! # Rig Endpoint
//!
//! Connection target of one of the (at most two) configured rigs.

use std::fmt;
use std::net::{SocketAddr, ToSocketAddrs};

use tracing::debug;
use uuid::Uuid;

use crate::error::ValidationError;

const MIN_UNPRIVILEGED_PORT: u16 = 1025;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RigEndpoint {
    hostname: String,
    port: u16,
    id: Uuid,
    ordinal: u8,
}

impl RigEndpoint {
    /// Validates every field: the port must be unprivileged, the hostname must
    /// resolve and the ordinal must name rig 1 or rig 2.
    pub fn new(hostname: &str, port: u16, ordinal: u8) -> Result<Self, ValidationError> {
        if !matches!(ordinal, 1 | 2) {
            return Err(ValidationError::InvalidOrdinal(ordinal));
        }
        check_port(port)?;
        check_hostname(hostname, port)?;

        Ok(Self {
            hostname: hostname.to_string(),
            port,
            id: Uuid::new_v4(),
            ordinal,
        })
    }

    pub fn hostname(&self) -> &str {
        &self.hostname
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn ordinal(&self) -> u8 {
        self.ordinal
    }

    pub fn set_port(&mut self, port: u16) -> Result<(), ValidationError> {
        check_port(port)?;
        self.port = port;
        Ok(())
    }

    pub fn set_hostname(&mut self, hostname: &str) -> Result<(), ValidationError> {
        check_hostname(hostname, self.port)?;
        self.hostname = hostname.to_string();
        Ok(())
    }

    /// Resolves the endpoint again; addresses may change between calls.
    pub fn socket_addrs(&self) -> std::io::Result<Vec<SocketAddr>> {
        Ok((self.hostname.as_str(), self.port).to_socket_addrs()?.collect())
    }
}

impl fmt::Display for RigEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rig {} @ {}:{}", self.ordinal, self.hostname, self.port)
    }
}

fn check_port(port: u16) -> Result<(), ValidationError> {
    if port < MIN_UNPRIVILEGED_PORT {
        return Err(ValidationError::PrivilegedPort(port));
    }
    Ok(())
}

fn check_hostname(hostname: &str, port: u16) -> Result<(), ValidationError> {
    let resolved: usize = (hostname, port)
        .to_socket_addrs()
        .map(|addrs| addrs.count())
        .unwrap_or(0);

    if resolved == 0 {
        return Err(ValidationError::UnresolvableHost(hostname.to_string()));
    }
    debug!("{hostname} resolved to {resolved} address(es)");
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
