//! Validation failures raised while building the value objects of this crate
//! and the scan configuration built on top of them.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("unsupported scan mode '{0}' (expected 'frequency' or 'bookmarks')")]
    InvalidScanMode(String),

    #[error("a bookmark scan needs at least one bookmark")]
    NoBookmarks,

    #[error("range_min ({min} Hz) must be lower than range_max ({max} Hz)")]
    InvalidRange { min: i64, max: i64 },

    #[error("port {0} is privileged, use a port above 1024")]
    PrivilegedPort(u16),

    #[error("hostname '{0}' could not be resolved")]
    UnresolvableHost(String),

    #[error("rig ordinal must be 1 or 2, got {0}")]
    InvalidOrdinal(u8),

    #[error("invalid frequency '{0}'")]
    InvalidFrequency(String),

    #[error("unsupported modulation '{0}'")]
    UnsupportedModulation(String),

    #[error("bookmark description cannot be empty")]
    EmptyDescription,

    #[error("invalid lockout value '{0}'")]
    InvalidLockout(String),
}
