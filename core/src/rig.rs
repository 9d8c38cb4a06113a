//! The **abstraction** every engine talks to when it drives a rig.
//!
//! Engines depend on [`RigControl`] rather than on the TCP client, which keeps
//! them testable against in-process rigs and lets one engine drive any rig the
//! client can reach.

use std::sync::Arc;

use rigscan_common::Modulation;
use rigscan_protocols::ProtocolError;
use thiserror::Error;

/// Failures while exchanging a request with a rig.
///
/// Every variant is a communication failure from the scan engine's point of
/// view: none of them is retried at this layer.
#[derive(Error, Debug)]
pub enum RigError {
    #[error("could not connect to {target}: {source}")]
    Connection {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error("i/o failure talking to {target}: {source}")]
    Io {
        target: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}

/// The subset of rig operations scanning and mirroring need.
pub trait RigControl {
    fn set_frequency(&self, hz: u64) -> Result<(), RigError>;

    fn get_frequency(&self) -> Result<u64, RigError>;

    fn set_mode(&self, mode: Modulation) -> Result<(), RigError>;

    fn get_mode(&self) -> Result<Modulation, RigError>;

    /// Signal strength in tenths of the rig's dBFS reading.
    fn get_level(&self) -> Result<i64, RigError>;

    fn start_recording(&self) -> Result<(), RigError>;

    fn stop_recording(&self) -> Result<(), RigError>;
}

impl<T: RigControl + ?Sized> RigControl for Arc<T> {
    fn set_frequency(&self, hz: u64) -> Result<(), RigError> {
        (**self).set_frequency(hz)
    }

    fn get_frequency(&self) -> Result<u64, RigError> {
        (**self).get_frequency()
    }

    fn set_mode(&self, mode: Modulation) -> Result<(), RigError> {
        (**self).set_mode(mode)
    }

    fn get_mode(&self) -> Result<Modulation, RigError> {
        (**self).get_mode()
    }

    fn get_level(&self) -> Result<i64, RigError> {
        (**self).get_level()
    }

    fn start_recording(&self) -> Result<(), RigError> {
        (**self).start_recording()
    }

    fn stop_recording(&self) -> Result<(), RigError> {
        (**self).stop_recording()
    }
}
