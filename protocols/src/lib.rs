//! Line-oriented rig control protocol.
//!
//! Requests are encoded by [`command`], replies are validated and decoded by
//! [`response`]. Nothing in this crate touches a socket.

pub mod command;
pub mod error;
pub mod response;

pub use command::{Command, Func, Parm, ParmValue, ResetKind, Vfo};
pub use error::ProtocolError;
