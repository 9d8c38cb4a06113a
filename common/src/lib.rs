//! Value objects shared by every rigscan crate: rig endpoints, channels and
//! bookmarks, plus the validation errors raised while building them.

pub mod bookmark;
pub mod channel;
pub mod config;
pub mod endpoint;
pub mod error;

pub use bookmark::{Bookmark, Lockout};
pub use channel::{Channel, Modulation};
pub use endpoint::RigEndpoint;
pub use error::ValidationError;
