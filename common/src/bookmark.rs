//! # Bookmark Model
//!
//! A bookmark is a named, lockable channel. Bookmarks are loaded by the
//! controller for bookmark-walk scans and synthesized by the scan engine when
//! auto-bookmarking a frequency sweep.
//!
//! Two bookmarks are equal when their channels are equal. Description, lockout
//! and identity do not take part, which is what deduplication relies on.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use uuid::Uuid;

use crate::channel::Channel;
use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lockout {
    #[default]
    Unset,
    /// Skipped by bookmark scans.
    Locked,
    Open,
    Cleared,
}

impl Lockout {
    pub fn as_str(&self) -> &'static str {
        match self {
            Lockout::Unset => "",
            Lockout::Locked => "L",
            Lockout::Open => "O",
            Lockout::Cleared => "0",
        }
    }

    pub fn is_locked(&self) -> bool {
        matches!(self, Lockout::Locked)
    }
}

impl FromStr for Lockout {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" => Ok(Lockout::Unset),
            "L" => Ok(Lockout::Locked),
            "O" => Ok(Lockout::Open),
            "0" => Ok(Lockout::Cleared),
            other => Err(ValidationError::InvalidLockout(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Bookmark {
    channel: Channel,
    description: String,
    lockout: Lockout,
    id: Uuid,
}

impl Bookmark {
    pub fn new(
        channel: Channel,
        description: impl Into<String>,
        lockout: Lockout,
    ) -> Result<Self, ValidationError> {
        let description: String = description.into();
        if description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        Ok(Self {
            channel,
            description,
            lockout,
            id: Uuid::new_v4(),
        })
    }

    /// Factory for raw text tuples, as they arrive from bookmark files or the
    /// command line.
    pub fn from_raw(
        frequency: &str,
        modulation: &str,
        description: &str,
        lockout: &str,
    ) -> Result<Self, ValidationError> {
        let channel: Channel = Channel::parse(frequency, modulation)?;
        let lockout: Lockout = lockout.parse()?;
        Self::new(channel, description, lockout)
    }

    pub fn channel(&self) -> &Channel {
        &self.channel
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn lockout(&self) -> Lockout {
        self.lockout
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn is_locked(&self) -> bool {
        self.lockout.is_locked()
    }
}

impl PartialEq for Bookmark {
    fn eq(&self, other: &Self) -> bool {
        self.channel == other.channel
    }
}

impl Eq for Bookmark {}

impl Hash for Bookmark {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.channel.hash(state);
    }
}

impl fmt::Display for Bookmark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.description, self.channel)
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
    use crate::channel::Modulation;
    use std::collections::HashSet;

    #[test]
    fn equality_ignores_description_and_lockout() {
        let first: Bookmark = Bookmark::from_raw("145500000", "FM", "Repeater", "").unwrap();
        let second: Bookmark = Bookmark::from_raw("145,500,000", "fm", "Other name", "L").unwrap();

        assert_ne!(first.id(), second.id());
        assert_eq!(first, second);

        let mut set: HashSet<Bookmark> = HashSet::new();
        set.insert(first);
        assert!(!set.insert(second), "equal bookmarks should hash the same");
    }

    #[test]
    fn equality_depends_on_modulation() {
        let fm: Bookmark = Bookmark::from_raw("145500000", "FM", "a", "").unwrap();
        let am: Bookmark = Bookmark::from_raw("145500000", "AM", "a", "").unwrap();
        assert_ne!(fm, am);
    }

    #[test]
    fn from_raw_should_fail_on_empty_description() {
        let result = Bookmark::from_raw("145500000", "FM", "   ", "");
        assert_eq!(result.unwrap_err(), ValidationError::EmptyDescription);
    }

    #[test]
    fn from_raw_should_fail_on_unknown_lockout() {
        let result = Bookmark::from_raw("145500000", "FM", "desc", "X");
        assert_eq!(result.unwrap_err(), ValidationError::InvalidLockout("X".into()));
    }

    #[test]
    fn test_lockout_values() {
        assert_eq!("".parse::<Lockout>(), Ok(Lockout::Unset));
        assert_eq!("L".parse::<Lockout>(), Ok(Lockout::Locked));
        assert_eq!("O".parse::<Lockout>(), Ok(Lockout::Open));
        assert_eq!("0".parse::<Lockout>(), Ok(Lockout::Cleared));
        assert!(Lockout::Locked.is_locked());
        assert!(!Lockout::Open.is_locked());
    }

    #[test]
    fn new_keeps_channel() {
        let channel: Channel = Channel::new(7_074_000, Modulation::Usb).unwrap();
        let bookmark: Bookmark = Bookmark::new(channel, "FT8", Lockout::Unset).unwrap();
        assert_eq!(bookmark.channel().frequency(), 7_074_000);
        assert_eq!(bookmark.description(), "FT8");
        assert_eq!(bookmark.lockout().as_str(), "");
    }
}
