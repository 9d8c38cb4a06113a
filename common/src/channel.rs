//! # Channel Model
//!
//! A [`Channel`] is a tunable `(frequency, modulation)` pair. It is the smallest
//! thing the scan engine can tune a rig to, and the payload of every bookmark.

use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;

/// Demodulation modes a rig can be asked to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modulation {
    Am,
    Fm,
    Wfm,
    WfmStereo,
    WfmStereoOirt,
    Lsb,
    Usb,
    Cw,
    CwLower,
    CwUpper,
}

impl Modulation {
    pub const ALL: [Modulation; 10] = [
        Modulation::Am,
        Modulation::Fm,
        Modulation::Wfm,
        Modulation::WfmStereo,
        Modulation::WfmStereoOirt,
        Modulation::Lsb,
        Modulation::Usb,
        Modulation::Cw,
        Modulation::CwLower,
        Modulation::CwUpper,
    ];

    /// Canonical protocol token, as rigs send and expect it.
    pub fn as_str(&self) -> &'static str {
        match self {
            Modulation::Am => "AM",
            Modulation::Fm => "FM",
            Modulation::Wfm => "WFM",
            Modulation::WfmStereo => "WFM_ST",
            Modulation::WfmStereoOirt => "WFM_ST_OIRT",
            Modulation::Lsb => "LSB",
            Modulation::Usb => "USB",
            Modulation::Cw => "CW",
            Modulation::CwLower => "CWL",
            Modulation::CwUpper => "CWU",
        }
    }
}

impl FromStr for Modulation {
    type Err = ValidationError;

    /// Case-insensitive, surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper: String = s.trim().to_ascii_uppercase();
        Modulation::ALL
            .into_iter()
            .find(|modulation| modulation.as_str() == upper)
            .ok_or_else(|| ValidationError::UnsupportedModulation(s.to_string()))
    }
}

impl fmt::Display for Modulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Channel {
    frequency: u64,
    modulation: Modulation,
}

impl Channel {
    pub fn new(frequency: u64, modulation: Modulation) -> Result<Self, ValidationError> {
        if frequency == 0 {
            return Err(ValidationError::InvalidFrequency(frequency.to_string()));
        }
        Ok(Self {
            frequency,
            modulation,
        })
    }

    /// Builds a channel from user-entered text.
    ///
    /// The frequency may carry thousands separators (`145,500,000`).
    pub fn parse(frequency: &str, modulation: &str) -> Result<Self, ValidationError> {
        let frequency: u64 = parse_frequency(frequency)?;
        let modulation: Modulation = modulation.parse()?;
        Self::new(frequency, modulation)
    }

    pub fn frequency(&self) -> u64 {
        self.frequency
    }

    pub fn modulation(&self) -> Modulation {
        self.modulation
    }

    /// Frequency grouped in thousands, e.g. `145,500,000`.
    pub fn display_string(&self) -> String {
        group_thousands(self.frequency)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz {}", self.display_string(), self.modulation)
    }
}

fn parse_frequency(raw: &str) -> Result<u64, ValidationError> {
    let digits: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();

    digits
        .parse::<u64>()
        .map_err(|_| ValidationError::InvalidFrequency(raw.to_string()))
}

pub fn group_thousands(value: u64) -> String {
    let digits: String = value.to_string();
    let mut grouped: String = String::with_capacity(digits.len() + digits.len() / 3);

    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
