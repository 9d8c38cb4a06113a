//! Request side of the rig control protocol.
//!
//! Every request is one ASCII line: a command token, optionally followed by
//! space separated arguments. Arguments are validated when the typed
//! [`Command`] is built, so encoding itself cannot fail.

use std::fmt;
use std::str::FromStr;

use rigscan_common::Modulation;

use crate::error::ProtocolError;

macro_rules! allow_list {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $token:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $token),+
                }
            }
        }

        impl FromStr for $name {
            type Err = ProtocolError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim() {
                    $($token => Ok($name::$variant),)+
                    other => Err(ProtocolError::NotAllowed {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

allow_list!(
    /// VFO names understood by `V` / returned by `v`.
    Vfo {
        VfoA => "VFOA",
        VfoB => "VFOB",
        VfoC => "VFOC",
        Current => "currVFO",
        Vfo => "VFO",
        Memory => "MEM",
        Main => "Main",
        Sub => "Sub",
        Tx => "TX",
        Rx => "RX",
    }
);

allow_list!(
    /// Rig functions toggled with `U` and queried with `u`.
    Func {
        Fagc => "FAGC",
        Nb => "NB",
        Comp => "COMP",
        Vox => "VOX",
        Tone => "TONE",
        Tsql => "TSQL",
        Sbkin => "SBKIN",
        Fbkin => "FBKIN",
        Anf => "ANF",
        Nr => "NR",
        Aip => "AIP",
        Apf => "APF",
        Mon => "MON",
        Mn => "MN",
        Rf => "RF",
        Aro => "ARO",
        Lock => "LOCK",
        Mute => "MUTE",
        Vsc => "VSC",
        Rev => "REV",
        Sql => "SQL",
        Abm => "ABM",
        Bc => "BC",
        Mbc => "MBC",
        Afc => "AFC",
        Satmode => "SATMODE",
        Scope => "SCOPE",
        Resume => "RESUME",
        Tburst => "TBURST",
        Tuner => "TUNER",
    }
);

allow_list!(
    /// Rig parameters set with `P` and queried with `p`.
    Parm {
        Ann => "ANN",
        Apo => "APO",
        Backlight => "BACKLIGHT",
        Beep => "BEEP",
        Time => "TIME",
        Bat => "BAT",
        Keylight => "KEYLIGHT",
    }
);

allow_list!(
    /// Reset levels accepted by `*`.
    ResetKind {
        None => "0",
        Software => "1",
        Vfo => "2",
        Memory => "4",
        Master => "8",
    }
);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetFrequency(u64),
    GetFrequency,
    SetMode(Modulation),
    GetMode,
    GetLevel,
    StartRecording,
    StopRecording,
    SetVfo(Vfo),
    GetVfo,
    SetRit(i32),
    GetRit,
    SetXit(i32),
    GetXit,
    SetSplitFrequency(u64),
    GetSplitFrequency,
    SetSplitMode(Modulation),
    GetSplitMode,
    SetFunc(Func, bool),
    GetFunc(Func),
    SetParm(Parm, ParmValue),
    GetParm(Parm),
    SetAntenna(u8),
    GetAntenna,
    Reset(ResetKind),
}

impl Command {
    /// Encodes the request line, including the trailing newline.
    pub fn to_line(&self) -> String {
        format!("{self}\n")
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::SetFrequency(hz) => write!(f, "F {hz}"),
            Command::GetFrequency => f.write_str("f"),
            Command::SetMode(mode) => write!(f, "M {mode}"),
            Command::GetMode => f.write_str("m"),
            Command::GetLevel => f.write_str("l"),
            Command::StartRecording => f.write_str("AOS"),
            Command::StopRecording => f.write_str("LOS"),
            Command::SetVfo(vfo) => write!(f, "V {vfo}"),
            Command::GetVfo => f.write_str("v"),
            Command::SetRit(hz) => write!(f, "J {hz}"),
            Command::GetRit => f.write_str("j"),
            Command::SetXit(hz) => write!(f, "Z {hz}"),
            Command::GetXit => f.write_str("z"),
            Command::SetSplitFrequency(hz) => write!(f, "I {hz}"),
            Command::GetSplitFrequency => f.write_str("i"),
            Command::SetSplitMode(mode) => write!(f, "X {mode}"),
            Command::GetSplitMode => f.write_str("x"),
            Command::SetFunc(func, on) => write!(f, "U {func} {}", u8::from(*on)),
            Command::GetFunc(func) => write!(f, "u {func}"),
            Command::SetParm(parm, value) => write!(f, "P {parm} {value}"),
            Command::GetParm(parm) => write!(f, "p {parm}"),
            Command::SetAntenna(antenna) => write!(f, "Y {antenna}"),
            Command::GetAntenna => f.write_str("y"),
            Command::Reset(kind) => write!(f, "* {kind}"),
        }
    }
}

/// A single whitespace-free token, so it cannot split or end the request line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParmValue(String);

impl FromStr for ParmValue {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: &str = s.trim();
        if value.is_empty() || !value.is_ascii() || value.chars().any(char::is_whitespace) {
            return Err(ProtocolError::InvalidArgument(format!(
                "parameter value '{s}' must be one ASCII token"
            )));
        }
        Ok(Self(value.to_string()))
    }
}

impl fmt::Display for ParmValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parses a user-supplied frequency argument in Hz.
pub fn parse_frequency_arg(raw: &str) -> Result<u64, ProtocolError> {
    match raw.trim().parse::<u64>() {
        Ok(hz) if hz > 0 => Ok(hz),
        _ => Err(ProtocolError::InvalidArgument(format!(
            "frequency '{raw}' is not a positive number of Hz"
        ))),
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
