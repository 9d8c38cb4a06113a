//! Live scan parameters.
//!
//! The engine copies the tunable part of a [`ScanTask`] into [`ScanParams`]
//! and applies controller updates to that copy. The task itself never changes.

use std::time::Duration;

use thiserror::Error;

use crate::messenger::{ParamUpdate, UpdateValue};
use crate::task::{MAX_FREQUENCY, MIN_INTERVAL, ScanTask};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpdateError {
    #[error("update without a name or a value")]
    Malformed,

    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    #[error("invalid value {value} for '{name}'")]
    InvalidValue { name: String, value: UpdateValue },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanParams {
    pub range_min: u64,
    pub range_max: u64,
    pub interval: u64,
    pub delay: Duration,
    pub passes: u32,
    pub sgn_level: i64,
    pub wait: bool,
    pub record: bool,
    pub auto_bookmark: bool,
    pub log: bool,
}

impl From<&ScanTask> for ScanParams {
    fn from(task: &ScanTask) -> Self {
        Self {
            range_min: task.range_min(),
            range_max: task.range_max(),
            interval: task.interval(),
            delay: task.delay(),
            passes: task.passes(),
            sgn_level: task.sgn_level(),
            wait: task.wait(),
            record: task.record(),
            auto_bookmark: task.auto_bookmark(),
            log: task.log(),
        }
    }
}

impl ScanParams {
    /// Applies one update. Range bounds arrive in kHz and are stored in Hz.
    pub fn apply(&mut self, update: &ParamUpdate) -> Result<(), UpdateError> {
        let name: &str = update.name.trim();
        if name.is_empty() || update.value.is_empty() {
            return Err(UpdateError::Malformed);
        }

        let invalid = || UpdateError::InvalidValue {
            name: name.to_string(),
            value: update.value.clone(),
        };
        let int = || update.value.as_int().ok_or_else(invalid);
        let flag = || update.value.as_bool().ok_or_else(invalid);

        match name {
            "range_min" => self.range_min = khz_to_hz(int()?),
            "range_max" => self.range_max = khz_to_hz(int()?),
            "interval" => self.interval = int()?.max(MIN_INTERVAL) as u64,
            "delay" => {
                let seconds: u64 = u64::try_from(int()?).map_err(|_| invalid())?;
                self.delay = Duration::from_secs(seconds);
            }
            "passes" => self.passes = u32::try_from(int()?.max(1)).unwrap_or(u32::MAX),
            "sgn_level" => self.sgn_level = int()?,
            "wait" => self.wait = flag()?,
            "record" => self.record = flag()?,
            "auto_bookmark" => self.auto_bookmark = flag()?,
            "log" => self.log = flag()?,
            other => return Err(UpdateError::UnknownParameter(other.to_string())),
        }
        Ok(())
    }
}

fn khz_to_hz(khz: i64) -> u64 {
    khz.saturating_mul(1_000).clamp(0, MAX_FREQUENCY) as u64
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
