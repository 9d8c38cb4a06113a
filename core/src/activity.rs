//! Activity records written when a scan hears something.
//!
//! Where records end up is the caller's business; the engine only calls
//! [`ActivityLog::write`] per detection and [`ActivityLog::close`] once the
//! run ends.

use rigscan_common::Modulation;
use tracing::info;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Bookmark,
    Frequency,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Bookmark => "bookmark",
            RecordKind::Frequency => "frequency",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityRecord {
    pub kind: RecordKind,
    pub frequency: u64,
    pub modulation: Modulation,
    /// Bookmark description, absent for sweep hits.
    pub description: Option<String>,
    /// Last sampled level, in tenths of dBFS.
    pub level: i64,
}

pub trait ActivityLog {
    fn write(&mut self, record: &ActivityRecord) -> anyhow::Result<()>;

    fn close(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
}

/// Emits every record as an `info` event on the `rigscan::activity` target.
#[derive(Debug, Default)]
pub struct TracingActivityLog {
    written: usize,
}

impl TracingActivityLog {
    pub fn written(&self) -> usize {
        self.written
    }
}

impl ActivityLog for TracingActivityLog {
    fn write(&mut self, record: &ActivityRecord) -> anyhow::Result<()> {
        self.written += 1;
        info!(
            target: "rigscan::activity",
            kind = record.kind.as_str(),
            frequency = record.frequency,
            modulation = %record.modulation,
            level = record.level,
            "activity on {} Hz {}{}",
            rigscan_common::channel::group_thousands(record.frequency),
            record.modulation,
            record
                .description
                .as_deref()
                .map(|desc| format!(" ({desc})"))
                .unwrap_or_default(),
        );
        Ok(())
    }
}
