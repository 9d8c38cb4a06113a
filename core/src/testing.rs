//! In-process rig and activity log used by the engine tests.

use std::collections::VecDeque;
use std::io::{Error, ErrorKind};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use rigscan_common::Modulation;

use crate::activity::{ActivityLog, ActivityRecord};
use crate::rig::{RigControl, RigError};
use crate::scanner::ScanTimings;

pub const QUIET: i64 = -1_000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    SetFrequency(u64),
    GetFrequency,
    SetMode(Modulation),
    GetMode,
    GetLevel,
    StartRecording,
    StopRecording,
}

#[derive(Debug)]
pub struct MockRig {
    calls: Mutex<Vec<Call>>,
    levels: Mutex<VecDeque<i64>>,
    default_level: i64,
    fail_tune_at: Option<usize>,
    state: Mutex<(u64, Modulation)>,
}

impl MockRig {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            levels: Mutex::new(VecDeque::new()),
            default_level: QUIET,
            fail_tune_at: None,
            state: Mutex::new((100_000_000, Modulation::Fm)),
        }
    }

    /// Levels returned by successive `get_level` calls, then `default_level`.
    pub fn with_levels(self, levels: impl IntoIterator<Item = i64>) -> Self {
        *self.levels.lock().unwrap() = levels.into_iter().collect();
        self
    }

    pub fn with_default_level(mut self, level: i64) -> Self {
        self.default_level = level;
        self
    }

    /// The `nth` (1-based) `set_frequency` call fails with a refused connection.
    pub fn failing_tune(mut self, nth: usize) -> Self {
        self.fail_tune_at = Some(nth);
        self
    }

    pub fn with_state(self, frequency: u64, mode: Modulation) -> Self {
        *self.state.lock().unwrap() = (frequency, mode);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|call| predicate(call)).count()
    }

    pub fn tuned(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::SetFrequency(hz) => Some(hz),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: Call) -> usize {
        let mut calls = self.calls.lock().unwrap_or_else(PoisonError::into_inner);
        calls.push(call);
        calls.len()
    }
}

fn refused() -> RigError {
    RigError::Connection {
        target: "mock".to_string(),
        source: Error::new(ErrorKind::ConnectionRefused, "connection refused"),
    }
}

impl RigControl for MockRig {
    fn set_frequency(&self, hz: u64) -> Result<(), RigError> {
        self.record(Call::SetFrequency(hz));
        let attempts: usize = self.count(|call| matches!(call, Call::SetFrequency(_)));
        if self.fail_tune_at == Some(attempts) {
            return Err(refused());
        }
        self.state.lock().unwrap().0 = hz;
        Ok(())
    }

    fn get_frequency(&self) -> Result<u64, RigError> {
        self.record(Call::GetFrequency);
        Ok(self.state.lock().unwrap().0)
    }

    fn set_mode(&self, mode: Modulation) -> Result<(), RigError> {
        self.record(Call::SetMode(mode));
        self.state.lock().unwrap().1 = mode;
        Ok(())
    }

    fn get_mode(&self) -> Result<Modulation, RigError> {
        self.record(Call::GetMode);
        Ok(self.state.lock().unwrap().1)
    }

    fn get_level(&self) -> Result<i64, RigError> {
        self.record(Call::GetLevel);
        let next: Option<i64> = self.levels.lock().unwrap().pop_front();
        Ok(next.unwrap_or(self.default_level))
    }

    fn start_recording(&self) -> Result<(), RigError> {
        self.record(Call::StartRecording);
        Ok(())
    }

    fn stop_recording(&self) -> Result<(), RigError> {
        self.record(Call::StopRecording);
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingLog {
    pub records: Vec<ActivityRecord>,
    pub closed: bool,
}

impl ActivityLog for RecordingLog {
    fn write(&mut self, record: &ActivityRecord) -> anyhow::Result<()> {
        self.records.push(record.clone());
        Ok(())
    }

    fn close(&mut self) -> anyhow::Result<()> {
        self.closed = true;
        Ok(())
    }
}

pub fn instant() -> ScanTimings {
    ScanTimings {
        tune_settle: Duration::ZERO,
        sample_spacing: Duration::ZERO,
    }
}
