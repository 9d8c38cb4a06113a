//! The central **engine** for scan runs.
//!
//! A [`ScanEngine`] executes one [`ScanTask`] against a rig until the task's
//! passes are exhausted, a stop is requested, or the rig stops answering.
//! Both scan strategies share the same skeleton (tune, detect, react,
//! advance) and differ only in what they iterate over:
//!
//! * the bookmark walk visits the task's bookmark list, pass after pass.
//! * the frequency sweep steps through `range_min..=range_max` and bookmarks local
//!   signal peaks.
//!
//! **Architectural Note:**
//! The engine owns its rig handle and activity log, but never owns the
//! thread it runs on. Controllers spawn it on a [`Worker`](crate::worker::Worker),
//! talk to it through the shared [`InterThreadMessenger`], and request
//! termination through a [`StopFlag`].

use std::fmt;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::activity::{ActivityLog, ActivityRecord};
use crate::messenger::{InterThreadMessenger, ParamUpdate};
use crate::rig::{RigControl, RigError};
use crate::task::{ScanMode, ScanTask};
use crate::worker::StopFlag;

mod params;
mod sweep;
mod walk;

pub use params::{ScanParams, UpdateError};
pub use sweep::AUTO_BOOKMARK_DESCRIPTION;

/// Samples taken per signal check.
pub const SIGNAL_SAMPLES: usize = 2;
/// Rig levels are tenths of dBFS, thresholds are whole dBFS.
pub const LEVEL_SCALE: i64 = 10;

const DWELL_SLICE: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanTimings {
    /// Pause after every tune before the first level sample.
    pub tune_settle: Duration,
    /// Pause between two level samples.
    pub sample_spacing: Duration,
}

impl Default for ScanTimings {
    fn default() -> Self {
        Self {
            tune_settle: Duration::from_millis(250),
            sample_spacing: Duration::from_millis(200),
        }
    }
}

/// Why a scan run ended.
#[derive(Debug)]
pub enum StopReason {
    Requested,
    PassesExhausted,
    /// `range_min` was above `range_max` when a sweep started its pass.
    InvertedRange,
    CommunicationError(RigError),
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StopReason::Requested => write!(f, "stopped on request"),
            StopReason::PassesExhausted => write!(f, "all passes completed"),
            StopReason::InvertedRange => write!(f, "empty frequency range"),
            StopReason::CommunicationError(e) => write!(f, "rig communication failed: {e}"),
        }
    }
}

/// Outcome of one signal check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Detection {
    pub active: bool,
    /// Last sampled level.
    pub level: i64,
}

pub type TuneCallback = Box<dyn Fn(u64) + Send + Sync>;

pub struct ScanEngine<R, L> {
    rig: R,
    activity: L,
    messenger: Arc<InterThreadMessenger>,
    timings: ScanTimings,
    on_tune: Option<TuneCallback>,
}

impl<R: RigControl, L: ActivityLog> ScanEngine<R, L> {
    pub fn new(rig: R, activity: L, messenger: Arc<InterThreadMessenger>) -> Self {
        Self {
            rig,
            activity,
            messenger,
            timings: ScanTimings::default(),
            on_tune: None,
        }
    }

    pub fn with_timings(mut self, timings: ScanTimings) -> Self {
        self.timings = timings;
        self
    }

    /// Registers a callback invoked with every frequency the engine tunes to.
    pub fn on_tune(mut self, callback: impl Fn(u64) + Send + Sync + 'static) -> Self {
        self.on_tune = Some(Box::new(callback));
        self
    }

    pub fn rig(&self) -> &R {
        &self.rig
    }

    pub fn activity(&self) -> &L {
        &self.activity
    }

    /// Runs `task` to completion.
    ///
    /// Whatever the outcome, the activity log is closed and the stop signal
    /// is posted on the messenger before this returns.
    pub fn scan(&mut self, task: &ScanTask, flag: &StopFlag) -> StopReason {
        let mut params: ScanParams = ScanParams::from(task);
        info!("starting {:?} scan", task.scan_mode());

        let outcome: Result<StopReason, RigError> = match task.scan_mode() {
            ScanMode::Bookmarks => self.walk(task, &mut params, flag),
            ScanMode::Frequency => self.sweep(task, &mut params, flag),
        };
        let reason: StopReason = outcome.unwrap_or_else(StopReason::CommunicationError);

        match &reason {
            StopReason::CommunicationError(e) => error!("scan aborted: {e}"),
            other => info!("scan finished: {other}"),
        }

        if let Err(e) = self.activity.close() {
            warn!("could not close activity log: {e:#}");
        }
        if let Err(e) = self.messenger.notify_stopped() {
            error!("could not post stop signal: {e}");
        }
        reason
    }

    /// Drains pending controller updates into `params`.
    ///
    /// Bad updates are logged and dropped. A malformed one also leaves the
    /// rest of the queue for the next checkpoint.
    pub fn apply_updates(&self, params: &mut ScanParams) {
        while let Some(update) = self.messenger.take_update() {
            let ParamUpdate { name, value } = &update;
            match params.apply(&update) {
                Ok(()) => debug!("applied update {name} = {value}"),
                Err(UpdateError::Malformed) => {
                    warn!("dropping malformed update {name:?} = {value}");
                    break;
                }
                Err(e) => warn!("dropping update: {e}"),
            }
        }
    }

    /// Samples the level [`SIGNAL_SAMPLES`] times. The channel is active when
    /// more than one sample is strictly above `sgn_level` (in dBFS).
    pub fn signal_check(&self, sgn_level: i64) -> Result<Detection, RigError> {
        let threshold: i64 = sgn_level.saturating_mul(LEVEL_SCALE);
        let mut above: usize = 0;
        let mut level: i64 = 0;

        for sample in 0..SIGNAL_SAMPLES {
            if sample > 0 {
                thread::sleep(self.timings.sample_spacing);
            }
            level = self.rig.get_level()?;
            if level > threshold {
                above += 1;
            }
        }

        Ok(Detection {
            active: above > 1,
            level,
        })
    }

    fn tune(&self, frequency: u64) -> Result<(), RigError> {
        self.rig.set_frequency(frequency)?;
        if let Some(callback) = &self.on_tune {
            callback(frequency);
        }
        thread::sleep(self.timings.tune_settle);
        Ok(())
    }

    /// Logs the hit, then dwells with the recorder running if asked to.
    fn react(
        &mut self,
        record: ActivityRecord,
        params: &ScanParams,
        flag: &StopFlag,
    ) -> Result<(), RigError> {
        if params.log
            && let Err(e) = self.activity.write(&record)
        {
            warn!("could not write activity record: {e:#}");
        }

        if !params.record {
            return self.dwell(params, flag);
        }

        self.rig.start_recording()?;
        let dwelled: Result<(), RigError> = self.dwell(params, flag);
        let stopped: Result<(), RigError> = self.rig.stop_recording();
        dwelled?;
        stopped
    }

    /// With `wait` set, stays until the channel is next seen clear.
    /// Otherwise sleeps `delay`, waking early on a stop request.
    fn dwell(&self, params: &ScanParams, flag: &StopFlag) -> Result<(), RigError> {
        if params.wait {
            while flag.is_active() && self.signal_check(params.sgn_level)?.active {}
            return Ok(());
        }

        self.pause(params.delay, flag);
        Ok(())
    }

    /// Sleeps for `duration` in slices, returning early once `flag` is cleared.
    fn pause(&self, duration: Duration, flag: &StopFlag) {
        let deadline: Instant = Instant::now() + duration;
        while flag.is_active() {
            let now: Instant = Instant::now();
            if now >= deadline {
                break;
            }
            thread::sleep((deadline - now).min(DWELL_SLICE));
        }
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
