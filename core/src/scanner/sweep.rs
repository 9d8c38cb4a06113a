//! Frequency sweep with peak bookmarking.
//!
//! A broad signal trips the detector on several adjacent steps. Instead of
//! bookmarking each of them, the sweep follows the level while it rises and
//! bookmarks the strongest step once the level starts to fall or the signal
//! drops out. A candidate still pending when a pass ends is bookmarked too.

use rigscan_common::{Bookmark, Channel, Lockout, ValidationError};
use tracing::{debug, info, warn};

use super::{Detection, ScanEngine, ScanParams, StopReason};
use crate::activity::{ActivityLog, ActivityRecord, RecordKind};
use crate::rig::{RigControl, RigError};
use crate::task::ScanTask;
use crate::worker::StopFlag;

pub const AUTO_BOOKMARK_DESCRIPTION: &str = "auto-bookmark";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Candidate {
    level: i64,
    frequency: u64,
}

#[derive(Debug, Default)]
struct PeakTracker {
    pending: Option<Candidate>,
}

impl PeakTracker {
    /// Feeds one active step. Returns the previous candidate's frequency once
    /// the level falls below it.
    fn observe(&mut self, level: i64, frequency: u64) -> Option<u64> {
        match self.pending {
            Some(previous) if level < previous.level => {
                self.pending = None;
                Some(previous.frequency)
            }
            _ => {
                self.pending = Some(Candidate { level, frequency });
                None
            }
        }
    }

    fn flush(&mut self) -> Option<u64> {
        self.pending.take().map(|candidate| candidate.frequency)
    }
}

impl<R: RigControl, L: ActivityLog> ScanEngine<R, L> {
    pub(super) fn sweep(
        &mut self,
        task: &ScanTask,
        params: &mut ScanParams,
        flag: &StopFlag,
    ) -> Result<StopReason, RigError> {
        self.apply_updates(params);
        if params.range_min > params.range_max {
            info!(
                "range_min {} Hz is above range_max {} Hz, nothing to sweep",
                params.range_min, params.range_max
            );
            return Ok(StopReason::InvertedRange);
        }
        if !flag.is_active() {
            return Ok(StopReason::Requested);
        }

        self.rig.set_mode(task.frequency_modulation())?;
        let mut peaks: PeakTracker = PeakTracker::default();
        let mut completed: u32 = 0;

        loop {
            let mut frequency: u64 = params.range_min;
            while frequency <= params.range_max {
                if !flag.is_active() {
                    return Ok(StopReason::Requested);
                }
                self.apply_updates(params);

                self.tune(frequency)?;
                let detection: Detection = self.signal_check(params.sgn_level)?;

                if detection.active {
                    debug!("activity on {frequency} Hz, level {}", detection.level);
                    let record = ActivityRecord {
                        kind: RecordKind::Frequency,
                        frequency,
                        modulation: task.frequency_modulation(),
                        description: None,
                        level: detection.level,
                    };
                    self.react(record, params, flag)?;

                    if params.auto_bookmark
                        && let Some(peak) = peaks.observe(detection.level, frequency)
                    {
                        self.auto_bookmark(task, peak);
                    }
                } else if let Some(peak) = peaks.flush() {
                    self.auto_bookmark(task, peak);
                }

                frequency = frequency.saturating_add(params.interval.max(1));
            }

            if let Some(peak) = peaks.flush() {
                self.auto_bookmark(task, peak);
            }

            completed += 1;
            debug!("sweep pass {completed}/{} done", params.passes);
            if completed >= params.passes {
                return Ok(StopReason::PassesExhausted);
            }
            if !flag.is_active() {
                return Ok(StopReason::Requested);
            }

            self.apply_updates(params);
            if params.range_min > params.range_max {
                info!("range was inverted by an update, stopping sweep");
                return Ok(StopReason::InvertedRange);
            }
        }
    }

    fn auto_bookmark(&self, task: &ScanTask, frequency: u64) {
        let bookmark: Result<Bookmark, ValidationError> =
            Channel::new(frequency, task.frequency_modulation())
                .and_then(|channel| {
                    Bookmark::new(channel, AUTO_BOOKMARK_DESCRIPTION, Lockout::Unset)
                });

        match bookmark {
            Ok(bookmark) => {
                if task.new_bookmarks().push_unique(bookmark) {
                    info!("bookmarked peak at {frequency} Hz");
                } else {
                    debug!("{frequency} Hz is already bookmarked");
                }
            }
            Err(e) => warn!("cannot bookmark {frequency} Hz: {e}"),
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
