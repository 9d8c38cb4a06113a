//! Bookmark walk.

use rigscan_common::Bookmark;
use tracing::{debug, trace};

use super::{DWELL_SLICE, Detection, ScanEngine, ScanParams, StopReason};
use crate::activity::{ActivityLog, ActivityRecord, RecordKind};
use crate::rig::{RigControl, RigError};
use crate::task::ScanTask;
use crate::worker::StopFlag;

/// Per-bookmark outcome. Only rig failures abort the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    LockedOut,
    Clear,
    Active(Detection),
}

impl<R: RigControl, L: ActivityLog> ScanEngine<R, L> {
    pub(super) fn walk(
        &mut self,
        task: &ScanTask,
        params: &mut ScanParams,
        flag: &StopFlag,
    ) -> Result<StopReason, RigError> {
        if !flag.is_active() {
            return Ok(StopReason::Requested);
        }
        self.rig.set_mode(task.frequency_modulation())?;
        let mut completed: u32 = 0;

        loop {
            self.apply_updates(params);
            let mut visited: usize = 0;

            for bookmark in task.bookmarks() {
                if !flag.is_active() {
                    return Ok(StopReason::Requested);
                }
                self.apply_updates(params);

                let visit: Visit = self.visit(bookmark, params)?;
                if visit != Visit::LockedOut {
                    visited += 1;
                }
                match visit {
                    Visit::LockedOut => trace!("skipping locked out {bookmark}"),
                    Visit::Clear => {}
                    Visit::Active(detection) => {
                        debug!("activity on {bookmark}, level {}", detection.level);
                        let record = ActivityRecord {
                            kind: RecordKind::Bookmark,
                            frequency: bookmark.channel().frequency(),
                            modulation: bookmark.channel().modulation(),
                            description: Some(bookmark.description().to_string()),
                            level: detection.level,
                        };
                        self.react(record, params, flag)?;
                    }
                }
            }

            completed += 1;
            debug!("bookmark pass {completed}/{} done", params.passes);
            if completed >= params.passes {
                return Ok(StopReason::PassesExhausted);
            }
            if !flag.is_active() {
                return Ok(StopReason::Requested);
            }
            if visited == 0 {
                // Nothing to tune this pass, idle before the next one.
                self.pause(params.delay.max(DWELL_SLICE), flag);
            }
        }
    }

    fn visit(&self, bookmark: &Bookmark, params: &ScanParams) -> Result<Visit, RigError> {
        if bookmark.is_locked() {
            return Ok(Visit::LockedOut);
        }
        self.tune(bookmark.channel().frequency())?;
        let detection: Detection = self.signal_check(params.sgn_level)?;
        Ok(if detection.active {
            Visit::Active(detection)
        } else {
            Visit::Clear
        })
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
