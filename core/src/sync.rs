//! Frequency and mode mirroring between two rigs.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rigscan_common::Modulation;
use tracing::{debug, error, info};
use uuid::Uuid;

use crate::messenger::InterThreadMessenger;
use crate::rig::{RigControl, RigError};
use crate::worker::StopFlag;

/// Binds a source rig to a destination rig for one sync run.
pub struct SyncTask<S, D> {
    pub messenger: Arc<InterThreadMessenger>,
    pub source: S,
    pub dest: D,
    /// Text of the error that ended the last run, if any.
    pub error: Option<String>,
    pub id: Uuid,
}

impl<S: RigControl, D: RigControl> SyncTask<S, D> {
    pub fn new(messenger: Arc<InterThreadMessenger>, source: S, dest: D) -> Self {
        Self {
            messenger,
            source,
            dest,
            error: None,
            id: Uuid::new_v4(),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SyncEngine {
    interval: Duration,
}

impl Default for SyncEngine {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(100),
        }
    }
}

impl SyncEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Copies frequency and mode from source to destination until `flag` is
    /// cleared or either rig fails. The first failure ends the run, is kept
    /// in `task.error` and returned.
    pub fn sync<S, D>(&self, task: &mut SyncTask<S, D>, flag: &StopFlag) -> Result<(), RigError>
    where
        S: RigControl,
        D: RigControl,
    {
        info!("sync {} started", task.id);
        task.error = None;

        let mut outcome: Result<(), RigError> = Ok(());
        while flag.is_active() {
            if let Err(e) = copy_state(&task.source, &task.dest) {
                error!("sync {} stopped: {e}", task.id);
                task.error = Some(e.to_string());
                outcome = Err(e);
                break;
            }
            thread::sleep(self.interval);
        }

        if outcome.is_ok() {
            info!("sync {} stopped on request", task.id);
        }
        if let Err(e) = task.messenger.notify_stopped() {
            error!("could not post stop signal: {e}");
        }
        outcome
    }
}

fn copy_state<S: RigControl, D: RigControl>(source: &S, dest: &D) -> Result<(), RigError> {
    let frequency: u64 = source.get_frequency()?;
    let mode: Modulation = source.get_mode()?;
    dest.set_frequency(frequency)?;
    dest.set_mode(mode)?;
    debug!("mirrored {frequency} Hz {mode}");
    Ok(())
}

// ╔════════════════════════════════════════════╗
// ║ ████████╗███████╗███████╗████████╗███████╗ ║
// ║ ╚══██╔══╝██╔════╝██╔════╝╚══██╔══╝██╔════╝ ║
// ║    ██║   █████╗  ███████╗   ██║   ███████╗ ║
// ║    ██║   ██╔══╝  ╚════██║   ██║   ╚════██║ ║
// ║    ██║   ███████╗███████║   ██║   ███████║ ║
// ║    ╚═╝   ╚══════╝╚══════╝   ╚═╝   ╚══════╝ ║
// ╚════════════════════════════════════════════╝
