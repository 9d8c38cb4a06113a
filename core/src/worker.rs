//! Worker thread handle with cooperative cancellation.
//!
//! Engines never get preempted. They poll a [`StopFlag`] at their loop
//! boundaries, so a stop request takes effect within one step.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};

use tracing::{debug, error};

/// Shared "active" flag. Cleared once to request termination.
#[derive(Debug, Clone)]
pub struct StopFlag(Arc<AtomicBool>);

impl Default for StopFlag {
    fn default() -> Self {
        Self::new()
    }
}

impl StopFlag {
    pub fn new() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }

    pub fn is_active(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    pub fn terminate(&self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Runs at most one job at a time on a named thread.
pub struct Worker<T> {
    name: &'static str,
    flag: Option<StopFlag>,
    handle: Option<JoinHandle<T>>,
}

impl<T: Send + 'static> Worker<T> {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            flag: None,
            handle: None,
        }
    }

    /// Spawns `job` unless a previous job is still running, in which case
    /// nothing happens and `Ok(false)` is returned.
    pub fn start<F>(&mut self, job: F) -> std::io::Result<bool>
    where
        F: FnOnce(StopFlag) -> T + Send + 'static,
    {
        if self.is_running() {
            debug!("{} worker already running, ignoring start", self.name);
            return Ok(false);
        }
        // A finished but unjoined job is discarded.
        self.join();

        let flag: StopFlag = StopFlag::new();
        let job_flag: StopFlag = flag.clone();
        let handle: JoinHandle<T> = thread::Builder::new()
            .name(self.name.to_string())
            .spawn(move || job(job_flag))?;

        self.flag = Some(flag);
        self.handle = Some(handle);
        debug!("{} worker started", self.name);
        Ok(true)
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Requests termination. Does nothing when no job was started.
    pub fn stop(&self) {
        if let Some(flag) = &self.flag {
            debug!("{} worker asked to stop", self.name);
            flag.terminate();
        }
    }

    /// Waits for the job and returns its result. `None` when no job was
    /// started or the job panicked.
    pub fn join(&mut self) -> Option<T> {
        let handle: JoinHandle<T> = self.handle.take()?;
        self.flag = None;
        match handle.join() {
            Ok(result) => Some(result),
            Err(_) => {
                error!("{} worker panicked", self.name);
                None
            }
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
