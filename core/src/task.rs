//! # Scan Task Model
//!
//! A [`ScanTask`] is the validated, immutable configuration of one scan run.
//! It is built once from a raw [`ScanConfig`] and handed to the scan engine.
//! Invalid input either fails construction or is clamped into range with a
//! diagnostic, never carried into a running scan.

use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rigscan_common::{Bookmark, Modulation, ValidationError};
use tracing::warn;

/// Smallest frequency step a sweep may use, in Hz.
pub const MIN_INTERVAL: i64 = 1_000;
/// Highest frequency a scan may reach, in Hz.
pub const MAX_FREQUENCY: i64 = 500_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Sweep `range_min..=range_max` in `interval` steps.
    Frequency,
    /// Walk the bookmark list in order.
    Bookmarks,
}

impl FromStr for ScanMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "frequency" => Ok(ScanMode::Frequency),
            "bookmarks" => Ok(ScanMode::Bookmarks),
            _ => Err(ValidationError::InvalidScanMode(s.to_string())),
        }
    }
}

/// Raw scan settings, as entered by the user.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub scan_mode: String,
    pub frequency_modulation: Modulation,
    /// Hz
    pub range_min: i64,
    /// Hz
    pub range_max: i64,
    /// Hz
    pub interval: i64,
    /// Seconds
    pub delay: u64,
    pub passes: i64,
    /// Detection threshold in dBFS.
    pub sgn_level: i64,
    pub wait: bool,
    pub record: bool,
    pub auto_bookmark: bool,
    pub log: bool,
    pub bookmarks: Vec<Bookmark>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            scan_mode: "frequency".to_string(),
            frequency_modulation: Modulation::Fm,
            range_min: 88_000_000,
            range_max: 108_000_000,
            interval: 100_000,
            delay: 3,
            passes: 1,
            sgn_level: -30,
            wait: false,
            record: false,
            auto_bookmark: false,
            log: false,
            bookmarks: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScanTask {
    scan_mode: ScanMode,
    frequency_modulation: Modulation,
    range_min: u64,
    range_max: u64,
    interval: u64,
    delay: Duration,
    passes: u32,
    sgn_level: i64,
    wait: bool,
    record: bool,
    auto_bookmark: bool,
    log: bool,
    bookmarks: Vec<Bookmark>,
    new_bookmarks: NewBookmarks,
}

impl ScanTask {
    pub fn new(config: ScanConfig) -> Result<Self, ValidationError> {
        let scan_mode: ScanMode = config.scan_mode.parse()?;

        let passes: u32 = if config.passes < 1 {
            warn!("passes {} is below 1, scanning once", config.passes);
            1
        } else {
            u32::try_from(config.passes).unwrap_or(u32::MAX)
        };

        let range_min: i64 = if config.range_min < 0 {
            warn!("range_min {} Hz is negative, using 0 Hz", config.range_min);
            0
        } else {
            config.range_min
        };

        let range_max: i64 = if config.range_max > MAX_FREQUENCY {
            warn!(
                "range_max {} Hz is above the {MAX_FREQUENCY} Hz ceiling, using the ceiling",
                config.range_max
            );
            MAX_FREQUENCY
        } else {
            config.range_max
        };

        if scan_mode == ScanMode::Bookmarks && config.bookmarks.is_empty() {
            return Err(ValidationError::NoBookmarks);
        }

        let mut interval: i64 = config.interval;
        if scan_mode == ScanMode::Frequency {
            if interval < MIN_INTERVAL {
                warn!("interval {interval} Hz is below {MIN_INTERVAL} Hz, using {MIN_INTERVAL} Hz");
                interval = MIN_INTERVAL;
            }
            if range_min >= range_max {
                return Err(ValidationError::InvalidRange {
                    min: range_min,
                    max: range_max,
                });
            }
        }

        Ok(Self {
            scan_mode,
            frequency_modulation: config.frequency_modulation,
            range_min: range_min as u64,
            range_max: range_max.max(0) as u64,
            interval: interval.max(0) as u64,
            delay: Duration::from_secs(config.delay),
            passes,
            sgn_level: config.sgn_level,
            wait: config.wait,
            record: config.record,
            auto_bookmark: config.auto_bookmark,
            log: config.log,
            bookmarks: config.bookmarks,
            new_bookmarks: NewBookmarks::default(),
        })
    }

    pub fn scan_mode(&self) -> ScanMode {
        self.scan_mode
    }

    pub fn frequency_modulation(&self) -> Modulation {
        self.frequency_modulation
    }

    pub fn range_min(&self) -> u64 {
        self.range_min
    }

    pub fn range_max(&self) -> u64 {
        self.range_max
    }

    pub fn interval(&self) -> u64 {
        self.interval
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    pub fn sgn_level(&self) -> i64 {
        self.sgn_level
    }

    pub fn wait(&self) -> bool {
        self.wait
    }

    pub fn record(&self) -> bool {
        self.record
    }

    pub fn auto_bookmark(&self) -> bool {
        self.auto_bookmark
    }

    pub fn log(&self) -> bool {
        self.log
    }

    pub fn bookmarks(&self) -> &[Bookmark] {
        &self.bookmarks
    }

    /// Output list of bookmarks discovered by this run. Clones of the task
    /// share it, so the controller can keep a handle while the engine owns
    /// the task.
    pub fn new_bookmarks(&self) -> &NewBookmarks {
        &self.new_bookmarks
    }
}

/// Append-only list of discovered bookmarks shared between engine and
/// controller.
#[derive(Debug, Clone, Default)]
pub struct NewBookmarks {
    inner: Arc<Mutex<Vec<Bookmark>>>,
}

impl NewBookmarks {
    /// Returns `false` when an equal bookmark is already in the list.
    pub fn push_unique(&self, bookmark: Bookmark) -> bool {
        let mut list = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        if list.contains(&bookmark) {
            return false;
        }
        list.push(bookmark);
        true
    }

    pub fn drain(&self) -> Vec<Bookmark> {
        let mut list = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *list)
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
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
