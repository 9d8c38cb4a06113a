use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use clap::Args;
use colored::*;
use rigscan_common::{Bookmark, Modulation, RigEndpoint, config::Config};
use rigscan_core::{
    InterThreadMessenger, NewBookmarks, RigClient, ScanConfig, ScanEngine, ScanMode, ScanTask,
    StopReason, TracingActivityLog, Worker,
};

use crate::commands::{self, RigArgs};
use crate::mprint;
use crate::terminal::{colors, format, print, spinner};

#[derive(Args, Debug, Clone)]
pub struct ScanArgs {
    #[command(flatten)]
    pub rig: RigArgs,

    /// Scan strategy: "frequency" or "bookmarks"
    #[arg(long, default_value = "frequency")]
    pub mode: String,

    /// Demodulation mode set once at scan start
    #[arg(long, default_value = "FM")]
    pub modulation: Modulation,

    #[arg(long, default_value_t = 88_000, allow_negative_numbers = true)]
    pub range_min_khz: i64,

    #[arg(long, default_value_t = 108_000, allow_negative_numbers = true)]
    pub range_max_khz: i64,

    /// Sweep step, at least 1000 Hz
    #[arg(long, default_value_t = 100_000, allow_negative_numbers = true)]
    pub interval_hz: i64,

    /// Seconds to dwell on an active channel
    #[arg(long, default_value_t = 3)]
    pub delay: u64,

    /// Passes over the range or list, 0 scans until interrupted
    #[arg(long, default_value_t = 1, allow_negative_numbers = true)]
    pub passes: i64,

    /// Detection threshold in dBFS
    #[arg(long, default_value_t = -30, allow_negative_numbers = true)]
    pub level: i64,

    /// Stay on an active channel until it clears
    #[arg(long)]
    pub wait: bool,

    /// Ask the rig to record while dwelling
    #[arg(long)]
    pub record: bool,

    /// Bookmark signal peaks found by a sweep
    #[arg(long)]
    pub auto_bookmark: bool,

    /// Log every detection
    #[arg(long)]
    pub log: bool,

    /// "FREQ,MODE,DESC[,LOCKOUT]", repeatable
    #[arg(long = "bookmark", value_parser = parse_bookmark)]
    pub bookmarks: Vec<Bookmark>,
}

impl ScanArgs {
    fn to_config(&self) -> ScanConfig {
        let passes: i64 = if self.passes == 0 {
            i64::from(u32::MAX)
        } else {
            self.passes
        };

        ScanConfig {
            scan_mode: self.mode.clone(),
            frequency_modulation: self.modulation,
            range_min: self.range_min_khz.saturating_mul(1_000),
            range_max: self.range_max_khz.saturating_mul(1_000),
            interval: self.interval_hz,
            delay: self.delay,
            passes,
            sgn_level: self.level,
            wait: self.wait,
            record: self.record,
            auto_bookmark: self.auto_bookmark,
            log: self.log,
            bookmarks: self.bookmarks.clone(),
        }
    }
}

/// The frequency may itself be written with thousands separators, so the
/// first field that names a modulation ends it.
pub fn parse_bookmark(raw: &str) -> anyhow::Result<Bookmark> {
    let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
    let mode_at: usize = fields
        .iter()
        .skip(1)
        .position(|field| field.parse::<Modulation>().is_ok())
        .map(|idx| idx + 1)
        .with_context(|| format!("bookmark '{raw}' names no modulation"))?;

    if fields.len() > mode_at + 3 {
        bail!("bookmark '{raw}' has too many fields");
    }

    let frequency: String = fields[..mode_at].concat();
    let description: &str = fields.get(mode_at + 1).copied().unwrap_or("");
    let lockout: &str = fields.get(mode_at + 2).copied().unwrap_or("");

    Bookmark::from_raw(&frequency, fields[mode_at], description, lockout)
        .with_context(|| format!("invalid bookmark '{raw}'"))
}

pub async fn scan(args: ScanArgs, cfg: &Config) -> anyhow::Result<()> {
    let endpoint: RigEndpoint = args.rig.endpoint(1)?;
    let task: ScanTask = ScanTask::new(args.to_config()).context("invalid scan settings")?;
    let discovered: NewBookmarks = task.new_bookmarks().clone();
    let messenger: Arc<InterThreadMessenger> = Arc::new(InterThreadMessenger::new());

    print_task(&task, &endpoint, cfg);

    let mut engine = ScanEngine::new(
        RigClient::new(endpoint),
        TracingActivityLog::default(),
        messenger.clone(),
    )
    .on_tune(spinner::report_tune_progress);

    let start_time: Instant = Instant::now();
    let mut worker: Worker<StopReason> = Worker::new("scan");
    worker
        .start(move |flag| engine.scan(&task, &flag))
        .context("could not start the scan worker")?;
    spinner::report_status("Starting scan...");

    let reason: Option<StopReason> = commands::supervise(&mut worker, &messenger).await;
    spinner::finish();

    scan_ends(reason, discovered.drain(), start_time.elapsed(), cfg)
}

fn print_task(task: &ScanTask, endpoint: &RigEndpoint, cfg: &Config) {
    if cfg.quiet > 0 {
        return;
    }

    print::header("scan settings", cfg.quiet);
    print::set_key_width(["Rig", "Strategy", "Range", "Interval", "Passes", "Threshold"]);
    print::aligned_line("Rig", endpoint.to_string());

    match task.scan_mode() {
        ScanMode::Frequency => {
            print::aligned_line("Strategy", "frequency sweep");
            print::aligned_line(
                "Range",
                format!(
                    "{} - {}",
                    format::frequency(task.range_min()),
                    format::frequency(task.range_max())
                ),
            );
            print::aligned_line("Interval", format::frequency(task.interval()));
        }
        ScanMode::Bookmarks => {
            print::aligned_line("Strategy", format!("{} bookmarks", task.bookmarks().len()));
        }
    }

    let passes: String = match task.passes() {
        u32::MAX => "until interrupted".to_string(),
        n => n.to_string(),
    };
    print::aligned_line("Passes", passes);
    print::aligned_line("Threshold", format!("{} dBFS", task.sgn_level()));
}

fn scan_ends(
    reason: Option<StopReason>,
    bookmarks: Vec<Bookmark>,
    total_time: Duration,
    cfg: &Config,
) -> anyhow::Result<()> {
    let Some(reason) = reason else {
        bail!("the scan worker died without reporting why it stopped");
    };

    if !bookmarks.is_empty() {
        print::header("new bookmarks", cfg.quiet);
        print_bookmarks(&bookmarks, cfg);
    }

    let found: ColoredString = format!("{} new bookmarks", bookmarks.len()).bold().green();
    let total_time: ColoredString = format!("{:.2}s", total_time.as_secs_f64()).bold().yellow();
    let output: String = format!("Scan ended ({}): {found} in {total_time}", format::stop_reason(&reason))
        .color(colors::TEXT_DEFAULT)
        .to_string();

    match cfg.quiet {
        0 => {
            print::fat_separator();
            print::centerln(&output);
        }
        _ => {
            mprint!();
            mprint!(&output);
        }
    }

    match reason {
        StopReason::CommunicationError(e) => Err(anyhow::Error::new(e).context("scan aborted")),
        _ => Ok(()),
    }
}

fn print_bookmarks(bookmarks: &[Bookmark], cfg: &Config) {
    for (idx, bookmark) in bookmarks.iter().enumerate() {
        if cfg.quiet < 2 {
            print::tree_head(idx, bookmark.description());
            print::as_tree_one_level(format::bookmark_to_detail(bookmark));
        }
        if idx + 1 != bookmarks.len() {
            mprint!();
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
