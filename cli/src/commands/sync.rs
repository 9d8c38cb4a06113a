use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, bail};
use clap::Args;
use colored::*;
use rigscan_common::config::Config;
use rigscan_core::{InterThreadMessenger, RigClient, SyncEngine, SyncTask, Worker};

use crate::commands;
use crate::terminal::{print, spinner};

#[derive(Args, Debug, Clone)]
pub struct SyncArgs {
    /// Rig whose frequency and mode are copied
    #[arg(long, default_value = "127.0.0.1")]
    pub source_host: String,

    #[arg(long, default_value_t = 7356)]
    pub source_port: u16,

    /// Rig that follows the source
    #[arg(long)]
    pub dest_host: String,

    #[arg(long, default_value_t = 7356)]
    pub dest_port: u16,

    /// Milliseconds between two copies
    #[arg(long, default_value_t = 100)]
    pub interval_ms: u64,
}

pub async fn sync(args: SyncArgs, cfg: &Config) -> anyhow::Result<()> {
    let source = commands::RigArgs {
        host: args.source_host,
        port: args.source_port,
    };
    let dest = commands::RigArgs {
        host: args.dest_host,
        port: args.dest_port,
    };
    let source: RigClient = RigClient::new(source.endpoint(1)?);
    let dest: RigClient = RigClient::new(dest.endpoint(2)?);

    if cfg.quiet == 0 {
        print::set_key_width(["Source", "Destination"]);
        print::aligned_line("Source", source.endpoint().to_string());
        print::aligned_line("Destination", dest.endpoint().to_string());
    }

    let messenger: Arc<InterThreadMessenger> = Arc::new(InterThreadMessenger::new());
    let mut task = SyncTask::new(messenger.clone(), source, dest);
    let engine: SyncEngine = SyncEngine::new().with_interval(Duration::from_millis(args.interval_ms));

    let start_time: Instant = Instant::now();
    let mut worker: Worker<Option<String>> = Worker::new("sync");
    worker
        .start(move |flag| {
            // The error text is kept on the task as well.
            let _ = engine.sync(&mut task, &flag);
            task.error
        })
        .context("could not start the sync worker")?;
    spinner::report_status("Mirroring, press Ctrl-C to stop...");

    let outcome: Option<Option<String>> = commands::supervise(&mut worker, &messenger).await;
    spinner::finish();

    let elapsed: ColoredString = format!("{:.2}s", start_time.elapsed().as_secs_f64()).bold().yellow();
    match outcome {
        Some(None) => {
            print::fat_separator();
            print::centerln(&format!("Sync stopped after {elapsed}"));
            Ok(())
        }
        Some(Some(error)) => bail!("sync stopped after {elapsed}: {error}"),
        None => bail!("the sync worker died without reporting why it stopped"),
    }
}
