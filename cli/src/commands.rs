pub mod scan;
pub mod status;
pub mod sync;

use std::time::Duration;

use anyhow::Context;
use clap::{ArgAction, Args, Parser, Subcommand};
use rigscan_common::{Modulation, RigEndpoint};
use rigscan_core::{InterThreadMessenger, Worker};
use rigscan_protocols::command::parse_frequency_arg;
use tracing::warn;

/// How often the controller polls the messenger for a stop signal.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Parser)]
#[command(name = "rigscan")]
#[command(about = "Scanner and frequency mirror for networked radio rigs.", version)]
pub struct CommandLine {
    #[command(subcommand)]
    pub command: Commands,

    /// Print less; repeat to print only summaries
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub quiet: u8,

    /// Print more; repeat for protocol traces
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Skip the startup banner
    #[arg(long, global = true)]
    pub no_banner: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show frequency, mode and signal level of a rig
    #[command(alias = "st")]
    Status {
        #[command(flatten)]
        rig: RigArgs,

        /// Tune to this frequency (Hz) before reading
        #[arg(long, value_parser = parse_frequency_arg)]
        tune: Option<u64>,

        /// Switch to this mode before reading
        #[arg(long)]
        mode: Option<Modulation>,
    },
    /// Scan a frequency range or a bookmark list
    #[command(alias = "s")]
    Scan(scan::ScanArgs),
    /// Mirror frequency and mode from one rig to another
    #[command(alias = "y")]
    Sync(sync::SyncArgs),
}

#[derive(Args, Debug, Clone)]
pub struct RigArgs {
    /// Rig hostname or address
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Rig control port
    #[arg(long, default_value_t = 7356)]
    pub port: u16,
}

impl RigArgs {
    pub fn endpoint(&self, ordinal: u8) -> anyhow::Result<RigEndpoint> {
        RigEndpoint::new(&self.host, self.port, ordinal)
            .with_context(|| format!("invalid rig endpoint {}:{}", self.host, self.port))
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

/// Waits for the engine's stop signal, turning Ctrl-C into a cooperative
/// stop request, then joins the worker.
pub async fn supervise<T: Send + 'static>(
    worker: &mut Worker<T>,
    messenger: &InterThreadMessenger,
) -> Option<T> {
    let mut ticker: tokio::time::Interval = tokio::time::interval(POLL_INTERVAL);
    let mut interrupted: bool = false;

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if messenger.check_stopped() || !worker.is_running() {
                    break;
                }
            }
            signal = tokio::signal::ctrl_c(), if !interrupted => {
                interrupted = true;
                match signal {
                    Ok(()) => {
                        warn!("stop requested, finishing the current step");
                        worker.stop();
                    }
                    Err(e) => warn!("cannot listen for Ctrl-C: {e}"),
                }
            }
        }
    }

    worker.join()
}
