mod commands;
mod terminal;

use commands::{CommandLine, Commands, scan, status, sync};
use rigscan_common::config::Config;
use terminal::{logging, print, spinner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let commands = CommandLine::parse_args();

    logging::init_logging(commands.verbose, commands.quiet);

    let cfg = Config {
        no_banner: commands.no_banner,
        quiet: commands.quiet,
    };
    print::banner(cfg.no_banner, cfg.quiet);

    let result: anyhow::Result<()> = match commands.command {
        Commands::Status { rig, tune, mode } => {
            print::header("reading rig", cfg.quiet);
            status::status(rig, tune, mode, &cfg).await
        }
        Commands::Scan(args) => {
            print::header("getting ready to scan", cfg.quiet);
            scan::scan(args, &cfg).await
        }
        Commands::Sync(args) => {
            print::header("getting ready to sync", cfg.quiet);
            sync::sync(args, &cfg).await
        }
    };

    spinner::finish();
    if cfg.quiet == 0 {
        print::end_of_program();
    }
    result
}
