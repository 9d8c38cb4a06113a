use anyhow::Context;
use rigscan_common::{Modulation, config::Config};
use rigscan_core::{RigClient, RigControl, RigError};

use crate::commands::RigArgs;
use crate::terminal::{format, print};

struct Reading {
    frequency: u64,
    mode: Modulation,
    level: i64,
}

pub async fn status(
    rig: RigArgs,
    tune: Option<u64>,
    mode: Option<Modulation>,
    cfg: &Config,
) -> anyhow::Result<()> {
    let client: RigClient = RigClient::new(rig.endpoint(1)?);
    let target: String = client.endpoint().to_string();

    let reading: Reading = tokio::task::spawn_blocking(move || -> Result<Reading, RigError> {
        if let Some(hz) = tune {
            client.set_frequency(hz)?;
        }
        if let Some(mode) = mode {
            client.set_mode(mode)?;
        }
        Ok(Reading {
            frequency: client.get_frequency()?,
            mode: client.get_mode()?,
            level: client.get_level()?,
        })
    })
    .await
    .context("status worker panicked")?
    .with_context(|| format!("could not read {target}"))?;

    if cfg.quiet > 1 {
        print::print(&format!(
            "{} {} {}",
            format::frequency(reading.frequency),
            format::modulation(reading.mode),
            format::level(reading.level)
        ));
        return Ok(());
    }

    print::set_key_width(["Rig", "Frequency", "Mode", "Level"]);
    print::aligned_line("Rig", target);
    print::aligned_line("Frequency", format::frequency(reading.frequency));
    print::aligned_line("Mode", format::modulation(reading.mode));
    print::aligned_line("Level", format::level(reading.level));
    Ok(())
}
