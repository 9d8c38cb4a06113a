use crate::terminal::colors;
use colored::*;
use rigscan_common::channel::group_thousands;
use rigscan_common::{Bookmark, Lockout, Modulation};
use rigscan_core::StopReason;

pub type Detail = (String, ColoredString);

pub fn frequency(hz: u64) -> ColoredString {
    format!("{} Hz", group_thousands(hz)).color(colors::FREQUENCY)
}

pub fn modulation(mode: Modulation) -> ColoredString {
    mode.as_str().color(colors::MODULATION)
}

/// Rig levels are tenths of dBFS.
pub fn level(tenths: i64) -> ColoredString {
    let sign: &str = if tenths < 0 { "-" } else { "" };
    let abs: u64 = tenths.unsigned_abs();
    format!("{sign}{}.{} dBFS", abs / 10, abs % 10).color(colors::LEVEL)
}

pub fn stop_reason(reason: &StopReason) -> ColoredString {
    match reason {
        StopReason::PassesExhausted => reason.to_string().green().bold(),
        StopReason::Requested | StopReason::InvertedRange => reason.to_string().yellow().bold(),
        StopReason::CommunicationError(_) => reason.to_string().red().bold(),
    }
}

pub fn bookmark_to_detail(bookmark: &Bookmark) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![
        ("Frequency".to_string(), frequency(bookmark.channel().frequency())),
        ("Mode".to_string(), modulation(bookmark.channel().modulation())),
    ];

    if bookmark.lockout() != Lockout::Unset {
        let lockout: ColoredString = match bookmark.lockout() {
            Lockout::Locked => "locked".color(colors::LOCKED),
            _ => bookmark.lockout().as_str().normal(),
        };
        details.push(("Lockout".to_string(), lockout));
    }

    details.push(("Id".to_string(), bookmark.id().to_string().dimmed()));
    details
}
