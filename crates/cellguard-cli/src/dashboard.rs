//! Single-line status display for the operator panel.

use cellguard_access::AccessSnapshot;
use cellguard_core::AccessState;
use console::style;
use std::io::Write;

pub const BAR_WIDTH: usize = 30;

pub fn banner() -> String {
    format!(
        "\n{}",
        style("--- CELLGUARD: ACCESS STATUS MONITOR ---").bold()
    )
}

/// Render one status line for `snapshot` (no carriage return, no newline).
pub fn render(snapshot: &AccessSnapshot) -> String {
    match snapshot.state {
        AccessState::Safe => {
            let bar = "░".repeat(BAR_WIDTH);
            format!(
                " [SYSTEM SAFE: STANDARD GUARDS ACTIVE]  [{}]",
                style(bar).green()
            )
        }
        AccessState::Override => {
            let filled = ((BAR_WIDTH as f64) * snapshot.fraction_left()) as usize;
            let bar = format!("{}{}", "█".repeat(filled), "·".repeat(BAR_WIDTH - filled));
            let tier = snapshot.profile.map(|p| p.name).unwrap_or("N/A").to_uppercase();
            let caution = style(format!("CAUTION: {tier} OVERRIDE ACTIVE")).bold().red();
            format!(
                " [!] {} ({}s) [!]  [{}]",
                caution,
                snapshot.time_left_secs as u64,
                style(bar).yellow()
            )
        }
        AccessState::Timeout => {
            let bar = "░".repeat(BAR_WIDTH);
            let alarm = style("WATCHDOG TIMEOUT: OVERRIDE REVOKED").bold().red();
            format!(" [!] {} [!]  [{}]", alarm, style(bar).red())
        }
    }
}

/// Overwrite the current terminal line with the rendered snapshot.
pub fn draw(snapshot: &AccessSnapshot) -> std::io::Result<()> {
    let mut out = std::io::stdout().lock();
    write!(out, "\r{}", render(snapshot))?;
    out.flush()
}
