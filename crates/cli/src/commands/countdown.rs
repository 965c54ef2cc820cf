//! Countdown display.
//!
//! # Usage
//!
//! ```bash
//! gg-cli countdown 2026-12-25T00:00:00Z
//! gg-cli countdown 2026-12-25T00:00:00Z --once
//! ```

use std::io::Write;
use std::time::Duration;

use giftgrid_storefront::widgets::{Countdown, CountdownState};
use tracing::info;

use super::CliError;

/// Print the time left until `target` every second until it passes.
///
/// # Errors
///
/// Returns an error if `target` is not an RFC 3339 timestamp.
pub async fn run(target: &str, once: bool) -> Result<(), CliError> {
    let countdown = Countdown::parse(target)?;
    info!(target = %countdown.target(), "Counting down");

    let mut ticker = tokio::time::interval(Duration::from_secs(1));
    loop {
        ticker.tick().await;
        let state = countdown.state();
        let mut out = std::io::stdout().lock();
        match state {
            CountdownState::Running(remaining) => writeln!(out, "{remaining}")?,
            CountdownState::Ended => {
                writeln!(out, "ended")?;
                return Ok(());
            }
        }
        if once {
            return Ok(());
        }
    }
}
