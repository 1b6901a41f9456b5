//! Session warning state and remaining-time formatting

use chrono::Duration;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::commands::MonitorCommand;
use crate::error::{DraftGuardError, Result};

/// Phase of the session-lifecycle state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Principal present, expiry beyond the warning threshold
    Active,
    /// Remaining lifetime crossed the threshold; warning surface is open
    Warning,
    /// Session reached its expiry or the user logged out
    Expired,
}

/// Observable warning state, recomputed each tick
///
/// The monitor's background task is the only writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionWarning {
    /// Whether the warning surface should be shown
    pub is_open: bool,
    /// Formatted remaining lifetime, empty while closed
    pub time_remaining: String,
}

impl SessionWarning {
    pub(super) fn closed() -> Self {
        Self {
            is_open: false,
            time_remaining: String::new(),
        }
    }
}

/// Clonable handle for the user actions on the warning surface
#[derive(Clone)]
pub struct SessionActions {
    pub(super) command_tx: mpsc::UnboundedSender<MonitorCommand>,
}

impl SessionActions {
    /// Extend the session: refresh expiry and close the warning
    pub async fn extend(&self) -> Result<()> {
        self.send_and_wait(|response_tx| MonitorCommand::Extend { response_tx })
            .await
    }

    /// Log out now: terminate the session and close the warning
    pub async fn logout(&self) -> Result<()> {
        self.send_and_wait(|response_tx| MonitorCommand::Logout { response_tx })
            .await
    }

    async fn send_and_wait<F>(&self, command: F) -> Result<()>
    where
        F: FnOnce(tokio::sync::oneshot::Sender<Result<()>>) -> MonitorCommand,
    {
        let (response_tx, response_rx) = tokio::sync::oneshot::channel();
        self.command_tx
            .send(command(response_tx))
            .map_err(|_| DraftGuardError::ChannelClosed("session command"))?;
        response_rx
            .await
            .map_err(|_| DraftGuardError::ChannelClosed("session response"))?
    }
}

/// Presentation contract for the warning modal
///
/// Bundles the current warning state with the action handle, so the
/// presentation layer needs nothing else from the monitor.
#[derive(Clone)]
pub struct WarningSurface {
    /// Whether the modal should be shown
    pub is_open: bool,
    /// Formatted remaining lifetime
    pub time_remaining: String,
    /// Extend/logout actions wired to the monitor
    pub actions: SessionActions,
}

/// Format a remaining lifetime for display
///
/// Minute precision (ceiling) at or above one minute, second precision
/// below. Matches the cadence the warning modal displays at.
#[must_use]
pub fn format_remaining(remaining: Duration) -> String {
    let seconds = remaining.num_seconds().max(0);
    if seconds >= 60 {
        let minutes = (seconds + 59) / 60;
        if minutes == 1 {
            "1 minute".to_string()
        } else {
            format!("{minutes} minutes")
        }
    } else if seconds == 1 {
        "1 second".to_string()
    } else {
        format!("{seconds} seconds")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_whole_minutes() {
        assert_eq!(format_remaining(Duration::minutes(4)), "4 minutes");
        assert_eq!(format_remaining(Duration::minutes(1)), "1 minute");
    }

    #[test]
    fn rounds_partial_minutes_up() {
        assert_eq!(format_remaining(Duration::seconds(150)), "3 minutes");
        assert_eq!(format_remaining(Duration::seconds(61)), "2 minutes");
    }

    #[test]
    fn formats_sub_minute_in_seconds() {
        assert_eq!(format_remaining(Duration::seconds(45)), "45 seconds");
        assert_eq!(format_remaining(Duration::seconds(1)), "1 second");
        assert_eq!(format_remaining(Duration::seconds(0)), "0 seconds");
    }

    #[test]
    fn clamps_negative_remaining() {
        assert_eq!(format_remaining(Duration::seconds(-30)), "0 seconds");
    }
}
