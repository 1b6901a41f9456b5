//! Monitor command protocol
//!
//! Defines the command messages sent to the session-monitor background task
//! via channels. The tick loop is the only writer of warning state, so user
//! actions travel through the same channel instead of sharing locks.

use tokio::sync::oneshot;

use crate::error::Result;

/// Commands that can be sent to a session-monitor background task
pub(super) enum MonitorCommand {
    /// Extend the session: refresh expiry through the provider, close the
    /// warning, and re-arm the threshold for the refreshed epoch
    Extend {
        /// Channel to send the refresh result back
        response_tx: oneshot::Sender<Result<()>>,
    },

    /// Log out now: terminate through the provider and close the warning
    Logout {
        /// Channel to send the terminate result back
        response_tx: oneshot::Sender<Result<()>>,
    },

    /// Shut the monitor down gracefully
    Shutdown {
        /// Channel to send the shutdown confirmation back
        response_tx: oneshot::Sender<()>,
    },
}
