//! Engine command protocol
//!
//! Defines the command messages sent to the autosave background task via
//! channels, keeping all mutable state inside the task and avoiding shared
//! locks on the hot path.

use tokio::sync::oneshot;

use crate::error::Result;

/// Commands that can be sent to an autosave background task
pub(super) enum EngineCommand<T> {
    /// Record a new value of the tracked data
    Update {
        /// The changed data, cloned at the call boundary
        data: T,
    },

    /// Force an immediate save attempt, bypassing the interval gate
    Flush {
        /// Resolves when the forced attempt settles, or immediately when
        /// nothing is pending
        response_tx: oneshot::Sender<Result<()>>,
    },

    /// Shut the engine down gracefully
    Shutdown {
        /// Channel to send the shutdown confirmation back
        response_tx: oneshot::Sender<()>,
    },
}
