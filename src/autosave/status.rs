//! Autosave state structures
//!
//! Defines the status signal published by [`AutosaveEngine`] and the
//! indicator snapshot consumed by the presentation layer.
//!
//! [`AutosaveEngine`]: super::AutosaveEngine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Phase of the autosave loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AutosaveStatus {
    /// No changes recorded since mount or since the last save settled
    Idle,
    /// A change is recorded and waiting for the next eligible attempt
    Pending,
    /// Exactly one persistence call is in flight
    Saving,
    /// The most recent attempt succeeded
    Saved,
    /// The most recent attempt failed; retried on the next change or tick
    Error,
}

/// Observable state of one [`AutosaveEngine`] instance
///
/// Published through a `watch` channel; the background task is the only
/// writer.
///
/// [`AutosaveEngine`]: super::AutosaveEngine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutosaveState {
    /// Current phase
    pub status: AutosaveStatus,

    /// When the last successful persistence call returned
    pub last_saved_at: Option<DateTime<Utc>>,

    /// Reason for the last failure, if any
    pub last_error: Option<String>,

    /// Whether a pending or in-flight change has not yet been persisted
    pub has_unsaved_changes: bool,
}

impl AutosaveState {
    pub(super) fn initial() -> Self {
        Self {
            status: AutosaveStatus::Idle,
            last_saved_at: None,
            last_error: None,
            has_unsaved_changes: false,
        }
    }
}

/// Snapshot for a UI autosave indicator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AutosaveIndicator {
    /// True while a persistence call is in flight
    pub is_auto_saving: bool,
    /// When the data was last successfully persisted
    pub last_saved: Option<DateTime<Utc>>,
    /// True when a change has not yet been persisted
    pub has_unsaved_changes: bool,
}

impl From<&AutosaveState> for AutosaveIndicator {
    fn from(state: &AutosaveState) -> Self {
        Self {
            is_auto_saving: state.status == AutosaveStatus::Saving,
            last_saved: state.last_saved_at,
            has_unsaved_changes: state.has_unsaved_changes,
        }
    }
}
