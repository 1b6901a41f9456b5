//! Error types for draftguard

use thiserror::Error;

/// Main error type for the autosave and session-lifecycle engines
#[derive(Error, Debug)]
pub enum DraftGuardError {
    /// Save function returned false or failed; recoverable, retried on the
    /// next change or interval tick
    #[error("Persistence failure: {0}")]
    Persistence(String),

    /// Session expiry time unavailable or malformed; the warning is
    /// suppressed but access control is unaffected
    #[error("Session lifetime unknown: {0}")]
    SessionUnknown(String),

    /// Session has reached its expiry; terminal for the current epoch
    #[error("Session expired")]
    SessionExpired,

    /// No principal present after the provider resolved
    #[error("Unauthenticated")]
    Unauthenticated,

    /// Session provider refresh or terminate action failed
    #[error("Provider error: {0}")]
    Provider(String),

    /// Command sent to an engine whose background task has shut down
    #[error("{0} channel closed")]
    ChannelClosed(&'static str),
}

/// Result type alias for draftguard operations
pub type Result<T> = std::result::Result<T, DraftGuardError>;

impl DraftGuardError {
    /// Create a persistence failure error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create a session-unknown error
    pub fn session_unknown(msg: impl Into<String>) -> Self {
        Self::SessionUnknown(msg.into())
    }

    /// Create a provider action error
    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    /// Whether the error is recoverable by a later retry
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::Persistence(_) | Self::SessionUnknown(_) | Self::Provider(_)
        )
    }
}
