//! Autosave engine options and configuration

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::clock::{SharedClock, SystemClock};
use crate::error::DraftGuardError;

/// Callback invoked after each successful save with the save timestamp
pub type SaveSuccessCallback = Arc<dyn Fn(DateTime<Utc>) + Send + Sync>;

/// Callback invoked after each failed save with the failure
pub type SaveErrorCallback = Arc<dyn Fn(&DraftGuardError) + Send + Sync>;

/// Options for [`AutosaveEngine`]
///
/// [`AutosaveEngine`]: super::AutosaveEngine
#[derive(Clone)]
pub struct AutosaveOptions {
    /// Minimum time between automatic save attempts
    pub interval: Duration,
    /// Invoked after each successful save
    pub on_save_success: Option<SaveSuccessCallback>,
    /// Invoked after each failed save
    pub on_save_error: Option<SaveErrorCallback>,
    /// Wall-clock source for `last_saved_at` stamps
    pub clock: SharedClock,
}

impl AutosaveOptions {
    /// Default minimum interval between save attempts
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(3);

    /// Create a new builder for `AutosaveOptions`
    #[must_use]
    pub fn builder() -> AutosaveOptionsBuilder {
        AutosaveOptionsBuilder::default()
    }
}

impl Default for AutosaveOptions {
    fn default() -> Self {
        Self {
            interval: Self::DEFAULT_INTERVAL,
            on_save_success: None,
            on_save_error: None,
            clock: Arc::new(SystemClock),
        }
    }
}

impl std::fmt::Debug for AutosaveOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutosaveOptions")
            .field("interval", &self.interval)
            .field(
                "on_save_success",
                &self.on_save_success.as_ref().map(|_| "<callback>"),
            )
            .field(
                "on_save_error",
                &self.on_save_error.as_ref().map(|_| "<callback>"),
            )
            .finish()
    }
}

/// Builder for [`AutosaveOptions`]
#[derive(Default)]
pub struct AutosaveOptionsBuilder {
    options: AutosaveOptions,
}

impl AutosaveOptionsBuilder {
    /// Set the minimum interval between save attempts
    #[must_use]
    pub fn interval(mut self, interval: Duration) -> Self {
        self.options.interval = interval;
        self
    }

    /// Set the success callback
    #[must_use]
    pub fn on_save_success<F>(mut self, callback: F) -> Self
    where
        F: Fn(DateTime<Utc>) + Send + Sync + 'static,
    {
        self.options.on_save_success = Some(Arc::new(callback));
        self
    }

    /// Set the error callback
    #[must_use]
    pub fn on_save_error<F>(mut self, callback: F) -> Self
    where
        F: Fn(&DraftGuardError) + Send + Sync + 'static,
    {
        self.options.on_save_error = Some(Arc::new(callback));
        self
    }

    /// Set the wall-clock source
    #[must_use]
    pub fn clock(mut self, clock: SharedClock) -> Self {
        self.options.clock = clock;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> AutosaveOptions {
        self.options
    }
}
