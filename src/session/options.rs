//! Session monitor options and configuration

use std::sync::Arc;
use std::time::Duration;

use crate::clock::{SharedClock, SystemClock};

/// Options for [`SessionLifecycleMonitor`]
///
/// [`SessionLifecycleMonitor`]: super::SessionLifecycleMonitor
#[derive(Clone)]
pub struct MonitorOptions {
    /// Lead time before expiry at which the warning opens
    pub warning_threshold: Duration,
    /// Cadence at which remaining lifetime is re-evaluated
    pub tick: Duration,
    /// Wall-clock source for expiry arithmetic
    pub clock: SharedClock,
}

impl MonitorOptions {
    /// Default warning lead time
    pub const DEFAULT_WARNING_THRESHOLD: Duration = Duration::from_secs(5 * 60);

    /// Default tick cadence; matches the second-level display precision
    pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

    /// Create a new builder for `MonitorOptions`
    #[must_use]
    pub fn builder() -> MonitorOptionsBuilder {
        MonitorOptionsBuilder::default()
    }
}

impl Default for MonitorOptions {
    fn default() -> Self {
        Self {
            warning_threshold: Self::DEFAULT_WARNING_THRESHOLD,
            tick: Self::DEFAULT_TICK,
            clock: Arc::new(SystemClock),
        }
    }
}

impl std::fmt::Debug for MonitorOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MonitorOptions")
            .field("warning_threshold", &self.warning_threshold)
            .field("tick", &self.tick)
            .finish()
    }
}

/// Builder for [`MonitorOptions`]
#[derive(Default)]
pub struct MonitorOptionsBuilder {
    options: MonitorOptions,
}

impl MonitorOptionsBuilder {
    /// Set the warning lead time
    #[must_use]
    pub fn warning_threshold(mut self, threshold: Duration) -> Self {
        self.options.warning_threshold = threshold;
        self
    }

    /// Set the tick cadence
    #[must_use]
    pub fn tick(mut self, tick: Duration) -> Self {
        self.options.tick = tick;
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
    pub fn build(self) -> MonitorOptions {
        self.options
    }
}
