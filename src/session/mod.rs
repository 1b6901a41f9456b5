//! Session lifecycle monitoring
//!
//! Provides [`SessionLifecycleMonitor`] for tracking an authenticated
//! session's remaining lifetime, warning before expiry, and extending or
//! terminating through the external provider's actions.
//!
//! # Module Structure
//!
//! - `monitor` - `SessionLifecycleMonitor` handle and tick task
//! - `commands` - Command protocol for the tick task
//! - `options` - `MonitorOptions` and builder
//! - `provider` - External session-provider contract
//! - `warning` - Phase, warning state, and remaining-time formatting

mod commands;
mod monitor;
mod options;
mod provider;
mod warning;

pub use monitor::SessionLifecycleMonitor;
pub use options::{MonitorOptions, MonitorOptionsBuilder};
pub use provider::{Principal, SessionProvider, SessionSnapshot};
pub use warning::{
    SessionActions, SessionPhase, SessionWarning, WarningSurface, format_remaining,
};
