//! Autosave engine
//!
//! Provides [`AutosaveEngine`] for periodically persisting in-progress form
//! data without blocking the user, with serialized save attempts, no-op
//! detection, and a `watch`-published status signal for a UI indicator.
//!
//! # Module Structure
//!
//! - `engine` - `AutosaveEngine` handle and background task
//! - `commands` - Command protocol for the background task
//! - `options` - `AutosaveOptions` and builder
//! - `status` - Status signal and indicator snapshot

mod commands;
mod engine;
mod options;
mod status;

pub use engine::{AutosaveEngine, SaveFn};
pub use options::{AutosaveOptions, AutosaveOptionsBuilder, SaveErrorCallback, SaveSuccessCallback};
pub use status::{AutosaveIndicator, AutosaveState, AutosaveStatus};
