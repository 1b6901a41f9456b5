//! # draftguard
//!
//! Timer-driven autosave and session-lifecycle engine for client
//! applications. The crate covers the two places where a form-heavy client
//! has real state-machine stakes: persisting in-progress edits without
//! blocking the user, and counting down an authenticated session's remaining
//! lifetime with a warn/extend/terminate loop.
//!
//! ## Autosave
//!
//! [`AutosaveEngine`] owns a background task that serializes save attempts
//! for one piece of form data: changes are recorded immediately, attempts are
//! gated to at most one per interval, at most one persistence call is ever in
//! flight, and unchanged data is never re-saved.
//!
//! ```no_run
//! use std::sync::Arc;
//! use draftguard::{AutosaveEngine, AutosaveOptions, SaveFn};
//!
//! # async fn example() -> draftguard::Result<()> {
//! let save: SaveFn<String> = Arc::new(|draft: String| {
//!     Box::pin(async move {
//!         // persist the draft to the backend
//!         let _ = draft;
//!         Ok(true)
//!     })
//! });
//!
//! let options = AutosaveOptions::builder()
//!     .interval(std::time::Duration::from_secs(3))
//!     .on_save_success(|at| log::info!("draft saved at {at}"))
//!     .build();
//!
//! let engine = AutosaveEngine::spawn(save, options);
//! engine.update("dear hiring manager".to_string())?;
//!
//! let indicator = engine.indicator();
//! assert!(indicator.has_unsaved_changes);
//! # Ok(())
//! # }
//! ```
//!
//! ## Session lifecycle
//!
//! [`SessionLifecycleMonitor`] ticks against an externally-supplied
//! [`SessionProvider`], opens a warning surface exactly once per session
//! epoch when the remaining lifetime crosses the configured threshold, and
//! exposes `extend`/`logout` actions that close the surface and delegate to
//! the provider. [`RouteGuard`] evaluates the same provider state into a
//! loading / allow / replace-redirect decision for protected views.
//!
//! ```no_run
//! use std::sync::Arc;
//! use draftguard::{MonitorOptions, RouteGuard, SessionLifecycleMonitor};
//! # use draftguard::SessionProvider;
//!
//! # async fn example(provider: Arc<dyn SessionProvider>) -> draftguard::Result<()> {
//! let monitor = SessionLifecycleMonitor::spawn(
//!     provider.clone(),
//!     MonitorOptions::builder()
//!         .warning_threshold(std::time::Duration::from_secs(5 * 60))
//!         .build(),
//! );
//!
//! let surface = monitor.surface();
//! if surface.is_open {
//!     // render the modal; wire surface.actions.extend() / .logout()
//! }
//!
//! let guard = RouteGuard::new("/login");
//! let _outcome = guard.evaluate(&provider.snapshot());
//! # Ok(())
//! # }
//! ```
//!
//! ## Design
//!
//! Each engine is a spawned task owning its timers and state; handles
//! communicate over command channels and observe through `watch` channels.
//! Dropping a handle aborts its task, so no timer or callback fires after
//! the hosting view unmounts. Wall-clock reads go through the injectable
//! [`Clock`] so tests drive expiry deterministically.
//!
//! All failures are absorbed into published state (`status`, warning flags,
//! guard outcomes) or returned from the action that caused them; nothing
//! panics the hosting view.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod autosave;
pub mod clock;
pub mod error;
pub mod guard;
pub mod session;

// Re-export commonly used types for external API
pub use autosave::{
    AutosaveEngine, AutosaveIndicator, AutosaveOptions, AutosaveOptionsBuilder, AutosaveState,
    AutosaveStatus, SaveErrorCallback, SaveFn, SaveSuccessCallback,
};
pub use clock::{Clock, ManualClock, SharedClock, SystemClock};
pub use error::{DraftGuardError, Result};
pub use guard::{GuardOutcome, RouteGuard};
pub use session::{
    MonitorOptions, MonitorOptionsBuilder, Principal, SessionActions, SessionLifecycleMonitor,
    SessionPhase, SessionProvider, SessionSnapshot, SessionWarning, WarningSurface,
};

/// Version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
