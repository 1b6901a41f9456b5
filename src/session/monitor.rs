//! Session lifecycle monitor
//!
//! [`SessionLifecycleMonitor`] owns a background tick task that counts down
//! to the externally-supplied session expiry, opens a warning surface once
//! per epoch when the threshold is crossed, and drives `extend`/`logout`
//! through the provider's own actions. The machine moves between `Active`,
//! `Warning`, and `Expired`; a refreshed expiry starts a new epoch.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time;

use super::commands::MonitorCommand;
use super::options::MonitorOptions;
use super::provider::SessionProvider;
use super::warning::{SessionActions, SessionPhase, SessionWarning, WarningSurface, format_remaining};
use crate::error::{DraftGuardError, Result};

/// Handle to a running session-lifecycle monitor
///
/// Dropping the handle aborts the tick task, so no warning or termination
/// side effect can fire after the hosting view unmounts.
pub struct SessionLifecycleMonitor {
    command_tx: mpsc::UnboundedSender<MonitorCommand>,
    warning_rx: watch::Receiver<SessionWarning>,
    phase_rx: watch::Receiver<SessionPhase>,
    task: JoinHandle<()>,
}

impl SessionLifecycleMonitor {
    /// Spawn a monitor over the given provider
    #[must_use]
    pub fn spawn(provider: Arc<dyn SessionProvider>, options: MonitorOptions) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (warning_tx, warning_rx) = watch::channel(SessionWarning::closed());
        let (phase_tx, phase_rx) = watch::channel(SessionPhase::Active);

        let task = spawn_monitor_task(provider, options, command_rx, warning_tx, phase_tx);

        Self {
            command_tx,
            warning_rx,
            phase_rx,
            task,
        }
    }

    /// Subscribe to warning-surface state
    #[must_use]
    pub fn warning(&self) -> watch::Receiver<SessionWarning> {
        self.warning_rx.clone()
    }

    /// Subscribe to state-machine phase transitions
    #[must_use]
    pub fn phase(&self) -> watch::Receiver<SessionPhase> {
        self.phase_rx.clone()
    }

    /// Clonable extend/logout handle for the presentation layer
    #[must_use]
    pub fn actions(&self) -> SessionActions {
        SessionActions {
            command_tx: self.command_tx.clone(),
        }
    }

    /// Snapshot of the presentation contract for the warning modal
    #[must_use]
    pub fn surface(&self) -> WarningSurface {
        let warning = self.warning_rx.borrow().clone();
        WarningSurface {
            is_open: warning.is_open,
            time_remaining: warning.time_remaining,
            actions: self.actions(),
        }
    }

    /// Extend the session; resolves with the provider's refresh outcome
    ///
    /// The warning closes immediately regardless of the outcome.
    pub async fn extend(&self) -> Result<()> {
        self.actions().extend().await
    }

    /// Log out now; resolves with the provider's terminate outcome
    pub async fn logout(&self) -> Result<()> {
        self.actions().logout().await
    }

    /// Shut the monitor down gracefully
    pub async fn shutdown(&mut self) -> Result<()> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(MonitorCommand::Shutdown { response_tx })
            .map_err(|_| DraftGuardError::ChannelClosed("session command"))?;
        response_rx
            .await
            .map_err(|_| DraftGuardError::ChannelClosed("session shutdown"))
    }
}

impl Drop for SessionLifecycleMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Mutable state owned by the tick task
struct MonitorState {
    phase: SessionPhase,
    warning: SessionWarning,
    /// Epoch (`expires_at` value) whose warning has opened or been spent
    warned_epoch: Option<DateTime<Utc>>,
    /// Epoch already terminated, so hard expiry fires terminate once
    terminated_epoch: Option<DateTime<Utc>>,
    /// Whether a principal has been observed, so a provider-side sign-out
    /// is distinguishable from never having signed in
    saw_principal: bool,
    /// Suppresses repeated warn logs while expiry stays unknown
    unknown_logged: bool,
    warning_tx: watch::Sender<SessionWarning>,
    phase_tx: watch::Sender<SessionPhase>,
}

impl MonitorState {
    fn set_phase(&mut self, phase: SessionPhase) {
        if self.phase != phase {
            log::debug!("session: {:?} -> {:?}", self.phase, phase);
            self.phase = phase;
            self.phase_tx.send_replace(phase);
        }
    }

    fn open_warning(&mut self, time_remaining: String) {
        self.warning = SessionWarning {
            is_open: true,
            time_remaining,
        };
        self.warning_tx.send_replace(self.warning.clone());
    }

    fn refresh_warning(&mut self, time_remaining: String) {
        if self.warning.time_remaining != time_remaining {
            self.warning.time_remaining = time_remaining;
            self.warning_tx.send_replace(self.warning.clone());
        }
    }

    fn close_warning(&mut self) {
        if self.warning.is_open {
            self.warning = SessionWarning::closed();
            self.warning_tx.send_replace(self.warning.clone());
        }
    }
}

fn spawn_monitor_task(
    provider: Arc<dyn SessionProvider>,
    options: MonitorOptions,
    mut command_rx: mpsc::UnboundedReceiver<MonitorCommand>,
    warning_tx: watch::Sender<SessionWarning>,
    phase_tx: watch::Sender<SessionPhase>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut state = MonitorState {
            phase: SessionPhase::Active,
            warning: SessionWarning::closed(),
            warned_epoch: None,
            terminated_epoch: None,
            saw_principal: false,
            unknown_logged: false,
            warning_tx,
            phase_tx,
        };

        // First tick fires immediately so a session already inside the
        // threshold warns without waiting a full cadence
        let mut ticker = time::interval(options.tick);
        ticker.set_missed_tick_behavior(time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                cmd = command_rx.recv() => match cmd {
                    Some(MonitorCommand::Extend { response_tx }) => {
                        // Spend the current epoch first: the warning must not
                        // re-open unless a refreshed expiry crosses the
                        // threshold again
                        state.warned_epoch = provider.snapshot().expires_at;
                        state.close_warning();
                        state.set_phase(SessionPhase::Active);

                        let result = provider.refresh().await;
                        if let Err(e) = &result {
                            log::warn!("session: refresh failed: {e}");
                        }
                        let _ = response_tx.send(result);
                    }
                    Some(MonitorCommand::Logout { response_tx }) => {
                        state.terminated_epoch = provider.snapshot().expires_at;
                        state.close_warning();
                        state.set_phase(SessionPhase::Expired);

                        let result = provider.terminate().await;
                        if let Err(e) = &result {
                            log::warn!("session: terminate failed: {e}");
                        }
                        let _ = response_tx.send(result);
                    }
                    Some(MonitorCommand::Shutdown { response_tx }) => {
                        let _ = response_tx.send(());
                        break;
                    }
                    None => break,
                },
                _ = ticker.tick() => {
                    evaluate_tick(provider.as_ref(), &options, &mut state).await;
                },
            }
        }
    })
}

/// One evaluation of the countdown against the provider's current state
async fn evaluate_tick(
    provider: &dyn SessionProvider,
    options: &MonitorOptions,
    state: &mut MonitorState,
) {
    let snapshot = provider.snapshot();

    // Session truth not yet known: nothing to count down
    if snapshot.is_loading {
        state.close_warning();
        return;
    }

    if snapshot.principal.is_none() {
        state.close_warning();
        // The provider ended the session from its side; the epoch is over
        // even though neither expiry nor logout fired here
        if state.saw_principal {
            state.saw_principal = false;
            state.set_phase(SessionPhase::Expired);
        }
        return;
    }
    state.saw_principal = true;

    let Some(expires_at) = snapshot.expires_at else {
        // Fail open on the warning only; access control stays with the guard
        if !state.unknown_logged {
            log::warn!("session: expiry unavailable, suppressing warning");
            state.unknown_logged = true;
        }
        state.close_warning();
        return;
    };
    state.unknown_logged = false;

    let now = options.clock.now();

    if now >= expires_at {
        if state.terminated_epoch != Some(expires_at) {
            state.terminated_epoch = Some(expires_at);
            state.close_warning();
            state.set_phase(SessionPhase::Expired);
            if let Err(e) = provider.terminate().await {
                log::warn!("session: terminate on expiry failed: {e}");
            }
        }
        return;
    }

    let remaining = expires_at - now;
    let threshold = chrono::Duration::from_std(options.warning_threshold)
        .unwrap_or_else(|_| chrono::Duration::MAX);

    if remaining <= threshold {
        if state.warned_epoch != Some(expires_at) {
            state.warned_epoch = Some(expires_at);
            state.set_phase(SessionPhase::Warning);
            state.open_warning(format_remaining(remaining));
        } else if state.warning.is_open {
            state.refresh_warning(format_remaining(remaining));
        }
    } else {
        // A refreshed or replacement session epoch returns the machine to
        // Active and closes any stale warning
        state.close_warning();
        state.set_phase(SessionPhase::Active);
    }
}
