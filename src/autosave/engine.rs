//! Interval-gated autosave engine
//!
//! [`AutosaveEngine`] owns a background task that serializes persistence
//! attempts for one piece of mutable form data. Changes are recorded through
//! a command channel; at most one save call is ever in flight, and the next
//! automatic attempt never starts earlier than `interval` after the previous
//! one. Status is published through a `watch` channel for the UI indicator.

use std::sync::Arc;

use futures::future::BoxFuture;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::commands::EngineCommand;
use super::options::AutosaveOptions;
use super::status::{AutosaveIndicator, AutosaveState, AutosaveStatus};
use crate::error::{DraftGuardError, Result};

/// Caller-supplied persistence function
///
/// Must be idempotent under repeated identical-data calls. Failure is
/// signaled by `Ok(false)` or `Err`, never a silent no-op.
pub type SaveFn<T> = Arc<dyn Fn(T) -> BoxFuture<'static, Result<bool>> + Send + Sync>;

/// Handle to a running autosave loop
///
/// Dropping the handle aborts the background task, so no timer or callback
/// can fire after the hosting view stops observing the engine. Prefer
/// [`shutdown`](Self::shutdown) for a graceful stop.
pub struct AutosaveEngine<T> {
    command_tx: mpsc::UnboundedSender<EngineCommand<T>>,
    state_rx: watch::Receiver<AutosaveState>,
    task: JoinHandle<()>,
}

impl<T> AutosaveEngine<T>
where
    T: Clone + PartialEq + Send + 'static,
{
    /// Spawn an engine for one piece of form data
    #[must_use]
    pub fn spawn(save: SaveFn<T>, options: AutosaveOptions) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(AutosaveState::initial());

        let task = spawn_engine_task(save, options, command_rx, state_tx);

        Self {
            command_tx,
            state_rx,
            task,
        }
    }

    /// Record a change to the tracked data
    ///
    /// Marks the state pending unless the value equals the last successfully
    /// saved value. Never blocks and never mutates the caller's data.
    pub fn update(&self, data: T) -> Result<()> {
        self.command_tx
            .send(EngineCommand::Update { data })
            .map_err(|_| DraftGuardError::ChannelClosed("autosave command"))
    }

    /// Force an immediate save attempt, bypassing the interval gate
    ///
    /// Resolves once every change recorded before the call has been
    /// persisted, including a change held while an attempt was already in
    /// flight, or immediately when nothing is pending. A failed attempt
    /// resolves with the failure. Used to persist a draft before abandoning
    /// an edit session.
    pub async fn flush(&self) -> Result<()> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(EngineCommand::Flush { response_tx })
            .map_err(|_| DraftGuardError::ChannelClosed("autosave command"))?;
        response_rx
            .await
            .map_err(|_| DraftGuardError::ChannelClosed("autosave flush"))?
    }

    /// Subscribe to status transitions
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AutosaveState> {
        self.state_rx.clone()
    }

    /// Current status snapshot
    #[must_use]
    pub fn state(&self) -> AutosaveState {
        self.state_rx.borrow().clone()
    }

    /// Snapshot for the UI indicator
    #[must_use]
    pub fn indicator(&self) -> AutosaveIndicator {
        AutosaveIndicator::from(&*self.state_rx.borrow())
    }

    /// Shut the engine down gracefully
    ///
    /// Pending timers are cancelled; an in-flight attempt is dropped.
    pub async fn shutdown(&mut self) -> Result<()> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(EngineCommand::Shutdown { response_tx })
            .map_err(|_| DraftGuardError::ChannelClosed("autosave command"))?;
        response_rx
            .await
            .map_err(|_| DraftGuardError::ChannelClosed("autosave shutdown"))
    }
}

impl<T> Drop for AutosaveEngine<T> {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn the background task that owns all engine state
///
/// The task runs a `select!` loop over the command channel, the interval
/// ticker, and the in-flight save future. It is the only writer of the
/// published [`AutosaveState`].
fn spawn_engine_task<T>(
    save: SaveFn<T>,
    options: AutosaveOptions,
    mut command_rx: mpsc::UnboundedReceiver<EngineCommand<T>>,
    state_tx: watch::Sender<AutosaveState>,
) -> JoinHandle<()>
where
    T: Clone + PartialEq + Send + 'static,
{
    tokio::spawn(async move {
        let mut state = AutosaveState::initial();
        let mut pending: Option<T> = None;
        let mut last_saved: Option<T> = None;
        let mut in_flight: Option<BoxFuture<'static, Result<bool>>> = None;
        let mut in_flight_data: Option<T> = None;
        let mut flush_waiters: Vec<oneshot::Sender<Result<()>>> = Vec::new();

        // First automatic attempt no earlier than one interval after spawn
        let mut ticker = time::interval_at(
            time::Instant::now() + options.interval,
            options.interval,
        );
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                cmd = command_rx.recv() => match cmd {
                    Some(EngineCommand::Update { data }) => {
                        if in_flight.is_none()
                            && pending.is_none()
                            && last_saved.as_ref() == Some(&data)
                        {
                            // Unchanged since the last successful save
                            log::trace!("autosave: change matches saved value, skipping");
                            continue;
                        }
                        pending = Some(data);
                        state.has_unsaved_changes = true;
                        if in_flight.is_none() {
                            state.status = AutosaveStatus::Pending;
                        }
                        state_tx.send_replace(state.clone());
                    }
                    Some(EngineCommand::Flush { response_tx }) => {
                        if pending.is_some() && pending == last_saved {
                            // Value circled back to what is already persisted
                            pending = None;
                            state.has_unsaved_changes = false;
                            if state.status == AutosaveStatus::Pending {
                                state.status = AutosaveStatus::Saved;
                            }
                            state_tx.send_replace(state.clone());
                        }
                        if in_flight.is_some() {
                            flush_waiters.push(response_tx);
                        } else if pending.is_some() {
                            flush_waiters.push(response_tx);
                            begin_attempt(
                                &save,
                                &mut pending,
                                &mut in_flight,
                                &mut in_flight_data,
                                &mut state,
                                &state_tx,
                            );
                            // Keep minimum spacing after a forced attempt
                            ticker.reset();
                        } else {
                            let _ = response_tx.send(Ok(()));
                        }
                    }
                    Some(EngineCommand::Shutdown { response_tx }) => {
                        let _ = response_tx.send(());
                        break;
                    }
                    None => break,
                },
                _ = ticker.tick(), if in_flight.is_none() && pending.is_some() => {
                    if pending == last_saved {
                        // Value circled back to what is already persisted
                        pending = None;
                        state.has_unsaved_changes = false;
                        if state.status == AutosaveStatus::Pending {
                            state.status = AutosaveStatus::Saved;
                        }
                        state_tx.send_replace(state.clone());
                        continue;
                    }
                    begin_attempt(
                        &save,
                        &mut pending,
                        &mut in_flight,
                        &mut in_flight_data,
                        &mut state,
                        &state_tx,
                    );
                },
                result = async {
                    match in_flight.as_mut() {
                        Some(fut) => fut.await,
                        // Unreachable: arm gated on in_flight.is_some()
                        None => Ok(false),
                    }
                }, if in_flight.is_some() => {
                    in_flight = None;
                    let attempted = in_flight_data.take();

                    match result {
                        Ok(true) => {
                            let saved_at = options.clock.now();
                            last_saved = attempted;
                            if pending == last_saved {
                                pending = None;
                            }
                            state.last_saved_at = Some(saved_at);
                            state.last_error = None;
                            state.has_unsaved_changes = pending.is_some();
                            state.status = if pending.is_some() {
                                AutosaveStatus::Pending
                            } else {
                                AutosaveStatus::Saved
                            };
                            state_tx.send_replace(state.clone());

                            if let Some(callback) = &options.on_save_success {
                                callback(saved_at);
                            }
                            if !flush_waiters.is_empty() && pending.is_some() {
                                // A flush is waiting on a change that arrived
                                // mid-attempt; it is not safe until the held
                                // value is persisted too
                                begin_attempt(
                                    &save,
                                    &mut pending,
                                    &mut in_flight,
                                    &mut in_flight_data,
                                    &mut state,
                                    &state_tx,
                                );
                                ticker.reset();
                            } else {
                                for waiter in flush_waiters.drain(..) {
                                    let _ = waiter.send(Ok(()));
                                }
                            }
                        }
                        outcome => {
                            let error = match outcome {
                                Err(e) => DraftGuardError::persistence(e.to_string()),
                                _ => DraftGuardError::persistence("save function returned false"),
                            };
                            log::debug!("autosave: attempt failed: {error}");

                            // Re-arm the unsaved value unless a newer change
                            // already superseded it
                            if pending.is_none() {
                                pending = attempted;
                            }
                            state.last_error = Some(error.to_string());
                            state.has_unsaved_changes = true;
                            state.status = AutosaveStatus::Error;
                            state_tx.send_replace(state.clone());

                            if let Some(callback) = &options.on_save_error {
                                callback(&error);
                            }
                            for waiter in flush_waiters.drain(..) {
                                let _ = waiter.send(Err(DraftGuardError::persistence(
                                    error.to_string(),
                                )));
                            }
                        }
                    }
                },
            }
        }
    })
}

/// Move the pending value into flight and invoke the save function
fn begin_attempt<T>(
    save: &SaveFn<T>,
    pending: &mut Option<T>,
    in_flight: &mut Option<BoxFuture<'static, Result<bool>>>,
    in_flight_data: &mut Option<T>,
    state: &mut AutosaveState,
    state_tx: &watch::Sender<AutosaveState>,
) where
    T: Clone + PartialEq + Send + 'static,
{
    let Some(data) = pending.take() else {
        return;
    };
    log::trace!("autosave: starting save attempt");
    *in_flight_data = Some(data.clone());
    *in_flight = Some(save(data));
    state.status = AutosaveStatus::Saving;
    state.has_unsaved_changes = true;
    state_tx.send_replace(state.clone());
}
