//! Integration tests for `AutosaveEngine`
//!
//! All tests run under paused tokio time so interval gating is asserted
//! deterministically with `tokio::time::advance`.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use parking_lot::Mutex;
use tokio_test::{assert_pending, assert_ready_ok, task};

use draftguard::{
    AutosaveEngine, AutosaveOptions, AutosaveStatus, DraftGuardError, ManualClock, SaveFn,
};

/// Save function that records every call and succeeds
fn recording_save(calls: Arc<Mutex<Vec<String>>>) -> SaveFn<String> {
    Arc::new(move |data: String| {
        let calls = calls.clone();
        Box::pin(async move {
            calls.lock().push(data);
            Ok(true)
        })
    })
}

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Let the background task process everything currently runnable
async fn settle() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

async fn advance(duration: Duration) {
    tokio::time::advance(duration).await;
    settle().await;
}

#[tokio::test(start_paused = true)]
async fn coalesces_changes_into_single_attempt() {
    init_logging();
    let calls = Arc::new(Mutex::new(Vec::new()));
    let options = AutosaveOptions::builder()
        .interval(Duration::from_millis(3000))
        .build();
    let engine = AutosaveEngine::spawn(recording_save(calls.clone()), options);

    engine.update("t0 draft".to_string()).unwrap();
    settle().await;
    advance(Duration::from_millis(500)).await;
    engine.update("t500 draft".to_string()).unwrap();
    settle().await;

    // Nothing may fire before the interval elapses
    advance(Duration::from_millis(2400)).await;
    assert!(calls.lock().is_empty());
    assert_eq!(engine.state().status, AutosaveStatus::Pending);
    assert!(engine.indicator().has_unsaved_changes);

    // One attempt at t >= 3000 carrying the latest value
    advance(Duration::from_millis(200)).await;
    assert_eq!(*calls.lock(), vec!["t500 draft".to_string()]);
    assert_eq!(engine.state().status, AutosaveStatus::Saved);
    assert!(engine.state().last_saved_at.is_some());
    assert!(!engine.indicator().has_unsaved_changes);

    // No second attempt without a new change
    advance(Duration::from_millis(6000)).await;
    assert_eq!(calls.lock().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn unchanged_data_is_not_resaved() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let options = AutosaveOptions::builder()
        .interval(Duration::from_millis(1000))
        .build();
    let engine = AutosaveEngine::spawn(recording_save(calls.clone()), options);

    engine.update("draft".to_string()).unwrap();
    settle().await;
    advance(Duration::from_millis(1100)).await;
    assert_eq!(calls.lock().len(), 1);

    // Same value again: no-op detection suppresses the attempt
    engine.update("draft".to_string()).unwrap();
    settle().await;
    advance(Duration::from_millis(2000)).await;
    assert_eq!(calls.lock().len(), 1);
    assert_eq!(engine.state().status, AutosaveStatus::Saved);
}

#[tokio::test(start_paused = true)]
async fn no_attempt_fires_after_drop() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let options = AutosaveOptions::builder()
        .interval(Duration::from_millis(3000))
        .build();
    let engine = AutosaveEngine::spawn(recording_save(calls.clone()), options);

    engine.update("abandoned draft".to_string()).unwrap();
    settle().await;
    advance(Duration::from_millis(1000)).await;
    drop(engine);

    advance(Duration::from_millis(10_000)).await;
    assert!(calls.lock().is_empty());
}

#[tokio::test(start_paused = true)]
async fn failed_save_reports_error_and_rearm_retries() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let attempts = Arc::new(AtomicUsize::new(0));
    let errors = Arc::new(AtomicUsize::new(0));
    let successes = Arc::new(AtomicUsize::new(0));

    let save: SaveFn<String> = {
        let calls = calls.clone();
        let attempts = attempts.clone();
        Arc::new(move |data: String| {
            let calls = calls.clone();
            let attempts = attempts.clone();
            Box::pin(async move {
                calls.lock().push(data);
                if attempts.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err(DraftGuardError::persistence("backend unavailable"))
                } else {
                    Ok(true)
                }
            })
        })
    };

    let options = AutosaveOptions::builder()
        .interval(Duration::from_millis(1000))
        .on_save_error({
            let errors = errors.clone();
            move |_| {
                errors.fetch_add(1, Ordering::SeqCst);
            }
        })
        .on_save_success({
            let successes = successes.clone();
            move |_| {
                successes.fetch_add(1, Ordering::SeqCst);
            }
        })
        .build();
    let engine = AutosaveEngine::spawn(save, options);

    engine.update("first".to_string()).unwrap();
    settle().await;
    advance(Duration::from_millis(1100)).await;
    assert_eq!(engine.state().status, AutosaveStatus::Error);
    assert!(engine.state().last_error.is_some());
    assert!(engine.indicator().has_unsaved_changes);
    assert_eq!(errors.load(Ordering::SeqCst), 1);

    // An unrelated change re-arms a fresh attempt without manual reset
    engine.update("second".to_string()).unwrap();
    settle().await;
    advance(Duration::from_millis(1100)).await;
    assert_eq!(*calls.lock(), vec!["first".to_string(), "second".to_string()]);
    assert_eq!(engine.state().status, AutosaveStatus::Saved);
    assert!(engine.state().last_error.is_none());
    assert_eq!(successes.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn falsy_save_result_counts_as_failure() {
    let options = AutosaveOptions::builder()
        .interval(Duration::from_millis(500))
        .build();
    let save: SaveFn<String> = Arc::new(|_| Box::pin(async { Ok(false) }));
    let engine = AutosaveEngine::spawn(save, options);

    engine.update("draft".to_string()).unwrap();
    settle().await;
    advance(Duration::from_millis(600)).await;
    assert_eq!(engine.state().status, AutosaveStatus::Error);
    assert!(
        engine
            .state()
            .last_error
            .unwrap()
            .contains("returned false")
    );
}

#[tokio::test(start_paused = true)]
async fn never_more_than_one_save_in_flight() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let (release_tx, release_rx) = tokio::sync::mpsc::unbounded_channel::<()>();
    let release_rx = Arc::new(tokio::sync::Mutex::new(release_rx));

    let save: SaveFn<String> = {
        let calls = calls.clone();
        Arc::new(move |data: String| {
            let calls = calls.clone();
            let release_rx = release_rx.clone();
            Box::pin(async move {
                calls.lock().push(data);
                release_rx.lock().await.recv().await;
                Ok(true)
            })
        })
    };

    let options = AutosaveOptions::builder()
        .interval(Duration::from_millis(1000))
        .build();
    let engine = AutosaveEngine::spawn(save, options);

    engine.update("first".to_string()).unwrap();
    settle().await;
    advance(Duration::from_millis(1100)).await;
    assert_eq!(engine.state().status, AutosaveStatus::Saving);
    assert!(engine.indicator().is_auto_saving);
    assert_eq!(calls.lock().len(), 1);

    // A change while saving is held as pending; no second call starts
    engine.update("second".to_string()).unwrap();
    settle().await;
    advance(Duration::from_millis(2500)).await;
    assert_eq!(calls.lock().len(), 1);
    assert_eq!(engine.state().status, AutosaveStatus::Saving);

    // First attempt settles; the held change goes out on a later tick
    release_tx.send(()).unwrap();
    settle().await;
    advance(Duration::from_millis(1100)).await;
    assert_eq!(*calls.lock(), vec!["first".to_string(), "second".to_string()]);

    release_tx.send(()).unwrap();
    settle().await;
    assert_eq!(engine.state().status, AutosaveStatus::Saved);
    assert!(!engine.indicator().has_unsaved_changes);
}

#[tokio::test(start_paused = true)]
async fn flush_bypasses_the_interval_gate() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let options = AutosaveOptions::builder()
        .interval(Duration::from_secs(60))
        .build();
    let engine = AutosaveEngine::spawn(recording_save(calls.clone()), options);

    engine.update("urgent draft".to_string()).unwrap();
    settle().await;
    engine.flush().await.unwrap();
    assert_eq!(*calls.lock(), vec!["urgent draft".to_string()]);
    assert_eq!(engine.state().status, AutosaveStatus::Saved);

    // Nothing pending: flush resolves immediately without a call
    engine.flush().await.unwrap();
    assert_eq!(calls.lock().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn flush_while_saving_waits_for_the_held_change() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let (release_tx, release_rx) = tokio::sync::mpsc::unbounded_channel::<()>();
    let release_rx = Arc::new(tokio::sync::Mutex::new(release_rx));

    let save: SaveFn<String> = {
        let calls = calls.clone();
        Arc::new(move |data: String| {
            let calls = calls.clone();
            let release_rx = release_rx.clone();
            Box::pin(async move {
                calls.lock().push(data);
                release_rx.lock().await.recv().await;
                Ok(true)
            })
        })
    };

    let options = AutosaveOptions::builder()
        .interval(Duration::from_millis(1000))
        .build();
    let engine = AutosaveEngine::spawn(save, options);

    engine.update("first".to_string()).unwrap();
    settle().await;
    advance(Duration::from_millis(1100)).await;
    assert_eq!(engine.state().status, AutosaveStatus::Saving);

    // A newer value arrives while the first attempt is in flight
    engine.update("second".to_string()).unwrap();
    settle().await;

    let mut flush = task::spawn(engine.flush());
    assert_pending!(flush.poll());
    settle().await;

    // First attempt settles: the flush must stay open and the held change
    // goes straight into flight
    release_tx.send(()).unwrap();
    settle().await;
    assert_pending!(flush.poll());
    assert_eq!(calls.lock().len(), 2);

    release_tx.send(()).unwrap();
    settle().await;
    assert_ready_ok!(flush.poll());
    assert_eq!(*calls.lock(), vec!["first".to_string(), "second".to_string()]);
    assert_eq!(engine.state().status, AutosaveStatus::Saved);
    assert!(!engine.indicator().has_unsaved_changes);
}

#[tokio::test(start_paused = true)]
async fn saved_timestamp_comes_from_the_injected_clock() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let frozen = Utc.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap();
    let clock = ManualClock::new(frozen);

    let options = AutosaveOptions::builder()
        .interval(Duration::from_millis(1000))
        .clock(Arc::new(clock))
        .build();
    let engine = AutosaveEngine::spawn(recording_save(calls.clone()), options);

    engine.update("draft".to_string()).unwrap();
    settle().await;
    advance(Duration::from_millis(1100)).await;
    assert_eq!(engine.state().last_saved_at, Some(frozen));
    assert_eq!(engine.indicator().last_saved, Some(frozen));
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_the_loop_and_rejects_further_updates() {
    let calls = Arc::new(Mutex::new(Vec::new()));
    let options = AutosaveOptions::builder()
        .interval(Duration::from_millis(1000))
        .build();
    let mut engine = AutosaveEngine::spawn(recording_save(calls.clone()), options);

    engine.update("draft".to_string()).unwrap();
    engine.shutdown().await.unwrap();

    advance(Duration::from_millis(5000)).await;
    assert!(calls.lock().is_empty());
    assert!(matches!(
        engine.update("late".to_string()),
        Err(DraftGuardError::ChannelClosed(_))
    ));
}
