//! Integration tests for `RouteGuard`
//!
//! The guard holds no state: every evaluation is a pure function of the
//! provider snapshot, so the decision table is exercised directly.

use chrono::Utc;

use draftguard::{GuardOutcome, Principal, RouteGuard, SessionSnapshot};

#[test]
fn decision_table_over_provider_states() {
    let guard = RouteGuard::new("/login");

    // Resolving: loading affordance, even when a stale principal is present
    assert_eq!(guard.evaluate(&SessionSnapshot::loading()), GuardOutcome::Loading);
    let loading_with_principal = SessionSnapshot {
        principal: Some(Principal::new("user-1")),
        is_loading: true,
        expires_at: None,
    };
    assert_eq!(guard.evaluate(&loading_with_principal), GuardOutcome::Loading);

    // Resolved and authenticated: allow, expiry knowledge not required
    let resolved = SessionSnapshot {
        principal: Some(Principal::new("user-1")),
        is_loading: false,
        expires_at: Some(Utc::now() + chrono::Duration::hours(1)),
    };
    assert_eq!(guard.evaluate(&resolved), GuardOutcome::Allow);

    // Resolved and signed out: history-replacing redirect
    assert_eq!(
        guard.evaluate(&SessionSnapshot::signed_out()),
        GuardOutcome::Redirect {
            to: "/login".to_string(),
            replace: true,
        }
    );
}

#[test]
fn reevaluation_follows_provider_transitions() {
    let guard = RouteGuard::new("/");
    let mut snapshot = SessionSnapshot::loading();
    assert_eq!(guard.evaluate(&snapshot), GuardOutcome::Loading);

    snapshot.is_loading = false;
    snapshot.principal = Some(Principal::new("user-9"));
    assert_eq!(guard.evaluate(&snapshot), GuardOutcome::Allow);

    // Session terminated out from under the view
    snapshot.principal = None;
    assert!(matches!(
        guard.evaluate(&snapshot),
        GuardOutcome::Redirect { replace: true, .. }
    ));
}
