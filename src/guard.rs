//! Route guard for protected views
//!
//! A stateless access-control check over the session provider's state. The
//! embedding application re-evaluates it on every provider state change and
//! renders whatever the outcome dictates.

use serde::{Deserialize, Serialize};

use crate::session::SessionSnapshot;

/// Result of evaluating a guarded route against provider state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum GuardOutcome {
    /// Provider still resolving; render a neutral loading affordance
    Loading,
    /// Principal present; render the protected content
    Allow,
    /// Unauthenticated; redirect to the public entry point
    Redirect {
        /// Redirect target
        to: String,
        /// Replace history instead of pushing, so back-navigation does not
        /// return to the guarded route
        replace: bool,
    },
}

/// Stateless wrapper around a protected view's access check
#[derive(Debug, Clone)]
pub struct RouteGuard {
    redirect_to: String,
}

impl RouteGuard {
    /// Create a guard redirecting unauthenticated visitors to the given path
    pub fn new(redirect_to: impl Into<String>) -> Self {
        Self {
            redirect_to: redirect_to.into(),
        }
    }

    /// Evaluate the guard against the provider's current state
    ///
    /// Loading wins over everything; once resolved, a principal allows and
    /// its absence redirects with history replacement.
    #[must_use]
    pub fn evaluate(&self, snapshot: &SessionSnapshot) -> GuardOutcome {
        if snapshot.is_loading {
            return GuardOutcome::Loading;
        }
        if snapshot.principal.is_some() {
            return GuardOutcome::Allow;
        }
        GuardOutcome::Redirect {
            to: self.redirect_to.clone(),
            replace: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Principal;

    fn signed_in() -> SessionSnapshot {
        SessionSnapshot {
            principal: Some(Principal::new("user-1")),
            is_loading: false,
            expires_at: None,
        }
    }

    #[test]
    fn loading_wins_regardless_of_principal() {
        let guard = RouteGuard::new("/");
        let mut snapshot = signed_in();
        snapshot.is_loading = true;
        assert_eq!(guard.evaluate(&snapshot), GuardOutcome::Loading);

        assert_eq!(
            guard.evaluate(&SessionSnapshot::loading()),
            GuardOutcome::Loading
        );
    }

    #[test]
    fn resolved_principal_allows() {
        let guard = RouteGuard::new("/");
        assert_eq!(guard.evaluate(&signed_in()), GuardOutcome::Allow);
    }

    #[test]
    fn resolved_without_principal_redirects_with_replace() {
        let guard = RouteGuard::new("/login");
        assert_eq!(
            guard.evaluate(&SessionSnapshot::signed_out()),
            GuardOutcome::Redirect {
                to: "/login".to_string(),
                replace: true,
            }
        );
    }
}
