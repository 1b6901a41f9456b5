//! External session provider contract
//!
//! The hosted-auth provider is the authoritative source of the principal and
//! the session expiry. This crate only reads its state and requests refresh
//! or termination through the actions exposed here; it never mutates
//! `expires_at` directly.

use chrono::{DateTime, Utc};
use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Authenticated identity supplied by the hosted-auth provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Principal {
    /// Stable subject identifier
    pub subject: String,

    /// Display name, when the provider supplies one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Provider-specific claims payload
    #[serde(default)]
    pub claims: serde_json::Value,
}

impl Principal {
    /// Create a principal with only a subject identifier
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            display_name: None,
            claims: serde_json::Value::Null,
        }
    }
}

/// Point-in-time view of the provider's state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// Authenticated identity, absent when signed out
    pub principal: Option<Principal>,

    /// True only during initial resolution, before session truth is known
    pub is_loading: bool,

    /// Authoritative session expiry; absent when unknown
    pub expires_at: Option<DateTime<Utc>>,
}

impl SessionSnapshot {
    /// Snapshot representing a provider still resolving
    #[must_use]
    pub fn loading() -> Self {
        Self {
            principal: None,
            is_loading: true,
            expires_at: None,
        }
    }

    /// Snapshot representing a resolved, signed-out provider
    #[must_use]
    pub fn signed_out() -> Self {
        Self {
            principal: None,
            is_loading: false,
            expires_at: None,
        }
    }
}

/// Contract the session-lifecycle monitor consumes
///
/// Implemented by the embedding application over its auth provider. Methods
/// return boxed futures so implementations stay object-safe without an
/// `async_trait` dependency.
pub trait SessionProvider: Send + Sync {
    /// Current provider state
    fn snapshot(&self) -> SessionSnapshot;

    /// Request a refreshed `expires_at` (how is the provider's concern)
    fn refresh(&self) -> BoxFuture<'_, Result<()>>;

    /// Log the principal out and invalidate the session
    fn terminate(&self) -> BoxFuture<'_, Result<()>>;
}
