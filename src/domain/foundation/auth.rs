//! Caller identity types for the domain layer.
//!
//! Every state-machine and ledger operation takes an explicit
//! [`CallerContext`] parameter. Authorization decisions are made against
//! that value alone; nothing in the domain reads ambient session state.
//! The identity provider (JWT adapter, or a mock in tests) populates the
//! context via the `IdentityProvider` port.

use super::UserId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Role assigned to a caller by the identity provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Requests bookings, chats in property channels.
    Tenant,
    /// Approves/rejects bookings on own properties, posts announcements.
    Owner,
    /// Settles payouts, sees everything.
    Admin,
}

impl Role {
    /// Stable string form used in tokens and logs.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Tenant => "tenant",
            Role::Owner => "owner",
            Role::Admin => "admin",
        }
    }

    /// Parses a role from its string form.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "tenant" => Some(Role::Tenant),
            "owner" => Some(Role::Owner),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }
}

/// Authenticated caller passed into every domain operation.
///
/// This is a **domain type** with no provider dependencies. Any identity
/// provider can populate it through the `IdentityProvider` port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    /// Stable user id from the identity provider.
    pub user_id: UserId,

    /// The caller's role.
    pub role: Role,

    /// Whether the caller has completed identity verification.
    ///
    /// Owners must be verified before they may approve bookings.
    pub verified: bool,
}

impl CallerContext {
    /// Creates a new caller context.
    pub fn new(user_id: UserId, role: Role, verified: bool) -> Self {
        Self {
            user_id,
            role,
            verified,
        }
    }

    /// Convenience constructor for a tenant caller.
    pub fn tenant(user_id: UserId) -> Self {
        Self::new(user_id, Role::Tenant, true)
    }

    /// Convenience constructor for a verified owner caller.
    pub fn owner(user_id: UserId) -> Self {
        Self::new(user_id, Role::Owner, true)
    }

    /// Convenience constructor for an admin caller.
    pub fn admin(user_id: UserId) -> Self {
        Self::new(user_id, Role::Admin, true)
    }

    /// True if the caller holds the given role.
    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// True if the caller is the given user.
    pub fn is_user(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}

/// Authentication errors that can occur during token validation.
#[derive(Debug, Clone, Error)]
pub enum AuthError {
    /// The token is missing, malformed, or has an invalid signature.
    #[error("Invalid or expired token")]
    InvalidToken,

    /// The token has expired (separate from InvalidToken for specific handling).
    #[error("Token expired")]
    TokenExpired,

    /// Token is valid but carries an unknown role claim.
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// The authentication service is unavailable (network, config, etc.).
    #[error("Auth service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl AuthError {
    /// Creates a service unavailable error with a message.
    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable(message.into())
    }

    /// Returns true if this is a transient error that may succeed on retry.
    pub fn is_transient(&self) -> bool {
        matches!(self, AuthError::ServiceUnavailable(_))
    }
}
