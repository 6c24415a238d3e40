//! Mock identity provider for testing.
//!
//! Implements the `IdentityProvider` port without real token
//! verification, so handler and middleware tests can mint callers
//! directly.
//!
//! # Example
//!
//! ```ignore
//! use rentledger::adapters::auth::MockIdentityProvider;
//! use rentledger::domain::foundation::{CallerContext, UserId};
//!
//! let provider = MockIdentityProvider::new()
//!     .with_caller("tenant-token", CallerContext::tenant(UserId::new("t-1").unwrap()));
//!
//! let caller = provider.verify_token("tenant-token").await?;
//! ```

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, CallerContext, UserId};
use crate::ports::IdentityProvider;

/// Mock identity provider for testing.
///
/// Stores a map of tokens to callers. Tokens not in the map return
/// `InvalidToken`.
#[derive(Debug, Default)]
pub struct MockIdentityProvider {
    /// Map of valid tokens to their associated callers
    tokens: RwLock<HashMap<String, CallerContext>>,
    /// Optional error to return for all verifications (for error testing)
    force_error: RwLock<Option<AuthError>>,
}

impl MockIdentityProvider {
    /// Creates a new empty mock provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a valid token that maps to a caller.
    pub fn with_caller(self, token: impl Into<String>, caller: CallerContext) -> Self {
        self.tokens.write().unwrap().insert(token.into(), caller);
        self
    }

    /// Adds a valid token for a tenant with the given user id.
    pub fn with_tenant(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let caller = CallerContext::tenant(UserId::new(&user_id.into()).unwrap());
        self.with_caller(token, caller)
    }

    /// Adds a valid token for a verified owner with the given user id.
    pub fn with_owner(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let caller = CallerContext::owner(UserId::new(&user_id.into()).unwrap());
        self.with_caller(token, caller)
    }

    /// Adds a valid token for an admin with the given user id.
    pub fn with_admin(self, token: impl Into<String>, user_id: impl Into<String>) -> Self {
        let caller = CallerContext::admin(UserId::new(&user_id.into()).unwrap());
        self.with_caller(token, caller)
    }

    /// Forces all verifications to return the specified error.
    pub fn with_error(self, error: AuthError) -> Self {
        *self.force_error.write().unwrap() = Some(error);
        self
    }

    /// Clears the forced error and returns to normal operation.
    pub fn clear_error(&self) {
        *self.force_error.write().unwrap() = None;
    }

    /// Registers a new valid token at runtime.
    pub fn add_token(&self, token: impl Into<String>, caller: CallerContext) {
        self.tokens.write().unwrap().insert(token.into(), caller);
    }

    /// Removes a token, making it invalid.
    pub fn remove_token(&self, token: &str) {
        self.tokens.write().unwrap().remove(token);
    }

    /// Returns the number of registered valid tokens.
    pub fn token_count(&self) -> usize {
        self.tokens.read().unwrap().len()
    }
}

#[async_trait]
impl IdentityProvider for MockIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<CallerContext, AuthError> {
        if let Some(error) = self.force_error.read().unwrap().clone() {
            return Err(error);
        }

        self.tokens
            .read()
            .unwrap()
            .get(token)
            .cloned()
            .ok_or(AuthError::InvalidToken)
    }
}
