//! Identity provider port.
//!
//! Resolves bearer credentials into an explicit [`CallerContext`]. Every
//! operation receives its caller as a parameter; nothing reads identity
//! from ambient state.

use async_trait::async_trait;

use crate::domain::foundation::{AuthError, CallerContext};

/// Port for verifying caller credentials.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a bearer token and produce the caller's context.
    ///
    /// # Errors
    ///
    /// - `InvalidToken` if the token fails signature or claim checks
    /// - `TokenExpired` if the token is past its expiry
    /// - `UnknownRole` if the role claim is unrecognized
    /// - `ServiceUnavailable` if the verifier backend is unreachable
    async fn verify_token(&self, token: &str) -> Result<CallerContext, AuthError>;
}
