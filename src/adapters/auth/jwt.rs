//! HMAC-signed JWT adapter for caller verification.
//!
//! This adapter implements the `IdentityProvider` port by validating
//! bearer tokens signed with a shared HMAC secret. It checks:
//!
//! 1. Signature against the configured secret (HS256)
//! 2. Issuer, audience, and expiry claims
//! 3. Role claim maps to a known [`Role`]
//!
//! The resulting [`CallerContext`] is passed explicitly into every
//! application operation; nothing downstream re-reads the token.
//!
//! # Example
//!
//! ```ignore
//! use rentledger::adapters::auth::{JwtConfig, JwtIdentityProvider};
//! use rentledger::ports::IdentityProvider;
//!
//! let config = JwtConfig::new("shared-secret", "https://auth.rentledger.io", "rentledger-api");
//! let provider = JwtIdentityProvider::new(config);
//! let caller = provider.verify_token("eyJ...").await?;
//! ```

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, TokenData, Validation};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AuthError, CallerContext, Role, UserId};
use crate::ports::IdentityProvider;

/// Configuration for the JWT identity adapter.
#[derive(Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret the tokens are signed with.
    pub secret: Secret<String>,

    /// Expected issuer claim. Tokens from other issuers are rejected.
    pub issuer: String,

    /// Expected audience claim.
    pub audience: String,
}

impl JwtConfig {
    /// Create a new configuration with required fields.
    pub fn new(
        secret: impl Into<String>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
    ) -> Self {
        Self {
            secret: Secret::new(secret.into()),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

/// JWT claims carried by rentledger access tokens.
#[derive(Debug, Serialize, Deserialize)]
struct AccessClaims {
    /// Subject - the user ID
    sub: String,

    /// Issuer
    iss: String,

    /// Audience
    aud: String,

    /// Expiry timestamp (Unix epoch seconds)
    exp: i64,

    /// Caller role ("tenant", "owner", or "admin")
    role: String,

    /// Whether the caller has completed identity verification
    #[serde(default)]
    verified: bool,
}

/// HMAC JWT identity provider.
///
/// Validates bearer tokens against a shared secret and maps their claims
/// to a [`CallerContext`]. This is the production implementation of
/// `IdentityProvider`.
pub struct JwtIdentityProvider {
    config: JwtConfig,
    decoding_key: DecodingKey,
}

impl JwtIdentityProvider {
    /// Create a new provider from configuration.
    pub fn new(config: JwtConfig) -> Self {
        let decoding_key = DecodingKey::from_secret(config.secret.expose_secret().as_bytes());
        Self {
            config,
            decoding_key,
        }
    }

    /// Validate a token's signature and registered claims.
    fn validate_token(&self, token: &str) -> Result<TokenData<AccessClaims>, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        decode::<AccessClaims>(token, &self.decoding_key, &validation).map_err(|e| {
            use jsonwebtoken::errors::ErrorKind;
            match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Token expired");
                    AuthError::TokenExpired
                }
                ErrorKind::InvalidIssuer => {
                    tracing::warn!("Invalid issuer in token");
                    AuthError::InvalidToken
                }
                ErrorKind::InvalidAudience => {
                    tracing::warn!("Invalid audience in token");
                    AuthError::InvalidToken
                }
                _ => {
                    tracing::debug!("Token validation failed: {}", e);
                    AuthError::InvalidToken
                }
            }
        })
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify_token(&self, token: &str) -> Result<CallerContext, AuthError> {
        let token_data = self.validate_token(token)?;
        let claims = token_data.claims;

        let role = Role::parse(&claims.role).ok_or_else(|| {
            tracing::warn!("Unknown role claim in token: {}", claims.role);
            AuthError::UnknownRole(claims.role.clone())
        })?;

        let user_id = UserId::new(&claims.sub).map_err(|_| {
            tracing::warn!("Invalid user ID in token subject");
            AuthError::InvalidToken
        })?;

        Ok(CallerContext::new(user_id, role, claims.verified))
    }
}

impl std::fmt::Debug for JwtIdentityProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtIdentityProvider")
            .field("issuer", &self.config.issuer)
            .field("audience", &self.config.audience)
            .finish_non_exhaustive()
    }
}
