//! Authentication middleware and extractors for axum.
//!
//! This module provides:
//! - `auth_middleware` - Layer that verifies Bearer tokens and injects the caller into extensions
//! - `RequireCaller` - Extractor that requires an authenticated caller
//!
//! # Architecture
//!
//! The middleware uses the `IdentityProvider` port, keeping it
//! provider-agnostic. Whether tokens come from the production JWT
//! verifier or a mock in tests, the middleware doesn't change.
//!
//! ```text
//! Request → auth_middleware → injects CallerContext into extensions
//!                                      ↓
//!                              Handler → RequireCaller extractor reads from extensions
//! ```
//!
//! # Example
//!
//! ```ignore
//! use axum::{Router, routing::get, middleware};
//! use std::sync::Arc;
//!
//! let provider: Arc<dyn IdentityProvider> = Arc::new(MockIdentityProvider::new());
//!
//! let app = Router::new()
//!     .route("/api/protected", get(protected_handler))
//!     .layer(middleware::from_fn_with_state(provider.clone(), auth_middleware));
//!
//! async fn protected_handler(RequireCaller(caller): RequireCaller) -> String {
//!     format!("Hello, {}!", caller.user_id.as_str())
//! }
//! ```

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::domain::foundation::{AuthError, CallerContext};
use crate::ports::IdentityProvider;

/// Auth middleware state - wraps the identity provider.
pub type AuthState = Arc<dyn IdentityProvider>;

/// Authentication middleware that verifies Bearer tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Verifies the token using the `IdentityProvider` port
/// 3. On success, injects `CallerContext` into request extensions
/// 4. On missing token, continues without injecting (handlers enforce
///    authentication via `RequireCaller`)
/// 5. On invalid token, returns 401 Unauthorized
///
/// # Token Extraction
///
/// Expects the token in the `Authorization` header with `Bearer` prefix:
/// ```text
/// Authorization: Bearer <token>
/// ```
pub async fn auth_middleware(
    State(provider): State<AuthState>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    match token {
        Some(token) => match provider.verify_token(token).await {
            Ok(caller) => {
                request.extensions_mut().insert(caller);
                next.run(request).await
            }
            Err(e) => {
                let (status, message) = match &e {
                    AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
                    AuthError::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid token"),
                    AuthError::UnknownRole(role) => {
                        tracing::warn!(role = %role, "Token carries unknown role");
                        (StatusCode::UNAUTHORIZED, "Unknown role")
                    }
                    AuthError::ServiceUnavailable(msg) => {
                        tracing::error!("Auth service unavailable: {}", msg);
                        (
                            StatusCode::SERVICE_UNAVAILABLE,
                            "Authentication service unavailable",
                        )
                    }
                };

                (
                    status,
                    Json(serde_json::json!({
                        "error": message,
                        "code": "AUTH_ERROR"
                    })),
                )
                    .into_response()
            }
        },
        None => {
            // No token provided - continue without a caller.
            // Handlers use RequireCaller to enforce authentication.
            next.run(request).await
        }
    }
}

/// Extractor that requires an authenticated caller.
///
/// Use this extractor in handlers that require authentication.
/// If no caller is in the request extensions (i.e., auth middleware
/// didn't successfully verify a token), returns 401 Unauthorized.
///
/// # Example
///
/// ```ignore
/// async fn my_handler(RequireCaller(caller): RequireCaller) -> impl IntoResponse {
///     format!("Hello, {}!", caller.user_id.as_str())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct RequireCaller(pub CallerContext);

impl<S> axum::extract::FromRequestParts<S> for RequireCaller
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut axum::http::request::Parts,
        _state: &'life1 S,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            parts
                .extensions
                .get::<CallerContext>()
                .cloned()
                .map(RequireCaller)
                .ok_or(AuthRejection::Unauthenticated)
        })
    }
}

/// Rejection type for authentication failures.
#[derive(Debug, Clone)]
pub enum AuthRejection {
    /// No valid authentication token was provided.
    Unauthenticated,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthRejection::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, "Authentication required")
            }
        };

        (
            status,
            Json(serde_json::json!({
                "error": message,
                "code": "UNAUTHENTICATED"
            })),
        )
            .into_response()
    }
}
