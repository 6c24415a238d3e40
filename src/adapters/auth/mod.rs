//! Authentication adapters.
//!
//! Implementations of the `IdentityProvider` port:
//!
//! - `jwt` - Production HMAC JWT verification
//! - `mock` - Test implementation that doesn't require real tokens

mod jwt;
mod mock;

pub use jwt::{JwtConfig, JwtIdentityProvider};
pub use mock::MockIdentityProvider;
