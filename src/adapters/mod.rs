//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - JWT token verification against the identity provider
//! - `events` - Event bus implementations (in-memory, Redis), outbox relay
//! - `http` - REST API endpoints
//! - `postgres` - Database-backed repositories and readers
//! - `property` - Property Directory client
//! - `websocket` - Live channel subscriptions

pub mod auth;
pub mod events;
pub mod http;
pub mod postgres;
pub mod property;
pub mod websocket;

pub use events::{IdempotentHandler, InMemoryEventBus, OutboxEventBus, OutboxRelay, OutboxRelayConfig};
