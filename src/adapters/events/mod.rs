//! Event bus adapters.
//!
//! Adapters implement the event publishing and subscribing ports
//! for different environments:
//!
//! - `InMemoryEventBus` - Synchronous, in-process bus for testing
//! - `OutboxEventBus` - Durable outbox-first bus for production
//! - `RedisEventPublisher` - Redis pub/sub publisher for production
//! - `IdempotentHandler` - Wrapper for at-most-once event processing
//! - `OutboxRelay` - Background service for reliable event delivery

mod idempotent_handler;
mod in_memory;
mod outbox_bus;
mod outbox_relay;
mod redis;

pub use idempotent_handler::IdempotentHandler;
pub use in_memory::InMemoryEventBus;
pub use outbox_bus::OutboxEventBus;
pub use outbox_relay::{OutboxRelay, OutboxRelayConfig};
pub use redis::RedisEventPublisher;
