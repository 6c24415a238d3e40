//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! This module provides adapters for PostgreSQL-backed persistence:
//! - `PostgresBookingRepository` / `PostgresBookingReader` - Booking write and read sides
//! - `PostgresSettlementRepository` / `PostgresSettlementReader` - Settlement ledger
//! - `PostgresNotificationRepository` - Personal notifications
//! - `PostgresChannelStore` - Channel logs and membership
//! - `PostgresOutboxWriter` - Transactional event outbox
//! - `PostgresProcessedEventStore` - Handler idempotency tracking

mod booking_reader;
mod booking_repository;
mod channel_store;
mod notification_repository;
mod outbox;
mod processed_events;
mod settlement_reader;
mod settlement_repository;

pub use booking_reader::PostgresBookingReader;
pub use booking_repository::PostgresBookingRepository;
pub use channel_store::PostgresChannelStore;
pub use notification_repository::PostgresNotificationRepository;
pub use outbox::PostgresOutboxWriter;
pub use processed_events::PostgresProcessedEventStore;
pub use settlement_reader::PostgresSettlementReader;
pub use settlement_repository::PostgresSettlementRepository;
