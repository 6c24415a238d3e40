//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `BookingRepository` / `BookingReader` - Booking write and read sides
//! - `SettlementRepository` / `SettlementReader` - Ledger write and read sides
//! - `NotificationRepository` - Personal notification storage
//! - `ChannelStore` - Append-only channel logs and membership
//!
//! ## Event Ports
//!
//! - `EventPublisher` / `EventSubscriber` / `EventHandler` - Event bus
//! - `OutboxWriter` - Transactional event persistence
//! - `ProcessedEventStore` - Idempotency tracking for handlers
//!
//! ## External Service Ports
//!
//! - `PropertyDirectory` - Property ownership and availability lookups
//! - `IdentityProvider` - Bearer token verification

mod booking_reader;
mod booking_repository;
mod channel_store;
mod event_publisher;
mod event_subscriber;
mod identity_provider;
mod notification_repository;
mod outbox_writer;
mod processed_event_store;
mod property_directory;
mod settlement_reader;
mod settlement_repository;

pub use booking_reader::{BookingReader, BookingSummary};
pub use booking_repository::BookingRepository;
pub use channel_store::ChannelStore;
pub use event_publisher::EventPublisher;
pub use event_subscriber::{EventBus, EventHandler, EventSubscriber};
pub use identity_provider::IdentityProvider;
pub use notification_repository::NotificationRepository;
pub use outbox_writer::{OutboxEntry, OutboxStatus, OutboxWriter};
pub use processed_event_store::ProcessedEventStore;
pub use property_directory::{OwnerPayoutDetails, PropertyDirectory, PropertyInfo};
pub use settlement_reader::{SettlementReader, SettlementTotals, SettlementView};
pub use settlement_repository::SettlementRepository;
