//! HTTP adapters - REST API implementations.
//!
//! Each domain module has its own HTTP adapter for endpoint exposure.

pub mod booking;
pub mod middleware;
pub mod notification;
pub mod settlement;

// Re-export key types for convenience
pub use booking::{booking_routes, BookingAppState};
pub use notification::{channel_routes, notification_routes, NotificationAppState};
pub use settlement::{settlement_routes, webhook_routes, SettlementAppState};
