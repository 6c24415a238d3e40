//! EventSubscriber port - Interface for subscribing to domain events.
//!
//! Fan-out and the settlement ledger register interest in booking and
//! payment events here, without knowing the transport underneath.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Handler for processing domain events.
///
/// Implementations should be:
/// - **Idempotent** - safe to call multiple times with the same event
/// - **Quick** - long operations belong in queued async work
/// - **Isolated** - errors don't affect other handlers
///
/// # Example
///
/// ```ignore
/// struct NotificationFanout { /* ... */ }
///
/// #[async_trait]
/// impl EventHandler for NotificationFanout {
///     async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
///         let payload: BookingEvent = event.payload_as()?;
///         // Persist notifications, adjust channel membership...
///         Ok(())
///     }
///
///     fn name(&self) -> &'static str {
///         "NotificationFanout"
///     }
/// }
/// ```
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Process an event.
    ///
    /// Must be idempotent; redelivery of the same event must produce the
    /// same result.
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Handler name for logging and idempotency tracking.
    fn name(&self) -> &'static str;
}

/// Port for subscribing to domain events.
///
/// # Example
///
/// ```ignore
/// subscriber.subscribe("payment.captured.v1", settlement_ingest);
/// subscriber.subscribe_all(&["booking.approved.v1", "booking.rejected.v1"], fanout);
/// ```
pub trait EventSubscriber: Send + Sync {
    /// Subscribe handler to a specific event type.
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>);

    /// Subscribe handler to multiple event types.
    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>);
}

/// Combined trait for event bus implementations.
pub trait EventBus: super::EventPublisher + EventSubscriber {}

impl<T: super::EventPublisher + EventSubscriber> EventBus for T {}
