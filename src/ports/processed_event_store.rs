//! ProcessedEventStore port - Interface for tracking processed events.
//!
//! Events may be delivered more than once: the payment provider retries
//! webhooks, the outbox relay restarts, consumers crash before an ack.
//! Handlers record what they have already handled here so redelivery is a
//! no-op.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventId, Timestamp};

/// Port for tracking which events have been processed by which handlers.
///
/// Each handler has its own processing record, so fan-out and settlement
/// ingest can each see the same booking event exactly once.
///
/// # Example
///
/// ```ignore
/// if store.contains(&event_id, "NotificationFanout").await? {
///     return Ok(()); // duplicate delivery
/// }
///
/// // handle event...
///
/// store.mark_processed(&event_id, "NotificationFanout").await?;
/// ```
#[async_trait]
pub trait ProcessedEventStore: Send + Sync {
    /// Whether the handler has already processed the event.
    async fn contains(&self, event_id: &EventId, handler_name: &str)
        -> Result<bool, DomainError>;

    /// Record that the handler processed the event.
    ///
    /// Call after successful handling, so the event is not reprocessed on
    /// redelivery.
    async fn mark_processed(
        &self,
        event_id: &EventId,
        handler_name: &str,
    ) -> Result<(), DomainError>;

    /// Delete entries older than the timestamp. Returns rows deleted.
    async fn delete_before(&self, timestamp: Timestamp) -> Result<u64, DomainError>;
}
