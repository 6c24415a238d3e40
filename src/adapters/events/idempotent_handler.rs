//! IdempotentHandler - Wrapper for ensuring at-most-once event processing.
//!
//! This adapter wraps any `EventHandler` and uses a `ProcessedEventStore`
//! to ensure each event is processed at most once per handler.
//!
//! ## Usage
//!
//! ```ignore
//! let handler = IdempotentHandler::new(
//!     NotificationFanout::new(notifications, channels, bookings, properties),
//!     processed_event_store.clone(),
//! );
//!
//! event_bus.subscribe("booking.approved.v1", Arc::new(handler));
//! ```
//!
//! ## How It Works
//!
//! 1. Before processing: Check if event was already processed by this handler
//! 2. If already processed: Skip and return Ok
//! 3. If not processed: Delegate to inner handler
//! 4. After successful handling: Mark event as processed
//!
//! ## Error Handling
//!
//! - If the inner handler fails, the event is NOT marked as processed
//! - This allows retry on the next delivery attempt
//! - ProcessedEventStore errors are propagated to the caller

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::{EventHandler, ProcessedEventStore};

/// Wrapper that ensures at-most-once event processing.
///
/// Decorates any `EventHandler` with idempotency tracking.
/// Uses the handler's `name()` as the idempotency key.
pub struct IdempotentHandler<H: EventHandler> {
    inner: H,
    processed_events: Arc<dyn ProcessedEventStore>,
}

impl<H: EventHandler> IdempotentHandler<H> {
    /// Create a new IdempotentHandler wrapping the given handler.
    pub fn new(inner: H, processed_events: Arc<dyn ProcessedEventStore>) -> Self {
        Self {
            inner,
            processed_events,
        }
    }
}

#[async_trait]
impl<H: EventHandler + 'static> EventHandler for IdempotentHandler<H> {
    async fn handle(&self, envelope: EventEnvelope) -> Result<(), DomainError> {
        let handler_name = self.inner.name();

        if self
            .processed_events
            .contains(&envelope.event_id, handler_name)
            .await?
        {
            tracing::debug!(
                event_id = %envelope.event_id,
                handler = handler_name,
                "Skipping duplicate event"
            );
            return Ok(());
        }

        self.inner.handle(envelope.clone()).await?;

        // Mark as processed (only after successful handling)
        self.processed_events
            .mark_processed(&envelope.event_id, handler_name)
            .await?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        self.inner.name()
    }
}
