//! Outbox-backed event bus for production deployments.
//!
//! Implements the first half of the Transactional Outbox Pattern:
//! every published envelope is persisted to the outbox before any
//! handler runs, so delivery to external consumers survives a crash.
//! The `OutboxRelay` drains the outbox to Redis for other processes;
//! in-process subscribers (fan-out, live channel bridge) are invoked
//! directly after the write.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::{EventHandler, EventPublisher, EventSubscriber, OutboxWriter};

/// Durable event bus: outbox write first, then in-process dispatch.
///
/// Handler failures are logged but do not fail the publish. The outbox
/// copy is already durable at that point, and in-process handlers are
/// idempotent, so a redelivery path stays available.
pub struct OutboxEventBus {
    outbox: Arc<dyn OutboxWriter>,
    handlers: RwLock<HashMap<String, Vec<Arc<dyn EventHandler>>>>,
}

impl OutboxEventBus {
    /// Creates a bus backed by the given outbox.
    pub fn new(outbox: Arc<dyn OutboxWriter>) -> Self {
        Self {
            outbox,
            handlers: RwLock::new(HashMap::new()),
        }
    }

    fn handlers_for(&self, event_type: &str) -> Result<Vec<Arc<dyn EventHandler>>, DomainError> {
        let handlers = self.handlers.read().map_err(|_| {
            DomainError::new(
                ErrorCode::InternalError,
                "OutboxEventBus: handlers lock poisoned",
            )
        })?;
        Ok(handlers.get(event_type).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl EventPublisher for OutboxEventBus {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        self.outbox.write(&event, &event.aggregate_id).await?;

        for handler in self.handlers_for(&event.event_type)? {
            if let Err(e) = handler.handle(event.clone()).await {
                tracing::error!(
                    handler = handler.name(),
                    event_type = %event.event_type,
                    event_id = %event.event_id,
                    error = %e,
                    "Event handler failed"
                );
            }
        }

        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

impl EventSubscriber for OutboxEventBus {
    fn subscribe(&self, event_type: &str, handler: Arc<dyn EventHandler>) {
        if let Ok(mut handlers) = self.handlers.write() {
            handlers
                .entry(event_type.to_string())
                .or_default()
                .push(handler);
        }
    }

    fn subscribe_all(&self, event_types: &[&str], handler: Arc<dyn EventHandler>) {
        for event_type in event_types {
            self.subscribe(event_type, handler.clone());
        }
    }
}

impl std::fmt::Debug for OutboxEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutboxEventBus").finish_non_exhaustive()
    }
}
