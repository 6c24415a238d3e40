//! OutboxWriter port - Interface for transactional event persistence.
//!
//! Transactional Outbox Pattern: a booking transition stores the status
//! change and its events in one database transaction, so either both are
//! durable or neither is. A background relay then publishes the events.
//!
//! ## Pipeline
//!
//! 1. Command handler saves aggregate AND events in the same transaction
//! 2. OutboxRelay (background task) reads pending entries
//! 3. OutboxRelay publishes to the broker and marks entries published
//! 4. Handlers receive events through EventSubscriber

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Status of an outbox entry in the delivery pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutboxStatus {
    /// Event written but not yet published
    Pending,
    /// Event successfully published to the broker
    Published,
    /// Publish failed, will be retried
    Failed,
}

/// An entry in the event outbox table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboxEntry {
    /// Unique identifier for this outbox entry
    pub id: Uuid,

    /// The domain event envelope
    pub event: EventEnvelope,

    /// Current delivery status
    pub status: OutboxStatus,

    /// When the event was written to the outbox
    pub created_at: DateTime<Utc>,

    /// When the event was last processed (published or failed)
    pub processed_at: Option<DateTime<Utc>>,

    /// Number of publish attempts
    pub attempts: u32,

    /// Last error message if failed
    pub last_error: Option<String>,

    /// Partition key for ordered delivery (typically the aggregate id)
    pub partition_key: String,
}

impl OutboxEntry {
    /// Create a new pending outbox entry for an event.
    pub fn new(event: EventEnvelope, partition_key: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            event,
            status: OutboxStatus::Pending,
            created_at: Utc::now(),
            processed_at: None,
            attempts: 0,
            last_error: None,
            partition_key: partition_key.into(),
        }
    }

    /// Mark the entry as successfully published.
    pub fn mark_published(&mut self) {
        self.status = OutboxStatus::Published;
        self.processed_at = Some(Utc::now());
        self.attempts += 1;
    }

    /// Mark the entry as failed with an error.
    pub fn mark_failed(&mut self, error: impl Into<String>) {
        self.status = OutboxStatus::Failed;
        self.processed_at = Some(Utc::now());
        self.attempts += 1;
        self.last_error = Some(error.into());
    }
}

/// Port for writing events to the transactional outbox.
///
/// Implementations should:
/// - Be called within the same database transaction as domain changes
/// - Support batch writes
/// - Use the aggregate id as partition key so per-aggregate order holds
#[async_trait]
pub trait OutboxWriter: Send + Sync {
    /// Write a single event to the outbox.
    async fn write(
        &self,
        event: &EventEnvelope,
        partition_key: &str,
    ) -> Result<OutboxEntry, DomainError>;

    /// Write multiple events to the outbox atomically.
    async fn write_batch(
        &self,
        events: &[EventEnvelope],
        partition_key: &str,
    ) -> Result<Vec<OutboxEntry>, DomainError>;

    /// Get pending events for the relay, ordered by creation time.
    async fn get_pending(&self, limit: u32) -> Result<Vec<OutboxEntry>, DomainError>;

    /// Mark an event as successfully published.
    async fn mark_published(&self, id: Uuid) -> Result<(), DomainError>;

    /// Mark an event as failed.
    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DomainError>;

    /// Delete published events older than `older_than_hours`.
    async fn cleanup_old(&self, older_than_hours: u32) -> Result<u64, DomainError>;
}
