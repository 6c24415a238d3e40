//! Redis-backed event publisher for production deployments.
//!
//! Publishes event envelopes as JSON over Redis pub/sub, one channel per
//! event type. The outbox relay is the only production caller, so
//! delivery stays at-least-once end to end: the envelope is durable in
//! the outbox before it ever reaches Redis.

use async_trait::async_trait;
use redis::aio::MultiplexedConnection;
use redis::AsyncCommands;

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::EventPublisher;

/// Redis pub/sub event publisher.
#[derive(Clone)]
pub struct RedisEventPublisher {
    conn: MultiplexedConnection,
    channel_prefix: String,
}

impl RedisEventPublisher {
    /// Create a new Redis event publisher.
    pub fn new(conn: MultiplexedConnection) -> Self {
        Self {
            conn,
            channel_prefix: "rentledger:events".to_string(),
        }
    }

    /// Override the channel prefix (for test isolation).
    pub fn with_channel_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.channel_prefix = prefix.into();
        self
    }

    fn channel_for(&self, event_type: &str) -> String {
        format!("{}:{}", self.channel_prefix, event_type)
    }
}

#[async_trait]
impl EventPublisher for RedisEventPublisher {
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let channel = self.channel_for(&event.event_type);
        let body = serde_json::to_string(&event).map_err(|e| {
            DomainError::new(
                ErrorCode::InternalError,
                format!("Failed to serialize event envelope: {}", e),
            )
        })?;

        let mut conn = self.conn.clone();
        conn.publish::<_, _, ()>(&channel, body)
            .await
            .map_err(|e: redis::RedisError| {
                DomainError::new(
                    ErrorCode::ExternalServiceError,
                    format!("Failed to publish event to Redis: {}", e),
                )
            })?;

        Ok(())
    }

    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError> {
        // Sequential best-effort; the outbox retries whatever fails here.
        for event in events {
            self.publish(event).await?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for RedisEventPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedisEventPublisher")
            .field("channel_prefix", &self.channel_prefix)
            .finish_non_exhaustive()
    }
}
