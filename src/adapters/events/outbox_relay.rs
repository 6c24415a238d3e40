//! OutboxRelay - Background service for reliable event delivery.
//!
//! Second half of the Transactional Outbox Pattern:
//! 1. Command handlers write events to the outbox (same transaction as domain changes)
//! 2. **OutboxRelay polls the outbox and publishes to the broker** ← This module
//!
//! Durability first: a booking transition is never acknowledged to the
//! caller before its events are on disk, and the relay retries delivery
//! until the broker accepts them.
//!
//! ## Graceful Shutdown
//!
//! The relay listens for a shutdown signal and completes the current
//! batch before stopping.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time;

use crate::domain::foundation::DomainError;
use crate::ports::{EventPublisher, OutboxWriter};

/// Configuration for the OutboxRelay service.
#[derive(Debug, Clone)]
pub struct OutboxRelayConfig {
    /// How often to poll for unpublished events.
    pub poll_interval: Duration,

    /// Maximum events to process per poll cycle.
    pub batch_size: u32,
}

impl Default for OutboxRelayConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(100),
            batch_size: 100,
        }
    }
}

impl OutboxRelayConfig {
    /// Create config with custom poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Create config with custom batch size.
    pub fn with_batch_size(mut self, size: u32) -> Self {
        self.batch_size = size;
        self
    }
}

/// Background service that publishes events from the outbox.
///
/// Polls the outbox for pending events and publishes them to the
/// configured EventPublisher (e.g., Redis, in-memory for tests).
pub struct OutboxRelay {
    outbox: Arc<dyn OutboxWriter>,
    event_publisher: Arc<dyn EventPublisher>,
    config: OutboxRelayConfig,
}

impl OutboxRelay {
    /// Create a new OutboxRelay with default configuration.
    pub fn new(outbox: Arc<dyn OutboxWriter>, event_publisher: Arc<dyn EventPublisher>) -> Self {
        Self {
            outbox,
            event_publisher,
            config: OutboxRelayConfig::default(),
        }
    }

    /// Create a new OutboxRelay with custom configuration.
    pub fn with_config(
        outbox: Arc<dyn OutboxWriter>,
        event_publisher: Arc<dyn EventPublisher>,
        config: OutboxRelayConfig,
    ) -> Self {
        Self {
            outbox,
            event_publisher,
            config,
        }
    }

    /// Run the relay loop until shutdown signal is received.
    ///
    /// Returns `Ok(())` on graceful shutdown, or error if a fatal error occurs.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<(), DomainError> {
        let mut interval = time::interval(self.config.poll_interval);

        loop {
            tokio::select! {
                _ = shutdown.changed() => {
                    if *shutdown.borrow() {
                        // Shutdown requested - process one final batch then exit
                        self.process_batch().await?;
                        return Ok(());
                    }
                }

                _ = interval.tick() => {
                    self.process_batch().await?;
                }
            }
        }
    }

    /// Process a single batch of pending events.
    pub async fn process_batch(&self) -> Result<usize, DomainError> {
        let entries = self.outbox.get_pending(self.config.batch_size).await?;
        let mut published_count = 0;

        for entry in entries {
            match self.event_publisher.publish(entry.event.clone()).await {
                Ok(()) => {
                    self.outbox.mark_published(entry.id).await?;
                    published_count += 1;
                }
                Err(e) => {
                    // Failed entries stay in the outbox and are retried next poll
                    tracing::warn!(
                        event_id = %entry.event.event_id,
                        event_type = %entry.event.event_type,
                        error = %e,
                        "Failed to publish outbox event"
                    );
                    let error_msg = format!("{}", e);
                    self.outbox.mark_failed(entry.id, &error_msg).await?;
                }
            }
        }

        Ok(published_count)
    }

    /// Run exactly one poll cycle (for testing).
    pub async fn poll_once(&self) -> Result<usize, DomainError> {
        self.process_batch().await
    }
}
