//! PostgreSQL implementation of OutboxWriter.
//!
//! Events are stored with the full envelope as JSONB so the relay can
//! republish them without rehydrating domain types. Entries keep their
//! delivery bookkeeping (status, attempts, last error) alongside.

use crate::domain::foundation::{DomainError, ErrorCode, EventEnvelope};
use crate::ports::{OutboxEntry, OutboxStatus, OutboxWriter};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the OutboxWriter port.
pub struct PostgresOutboxWriter {
    pool: PgPool,
}

impl PostgresOutboxWriter {
    /// Creates a new PostgresOutboxWriter with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of an outbox entry.
#[derive(Debug, sqlx::FromRow)]
struct OutboxRow {
    id: Uuid,
    event: serde_json::Value,
    status: String,
    created_at: DateTime<Utc>,
    processed_at: Option<DateTime<Utc>>,
    attempts: i32,
    last_error: Option<String>,
    partition_key: String,
}

impl TryFrom<OutboxRow> for OutboxEntry {
    type Error = DomainError;

    fn try_from(row: OutboxRow) -> Result<Self, Self::Error> {
        let event: EventEnvelope = serde_json::from_value(row.event).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid event envelope in outbox: {}", e),
            )
        })?;
        let status = parse_status(&row.status)?;

        Ok(OutboxEntry {
            id: row.id,
            event,
            status,
            created_at: row.created_at,
            processed_at: row.processed_at,
            attempts: row.attempts as u32,
            last_error: row.last_error,
            partition_key: row.partition_key,
        })
    }
}

fn parse_status(s: &str) -> Result<OutboxStatus, DomainError> {
    match s {
        "pending" => Ok(OutboxStatus::Pending),
        "published" => Ok(OutboxStatus::Published),
        "failed" => Ok(OutboxStatus::Failed),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid outbox status value: {}", s),
        )),
    }
}

fn status_to_string(status: OutboxStatus) -> &'static str {
    match status {
        OutboxStatus::Pending => "pending",
        OutboxStatus::Published => "published",
        OutboxStatus::Failed => "failed",
    }
}

fn serialize_event(event: &EventEnvelope) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(event).map_err(|e| {
        DomainError::new(
            ErrorCode::InternalError,
            format!("Failed to serialize event envelope: {}", e),
        )
    })
}

#[async_trait]
impl OutboxWriter for PostgresOutboxWriter {
    async fn write(
        &self,
        event: &EventEnvelope,
        partition_key: &str,
    ) -> Result<OutboxEntry, DomainError> {
        let entry = OutboxEntry::new(event.clone(), partition_key);

        sqlx::query(
            r#"
            INSERT INTO event_outbox (
                id, event, status, created_at, processed_at, attempts, last_error, partition_key
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(entry.id)
        .bind(serialize_event(&entry.event)?)
        .bind(status_to_string(entry.status))
        .bind(entry.created_at)
        .bind(entry.processed_at)
        .bind(entry.attempts as i32)
        .bind(&entry.last_error)
        .bind(&entry.partition_key)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to write outbox entry: {}", e),
            )
        })?;

        Ok(entry)
    }

    async fn write_batch(
        &self,
        events: &[EventEnvelope],
        partition_key: &str,
    ) -> Result<Vec<OutboxEntry>, DomainError> {
        if events.is_empty() {
            return Ok(Vec::new());
        }

        let entries: Vec<OutboxEntry> = events
            .iter()
            .map(|event| OutboxEntry::new(event.clone(), partition_key))
            .collect();

        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to start transaction: {}", e),
            )
        })?;

        for entry in &entries {
            sqlx::query(
                r#"
                INSERT INTO event_outbox (
                    id, event, status, created_at, processed_at, attempts, last_error, partition_key
                ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                "#,
            )
            .bind(entry.id)
            .bind(serialize_event(&entry.event)?)
            .bind(status_to_string(entry.status))
            .bind(entry.created_at)
            .bind(entry.processed_at)
            .bind(entry.attempts as i32)
            .bind(&entry.last_error)
            .bind(&entry.partition_key)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to write outbox batch: {}", e),
                )
            })?;
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit outbox batch: {}", e),
            )
        })?;

        Ok(entries)
    }

    async fn get_pending(&self, limit: u32) -> Result<Vec<OutboxEntry>, DomainError> {
        let rows: Vec<OutboxRow> = sqlx::query_as(
            r#"
            SELECT id, event, status, created_at, processed_at, attempts, last_error, partition_key
            FROM event_outbox
            WHERE status IN ('pending', 'failed')
            ORDER BY created_at ASC
            LIMIT $1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to fetch pending outbox entries: {}", e),
            )
        })?;

        rows.into_iter().map(OutboxEntry::try_from).collect()
    }

    async fn mark_published(&self, id: Uuid) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE event_outbox
            SET status = 'published', processed_at = NOW(), attempts = attempts + 1
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to mark outbox entry published: {}", e),
            )
        })?;

        Ok(())
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            UPDATE event_outbox
            SET status = 'failed', processed_at = NOW(), attempts = attempts + 1, last_error = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(error)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to mark outbox entry failed: {}", e),
            )
        })?;

        Ok(())
    }

    async fn cleanup_old(&self, older_than_hours: u32) -> Result<u64, DomainError> {
        let result = sqlx::query(
            r#"
            DELETE FROM event_outbox
            WHERE status = 'published'
              AND processed_at < NOW() - ($1 * INTERVAL '1 hour')
            "#,
        )
        .bind(i64::from(older_than_hours))
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to clean up outbox: {}", e),
            )
        })?;

        Ok(result.rows_affected())
    }
}
