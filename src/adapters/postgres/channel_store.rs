//! PostgreSQL implementation of ChannelStore.
//!
//! Messages are an append-only log per channel. Sequence numbers come
//! from a per-channel counter row updated in the same transaction as the
//! message insert; the upsert takes a row lock, so concurrent appends to
//! one channel serialize and receive distinct, ordered numbers.

use crate::domain::foundation::{DomainError, ErrorCode, MessageId, Timestamp, UserId};
use crate::domain::notification::{ChannelId, ChannelMessage, MessageKind};
use crate::ports::ChannelStore;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the ChannelStore port.
pub struct PostgresChannelStore {
    pool: PgPool,
}

impl PostgresChannelStore {
    /// Creates a new PostgresChannelStore with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a channel message.
#[derive(Debug, sqlx::FromRow)]
struct ChannelMessageRow {
    id: Uuid,
    channel_id: String,
    sender_id: String,
    kind: String,
    body: String,
    seq: i64,
    created_at: DateTime<Utc>,
}

impl TryFrom<ChannelMessageRow> for ChannelMessage {
    type Error = DomainError;

    fn try_from(row: ChannelMessageRow) -> Result<Self, Self::Error> {
        let channel_id = ChannelId::parse(&row.channel_id).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid channel_id: {}", e))
        })?;
        let kind = parse_kind(&row.kind)?;

        Ok(ChannelMessage {
            id: MessageId::from_uuid(row.id),
            channel_id,
            sender_id: UserId::new(row.sender_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid sender_id: {}", e))
            })?,
            kind,
            body: row.body,
            seq: row.seq,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

fn parse_kind(s: &str) -> Result<MessageKind, DomainError> {
    match s {
        "chat" => Ok(MessageKind::Chat),
        "announcement" => Ok(MessageKind::Announcement),
        _ => Err(DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid message kind value: {}", s),
        )),
    }
}

#[async_trait]
impl ChannelStore for PostgresChannelStore {
    async fn append(&self, message: &ChannelMessage) -> Result<ChannelMessage, DomainError> {
        let channel_key = message.channel_id.encode();

        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to start transaction: {}", e),
            )
        })?;

        // Upsert locks the counter row, serializing appends per channel.
        let (seq,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO channel_seqs (channel_id, seq)
            VALUES ($1, 1)
            ON CONFLICT (channel_id)
            DO UPDATE SET seq = channel_seqs.seq + 1
            RETURNING seq
            "#,
        )
        .bind(&channel_key)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to allocate sequence: {}", e),
            )
        })?;

        sqlx::query(
            r#"
            INSERT INTO channel_messages (id, channel_id, sender_id, kind, body, seq, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(message.id.as_uuid())
        .bind(&channel_key)
        .bind(message.sender_id.as_str())
        .bind(message.kind.as_str())
        .bind(&message.body)
        .bind(seq)
        .bind(message.created_at.as_datetime())
        .execute(&mut *tx)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to append message: {}", e))
        })?;

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit message append: {}", e),
            )
        })?;

        let mut persisted = message.clone();
        persisted.seq = seq;
        Ok(persisted)
    }

    async fn list_after(
        &self,
        channel_id: &ChannelId,
        after_seq: i64,
        limit: u32,
    ) -> Result<Vec<ChannelMessage>, DomainError> {
        let rows: Vec<ChannelMessageRow> = sqlx::query_as(
            r#"
            SELECT id, channel_id, sender_id, kind, body, seq, created_at
            FROM channel_messages
            WHERE channel_id = $1 AND seq > $2
            ORDER BY seq ASC
            LIMIT $3
            "#,
        )
        .bind(channel_id.encode())
        .bind(after_seq)
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to list messages: {}", e))
        })?;

        rows.into_iter().map(ChannelMessage::try_from).collect()
    }

    async fn add_member(
        &self,
        channel_id: &ChannelId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO channel_members (channel_id, user_id, joined_at)
            VALUES ($1, $2, NOW())
            ON CONFLICT (channel_id, user_id) DO NOTHING
            "#,
        )
        .bind(channel_id.encode())
        .bind(user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to add member: {}", e))
        })?;

        Ok(())
    }

    async fn remove_member(
        &self,
        channel_id: &ChannelId,
        user_id: &UserId,
    ) -> Result<(), DomainError> {
        sqlx::query("DELETE FROM channel_members WHERE channel_id = $1 AND user_id = $2")
            .bind(channel_id.encode())
            .bind(user_id.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to remove member: {}", e),
                )
            })?;

        Ok(())
    }

    async fn is_member(
        &self,
        channel_id: &ChannelId,
        user_id: &UserId,
    ) -> Result<bool, DomainError> {
        // A user channel has exactly one member: its user.
        if let ChannelId::User(owner) = channel_id {
            return Ok(owner == user_id);
        }

        let row: Option<(String,)> = sqlx::query_as(
            "SELECT user_id FROM channel_members WHERE channel_id = $1 AND user_id = $2",
        )
        .bind(channel_id.encode())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to check membership: {}", e),
            )
        })?;

        Ok(row.is_some())
    }

    async fn members(&self, channel_id: &ChannelId) -> Result<Vec<UserId>, DomainError> {
        if let ChannelId::User(owner) = channel_id {
            return Ok(vec![owner.clone()]);
        }

        let rows: Vec<(String,)> = sqlx::query_as(
            "SELECT user_id FROM channel_members WHERE channel_id = $1 ORDER BY joined_at ASC",
        )
        .bind(channel_id.encode())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to list members: {}", e))
        })?;

        rows.into_iter()
            .map(|(user_id,)| {
                UserId::new(user_id).map_err(|e| {
                    DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
                })
            })
            .collect()
    }
}
