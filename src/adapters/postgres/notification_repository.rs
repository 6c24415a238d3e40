//! PostgreSQL implementation of NotificationRepository.
//!
//! Fan-out writes land here before any live push; `save_all` uses a
//! transaction so a batch persists atomically or not at all.

use crate::domain::foundation::{DomainError, ErrorCode, NotificationId, Timestamp, UserId};
use crate::domain::notification::{Notification, NotificationType};
use crate::ports::NotificationRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the NotificationRepository port.
pub struct PostgresNotificationRepository {
    pool: PgPool,
}

impl PostgresNotificationRepository {
    /// Creates a new PostgresNotificationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a notification.
#[derive(Debug, sqlx::FromRow)]
struct NotificationRow {
    id: Uuid,
    recipient_user_id: String,
    notification_type: String,
    title: String,
    message: String,
    is_read: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<NotificationRow> for Notification {
    type Error = DomainError;

    fn try_from(row: NotificationRow) -> Result<Self, Self::Error> {
        let notification_type = NotificationType::parse(&row.notification_type).map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid notification type: {}", e),
            )
        })?;

        Ok(Notification {
            id: NotificationId::from_uuid(row.id),
            recipient_user_id: UserId::new(row.recipient_user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid recipient: {}", e))
            })?,
            notification_type,
            title: row.title,
            message: row.message,
            is_read: row.is_read,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl NotificationRepository for PostgresNotificationRepository {
    async fn save(&self, notification: &Notification) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO notifications (
                id, recipient_user_id, notification_type, title, message, is_read, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(notification.id.as_uuid())
        .bind(notification.recipient_user_id.as_str())
        .bind(notification.notification_type.as_str())
        .bind(&notification.title)
        .bind(&notification.message)
        .bind(notification.is_read)
        .bind(notification.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to save notification: {}", e),
            )
        })?;

        Ok(())
    }

    async fn save_all(&self, notifications: &[Notification]) -> Result<(), DomainError> {
        if notifications.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to start transaction: {}", e),
            )
        })?;

        for notification in notifications {
            sqlx::query(
                r#"
                INSERT INTO notifications (
                    id, recipient_user_id, notification_type, title, message, is_read, created_at
                ) VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(notification.id.as_uuid())
            .bind(notification.recipient_user_id.as_str())
            .bind(notification.notification_type.as_str())
            .bind(&notification.title)
            .bind(&notification.message)
            .bind(notification.is_read)
            .bind(notification.created_at.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to save notification batch: {}", e),
                )
            })?;
        }

        tx.commit().await.map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to commit notification batch: {}", e),
            )
        })?;

        Ok(())
    }

    async fn find_by_id(
        &self,
        id: &NotificationId,
    ) -> Result<Option<Notification>, DomainError> {
        let row: Option<NotificationRow> = sqlx::query_as(
            r#"
            SELECT id, recipient_user_id, notification_type, title, message, is_read, created_at
            FROM notifications
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find notification: {}", e),
            )
        })?;

        row.map(Notification::try_from).transpose()
    }

    async fn update(&self, notification: &Notification) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE notifications SET is_read = $2 WHERE id = $1")
            .bind(notification.id.as_uuid())
            .bind(notification.is_read)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                DomainError::new(
                    ErrorCode::DatabaseError,
                    format!("Failed to update notification: {}", e),
                )
            })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::NotificationNotFound,
                "Notification not found",
            ));
        }

        Ok(())
    }

    async fn list_for_recipient(
        &self,
        recipient_user_id: &UserId,
        since: Option<Timestamp>,
        limit: u32,
    ) -> Result<Vec<Notification>, DomainError> {
        let rows: Vec<NotificationRow> = match since {
            Some(ts) => sqlx::query_as(
                r#"
                SELECT id, recipient_user_id, notification_type, title, message, is_read, created_at
                FROM notifications
                WHERE recipient_user_id = $1 AND created_at >= $2
                ORDER BY created_at DESC
                LIMIT $3
                "#,
            )
            .bind(recipient_user_id.as_str())
            .bind(ts.as_datetime())
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await,
            None => sqlx::query_as(
                r#"
                SELECT id, recipient_user_id, notification_type, title, message, is_read, created_at
                FROM notifications
                WHERE recipient_user_id = $1
                ORDER BY created_at DESC
                LIMIT $2
                "#,
            )
            .bind(recipient_user_id.as_str())
            .bind(i64::from(limit))
            .fetch_all(&self.pool)
            .await,
        }
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list notifications: {}", e),
            )
        })?;

        rows.into_iter().map(Notification::try_from).collect()
    }

    async fn mark_all_read(&self, recipient_user_id: &UserId) -> Result<u64, DomainError> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE WHERE recipient_user_id = $1 AND is_read = FALSE",
        )
        .bind(recipient_user_id.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to mark notifications read: {}", e),
            )
        })?;

        Ok(result.rows_affected())
    }
}
