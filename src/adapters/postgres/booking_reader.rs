//! PostgreSQL implementation of BookingReader.
//!
//! Read-side queries over the bookings table. No mutation happens here;
//! listings are scoped to the caller (tenant, owner, or property).

use crate::domain::booking::BookingStatus;
use crate::domain::foundation::{
    BookingId, DomainError, ErrorCode, Money, PropertyId, Timestamp, UserId,
};
use crate::ports::{BookingReader, BookingSummary};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the BookingReader port.
pub struct PostgresBookingReader {
    pool: PgPool,
}

impl PostgresBookingReader {
    /// Creates a new PostgresBookingReader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BookingSummaryRow {
    id: Uuid,
    property_id: Uuid,
    tenant_id: String,
    status: String,
    room_type: String,
    check_in_date: DateTime<Utc>,
    amount: i64,
    reject_reason: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<BookingSummaryRow> for BookingSummary {
    type Error = DomainError;

    fn try_from(row: BookingSummaryRow) -> Result<Self, Self::Error> {
        let status = BookingStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid booking status value: {}", row.status),
            )
        })?;

        Ok(BookingSummary {
            id: BookingId::from_uuid(row.id),
            property_id: PropertyId::from_uuid(row.property_id),
            tenant_id: UserId::new(row.tenant_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid tenant_id: {}", e))
            })?,
            status,
            room_type: row.room_type,
            check_in_date: Timestamp::from_datetime(row.check_in_date),
            amount: Money::from_minor_units(row.amount),
            reject_reason: row.reject_reason,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[async_trait]
impl BookingReader for PostgresBookingReader {
    async fn list_for_tenant(
        &self,
        tenant_id: &UserId,
    ) -> Result<Vec<BookingSummary>, DomainError> {
        let rows: Vec<BookingSummaryRow> = sqlx::query_as(
            r#"
            SELECT id, property_id, tenant_id, status, room_type,
                   check_in_date, amount, reject_reason, created_at
            FROM bookings
            WHERE tenant_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(tenant_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to list bookings: {}", e))
        })?;

        rows.into_iter().map(BookingSummary::try_from).collect()
    }

    async fn list_for_owner(&self, owner_id: &UserId) -> Result<Vec<BookingSummary>, DomainError> {
        let rows: Vec<BookingSummaryRow> = sqlx::query_as(
            r#"
            SELECT id, property_id, tenant_id, status, room_type,
                   check_in_date, amount, reject_reason, created_at
            FROM bookings
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to list bookings: {}", e))
        })?;

        rows.into_iter().map(BookingSummary::try_from).collect()
    }

    async fn list_for_property(
        &self,
        property_id: &PropertyId,
    ) -> Result<Vec<BookingSummary>, DomainError> {
        let rows: Vec<BookingSummaryRow> = sqlx::query_as(
            r#"
            SELECT id, property_id, tenant_id, status, room_type,
                   check_in_date, amount, reject_reason, created_at
            FROM bookings
            WHERE property_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(property_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to list bookings: {}", e))
        })?;

        rows.into_iter().map(BookingSummary::try_from).collect()
    }

    async fn list_all(&self) -> Result<Vec<BookingSummary>, DomainError> {
        let rows: Vec<BookingSummaryRow> = sqlx::query_as(
            r#"
            SELECT id, property_id, tenant_id, status, room_type,
                   check_in_date, amount, reject_reason, created_at
            FROM bookings
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to list bookings: {}", e))
        })?;

        rows.into_iter().map(BookingSummary::try_from).collect()
    }

    async fn active_tenants(&self, property_id: &PropertyId) -> Result<Vec<UserId>, DomainError> {
        let rows: Vec<(String,)> = sqlx::query_as(
            r#"
            SELECT DISTINCT tenant_id
            FROM bookings
            WHERE property_id = $1
              AND status IN ('approved', 'confirmed')
            ORDER BY tenant_id ASC
            "#,
        )
        .bind(property_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list active tenants: {}", e),
            )
        })?;

        rows.into_iter()
            .map(|(tenant_id,)| {
                UserId::new(tenant_id).map_err(|e| {
                    DomainError::new(ErrorCode::DatabaseError, format!("Invalid tenant_id: {}", e))
                })
            })
            .collect()
    }

    async fn has_other_active_booking(
        &self,
        property_id: &PropertyId,
        tenant_id: &UserId,
        excluding: &BookingId,
    ) -> Result<bool, DomainError> {
        let row: Option<(Uuid,)> = sqlx::query_as(
            r#"
            SELECT id
            FROM bookings
            WHERE property_id = $1
              AND tenant_id = $2
              AND id <> $3
              AND status IN ('approved', 'confirmed')
            LIMIT 1
            "#,
        )
        .bind(property_id.as_uuid())
        .bind(tenant_id.as_str())
        .bind(excluding.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to check active bookings: {}", e),
            )
        })?;

        Ok(row.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> BookingSummaryRow {
        BookingSummaryRow {
            id: Uuid::new_v4(),
            property_id: Uuid::new_v4(),
            tenant_id: "tenant-1".to_string(),
            status: "approved".to_string(),
            room_type: "double".to_string(),
            check_in_date: Utc::now(),
            amount: 12000,
            reject_reason: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn summary_row_converts_to_summary() {
        let row = sample_row();
        let summary = BookingSummary::try_from(row).unwrap();
        assert_eq!(summary.status, BookingStatus::Approved);
        assert_eq!(summary.amount.minor_units(), 12000);
    }

    #[test]
    fn summary_row_rejects_unknown_status() {
        let mut row = sample_row();
        row.status = "archived".to_string();
        assert!(BookingSummary::try_from(row).is_err());
    }
}
