//! PostgreSQL implementation of BookingRepository.
//!
//! Provides persistent storage for Booking aggregates using PostgreSQL.
//! Updates use compare-and-swap on the version column so concurrent
//! writers to the same booking resolve to exactly one winner.

use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::foundation::{
    BookingId, DomainError, ErrorCode, Money, PropertyId, Timestamp, UserId,
};
use crate::ports::BookingRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the BookingRepository port.
///
/// Uses sqlx for type-safe database operations with connection pooling.
pub struct PostgresBookingRepository {
    pool: PgPool,
}

impl PostgresBookingRepository {
    /// Creates a new PostgresBookingRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a booking.
#[derive(Debug, sqlx::FromRow)]
struct BookingRow {
    id: Uuid,
    property_id: Uuid,
    tenant_id: String,
    owner_id: String,
    room_type: String,
    check_in_date: DateTime<Utc>,
    amount: i64,
    status: String,
    reject_reason: Option<String>,
    rebooked_from: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl TryFrom<BookingRow> for Booking {
    type Error = DomainError;

    fn try_from(row: BookingRow) -> Result<Self, Self::Error> {
        let status = parse_status(&row.status)?;

        Ok(Booking {
            id: BookingId::from_uuid(row.id),
            property_id: PropertyId::from_uuid(row.property_id),
            tenant_id: parse_user_id(row.tenant_id)?,
            owner_id: parse_user_id(row.owner_id)?,
            room_type: row.room_type,
            check_in_date: Timestamp::from_datetime(row.check_in_date),
            amount: Money::from_minor_units(row.amount),
            status,
            reject_reason: row.reject_reason,
            rebooked_from: row.rebooked_from.map(BookingId::from_uuid),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
            version: row.version,
        })
    }
}

fn parse_status(s: &str) -> Result<BookingStatus, DomainError> {
    BookingStatus::parse(s).ok_or_else(|| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid booking status value: {}", s),
        )
    })
}

fn parse_user_id(s: String) -> Result<UserId, DomainError> {
    UserId::new(s)
        .map_err(|e| DomainError::new(ErrorCode::DatabaseError, format!("Invalid user id: {}", e)))
}

#[async_trait]
impl BookingRepository for PostgresBookingRepository {
    async fn save(&self, booking: &Booking) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO bookings (
                id, property_id, tenant_id, owner_id, room_type, check_in_date,
                amount, status, reject_reason, rebooked_from, created_at, updated_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(booking.property_id.as_uuid())
        .bind(booking.tenant_id.as_str())
        .bind(booking.owner_id.as_str())
        .bind(&booking.room_type)
        .bind(booking.check_in_date.as_datetime())
        .bind(booking.amount.minor_units())
        .bind(booking.status.as_str())
        .bind(&booking.reject_reason)
        .bind(booking.rebooked_from.map(|id| *id.as_uuid()))
        .bind(booking.created_at.as_datetime())
        .bind(booking.updated_at.as_datetime())
        .bind(booking.version)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("bookings_live_overlap_idx") {
                    return DomainError::new(
                        ErrorCode::OverlappingBooking,
                        "Tenant already has a live booking for this property and date",
                    );
                }
            }
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to save booking: {}", e))
        })?;

        Ok(())
    }

    async fn update(&self, booking: &Booking, expected_version: i64) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE bookings SET
                status = $3,
                reject_reason = $4,
                updated_at = $5,
                version = $6
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(booking.id.as_uuid())
        .bind(expected_version)
        .bind(booking.status.as_str())
        .bind(&booking.reject_reason)
        .bind(booking.updated_at.as_datetime())
        .bind(booking.version)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to update booking: {}", e))
        })?;

        if result.rows_affected() == 0 {
            // Distinguish the row being gone from a concurrent writer winning.
            let exists: Option<(Uuid,)> =
                sqlx::query_as("SELECT id FROM bookings WHERE id = $1")
                    .bind(booking.id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| {
                        DomainError::new(
                            ErrorCode::DatabaseError,
                            format!("Failed to check booking existence: {}", e),
                        )
                    })?;

            return if exists.is_some() {
                Err(DomainError::new(
                    ErrorCode::Conflict,
                    "Booking was modified by another request",
                ))
            } else {
                Err(DomainError::new(ErrorCode::BookingNotFound, "Booking not found"))
            };
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        let row: Option<BookingRow> = sqlx::query_as(
            r#"
            SELECT id, property_id, tenant_id, owner_id, room_type, check_in_date,
                   amount, status, reject_reason, rebooked_from, created_at, updated_at, version
            FROM bookings
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find booking: {}", e))
        })?;

        row.map(Booking::try_from).transpose()
    }

    async fn find_overlapping(
        &self,
        property_id: &PropertyId,
        tenant_id: &UserId,
        check_in_date: &Timestamp,
    ) -> Result<Vec<Booking>, DomainError> {
        let rows: Vec<BookingRow> = sqlx::query_as(
            r#"
            SELECT id, property_id, tenant_id, owner_id, room_type, check_in_date,
                   amount, status, reject_reason, rebooked_from, created_at, updated_at, version
            FROM bookings
            WHERE property_id = $1
              AND tenant_id = $2
              AND check_in_date::date = $3::date
              AND status IN ('pending', 'approved', 'confirmed')
            ORDER BY created_at ASC
            "#,
        )
        .bind(property_id.as_uuid())
        .bind(tenant_id.as_str())
        .bind(check_in_date.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find overlapping bookings: {}", e),
            )
        })?;

        rows.into_iter().map(Booking::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_status_works_for_all_values() {
        assert_eq!(parse_status("pending").unwrap(), BookingStatus::Pending);
        assert_eq!(parse_status("approved").unwrap(), BookingStatus::Approved);
        assert_eq!(parse_status("rejected").unwrap(), BookingStatus::Rejected);
        assert_eq!(parse_status("confirmed").unwrap(), BookingStatus::Confirmed);
        assert_eq!(parse_status("completed").unwrap(), BookingStatus::Completed);
        assert_eq!(parse_status("cancelled").unwrap(), BookingStatus::Cancelled);
    }

    #[test]
    fn parse_status_rejects_invalid_values() {
        assert!(parse_status("invalid").is_err());
        assert!(parse_status("").is_err());
    }

    #[test]
    fn parse_user_id_rejects_empty() {
        assert!(parse_user_id(String::new()).is_err());
    }

    #[test]
    fn roundtrip_status_conversion() {
        for status in [
            BookingStatus::Pending,
            BookingStatus::Approved,
            BookingStatus::Rejected,
            BookingStatus::Confirmed,
            BookingStatus::Completed,
            BookingStatus::Cancelled,
        ] {
            let parsed = parse_status(status.as_str()).unwrap();
            assert_eq!(status, parsed);
        }
    }
}
