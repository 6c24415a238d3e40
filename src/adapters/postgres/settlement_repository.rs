//! PostgreSQL implementation of SettlementRepository.
//!
//! One settlement per booking is enforced by a unique index on
//! booking_id; the constraint violation maps to `SettlementExists` so
//! payment-capture retries stay idempotent at the storage layer too.

use crate::domain::foundation::{
    BookingId, DomainError, ErrorCode, Money, SettlementId, Timestamp, UserId,
};
use crate::domain::settlement::{OwnerBankSnapshot, Settlement, SettlementStatus};
use crate::ports::SettlementRepository;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the SettlementRepository port.
pub struct PostgresSettlementRepository {
    pool: PgPool,
}

impl PostgresSettlementRepository {
    /// Creates a new PostgresSettlementRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a settlement.
#[derive(Debug, sqlx::FromRow)]
struct SettlementRow {
    id: Uuid,
    booking_id: Uuid,
    owner_id: String,
    gross_amount: i64,
    platform_fee: i64,
    owner_amount: i64,
    status: String,
    settlement_date: Option<DateTime<Utc>>,
    bank_name: String,
    account_number: String,
    account_holder: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    version: i64,
}

impl TryFrom<SettlementRow> for Settlement {
    type Error = DomainError;

    fn try_from(row: SettlementRow) -> Result<Self, Self::Error> {
        let status = parse_status(&row.status)?;
        let owner_bank_snapshot =
            OwnerBankSnapshot::new(row.bank_name, row.account_number, row.account_holder).map_err(
                |e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Invalid bank snapshot: {}", e),
                    )
                },
            )?;

        Ok(Settlement {
            id: SettlementId::from_uuid(row.id),
            booking_id: BookingId::from_uuid(row.booking_id),
            owner_id: UserId::new(row.owner_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid owner_id: {}", e))
            })?,
            gross_amount: Money::from_minor_units(row.gross_amount),
            platform_fee: Money::from_minor_units(row.platform_fee),
            owner_amount: Money::from_minor_units(row.owner_amount),
            status,
            settlement_date: row.settlement_date.map(Timestamp::from_datetime),
            owner_bank_snapshot,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
            version: row.version,
        })
    }
}

fn parse_status(s: &str) -> Result<SettlementStatus, DomainError> {
    SettlementStatus::parse(s).ok_or_else(|| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid settlement status value: {}", s),
        )
    })
}

#[async_trait]
impl SettlementRepository for PostgresSettlementRepository {
    async fn save(&self, settlement: &Settlement) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO settlements (
                id, booking_id, owner_id, gross_amount, platform_fee, owner_amount,
                status, settlement_date, bank_name, account_number, account_holder,
                created_at, updated_at, version
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            "#,
        )
        .bind(settlement.id.as_uuid())
        .bind(settlement.booking_id.as_uuid())
        .bind(settlement.owner_id.as_str())
        .bind(settlement.gross_amount.minor_units())
        .bind(settlement.platform_fee.minor_units())
        .bind(settlement.owner_amount.minor_units())
        .bind(settlement.status.as_str())
        .bind(settlement.settlement_date.as_ref().map(|t| *t.as_datetime()))
        .bind(&settlement.owner_bank_snapshot.bank_name)
        .bind(&settlement.owner_bank_snapshot.account_number)
        .bind(&settlement.owner_bank_snapshot.account_holder)
        .bind(settlement.created_at.as_datetime())
        .bind(settlement.updated_at.as_datetime())
        .bind(settlement.version)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.constraint() == Some("settlements_booking_id_key") {
                    return DomainError::new(
                        ErrorCode::SettlementExists,
                        "Settlement for this booking already exists",
                    );
                }
            }
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to save settlement: {}", e))
        })?;

        Ok(())
    }

    async fn update(
        &self,
        settlement: &Settlement,
        expected_version: i64,
    ) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE settlements SET
                status = $3,
                settlement_date = $4,
                updated_at = $5,
                version = $6
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(settlement.id.as_uuid())
        .bind(expected_version)
        .bind(settlement.status.as_str())
        .bind(settlement.settlement_date.as_ref().map(|t| *t.as_datetime()))
        .bind(settlement.updated_at.as_datetime())
        .bind(settlement.version)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update settlement: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            let exists: Option<(Uuid,)> =
                sqlx::query_as("SELECT id FROM settlements WHERE id = $1")
                    .bind(settlement.id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(|e| {
                        DomainError::new(
                            ErrorCode::DatabaseError,
                            format!("Failed to check settlement existence: {}", e),
                        )
                    })?;

            return if exists.is_some() {
                Err(DomainError::new(
                    ErrorCode::Conflict,
                    "Settlement was modified by another request",
                ))
            } else {
                Err(DomainError::new(
                    ErrorCode::SettlementNotFound,
                    "Settlement not found",
                ))
            };
        }

        Ok(())
    }

    async fn find_by_id(&self, id: &SettlementId) -> Result<Option<Settlement>, DomainError> {
        let row: Option<SettlementRow> = sqlx::query_as(
            r#"
            SELECT id, booking_id, owner_id, gross_amount, platform_fee, owner_amount,
                   status, settlement_date, bank_name, account_number, account_holder,
                   created_at, updated_at, version
            FROM settlements
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find settlement: {}", e))
        })?;

        row.map(Settlement::try_from).transpose()
    }

    async fn find_by_booking_id(
        &self,
        booking_id: &BookingId,
    ) -> Result<Option<Settlement>, DomainError> {
        let row: Option<SettlementRow> = sqlx::query_as(
            r#"
            SELECT id, booking_id, owner_id, gross_amount, platform_fee, owner_amount,
                   status, settlement_date, bank_name, account_number, account_holder,
                   created_at, updated_at, version
            FROM settlements
            WHERE booking_id = $1
            "#,
        )
        .bind(booking_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to find settlement: {}", e))
        })?;

        row.map(Settlement::try_from).transpose()
    }
}
