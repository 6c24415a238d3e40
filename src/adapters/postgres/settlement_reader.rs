//! PostgreSQL implementation of SettlementReader.
//!
//! Admin reporting queries over the settlements table, including the
//! ledger-wide totals used for the consistency check.

use crate::domain::foundation::{
    BookingId, DomainError, ErrorCode, Money, SettlementId, Timestamp, UserId,
};
use crate::domain::settlement::{OwnerBankSnapshot, SettlementStatus};
use crate::ports::{SettlementReader, SettlementTotals, SettlementView};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// PostgreSQL implementation of the SettlementReader port.
pub struct PostgresSettlementReader {
    pool: PgPool,
}

impl PostgresSettlementReader {
    /// Creates a new PostgresSettlementReader with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SettlementViewRow {
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
}

impl TryFrom<SettlementViewRow> for SettlementView {
    type Error = DomainError;

    fn try_from(row: SettlementViewRow) -> Result<Self, Self::Error> {
        let status = SettlementStatus::parse(&row.status).ok_or_else(|| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Invalid settlement status value: {}", row.status),
            )
        })?;
        let owner_bank_snapshot =
            OwnerBankSnapshot::new(row.bank_name, row.account_number, row.account_holder).map_err(
                |e| {
                    DomainError::new(
                        ErrorCode::DatabaseError,
                        format!("Invalid bank snapshot: {}", e),
                    )
                },
            )?;

        Ok(SettlementView {
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
        })
    }
}

#[async_trait]
impl SettlementReader for PostgresSettlementReader {
    async fn list_pending(&self) -> Result<Vec<SettlementView>, DomainError> {
        let rows: Vec<SettlementViewRow> = sqlx::query_as(
            r#"
            SELECT id, booking_id, owner_id, gross_amount, platform_fee, owner_amount,
                   status, settlement_date, bank_name, account_number, account_holder, created_at
            FROM settlements
            WHERE status = 'pending_settlement'
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list pending settlements: {}", e),
            )
        })?;

        rows.into_iter().map(SettlementView::try_from).collect()
    }

    async fn list_settled(
        &self,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<SettlementView>, DomainError> {
        let offset = i64::from(page) * i64::from(page_size);

        let rows: Vec<SettlementViewRow> = sqlx::query_as(
            r#"
            SELECT id, booking_id, owner_id, gross_amount, platform_fee, owner_amount,
                   status, settlement_date, bank_name, account_number, account_holder, created_at
            FROM settlements
            WHERE status = 'settled'
            ORDER BY settlement_date DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(page_size))
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list settled settlements: {}", e),
            )
        })?;

        rows.into_iter().map(SettlementView::try_from).collect()
    }

    async fn list_for_owner(
        &self,
        owner_id: &UserId,
    ) -> Result<Vec<SettlementView>, DomainError> {
        let rows: Vec<SettlementViewRow> = sqlx::query_as(
            r#"
            SELECT id, booking_id, owner_id, gross_amount, platform_fee, owner_amount,
                   status, settlement_date, bank_name, account_number, account_holder, created_at
            FROM settlements
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list owner settlements: {}", e),
            )
        })?;

        rows.into_iter().map(SettlementView::try_from).collect()
    }

    async fn totals(&self) -> Result<SettlementTotals, DomainError> {
        let row: TotalsRow = sqlx::query_as(
            r#"
            SELECT
                COALESCE(SUM(owner_amount) FILTER (WHERE status = 'pending_settlement'), 0) AS pending_owner_amount,
                COALESCE(SUM(owner_amount) FILTER (WHERE status = 'settled'), 0) AS settled_owner_amount,
                COALESCE(SUM(gross_amount), 0) AS total_gross_amount,
                COALESCE(SUM(platform_fee), 0) AS total_platform_fee,
                COUNT(*) FILTER (WHERE status = 'pending_settlement') AS pending_count,
                COUNT(*) FILTER (WHERE status = 'settled') AS settled_count
            FROM settlements
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to compute settlement totals: {}", e),
            )
        })?;

        Ok(SettlementTotals {
            pending_owner_amount: Money::from_minor_units(row.pending_owner_amount),
            settled_owner_amount: Money::from_minor_units(row.settled_owner_amount),
            total_gross_amount: Money::from_minor_units(row.total_gross_amount),
            total_platform_fee: Money::from_minor_units(row.total_platform_fee),
            pending_count: row.pending_count as u64,
            settled_count: row.settled_count as u64,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct TotalsRow {
    pending_owner_amount: i64,
    settled_owner_amount: i64,
    total_gross_amount: i64,
    total_platform_fee: i64,
    pending_count: i64,
    settled_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_row() -> SettlementViewRow {
        SettlementViewRow {
            id: Uuid::new_v4(),
            booking_id: Uuid::new_v4(),
            owner_id: "owner-1".to_string(),
            gross_amount: 12000,
            platform_fee: 1200,
            owner_amount: 10800,
            status: "pending_settlement".to_string(),
            settlement_date: None,
            bank_name: "First Bank".to_string(),
            account_number: "12345678".to_string(),
            account_holder: "Ada Owner".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn view_row_converts_to_view() {
        let view = SettlementView::try_from(sample_row()).unwrap();
        assert_eq!(view.status, SettlementStatus::PendingSettlement);
        assert_eq!(view.platform_fee.minor_units(), 1200);
        assert_eq!(view.owner_amount.minor_units(), 10800);
    }

    #[test]
    fn view_row_rejects_unknown_status() {
        let mut row = sample_row();
        row.status = "paid".to_string();
        assert!(SettlementView::try_from(row).is_err());
    }
}
