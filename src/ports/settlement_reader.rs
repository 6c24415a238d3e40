//! Settlement reader port (read side / CQRS queries).
//!
//! Admin reporting over the settlement table. The totals query backs the
//! ledger consistency check: pending plus settled owner amounts must equal
//! gross minus fees for all time.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::foundation::{BookingId, DomainError, Money, SettlementId, Timestamp, UserId};
use crate::domain::settlement::{OwnerBankSnapshot, SettlementStatus};

/// Reader port for settlement queries.
#[async_trait]
pub trait SettlementReader: Send + Sync {
    /// List settlements awaiting payout, oldest first, with the bank
    /// snapshot needed to execute the transfer.
    async fn list_pending(&self) -> Result<Vec<SettlementView>, DomainError>;

    /// List settled rows, newest first, paginated.
    async fn list_settled(&self, page: u32, page_size: u32)
        -> Result<Vec<SettlementView>, DomainError>;

    /// Full settlement history for one owner, newest first.
    async fn list_for_owner(&self, owner_id: &UserId)
        -> Result<Vec<SettlementView>, DomainError>;

    /// Ledger-wide aggregate amounts.
    async fn totals(&self) -> Result<SettlementTotals, DomainError>;
}

/// Full view of a settlement for admin screens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementView {
    pub id: SettlementId,
    pub booking_id: BookingId,
    pub owner_id: UserId,
    pub gross_amount: Money,
    pub platform_fee: Money,
    pub owner_amount: Money,
    pub status: SettlementStatus,
    pub settlement_date: Option<Timestamp>,
    pub owner_bank_snapshot: OwnerBankSnapshot,
    pub created_at: Timestamp,
}

/// Aggregate amounts across the whole ledger.
///
/// Invariant: `pending_owner_amount + settled_owner_amount
/// == total_gross_amount - total_platform_fee`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SettlementTotals {
    pub pending_owner_amount: Money,
    pub settled_owner_amount: Money,
    pub total_gross_amount: Money,
    pub total_platform_fee: Money,
    pub pending_count: u64,
    pub settled_count: u64,
}

impl SettlementTotals {
    /// Checks the ledger sum invariant.
    pub fn is_consistent(&self) -> bool {
        self.pending_owner_amount + self.settled_owner_amount
            == self.total_gross_amount - self.total_platform_fee
    }
}
