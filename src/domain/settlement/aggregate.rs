//! Settlement aggregate entity.
//!
//! A Settlement records the money owed to a property owner for one
//! booking's captured payment. It is created exactly once per booking,
//! triggered only by a payment-captured event, and moves from
//! pending_settlement to settled exactly once.
//!
//! # Design Decisions
//!
//! - **Split computed once**: platform_fee and owner_amount are derived at
//!   creation and never recomputed; later fee policy changes do not touch
//!   existing settlements
//! - **Frozen bank snapshot**: owner payout details are copied at creation,
//!   not referenced live
//! - **Idempotent settle**: marking an already-settled settlement is a
//!   success that changes nothing, so payment-provider and admin retries
//!   are harmless

use crate::domain::foundation::{
    BookingId, CallerContext, DomainError, ErrorCode, Money, Role, SettlementId, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

use super::{OwnerBankSnapshot, SettlementStatus};

/// Outcome of a mark-settled call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettleOutcome {
    /// The settlement transitioned to settled in this call.
    Settled,

    /// It was already settled; nothing changed, including settlement_date.
    AlreadySettled,
}

/// Settlement aggregate.
///
/// # Invariants
///
/// - one settlement per booking (unique booking_id, enforced in storage)
/// - `platform_fee + owner_amount == gross_amount`, always
/// - `owner_amount` is never negative and never exceeds `gross_amount`
/// - `settlement_date` is set exactly when status is Settled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    /// Unique identifier for this settlement.
    pub id: SettlementId,

    /// Booking whose captured payment this settlement accounts for.
    pub booking_id: BookingId,

    /// Owner to be paid out.
    pub owner_id: UserId,

    /// Amount captured from the tenant, in minor units.
    pub gross_amount: Money,

    /// Platform's cut, computed once at creation.
    pub platform_fee: Money,

    /// Amount owed to the owner, computed once at creation.
    pub owner_amount: Money,

    /// Current payout status.
    pub status: SettlementStatus,

    /// When the payout was released. Set exactly once, on settle.
    pub settlement_date: Option<Timestamp>,

    /// Owner payout details frozen at creation time.
    pub owner_bank_snapshot: OwnerBankSnapshot,

    /// When the settlement was created.
    pub created_at: Timestamp,

    /// When the settlement was last updated.
    pub updated_at: Timestamp,

    /// Optimistic concurrency version, incremented on every persisted write.
    pub version: i64,
}

impl Settlement {
    /// Create a settlement from a captured payment.
    ///
    /// The fee split is computed here, once, from the given rate.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the gross amount is not positive or
    /// the rate exceeds 100%.
    pub fn from_captured_payment(
        id: SettlementId,
        booking_id: BookingId,
        owner_id: UserId,
        gross_amount: Money,
        fee_bps: u32,
        owner_bank_snapshot: OwnerBankSnapshot,
    ) -> Result<Self, DomainError> {
        if !gross_amount.is_positive() {
            return Err(DomainError::validation(
                "gross_amount",
                format!("must be positive, got {}", gross_amount.minor_units()),
            ));
        }
        if i64::from(fee_bps) > crate::domain::foundation::BPS_DENOMINATOR {
            return Err(DomainError::validation(
                "fee_bps",
                format!("rate {} exceeds 100%", fee_bps),
            ));
        }

        let (platform_fee, owner_amount) = gross_amount.split_at_bps(fee_bps);
        let now = Timestamp::now();
        Ok(Self {
            id,
            booking_id,
            owner_id,
            gross_amount,
            platform_fee,
            owner_amount,
            status: SettlementStatus::PendingSettlement,
            settlement_date: None,
            owner_bank_snapshot,
            created_at: now,
            updated_at: now,
            version: 0,
        })
    }

    /// Release the payout.
    ///
    /// Requires an admin caller. Calling this on an already-settled
    /// settlement is an idempotent success: nothing changes and
    /// `settlement_date` keeps its original value.
    ///
    /// # Errors
    ///
    /// `Forbidden` when the caller is not an admin.
    pub fn mark_settled(&mut self, caller: &CallerContext) -> Result<SettleOutcome, DomainError> {
        if !caller.has_role(Role::Admin) {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Only admins may settle payouts",
            ));
        }

        if self.status == SettlementStatus::Settled {
            return Ok(SettleOutcome::AlreadySettled);
        }

        self.status = SettlementStatus::Settled;
        let now = Timestamp::now();
        self.settlement_date = Some(now);
        self.updated_at = now;
        self.version += 1;
        Ok(SettleOutcome::Settled)
    }

    /// True if the payout is still queued.
    pub fn is_pending(&self) -> bool {
        self.status == SettlementStatus::PendingSettlement
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner_id() -> UserId {
        UserId::new("owner-1").unwrap()
    }

    fn admin() -> CallerContext {
        CallerContext::admin(UserId::new("admin-1").unwrap())
    }

    fn snapshot() -> OwnerBankSnapshot {
        OwnerBankSnapshot::new("First Bank", "12345678", "Ada Owner").unwrap()
    }

    fn pending_settlement() -> Settlement {
        Settlement::from_captured_payment(
            SettlementId::new(),
            BookingId::new(),
            owner_id(),
            Money::from_minor_units(12000),
            1000,
            snapshot(),
        )
        .unwrap()
    }

    // Construction tests

    #[test]
    fn capture_with_extreme_gross_amount_splits_exactly() {
        // Webhook amounts are provider-supplied; the split must hold even
        // for amounts near the i64 range.
        let gross = Money::from_minor_units(i64::MAX / 10_000 + 1);
        let settlement = Settlement::from_captured_payment(
            SettlementId::new(),
            BookingId::new(),
            owner_id(),
            gross,
            10_000,
            snapshot(),
        )
        .unwrap();

        assert_eq!(
            settlement.platform_fee + settlement.owner_amount,
            settlement.gross_amount
        );
        assert!(settlement.owner_amount >= Money::ZERO);
    }

    #[test]
    fn split_is_computed_once_at_creation() {
        let settlement = pending_settlement();

        assert_eq!(settlement.gross_amount.minor_units(), 12000);
        assert_eq!(settlement.platform_fee.minor_units(), 1200);
        assert_eq!(settlement.owner_amount.minor_units(), 10800);
        assert_eq!(settlement.status, SettlementStatus::PendingSettlement);
        assert!(settlement.settlement_date.is_none());
    }

    #[test]
    fn fee_plus_owner_amount_equals_gross() {
        for gross in [1i64, 999, 12000, 1_000_001] {
            let settlement = Settlement::from_captured_payment(
                SettlementId::new(),
                BookingId::new(),
                owner_id(),
                Money::from_minor_units(gross),
                1000,
                snapshot(),
            )
            .unwrap();

            assert_eq!(
                settlement.platform_fee + settlement.owner_amount,
                settlement.gross_amount
            );
            assert!(settlement.owner_amount <= settlement.gross_amount);
            assert!(settlement.owner_amount >= Money::ZERO);
        }
    }

    #[test]
    fn non_positive_gross_is_rejected() {
        let result = Settlement::from_captured_payment(
            SettlementId::new(),
            BookingId::new(),
            owner_id(),
            Money::ZERO,
            1000,
            snapshot(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn rate_above_one_hundred_percent_is_rejected() {
        let result = Settlement::from_captured_payment(
            SettlementId::new(),
            BookingId::new(),
            owner_id(),
            Money::from_minor_units(1000),
            10_001,
            snapshot(),
        );
        assert!(result.is_err());
    }

    // Settle tests

    #[test]
    fn admin_can_settle_pending() {
        let mut settlement = pending_settlement();
        let outcome = settlement.mark_settled(&admin()).unwrap();

        assert_eq!(outcome, SettleOutcome::Settled);
        assert_eq!(settlement.status, SettlementStatus::Settled);
        assert!(settlement.settlement_date.is_some());
    }

    #[test]
    fn second_settle_is_idempotent_and_keeps_date() {
        let mut settlement = pending_settlement();
        settlement.mark_settled(&admin()).unwrap();
        let first_date = settlement.settlement_date;

        let outcome = settlement.mark_settled(&admin()).unwrap();

        assert_eq!(outcome, SettleOutcome::AlreadySettled);
        assert_eq!(settlement.settlement_date, first_date);
    }

    #[test]
    fn non_admin_cannot_settle() {
        let mut settlement = pending_settlement();
        let owner = CallerContext::owner(owner_id());

        let err = settlement.mark_settled(&owner).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
        assert!(settlement.is_pending());
    }

    #[test]
    fn bank_snapshot_is_the_creation_time_copy() {
        let settlement = pending_settlement();
        assert_eq!(settlement.owner_bank_snapshot, snapshot());
    }
}
