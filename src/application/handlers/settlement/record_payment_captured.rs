//! RecordPaymentCapturedHandler - Ingress for payment capture events.
//!
//! The payment provider is the sole caller and retries delivery, so
//! idempotency is keyed on booking_id via the existing-row check, not on
//! client-supplied tokens.

use std::sync::Arc;

use crate::domain::foundation::{
    BookingId, ErrorCode, EventId, Money, SerializableDomainEvent, SettlementId, Timestamp,
};
use crate::domain::settlement::{
    FeePolicy, OwnerBankSnapshot, Settlement, SettlementError, SettlementEvent,
};
use crate::ports::{BookingRepository, EventPublisher, PropertyDirectory, SettlementRepository};

/// Command recording a captured payment for a booking.
#[derive(Debug, Clone)]
pub struct RecordPaymentCapturedCommand {
    pub booking_id: BookingId,
    pub gross_amount: Money,
}

/// Result of payment capture ingestion.
#[derive(Debug, Clone)]
pub struct RecordPaymentCapturedResult {
    pub settlement: Settlement,
    /// False when the settlement already existed (duplicate delivery).
    pub created: bool,
}

/// Handler for creating settlements from captured payments.
///
/// The fee comes from the configured policy, keyed by the booking's room
/// type where a category rate exists. The owner's bank details are
/// snapshotted at creation; later changes never touch this settlement.
pub struct RecordPaymentCapturedHandler {
    settlement_repository: Arc<dyn SettlementRepository>,
    booking_repository: Arc<dyn BookingRepository>,
    property_directory: Arc<dyn PropertyDirectory>,
    event_publisher: Arc<dyn EventPublisher>,
    fee_policy: FeePolicy,
}

impl RecordPaymentCapturedHandler {
    pub fn new(
        settlement_repository: Arc<dyn SettlementRepository>,
        booking_repository: Arc<dyn BookingRepository>,
        property_directory: Arc<dyn PropertyDirectory>,
        event_publisher: Arc<dyn EventPublisher>,
        fee_policy: FeePolicy,
    ) -> Self {
        Self {
            settlement_repository,
            booking_repository,
            property_directory,
            event_publisher,
            fee_policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: RecordPaymentCapturedCommand,
    ) -> Result<RecordPaymentCapturedResult, SettlementError> {
        // 1. Existing-row check: duplicate delivery returns the original
        if let Some(existing) = self
            .settlement_repository
            .find_by_booking_id(&cmd.booking_id)
            .await?
        {
            return Ok(RecordPaymentCapturedResult {
                settlement: existing,
                created: false,
            });
        }

        // 2. Resolve the booking for owner and fee category
        let booking = self
            .booking_repository
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or_else(|| {
                SettlementError::validation("booking_id", "No booking for captured payment")
            })?;

        // 3. Snapshot the owner's payout details as of now
        let payout = self
            .property_directory
            .get_owner_payout_details(&booking.owner_id)
            .await?;
        let snapshot =
            OwnerBankSnapshot::new(payout.bank_name, payout.account_number, payout.account_holder)
                .map_err(|e| SettlementError::validation("owner_bank", e.to_string()))?;

        // 4. Compute the split once and build the aggregate
        let fee_bps = self.fee_policy.rate_for(Some(&booking.room_type));
        let settlement = Settlement::from_captured_payment(
            SettlementId::new(),
            cmd.booking_id,
            booking.owner_id.clone(),
            cmd.gross_amount,
            fee_bps,
            snapshot,
        )?;

        // 5. Persist; a concurrent duplicate loses to the unique constraint
        match self.settlement_repository.save(&settlement).await {
            Ok(()) => {}
            Err(e) if e.code == ErrorCode::SettlementExists => {
                let existing = self
                    .settlement_repository
                    .find_by_booking_id(&cmd.booking_id)
                    .await?
                    .ok_or_else(|| SettlementError::Infrastructure(e.message))?;
                return Ok(RecordPaymentCapturedResult {
                    settlement: existing,
                    created: false,
                });
            }
            Err(e) => return Err(e.into()),
        }

        // 6. Publish the event
        let event = SettlementEvent::Created {
            event_id: EventId::new(),
            settlement_id: settlement.id,
            booking_id: settlement.booking_id,
            owner_id: settlement.owner_id.clone(),
            gross_amount: settlement.gross_amount,
            platform_fee: settlement.platform_fee,
            owner_amount: settlement.owner_amount,
            occurred_at: Timestamp::now(),
        };
        self.event_publisher.publish(event.to_envelope()).await?;

        Ok(RecordPaymentCapturedResult {
            settlement,
            created: true,
        })
    }
}
