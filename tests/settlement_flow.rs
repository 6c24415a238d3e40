//! Integration tests for the payment capture and settlement flow.
//!
//! Drives the settlement handlers over in-memory adapters: a captured
//! payment creates exactly one ledger row with the fee split applied,
//! duplicate captures collapse onto that row, and marking settled is an
//! idempotent admin-only operation.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use rentledger::adapters::events::InMemoryEventBus;
use rentledger::adapters::property::InMemoryPropertyDirectory;
use rentledger::application::handlers::settlement::{
    MarkSettledCommand, MarkSettledHandler, RecordPaymentCapturedCommand,
    RecordPaymentCapturedHandler,
};
use rentledger::domain::booking::Booking;
use rentledger::domain::foundation::{
    BookingId, CallerContext, DomainError, ErrorCode, Money, PropertyId, SettlementId, Timestamp,
    UserId,
};
use rentledger::domain::settlement::{FeePolicy, SettleOutcome, Settlement, SettlementStatus};
use rentledger::ports::{
    BookingRepository, EventPublisher, OwnerPayoutDetails, PropertyDirectory, SettlementRepository,
};

// =============================================================================
// Test Infrastructure
// =============================================================================

/// In-memory settlement repository enforcing one row per booking.
struct InMemorySettlementRepository {
    settlements: RwLock<HashMap<SettlementId, Settlement>>,
}

impl InMemorySettlementRepository {
    fn new() -> Self {
        Self {
            settlements: RwLock::new(HashMap::new()),
        }
    }

    async fn count(&self) -> usize {
        self.settlements.read().await.len()
    }
}

#[async_trait]
impl SettlementRepository for InMemorySettlementRepository {
    async fn save(&self, settlement: &Settlement) -> Result<(), DomainError> {
        let mut settlements = self.settlements.write().await;
        if settlements
            .values()
            .any(|s| s.booking_id == settlement.booking_id)
        {
            return Err(DomainError::new(
                ErrorCode::SettlementExists,
                "A settlement already exists for this booking",
            ));
        }
        settlements.insert(settlement.id, settlement.clone());
        Ok(())
    }

    async fn update(
        &self,
        settlement: &Settlement,
        expected_version: i64,
    ) -> Result<(), DomainError> {
        let mut settlements = self.settlements.write().await;
        match settlements.get(&settlement.id) {
            Some(current) if current.version == expected_version => {
                settlements.insert(settlement.id, settlement.clone());
                Ok(())
            }
            Some(_) => Err(DomainError::new(
                ErrorCode::Conflict,
                "Settlement was modified by another request",
            )),
            None => Err(DomainError::new(
                ErrorCode::SettlementNotFound,
                "Settlement not found",
            )),
        }
    }

    async fn find_by_id(&self, id: &SettlementId) -> Result<Option<Settlement>, DomainError> {
        Ok(self.settlements.read().await.get(id).cloned())
    }

    async fn find_by_booking_id(
        &self,
        booking_id: &BookingId,
    ) -> Result<Option<Settlement>, DomainError> {
        Ok(self
            .settlements
            .read()
            .await
            .values()
            .find(|s| s.booking_id == *booking_id)
            .cloned())
    }
}

/// Single-booking repository; the capture flow only ever loads by id.
struct SingleBookingRepository {
    booking: Booking,
}

#[async_trait]
impl BookingRepository for SingleBookingRepository {
    async fn save(&self, _booking: &Booking) -> Result<(), DomainError> {
        Ok(())
    }

    async fn update(&self, _booking: &Booking, _expected_version: i64) -> Result<(), DomainError> {
        Ok(())
    }

    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError> {
        Ok((self.booking.id == *id).then(|| self.booking.clone()))
    }

    async fn find_overlapping(
        &self,
        _property_id: &PropertyId,
        _tenant_id: &UserId,
        _check_in_date: &Timestamp,
    ) -> Result<Vec<Booking>, DomainError> {
        Ok(Vec::new())
    }
}

struct Fixture {
    settlements: Arc<InMemorySettlementRepository>,
    event_bus: Arc<InMemoryEventBus>,
    booking: Booking,
    admin: CallerContext,
    record: RecordPaymentCapturedHandler,
    settle: MarkSettledHandler,
}

fn owner_id() -> UserId {
    UserId::new("owner-1").unwrap()
}

fn fixture_with_policy(fee_policy: FeePolicy) -> Fixture {
    let booking = Booking::request(
        BookingId::new(),
        PropertyId::new(),
        UserId::new("tenant-1").unwrap(),
        owner_id(),
        "double".to_string(),
        Timestamp::now(),
        Money::from_minor_units(12_000),
    )
    .unwrap();

    let settlements = Arc::new(InMemorySettlementRepository::new());
    let event_bus = Arc::new(InMemoryEventBus::new());
    let directory: Arc<dyn PropertyDirectory> = Arc::new(
        InMemoryPropertyDirectory::new().with_payout_details(
            &owner_id(),
            OwnerPayoutDetails {
                bank_name: "First Rental Bank".to_string(),
                account_number: "12-345-678".to_string(),
                account_holder: "Owner One".to_string(),
            },
        ),
    );
    let booking_repo: Arc<dyn BookingRepository> = Arc::new(SingleBookingRepository {
        booking: booking.clone(),
    });
    let settlement_repo: Arc<dyn SettlementRepository> = settlements.clone();
    let bus: Arc<dyn EventPublisher> = event_bus.clone();

    Fixture {
        record: RecordPaymentCapturedHandler::new(
            settlement_repo.clone(),
            booking_repo,
            directory,
            bus.clone(),
            fee_policy,
        ),
        settle: MarkSettledHandler::new(settlement_repo, bus),
        settlements,
        event_bus,
        booking,
        admin: CallerContext::admin(UserId::new("admin-1").unwrap()),
    }
}

fn fixture() -> Fixture {
    fixture_with_policy(FeePolicy::fixed(1_000).unwrap())
}

// =============================================================================
// Integration Tests
// =============================================================================

#[tokio::test]
async fn captured_payment_creates_settlement_with_fee_split() {
    let fx = fixture();

    let result = fx
        .record
        .handle(RecordPaymentCapturedCommand {
            booking_id: fx.booking.id,
            gross_amount: Money::from_minor_units(12_000),
        })
        .await
        .unwrap();

    assert!(result.created);
    let settlement = result.settlement;
    assert_eq!(settlement.booking_id, fx.booking.id);
    assert_eq!(settlement.owner_id, owner_id());
    assert_eq!(settlement.gross_amount, Money::from_minor_units(12_000));
    assert_eq!(settlement.platform_fee, Money::from_minor_units(1_200));
    assert_eq!(settlement.owner_amount, Money::from_minor_units(10_800));
    assert_eq!(settlement.status, SettlementStatus::PendingSettlement);
    assert_eq!(settlement.owner_bank_snapshot.bank_name, "First Rental Bank");

    assert!(fx.event_bus.has_event("settlement.created.v1"));
}

#[tokio::test]
async fn category_rate_overrides_default_fee() {
    let fx = fixture_with_policy(
        FeePolicy::fixed(1_000)
            .unwrap()
            .with_category_rate("double", 2_000)
            .unwrap(),
    );

    let result = fx
        .record
        .handle(RecordPaymentCapturedCommand {
            booking_id: fx.booking.id,
            gross_amount: Money::from_minor_units(10_000),
        })
        .await
        .unwrap();

    assert_eq!(result.settlement.platform_fee, Money::from_minor_units(2_000));
    assert_eq!(result.settlement.owner_amount, Money::from_minor_units(8_000));
}

#[tokio::test]
async fn duplicate_capture_returns_existing_settlement() {
    let fx = fixture();
    let cmd = RecordPaymentCapturedCommand {
        booking_id: fx.booking.id,
        gross_amount: Money::from_minor_units(12_000),
    };

    let first = fx.record.handle(cmd.clone()).await.unwrap();
    let second = fx.record.handle(cmd).await.unwrap();

    assert!(first.created);
    assert!(!second.created);
    assert_eq!(first.settlement.id, second.settlement.id);
    assert_eq!(fx.settlements.count().await, 1);
    assert_eq!(fx.event_bus.events_of_type("settlement.created.v1").len(), 1);
}

#[tokio::test]
async fn mark_settled_is_idempotent() {
    let fx = fixture();
    let settlement = fx
        .record
        .handle(RecordPaymentCapturedCommand {
            booking_id: fx.booking.id,
            gross_amount: Money::from_minor_units(12_000),
        })
        .await
        .unwrap()
        .settlement;

    let first = fx
        .settle
        .handle(MarkSettledCommand {
            caller: fx.admin.clone(),
            settlement_id: settlement.id,
        })
        .await
        .unwrap();
    assert_eq!(first.outcome, SettleOutcome::Settled);
    assert_eq!(first.settlement.status, SettlementStatus::Settled);
    assert!(first.settlement.settlement_date.is_some());

    let second = fx
        .settle
        .handle(MarkSettledCommand {
            caller: fx.admin.clone(),
            settlement_id: settlement.id,
        })
        .await
        .unwrap();
    assert_eq!(second.outcome, SettleOutcome::AlreadySettled);

    // Only the first transition publishes
    assert_eq!(fx.event_bus.events_of_type("settlement.settled.v1").len(), 1);
}

#[tokio::test]
async fn non_admin_cannot_mark_settled() {
    let fx = fixture();
    let settlement = fx
        .record
        .handle(RecordPaymentCapturedCommand {
            booking_id: fx.booking.id,
            gross_amount: Money::from_minor_units(12_000),
        })
        .await
        .unwrap()
        .settlement;

    let owner = CallerContext::owner(owner_id());
    let result = fx
        .settle
        .handle(MarkSettledCommand {
            caller: owner,
            settlement_id: settlement.id,
        })
        .await;

    assert!(matches!(
        result,
        Err(rentledger::domain::settlement::SettlementError::Forbidden(_))
    ));
}

#[tokio::test]
async fn capture_for_unknown_booking_fails_validation() {
    let fx = fixture();

    let result = fx
        .record
        .handle(RecordPaymentCapturedCommand {
            booking_id: BookingId::new(),
            gross_amount: Money::from_minor_units(5_000),
        })
        .await;

    assert!(matches!(
        result,
        Err(rentledger::domain::settlement::SettlementError::ValidationFailed { .. })
    ));
}
