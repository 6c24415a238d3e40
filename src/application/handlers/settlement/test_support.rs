//! Shared mock ports for settlement handler tests.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::foundation::{
    BookingId, CallerContext, DomainError, ErrorCode, Money, SettlementId, UserId,
};
use crate::domain::settlement::{OwnerBankSnapshot, Settlement};
use crate::ports::SettlementRepository;

pub fn owner_id() -> UserId {
    UserId::new("owner-1").unwrap()
}

pub fn admin_caller() -> CallerContext {
    CallerContext::admin(UserId::new("admin-1").unwrap())
}

pub fn bank_snapshot() -> OwnerBankSnapshot {
    OwnerBankSnapshot::new("First National", "12345678", "Owner One").unwrap()
}

pub fn pending_settlement(booking_id: BookingId) -> Settlement {
    Settlement::from_captured_payment(
        SettlementId::new(),
        booking_id,
        owner_id(),
        Money::from_minor_units(12_000),
        1_000,
        bank_snapshot(),
    )
    .unwrap()
}

pub struct MockSettlementRepository {
    pub settlements: Mutex<Vec<Settlement>>,
    pub fail_save_with: Option<ErrorCode>,
    pub fail_update_with: Option<ErrorCode>,
}

impl MockSettlementRepository {
    pub fn new() -> Self {
        Self {
            settlements: Mutex::new(Vec::new()),
            fail_save_with: None,
            fail_update_with: None,
        }
    }

    pub fn with_settlement(settlement: Settlement) -> Self {
        Self {
            settlements: Mutex::new(vec![settlement]),
            fail_save_with: None,
            fail_update_with: None,
        }
    }

    pub fn stored(&self) -> Vec<Settlement> {
        self.settlements.lock().unwrap().clone()
    }
}

#[async_trait]
impl SettlementRepository for MockSettlementRepository {
    async fn save(&self, settlement: &Settlement) -> Result<(), DomainError> {
        if let Some(code) = self.fail_save_with {
            return Err(DomainError::new(code, "Simulated save failure"));
        }
        let mut settlements = self.settlements.lock().unwrap();
        if settlements
            .iter()
            .any(|s| s.booking_id == settlement.booking_id)
        {
            return Err(DomainError::new(
                ErrorCode::SettlementExists,
                "Settlement already exists for booking",
            ));
        }
        settlements.push(settlement.clone());
        Ok(())
    }

    async fn update(
        &self,
        settlement: &Settlement,
        expected_version: i64,
    ) -> Result<(), DomainError> {
        if let Some(code) = self.fail_update_with {
            return Err(DomainError::new(code, "Simulated update failure"));
        }
        let mut settlements = self.settlements.lock().unwrap();
        let stored = settlements
            .iter_mut()
            .find(|s| s.id == settlement.id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::SettlementNotFound, "Settlement not found")
            })?;
        if stored.version != expected_version {
            return Err(DomainError::new(
                ErrorCode::Conflict,
                "Version mismatch, concurrent writer won",
            ));
        }
        *stored = settlement.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: &SettlementId) -> Result<Option<Settlement>, DomainError> {
        let settlements = self.settlements.lock().unwrap();
        Ok(settlements.iter().find(|s| &s.id == id).cloned())
    }

    async fn find_by_booking_id(
        &self,
        booking_id: &BookingId,
    ) -> Result<Option<Settlement>, DomainError> {
        let settlements = self.settlements.lock().unwrap();
        Ok(settlements
            .iter()
            .find(|s| &s.booking_id == booking_id)
            .cloned())
    }
}
