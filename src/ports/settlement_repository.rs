//! Settlement repository port (write side).
//!
//! # Design
//!
//! - **One settlement per booking**: `save` must enforce a unique
//!   constraint on booking_id; the payment provider retries delivery, so
//!   the existing-row check is the idempotency mechanism.
//! - **Optimistic locking**: `update` carries the version the caller read.

use async_trait::async_trait;

use crate::domain::foundation::{BookingId, DomainError, SettlementId};
use crate::domain::settlement::Settlement;

/// Repository port for Settlement aggregate persistence.
#[async_trait]
pub trait SettlementRepository: Send + Sync {
    /// Save a new settlement.
    ///
    /// # Errors
    ///
    /// - `SettlementExists` if a settlement for the booking already exists
    /// - `DatabaseError` on persistence failure
    async fn save(&self, settlement: &Settlement) -> Result<(), DomainError>;

    /// Update an existing settlement if its stored version still matches
    /// `expected_version`.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the stored version differs
    /// - `SettlementNotFound` if the settlement doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(
        &self,
        settlement: &Settlement,
        expected_version: i64,
    ) -> Result<(), DomainError>;

    /// Find a settlement by its ID.
    async fn find_by_id(&self, id: &SettlementId) -> Result<Option<Settlement>, DomainError>;

    /// Find the settlement for a booking.
    ///
    /// This is the idempotency lookup for payment capture ingestion.
    async fn find_by_booking_id(
        &self,
        booking_id: &BookingId,
    ) -> Result<Option<Settlement>, DomainError>;
}
