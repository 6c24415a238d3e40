//! Booking repository port (write side).
//!
//! Defines the contract for persisting and retrieving Booking aggregates.
//!
//! # Design
//!
//! - **Single-writer per booking**: updates carry the version the caller
//!   read; a mismatch means another writer won and the update fails with
//!   `Conflict` rather than silently overwriting.
//! - **Overlap guard**: creation consults `find_overlapping` so a tenant
//!   cannot hold two live bookings for the same property and date.

use async_trait::async_trait;

use crate::domain::booking::Booking;
use crate::domain::foundation::{BookingId, DomainError, PropertyId, Timestamp, UserId};

/// Repository port for Booking aggregate persistence.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Save a new booking.
    ///
    /// # Errors
    ///
    /// - `DatabaseError` on persistence failure
    async fn save(&self, booking: &Booking) -> Result<(), DomainError>;

    /// Update an existing booking if its stored version still matches
    /// `expected_version`.
    ///
    /// # Errors
    ///
    /// - `Conflict` if the stored version differs (concurrent writer won)
    /// - `BookingNotFound` if the booking doesn't exist
    /// - `DatabaseError` on persistence failure
    async fn update(&self, booking: &Booking, expected_version: i64) -> Result<(), DomainError>;

    /// Find a booking by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &BookingId) -> Result<Option<Booking>, DomainError>;

    /// Find live (pending or approved) bookings by the same tenant for the
    /// same property and check-in date.
    ///
    /// Used by the creation guard; rejected, cancelled and completed
    /// bookings never count as overlapping.
    async fn find_overlapping(
        &self,
        property_id: &PropertyId,
        tenant_id: &UserId,
        check_in_date: &Timestamp,
    ) -> Result<Vec<Booking>, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn BookingRepository) {}
    }
}
