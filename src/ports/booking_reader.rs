//! Booking reader port (read side / CQRS queries).
//!
//! Read-optimized listings scoped to the caller's role. Implementations
//! may denormalize or cache; they never mutate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::booking::BookingStatus;
use crate::domain::foundation::{BookingId, DomainError, Money, PropertyId, Timestamp, UserId};

/// Reader port for booking queries.
#[async_trait]
pub trait BookingReader: Send + Sync {
    /// List bookings requested by a tenant, newest first.
    async fn list_for_tenant(&self, tenant_id: &UserId)
        -> Result<Vec<BookingSummary>, DomainError>;

    /// List bookings across all properties an owner holds, newest first.
    async fn list_for_owner(&self, owner_id: &UserId) -> Result<Vec<BookingSummary>, DomainError>;

    /// List bookings for one property, newest first.
    async fn list_for_property(
        &self,
        property_id: &PropertyId,
    ) -> Result<Vec<BookingSummary>, DomainError>;

    /// List every booking, newest first. Admin-only surface.
    async fn list_all(&self) -> Result<Vec<BookingSummary>, DomainError>;

    /// Tenants with at least one approved or confirmed booking on the
    /// property. Drives property-channel membership.
    async fn active_tenants(&self, property_id: &PropertyId) -> Result<Vec<UserId>, DomainError>;

    /// Whether the tenant still holds another approved or confirmed booking
    /// on the property, excluding the given booking.
    async fn has_other_active_booking(
        &self,
        property_id: &PropertyId,
        tenant_id: &UserId,
        excluding: &BookingId,
    ) -> Result<bool, DomainError>;
}

/// Summary view of a booking for lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSummary {
    pub id: BookingId,
    pub property_id: PropertyId,
    pub tenant_id: UserId,
    pub status: BookingStatus,
    pub room_type: String,
    pub check_in_date: Timestamp,
    pub amount: Money,
    pub reject_reason: Option<String>,
    pub created_at: Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn booking_reader_is_object_safe() {
        fn _accepts_dyn(_reader: &dyn BookingReader) {}
    }
}
