//! Axum router configuration for booking endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    approve_booking, cancel_booking, complete_booking, confirm_booking, create_booking,
    list_bookings, rebook_booking, reject_booking, BookingAppState,
};

/// Create the booking API router.
///
/// # Routes
///
/// - `POST /` - Request a new booking (tenant)
/// - `GET /` - List bookings scoped to the caller's role
/// - `POST /:id/approve` - Approve a pending booking (verified owner)
/// - `POST /:id/reject` - Reject a pending booking (owner, reason required)
/// - `POST /:id/confirm` - Record tenant check-in
/// - `POST /:id/complete` - Complete a confirmed booking
/// - `POST /:id/cancel` - Cancel an approved or confirmed booking (tenant)
/// - `POST /:id/rebook` - Rebook a rejected booking as a new one (tenant)
pub fn booking_routes() -> Router<BookingAppState> {
    Router::new()
        .route("/", post(create_booking))
        .route("/", get(list_bookings))
        .route("/:booking_id/approve", post(approve_booking))
        .route("/:booking_id/reject", post(reject_booking))
        .route("/:booking_id/confirm", post(confirm_booking))
        .route("/:booking_id/complete", post(complete_booking))
        .route("/:booking_id/cancel", post(cancel_booking))
        .route("/:booking_id/rebook", post(rebook_booking))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::application::handlers::booking::test_support::{
        MockBookingRepository, MockEventPublisher, MockPropertyDirectory,
    };
    use crate::domain::foundation::{BookingId, DomainError, PropertyId, UserId};
    use crate::ports::{BookingReader, BookingSummary};
    use async_trait::async_trait;

    struct EmptyBookingReader;

    #[async_trait]
    impl BookingReader for EmptyBookingReader {
        async fn list_for_tenant(
            &self,
            _tenant_id: &UserId,
        ) -> Result<Vec<BookingSummary>, DomainError> {
            Ok(vec![])
        }

        async fn list_for_owner(
            &self,
            _owner_id: &UserId,
        ) -> Result<Vec<BookingSummary>, DomainError> {
            Ok(vec![])
        }

        async fn list_for_property(
            &self,
            _property_id: &PropertyId,
        ) -> Result<Vec<BookingSummary>, DomainError> {
            Ok(vec![])
        }

        async fn list_all(&self) -> Result<Vec<BookingSummary>, DomainError> {
            Ok(vec![])
        }

        async fn active_tenants(
            &self,
            _property_id: &PropertyId,
        ) -> Result<Vec<UserId>, DomainError> {
            Ok(vec![])
        }

        async fn has_other_active_booking(
            &self,
            _property_id: &PropertyId,
            _tenant_id: &UserId,
            _excluding: &BookingId,
        ) -> Result<bool, DomainError> {
            Ok(false)
        }
    }

    fn test_state() -> BookingAppState {
        BookingAppState {
            booking_repository: Arc::new(MockBookingRepository::new()),
            booking_reader: Arc::new(EmptyBookingReader),
            property_directory: Arc::new(MockPropertyDirectory::available_property(
                PropertyId::new(),
            )),
            event_publisher: Arc::new(MockEventPublisher::new()),
        }
    }

    #[test]
    fn booking_routes_creates_router() {
        let router = booking_routes();
        let _: Router<()> = router.with_state(test_state());
    }
}
