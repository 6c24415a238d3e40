//! CancelBookingHandler - Command handler for tenant cancellation.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError, BookingEvent};
use crate::domain::foundation::{
    BookingId, CallerContext, ErrorCode, EventId, SerializableDomainEvent, Timestamp,
};
use crate::ports::{BookingRepository, EventPublisher};

/// Command to cancel an approved or confirmed booking.
#[derive(Debug, Clone)]
pub struct CancelBookingCommand {
    pub caller: CallerContext,
    pub booking_id: BookingId,
}

/// Result of successful cancellation.
#[derive(Debug, Clone)]
pub struct CancelBookingResult {
    pub booking: Booking,
    pub event: BookingEvent,
}

/// Handler for cancelling bookings.
///
/// Only the tenant may cancel, and only before completion.
pub struct CancelBookingHandler {
    repository: Arc<dyn BookingRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CancelBookingHandler {
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CancelBookingCommand,
    ) -> Result<CancelBookingResult, BookingError> {
        let mut booking = self
            .repository
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or(BookingError::NotFound(cmd.booking_id))?;

        let expected_version = booking.version;

        booking.cancel(&cmd.caller)?;

        self.repository
            .update(&booking, expected_version)
            .await
            .map_err(|e| match e.code {
                ErrorCode::Conflict => BookingError::Conflict(booking.id),
                _ => e.into(),
            })?;

        let event = BookingEvent::Cancelled {
            event_id: EventId::new(),
            booking_id: booking.id,
            property_id: booking.property_id,
            tenant_id: booking.tenant_id.clone(),
            owner_id: booking.owner_id.clone(),
            occurred_at: Timestamp::now(),
        };
        self.event_publisher.publish(event.to_envelope()).await?;

        Ok(CancelBookingResult { booking, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::booking::test_support::*;
    use crate::domain::booking::BookingStatus;
    use crate::domain::foundation::PropertyId;

    #[tokio::test]
    async fn tenant_cancels_approved_booking() {
        let booking = booking_in_status(PropertyId::new(), BookingStatus::Approved);
        let booking_id = booking.id;
        let repo = Arc::new(MockBookingRepository::with_booking(booking));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = CancelBookingHandler::new(repo, publisher.clone());

        let result = handler
            .handle(CancelBookingCommand {
                caller: tenant_caller(),
                booking_id,
            })
            .await
            .unwrap();

        assert_eq!(result.booking.status, BookingStatus::Cancelled);
        assert_eq!(
            publisher.published_events()[0].event_type,
            "booking.cancelled.v1"
        );
    }

    #[tokio::test]
    async fn tenant_cancels_confirmed_booking() {
        let booking = booking_in_status(PropertyId::new(), BookingStatus::Confirmed);
        let booking_id = booking.id;
        let repo = Arc::new(MockBookingRepository::with_booking(booking));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = CancelBookingHandler::new(repo, publisher);

        let result = handler
            .handle(CancelBookingCommand {
                caller: tenant_caller(),
                booking_id,
            })
            .await;

        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn pending_booking_cannot_be_cancelled() {
        let booking = pending_booking(PropertyId::new());
        let booking_id = booking.id;
        let repo = Arc::new(MockBookingRepository::with_booking(booking));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = CancelBookingHandler::new(repo, publisher);

        let err = handler
            .handle(CancelBookingCommand {
                caller: tenant_caller(),
                booking_id,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::InvalidTransition { .. }));
    }

    #[tokio::test]
    async fn owner_cannot_cancel() {
        let booking = booking_in_status(PropertyId::new(), BookingStatus::Approved);
        let booking_id = booking.id;
        let repo = Arc::new(MockBookingRepository::with_booking(booking));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = CancelBookingHandler::new(repo, publisher);

        let err = handler
            .handle(CancelBookingCommand {
                caller: owner_caller(),
                booking_id,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::Forbidden(_)));
    }

    #[tokio::test]
    async fn completed_booking_cannot_be_cancelled() {
        let booking = booking_in_status(PropertyId::new(), BookingStatus::Completed);
        let booking_id = booking.id;
        let repo = Arc::new(MockBookingRepository::with_booking(booking));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = CancelBookingHandler::new(repo, publisher);

        let err = handler
            .handle(CancelBookingCommand {
                caller: tenant_caller(),
                booking_id,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, BookingError::InvalidTransition { .. }));
    }
}
