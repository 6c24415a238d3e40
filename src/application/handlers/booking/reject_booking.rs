//! RejectBookingHandler - Command handler for owner rejection.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError, BookingEvent};
use crate::domain::foundation::{
    BookingId, CallerContext, ErrorCode, EventId, SerializableDomainEvent, Timestamp,
};
use crate::ports::{BookingRepository, EventPublisher};

/// Command to reject a pending booking with a reason.
#[derive(Debug, Clone)]
pub struct RejectBookingCommand {
    pub caller: CallerContext,
    pub booking_id: BookingId,
    pub reject_reason: String,
}

/// Result of successful rejection.
#[derive(Debug, Clone)]
pub struct RejectBookingResult {
    pub booking: Booking,
    pub event: BookingEvent,
}

/// Handler for rejecting bookings.
///
/// Rejection is terminal; the tenant can only rebook as a new booking.
pub struct RejectBookingHandler {
    repository: Arc<dyn BookingRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RejectBookingHandler {
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
        cmd: RejectBookingCommand,
    ) -> Result<RejectBookingResult, BookingError> {
        // 1. Load the booking
        let mut booking = self
            .repository
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or(BookingError::NotFound(cmd.booking_id))?;

        let expected_version = booking.version;

        // 2. Reject (authorizes, validates the reason, transitions)
        booking.reject(&cmd.caller, cmd.reject_reason.clone())?;

        // 3. Persist under the version read in step 1
        self.repository
            .update(&booking, expected_version)
            .await
            .map_err(|e| match e.code {
                ErrorCode::Conflict => BookingError::Conflict(booking.id),
                _ => e.into(),
            })?;

        // 4. Publish the event
        let event = BookingEvent::Rejected {
            event_id: EventId::new(),
            booking_id: booking.id,
            property_id: booking.property_id,
            tenant_id: booking.tenant_id.clone(),
            owner_id: booking.owner_id.clone(),
            reject_reason: cmd.reject_reason,
            occurred_at: Timestamp::now(),
        };
        self.event_publisher.publish(event.to_envelope()).await?;

        Ok(RejectBookingResult { booking, event })
    }
}
