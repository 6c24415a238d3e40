//! ConfirmBookingHandler - Command handler for recording check-in.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError, BookingEvent};
use crate::domain::foundation::{
    BookingId, CallerContext, ErrorCode, EventId, SerializableDomainEvent, Timestamp,
};
use crate::ports::{BookingRepository, EventPublisher};

/// Command to confirm an approved booking.
#[derive(Debug, Clone)]
pub struct ConfirmBookingCommand {
    pub caller: CallerContext,
    pub booking_id: BookingId,
}

/// Result of successful confirmation.
#[derive(Debug, Clone)]
pub struct ConfirmBookingResult {
    pub booking: Booking,
    pub event: BookingEvent,
}

/// Handler for confirming bookings.
///
/// Either party may record the check-in. Early confirmation before the
/// check-in date is allowed; the date is advisory.
pub struct ConfirmBookingHandler {
    repository: Arc<dyn BookingRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ConfirmBookingHandler {
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
        cmd: ConfirmBookingCommand,
    ) -> Result<ConfirmBookingResult, BookingError> {
        let mut booking = self
            .repository
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or(BookingError::NotFound(cmd.booking_id))?;

        let expected_version = booking.version;

        booking.confirm(&cmd.caller)?;

        self.repository
            .update(&booking, expected_version)
            .await
            .map_err(|e| match e.code {
                ErrorCode::Conflict => BookingError::Conflict(booking.id),
                _ => e.into(),
            })?;

        let event = BookingEvent::Confirmed {
            event_id: EventId::new(),
            booking_id: booking.id,
            property_id: booking.property_id,
            tenant_id: booking.tenant_id.clone(),
            owner_id: booking.owner_id.clone(),
            occurred_at: Timestamp::now(),
        };
        self.event_publisher.publish(event.to_envelope()).await?;

        Ok(ConfirmBookingResult { booking, event })
    }
}
