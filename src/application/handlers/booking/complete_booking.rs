//! CompleteBookingHandler - Command handler for finishing a stay.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError, BookingEvent};
use crate::domain::foundation::{
    BookingId, CallerContext, ErrorCode, EventId, SerializableDomainEvent, Timestamp,
};
use crate::ports::{BookingRepository, EventPublisher};

/// Command to complete a confirmed booking.
#[derive(Debug, Clone)]
pub struct CompleteBookingCommand {
    pub caller: CallerContext,
    pub booking_id: BookingId,
}

/// Result of successful completion.
#[derive(Debug, Clone)]
pub struct CompleteBookingResult {
    pub booking: Booking,
    pub event: BookingEvent,
}

/// Handler for completing bookings.
///
/// The owner records completion; admins may as well, which is how
/// scheduled system completion runs.
pub struct CompleteBookingHandler {
    repository: Arc<dyn BookingRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CompleteBookingHandler {
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
        cmd: CompleteBookingCommand,
    ) -> Result<CompleteBookingResult, BookingError> {
        let mut booking = self
            .repository
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or(BookingError::NotFound(cmd.booking_id))?;

        let expected_version = booking.version;

        booking.complete(&cmd.caller)?;

        self.repository
            .update(&booking, expected_version)
            .await
            .map_err(|e| match e.code {
                ErrorCode::Conflict => BookingError::Conflict(booking.id),
                _ => e.into(),
            })?;

        let event = BookingEvent::Completed {
            event_id: EventId::new(),
            booking_id: booking.id,
            property_id: booking.property_id,
            tenant_id: booking.tenant_id.clone(),
            owner_id: booking.owner_id.clone(),
            occurred_at: Timestamp::now(),
        };
        self.event_publisher.publish(event.to_envelope()).await?;

        Ok(CompleteBookingResult { booking, event })
    }
}
