//! ApproveBookingHandler - Command handler for owner approval.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError, BookingEvent};
use crate::domain::foundation::{
    BookingId, CallerContext, ErrorCode, EventId, SerializableDomainEvent, Timestamp,
};
use crate::ports::{BookingRepository, EventPublisher};

/// Command to approve a pending booking.
#[derive(Debug, Clone)]
pub struct ApproveBookingCommand {
    pub caller: CallerContext,
    pub booking_id: BookingId,
}

/// Result of successful approval.
#[derive(Debug, Clone)]
pub struct ApproveBookingResult {
    pub booking: Booking,
    pub event: BookingEvent,
}

/// Handler for approving bookings.
///
/// Only the verified owner of the booking's property may approve. Two
/// concurrent decisions on the same booking are serialized by version:
/// the loser gets `Conflict` and no partial write.
pub struct ApproveBookingHandler {
    repository: Arc<dyn BookingRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ApproveBookingHandler {
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
        cmd: ApproveBookingCommand,
    ) -> Result<ApproveBookingResult, BookingError> {
        // 1. Load the booking
        let mut booking = self
            .repository
            .find_by_id(&cmd.booking_id)
            .await?
            .ok_or(BookingError::NotFound(cmd.booking_id))?;

        let expected_version = booking.version;

        // 2. Approve (authorizes and transitions)
        booking.approve(&cmd.caller)?;

        // 3. Persist under the version read in step 1
        self.repository
            .update(&booking, expected_version)
            .await
            .map_err(|e| match e.code {
                ErrorCode::Conflict => BookingError::Conflict(booking.id),
                _ => e.into(),
            })?;

        // 4. Publish the event
        let event = BookingEvent::Approved {
            event_id: EventId::new(),
            booking_id: booking.id,
            property_id: booking.property_id,
            tenant_id: booking.tenant_id.clone(),
            owner_id: booking.owner_id.clone(),
            occurred_at: Timestamp::now(),
        };
        self.event_publisher.publish(event.to_envelope()).await?;

        Ok(ApproveBookingResult { booking, event })
    }
}
