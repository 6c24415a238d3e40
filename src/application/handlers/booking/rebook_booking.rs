//! RebookBookingHandler - Command handler for rebooking after rejection.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError, BookingEvent};
use crate::domain::foundation::{
    BookingId, CallerContext, EventId, SerializableDomainEvent, Timestamp,
};
use crate::ports::{BookingRepository, EventPublisher};

/// Command to rebook a rejected booking.
#[derive(Debug, Clone)]
pub struct RebookBookingCommand {
    pub caller: CallerContext,
    pub rejected_booking_id: BookingId,
    pub check_in_date: Timestamp,
}

/// Result of successful rebooking.
#[derive(Debug, Clone)]
pub struct RebookBookingResult {
    /// The new pending booking. The rejected one is untouched.
    pub booking: Booking,
    pub event: BookingEvent,
}

/// Handler for rebooking.
///
/// Creates an independent pending booking carrying a `rebooked_from`
/// back-reference; the rejected booking is never mutated.
pub struct RebookBookingHandler {
    repository: Arc<dyn BookingRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl RebookBookingHandler {
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
        cmd: RebookBookingCommand,
    ) -> Result<RebookBookingResult, BookingError> {
        // 1. Load the rejected booking
        let rejected = self
            .repository
            .find_by_id(&cmd.rejected_booking_id)
            .await?
            .ok_or(BookingError::NotFound(cmd.rejected_booking_id))?;

        // 2. Derive the new booking (authorizes and validates state)
        let booking = rejected.rebook(BookingId::new(), &cmd.caller, cmd.check_in_date)?;

        // 3. Same overlap guard as a fresh request
        let overlapping = self
            .repository
            .find_overlapping(&booking.property_id, &booking.tenant_id, &cmd.check_in_date)
            .await?;
        if !overlapping.is_empty() {
            return Err(BookingError::Overlap {
                property_id: booking.property_id,
            });
        }

        // 4. Persist the new row
        self.repository.save(&booking).await?;

        // 5. Publish the event
        let event = BookingEvent::Requested {
            event_id: EventId::new(),
            booking_id: booking.id,
            property_id: booking.property_id,
            tenant_id: booking.tenant_id.clone(),
            owner_id: booking.owner_id.clone(),
            amount: booking.amount,
            check_in_date: booking.check_in_date,
            rebooked_from: booking.rebooked_from,
            occurred_at: Timestamp::now(),
        };
        self.event_publisher.publish(event.to_envelope()).await?;

        Ok(RebookBookingResult { booking, event })
    }
}
