//! CreateBookingHandler - Command handler for requesting a booking.

use std::sync::Arc;

use crate::domain::booking::{Booking, BookingError, BookingEvent};
use crate::domain::foundation::{
    BookingId, CallerContext, ErrorCode, EventId, Money, PropertyId, Role,
    SerializableDomainEvent, Timestamp,
};
use crate::ports::{BookingRepository, EventPublisher, PropertyDirectory};

/// Command to create a pending booking.
#[derive(Debug, Clone)]
pub struct CreateBookingCommand {
    pub caller: CallerContext,
    pub property_id: PropertyId,
    pub room_type: String,
    pub check_in_date: Timestamp,
    pub amount: Money,
}

/// Result of successful booking creation.
#[derive(Debug, Clone)]
pub struct CreateBookingResult {
    pub booking: Booking,
    pub event: BookingEvent,
}

/// Handler for creating bookings.
///
/// The owner of the property is resolved from the directory at creation
/// time and frozen onto the booking. A tenant cannot hold two live
/// bookings for the same property and check-in date.
pub struct CreateBookingHandler {
    repository: Arc<dyn BookingRepository>,
    property_directory: Arc<dyn PropertyDirectory>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateBookingHandler {
    pub fn new(
        repository: Arc<dyn BookingRepository>,
        property_directory: Arc<dyn PropertyDirectory>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            repository,
            property_directory,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateBookingCommand,
    ) -> Result<CreateBookingResult, BookingError> {
        // 1. Only tenants request bookings
        if !cmd.caller.has_role(Role::Tenant) {
            return Err(BookingError::forbidden("Only tenants may request bookings"));
        }

        // 2. Resolve the property and check availability
        let property = self
            .property_directory
            .get_property(&cmd.property_id)
            .await
            .map_err(|e| match e.code {
                ErrorCode::PropertyNotFound => {
                    BookingError::validation("property_id", "Property not found")
                }
                _ => e.into(),
            })?;

        if !property.has_availability() {
            return Err(BookingError::validation(
                "property_id",
                "Property has no available units",
            ));
        }

        // 3. Guard against a second live booking for the same date
        let overlapping = self
            .repository
            .find_overlapping(&cmd.property_id, &cmd.caller.user_id, &cmd.check_in_date)
            .await?;
        if !overlapping.is_empty() {
            return Err(BookingError::Overlap {
                property_id: cmd.property_id,
            });
        }

        // 4. Create the aggregate (domain validation)
        let booking = Booking::request(
            BookingId::new(),
            cmd.property_id,
            cmd.caller.user_id.clone(),
            property.owner_id,
            cmd.room_type,
            cmd.check_in_date,
            cmd.amount,
        )?;

        // 5. Persist
        self.repository.save(&booking).await?;

        // 6. Publish the event
        let event = BookingEvent::Requested {
            event_id: EventId::new(),
            booking_id: booking.id,
            property_id: booking.property_id,
            tenant_id: booking.tenant_id.clone(),
            owner_id: booking.owner_id.clone(),
            amount: booking.amount,
            check_in_date: booking.check_in_date,
            rebooked_from: None,
            occurred_at: Timestamp::now(),
        };
        self.event_publisher.publish(event.to_envelope()).await?;

        Ok(CreateBookingResult { booking, event })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::booking::test_support::*;
    use crate::domain::booking::BookingStatus;

    fn command(property_id: PropertyId) -> CreateBookingCommand {
        CreateBookingCommand {
            caller: tenant_caller(),
            property_id,
            room_type: "studio".to_string(),
            check_in_date: check_in(),
            amount: Money::from_minor_units(12_000),
        }
    }

    #[tokio::test]
    async fn creates_pending_booking_with_frozen_owner() {
        let property_id = PropertyId::new();
        let repo = Arc::new(MockBookingRepository::new());
        let directory = Arc::new(MockPropertyDirectory::available_property(property_id));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler =
            CreateBookingHandler::new(repo.clone(), directory, publisher.clone());

        let result = handler.handle(command(property_id)).await.unwrap();

        assert_eq!(result.booking.status, BookingStatus::Pending);
        assert_eq!(result.booking.owner_id, owner_id());
        assert_eq!(repo.stored().len(), 1);

        let events = publisher.published_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type, "booking.requested.v1");
    }

    #[tokio::test]
    async fn owner_cannot_request_booking() {
        let property_id = PropertyId::new();
        let repo = Arc::new(MockBookingRepository::new());
        let directory = Arc::new(MockPropertyDirectory::available_property(property_id));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = CreateBookingHandler::new(repo, directory, publisher);

        let mut cmd = command(property_id);
        cmd.caller = owner_caller();
        let err = handler.handle(cmd).await.unwrap_err();

        assert!(matches!(err, BookingError::Forbidden(_)));
    }

    #[tokio::test]
    async fn unknown_property_fails_validation() {
        let property_id = PropertyId::new();
        let repo = Arc::new(MockBookingRepository::new());
        let directory = Arc::new(MockPropertyDirectory::available_property(PropertyId::new()));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = CreateBookingHandler::new(repo, directory, publisher);

        let err = handler.handle(command(property_id)).await.unwrap_err();

        assert!(matches!(err, BookingError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn full_property_fails_validation() {
        let property_id = PropertyId::new();
        let repo = Arc::new(MockBookingRepository::new());
        let directory = Arc::new(MockPropertyDirectory::full_property(property_id));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = CreateBookingHandler::new(repo, directory, publisher);

        let err = handler.handle(command(property_id)).await.unwrap_err();

        assert!(matches!(err, BookingError::ValidationFailed { .. }));
    }

    #[tokio::test]
    async fn overlapping_live_booking_conflicts() {
        let property_id = PropertyId::new();
        let mut existing = pending_booking(property_id);
        existing.check_in_date = check_in();
        let repo = Arc::new(MockBookingRepository::with_booking(existing.clone()));
        let directory = Arc::new(MockPropertyDirectory::available_property(property_id));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = CreateBookingHandler::new(repo, directory, publisher);

        let mut cmd = command(property_id);
        cmd.check_in_date = existing.check_in_date;
        let err = handler.handle(cmd).await.unwrap_err();

        assert!(matches!(err, BookingError::Overlap { .. }));
    }

    #[tokio::test]
    async fn rejected_booking_does_not_block_new_request() {
        let property_id = PropertyId::new();
        let rejected = booking_in_status(property_id, BookingStatus::Rejected);
        let date = rejected.check_in_date;
        let repo = Arc::new(MockBookingRepository::with_booking(rejected));
        let directory = Arc::new(MockPropertyDirectory::available_property(property_id));
        let publisher = Arc::new(MockEventPublisher::new());
        let handler = CreateBookingHandler::new(repo, directory, publisher);

        let mut cmd = command(property_id);
        cmd.check_in_date = date;
        let result = handler.handle(cmd).await;

        assert!(result.is_ok());
    }
}
