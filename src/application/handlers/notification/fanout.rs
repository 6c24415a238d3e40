//! NotificationFanout - Event handler that turns domain events into
//! notifications and channel membership changes.
//!
//! Consumes every booking transition and settlement completion. Each
//! event is processed once per handler via the processed-event store, so
//! at-least-once delivery upstream never duplicates a notification.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::booking::BookingEvent;
use crate::domain::foundation::{BookingId, DomainError, EventEnvelope, PropertyId, UserId};
use crate::domain::notification::{ChannelId, Notification, NotificationType};
use crate::domain::settlement::SettlementEvent;
use crate::ports::{BookingReader, ChannelStore, EventHandler, NotificationRepository, ProcessedEventStore};

/// Event types this handler subscribes to.
pub const FANOUT_EVENT_TYPES: &[&str] = &[
    "booking.requested.v1",
    "booking.approved.v1",
    "booking.rejected.v1",
    "booking.confirmed.v1",
    "booking.completed.v1",
    "booking.cancelled.v1",
    "settlement.settled.v1",
];

/// Fan-out handler for booking and settlement events.
pub struct NotificationFanout {
    notification_repository: Arc<dyn NotificationRepository>,
    channel_store: Arc<dyn ChannelStore>,
    booking_reader: Arc<dyn BookingReader>,
    processed_events: Arc<dyn ProcessedEventStore>,
}

impl NotificationFanout {
    pub fn new(
        notification_repository: Arc<dyn NotificationRepository>,
        channel_store: Arc<dyn ChannelStore>,
        booking_reader: Arc<dyn BookingReader>,
        processed_events: Arc<dyn ProcessedEventStore>,
    ) -> Self {
        Self {
            notification_repository,
            channel_store,
            booking_reader,
            processed_events,
        }
    }

    async fn notify(
        &self,
        recipient: &UserId,
        notification_type: NotificationType,
        title: &str,
        message: String,
    ) -> Result<(), DomainError> {
        let notification =
            Notification::new(recipient.clone(), notification_type, title, message)?;
        self.notification_repository.save(&notification).await
    }

    /// Drop the tenant from the property channel unless another approved
    /// or confirmed booking keeps them in.
    async fn retire_membership(
        &self,
        property_id: &PropertyId,
        tenant_id: &UserId,
        booking_id: &BookingId,
    ) -> Result<(), DomainError> {
        let retained = self
            .booking_reader
            .has_other_active_booking(property_id, tenant_id, booking_id)
            .await?;
        if !retained {
            self.channel_store
                .remove_member(&ChannelId::Property(*property_id), tenant_id)
                .await?;
        }
        Ok(())
    }

    async fn handle_booking_event(&self, event: BookingEvent) -> Result<(), DomainError> {
        match event {
            BookingEvent::Requested {
                owner_id,
                property_id,
                ..
            } => {
                self.notify(
                    &owner_id,
                    NotificationType::BookingCreated,
                    "New booking request",
                    format!("A tenant requested a booking for property {}", property_id),
                )
                .await
            }
            BookingEvent::Approved {
                booking_id: _,
                property_id,
                tenant_id,
                ..
            } => {
                self.notify(
                    &tenant_id,
                    NotificationType::BookingApproved,
                    "Booking approved",
                    format!("Your booking for property {} was approved", property_id),
                )
                .await?;
                self.channel_store
                    .add_member(&ChannelId::Property(property_id), &tenant_id)
                    .await
            }
            BookingEvent::Rejected {
                booking_id,
                property_id,
                tenant_id,
                reject_reason,
                ..
            } => {
                self.notify(
                    &tenant_id,
                    NotificationType::BookingRejected,
                    "Booking rejected",
                    format!("Your booking was rejected: {}", reject_reason),
                )
                .await?;
                self.retire_membership(&property_id, &tenant_id, &booking_id)
                    .await
            }
            BookingEvent::Confirmed {
                property_id,
                tenant_id,
                ..
            } => {
                // Membership normally starts at approval; confirm re-adds
                // in case approval fan-out was missed.
                self.channel_store
                    .add_member(&ChannelId::Property(property_id), &tenant_id)
                    .await
            }
            BookingEvent::Completed {
                booking_id,
                property_id,
                tenant_id,
                ..
            } => {
                self.retire_membership(&property_id, &tenant_id, &booking_id)
                    .await
            }
            BookingEvent::Cancelled {
                booking_id,
                property_id,
                tenant_id,
                owner_id,
                ..
            } => {
                self.notify(
                    &owner_id,
                    NotificationType::BookingCancelled,
                    "Booking cancelled",
                    format!("A booking for property {} was cancelled", property_id),
                )
                .await?;
                self.retire_membership(&property_id, &tenant_id, &booking_id)
                    .await
            }
        }
    }

    async fn handle_settlement_event(&self, event: SettlementEvent) -> Result<(), DomainError> {
        match event {
            SettlementEvent::Settled {
                owner_id,
                owner_amount,
                ..
            } => {
                self.notify(
                    &owner_id,
                    NotificationType::SettlementCompleted,
                    "Payout settled",
                    format!("Your payout of {} has been settled", owner_amount),
                )
                .await
            }
            SettlementEvent::Created { .. } => Ok(()),
        }
    }
}

#[async_trait]
impl EventHandler for NotificationFanout {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        // Redelivery guard
        if self
            .processed_events
            .contains(&event.event_id, self.name())
            .await?
        {
            return Ok(());
        }
        let event_id = event.event_id.clone();

        if event.event_type.starts_with("booking.") {
            let booking_event: BookingEvent = event.payload_as()?;
            self.handle_booking_event(booking_event).await?;
        } else if event.event_type.starts_with("settlement.") {
            let settlement_event: SettlementEvent = event.payload_as()?;
            self.handle_settlement_event(settlement_event).await?;
        }

        self.processed_events
            .mark_processed(&event_id, self.name())
            .await
    }

    fn name(&self) -> &'static str {
        "NotificationFanout"
    }
}
