//! Booking domain events.
//!
//! Events emitted during booking lifecycle changes. These events drive:
//! - Notification fan-out (tenant and owner notifications)
//! - Chat channel membership (grant on approve/confirm, revoke on exit)
//! - Audit logging (all state transitions)
//!
//! # Event Naming Convention
//!
//! Events are named in past tense to indicate something that has already
//! happened: `BookingApproved` not `ApproveBooking`.

use crate::domain::foundation::{
    BookingId, DomainEvent, EventId, Money, PropertyId, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

/// Events that occur during the booking lifecycle.
///
/// All state transitions emit events. Every variant carries enough
/// context for fan-out consumers to act without re-reading the booking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BookingEvent {
    /// A tenant requested a new booking (initial state: Pending).
    ///
    /// Also emitted for rebooks; `rebooked_from` then points at the
    /// rejected booking.
    Requested {
        event_id: EventId,
        booking_id: BookingId,
        property_id: PropertyId,
        tenant_id: UserId,
        owner_id: UserId,
        amount: Money,
        check_in_date: Timestamp,
        rebooked_from: Option<BookingId>,
        occurred_at: Timestamp,
    },

    /// Owner approved the request.
    ///
    /// State transition: Pending → Approved
    ///
    /// Fan-out: tenant notification plus property channel membership.
    Approved {
        event_id: EventId,
        booking_id: BookingId,
        property_id: PropertyId,
        tenant_id: UserId,
        owner_id: UserId,
        occurred_at: Timestamp,
    },

    /// Owner rejected the request with a reason.
    ///
    /// State transition: Pending → Rejected
    Rejected {
        event_id: EventId,
        booking_id: BookingId,
        property_id: PropertyId,
        tenant_id: UserId,
        owner_id: UserId,
        reject_reason: String,
        occurred_at: Timestamp,
    },

    /// Tenant check-in was recorded.
    ///
    /// State transition: Approved → Confirmed
    Confirmed {
        event_id: EventId,
        booking_id: BookingId,
        property_id: PropertyId,
        tenant_id: UserId,
        owner_id: UserId,
        occurred_at: Timestamp,
    },

    /// Stay finished normally.
    ///
    /// State transition: Confirmed → Completed
    ///
    /// Fan-out: property channel membership ends for this booking.
    Completed {
        event_id: EventId,
        booking_id: BookingId,
        property_id: PropertyId,
        tenant_id: UserId,
        owner_id: UserId,
        occurred_at: Timestamp,
    },

    /// Tenant cancelled after approval.
    ///
    /// State transition: Approved/Confirmed → Cancelled
    Cancelled {
        event_id: EventId,
        booking_id: BookingId,
        property_id: PropertyId,
        tenant_id: UserId,
        owner_id: UserId,
        occurred_at: Timestamp,
    },
}

impl BookingEvent {
    /// Returns the event type string for routing and filtering.
    pub fn event_type_str(&self) -> &'static str {
        match self {
            BookingEvent::Requested { .. } => "booking.requested.v1",
            BookingEvent::Approved { .. } => "booking.approved.v1",
            BookingEvent::Rejected { .. } => "booking.rejected.v1",
            BookingEvent::Confirmed { .. } => "booking.confirmed.v1",
            BookingEvent::Completed { .. } => "booking.completed.v1",
            BookingEvent::Cancelled { .. } => "booking.cancelled.v1",
        }
    }

    /// Returns the booking ID associated with this event.
    pub fn booking_id(&self) -> &BookingId {
        match self {
            BookingEvent::Requested { booking_id, .. }
            | BookingEvent::Approved { booking_id, .. }
            | BookingEvent::Rejected { booking_id, .. }
            | BookingEvent::Confirmed { booking_id, .. }
            | BookingEvent::Completed { booking_id, .. }
            | BookingEvent::Cancelled { booking_id, .. } => booking_id,
        }
    }

    /// Returns the property ID associated with this event.
    pub fn property_id(&self) -> &PropertyId {
        match self {
            BookingEvent::Requested { property_id, .. }
            | BookingEvent::Approved { property_id, .. }
            | BookingEvent::Rejected { property_id, .. }
            | BookingEvent::Confirmed { property_id, .. }
            | BookingEvent::Completed { property_id, .. }
            | BookingEvent::Cancelled { property_id, .. } => property_id,
        }
    }

    /// Returns the tenant ID associated with this event.
    pub fn tenant_id(&self) -> &UserId {
        match self {
            BookingEvent::Requested { tenant_id, .. }
            | BookingEvent::Approved { tenant_id, .. }
            | BookingEvent::Rejected { tenant_id, .. }
            | BookingEvent::Confirmed { tenant_id, .. }
            | BookingEvent::Completed { tenant_id, .. }
            | BookingEvent::Cancelled { tenant_id, .. } => tenant_id,
        }
    }

    /// Returns the owner ID associated with this event.
    pub fn owner_id(&self) -> &UserId {
        match self {
            BookingEvent::Requested { owner_id, .. }
            | BookingEvent::Approved { owner_id, .. }
            | BookingEvent::Rejected { owner_id, .. }
            | BookingEvent::Confirmed { owner_id, .. }
            | BookingEvent::Completed { owner_id, .. }
            | BookingEvent::Cancelled { owner_id, .. } => owner_id,
        }
    }
}

impl DomainEvent for BookingEvent {
    fn event_type(&self) -> &'static str {
        self.event_type_str()
    }

    fn schema_version(&self) -> u32 {
        1
    }

    fn aggregate_id(&self) -> String {
        self.booking_id().to_string()
    }

    fn aggregate_type(&self) -> &'static str {
        "Booking"
    }

    fn occurred_at(&self) -> Timestamp {
        match self {
            BookingEvent::Requested { occurred_at, .. }
            | BookingEvent::Approved { occurred_at, .. }
            | BookingEvent::Rejected { occurred_at, .. }
            | BookingEvent::Confirmed { occurred_at, .. }
            | BookingEvent::Completed { occurred_at, .. }
            | BookingEvent::Cancelled { occurred_at, .. } => *occurred_at,
        }
    }

    fn event_id(&self) -> EventId {
        match self {
            BookingEvent::Requested { event_id, .. }
            | BookingEvent::Approved { event_id, .. }
            | BookingEvent::Rejected { event_id, .. }
            | BookingEvent::Confirmed { event_id, .. }
            | BookingEvent::Completed { event_id, .. }
            | BookingEvent::Cancelled { event_id, .. } => event_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::SerializableDomainEvent;

    fn test_booking_id() -> BookingId {
        BookingId::new()
    }

    fn test_property_id() -> PropertyId {
        PropertyId::new()
    }

    fn tenant_id() -> UserId {
        UserId::new("tenant-1").unwrap()
    }

    fn owner_id() -> UserId {
        UserId::new("owner-1").unwrap()
    }

    fn now() -> Timestamp {
        Timestamp::now()
    }

    fn approved_event() -> BookingEvent {
        BookingEvent::Approved {
            event_id: EventId::new(),
            booking_id: test_booking_id(),
            property_id: test_property_id(),
            tenant_id: tenant_id(),
            owner_id: owner_id(),
            occurred_at: now(),
        }
    }

    #[test]
    fn requested_event_carries_rebook_reference() {
        let original = test_booking_id();
        let event = BookingEvent::Requested {
            event_id: EventId::new(),
            booking_id: test_booking_id(),
            property_id: test_property_id(),
            tenant_id: tenant_id(),
            owner_id: owner_id(),
            amount: Money::from_minor_units(12000),
            check_in_date: now().add_days(7),
            rebooked_from: Some(original),
            occurred_at: now(),
        };

        assert_eq!(event.event_type_str(), "booking.requested.v1");
        if let BookingEvent::Requested { rebooked_from, .. } = event {
            assert_eq!(rebooked_from, Some(original));
        } else {
            panic!("Expected Requested event");
        }
    }

    #[test]
    fn rejected_event_carries_reason() {
        let event = BookingEvent::Rejected {
            event_id: EventId::new(),
            booking_id: test_booking_id(),
            property_id: test_property_id(),
            tenant_id: tenant_id(),
            owner_id: owner_id(),
            reject_reason: "dates unavailable".to_string(),
            occurred_at: now(),
        };

        assert_eq!(event.event_type_str(), "booking.rejected.v1");
        if let BookingEvent::Rejected { reject_reason, .. } = event {
            assert_eq!(reject_reason, "dates unavailable");
        } else {
            panic!("Expected Rejected event");
        }
    }

    #[test]
    fn all_event_types_are_namespaced_and_versioned() {
        let booking_id = test_booking_id();
        let property_id = test_property_id();
        let events = vec![
            BookingEvent::Requested {
                event_id: EventId::new(),
                booking_id,
                property_id,
                tenant_id: tenant_id(),
                owner_id: owner_id(),
                amount: Money::from_minor_units(100),
                check_in_date: now(),
                rebooked_from: None,
                occurred_at: now(),
            },
            approved_event(),
            BookingEvent::Rejected {
                event_id: EventId::new(),
                booking_id,
                property_id,
                tenant_id: tenant_id(),
                owner_id: owner_id(),
                reject_reason: "full".to_string(),
                occurred_at: now(),
            },
            BookingEvent::Confirmed {
                event_id: EventId::new(),
                booking_id,
                property_id,
                tenant_id: tenant_id(),
                owner_id: owner_id(),
                occurred_at: now(),
            },
            BookingEvent::Completed {
                event_id: EventId::new(),
                booking_id,
                property_id,
                tenant_id: tenant_id(),
                owner_id: owner_id(),
                occurred_at: now(),
            },
            BookingEvent::Cancelled {
                event_id: EventId::new(),
                booking_id,
                property_id,
                tenant_id: tenant_id(),
                owner_id: owner_id(),
                occurred_at: now(),
            },
        ];

        for event in events {
            assert!(
                event.event_type_str().starts_with("booking."),
                "Event type {} should be namespaced with 'booking.'",
                event.event_type_str()
            );
            assert!(event.event_type_str().ends_with(".v1"));
        }
    }

    #[test]
    fn to_envelope_targets_the_booking_aggregate() {
        let event = approved_event();
        let booking_id = *event.booking_id();

        let envelope = event.to_envelope();

        assert_eq!(envelope.event_type, "booking.approved.v1");
        assert_eq!(envelope.aggregate_id, booking_id.to_string());
        assert_eq!(envelope.aggregate_type, "Booking");
        assert_eq!(envelope.schema_version, 1);
    }

    #[test]
    fn envelope_payload_round_trips() {
        let event = approved_event();
        let envelope = event.to_envelope();

        let restored: BookingEvent = envelope.payload_as().unwrap();
        assert_eq!(restored, event);
    }

    #[test]
    fn event_serializes_to_json() {
        let event = approved_event();
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("Approved"));
        assert!(json.contains("booking_id"));
        assert!(json.contains("tenant_id"));
    }
}
