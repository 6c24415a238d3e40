//! Settlement domain events.

use crate::domain::foundation::{
    BookingId, DomainEvent, EventId, Money, SettlementId, Timestamp, UserId,
};
use serde::{Deserialize, Serialize};

/// Events that occur during the settlement lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SettlementEvent {
    /// A settlement was created from a captured payment.
    ///
    /// Trigger: payment-captured event from the payment provider.
    Created {
        event_id: EventId,
        settlement_id: SettlementId,
        booking_id: BookingId,
        owner_id: UserId,
        gross_amount: Money,
        platform_fee: Money,
        owner_amount: Money,
        occurred_at: Timestamp,
    },

    /// An admin released the payout.
    ///
    /// State transition: PendingSettlement → Settled
    ///
    /// Fan-out: `settlement_completed` notification to the owner.
    Settled {
        event_id: EventId,
        settlement_id: SettlementId,
        booking_id: BookingId,
        owner_id: UserId,
        owner_amount: Money,
        settlement_date: Timestamp,
        occurred_at: Timestamp,
    },
}

impl SettlementEvent {
    /// Returns the event type string for routing and filtering.
    pub fn event_type_str(&self) -> &'static str {
        match self {
            SettlementEvent::Created { .. } => "settlement.created.v1",
            SettlementEvent::Settled { .. } => "settlement.settled.v1",
        }
    }

    /// Returns the settlement ID associated with this event.
    pub fn settlement_id(&self) -> &SettlementId {
        match self {
            SettlementEvent::Created { settlement_id, .. }
            | SettlementEvent::Settled { settlement_id, .. } => settlement_id,
        }
    }

    /// Returns the owner ID associated with this event.
    pub fn owner_id(&self) -> &UserId {
        match self {
            SettlementEvent::Created { owner_id, .. }
            | SettlementEvent::Settled { owner_id, .. } => owner_id,
        }
    }
}

impl DomainEvent for SettlementEvent {
    fn event_type(&self) -> &'static str {
        self.event_type_str()
    }

    fn schema_version(&self) -> u32 {
        1
    }

    fn aggregate_id(&self) -> String {
        self.settlement_id().to_string()
    }

    fn aggregate_type(&self) -> &'static str {
        "Settlement"
    }

    fn occurred_at(&self) -> Timestamp {
        match self {
            SettlementEvent::Created { occurred_at, .. }
            | SettlementEvent::Settled { occurred_at, .. } => *occurred_at,
        }
    }

    fn event_id(&self) -> EventId {
        match self {
            SettlementEvent::Created { event_id, .. }
            | SettlementEvent::Settled { event_id, .. } => event_id.clone(),
        }
    }
}
