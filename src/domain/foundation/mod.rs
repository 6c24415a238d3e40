//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers, errors, and the event
//! infrastructure that form the vocabulary of the rental domain.

mod auth;
mod errors;
mod events;
mod ids;
mod money;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, CallerContext, Role};
pub use errors::{DomainError, ErrorCode, ValidationError};
pub use events::{
    domain_event, DomainEvent, EventEnvelope, EventId, EventMetadata, SerializableDomainEvent,
};
pub use ids::{BookingId, MessageId, NotificationId, PropertyId, SettlementId, UserId};
pub use money::{Money, BPS_DENOMINATOR};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
