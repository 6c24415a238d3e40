//! Booking domain module.
//!
//! Owns the multi-party approval lifecycle: tenant requests, owner
//! approves or rejects, tenant checks in, stay completes or cancels.
//!
//! # Module Structure
//!
//! - `aggregate` - Booking aggregate entity
//! - `status` - BookingStatus state machine
//! - `events` - Lifecycle domain events
//! - `errors` - Booking-specific errors

mod aggregate;
mod errors;
mod events;
mod status;

pub use aggregate::Booking;
pub use errors::BookingError;
pub use events::BookingEvent;
pub use status::BookingStatus;
