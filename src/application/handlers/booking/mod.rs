//! Booking handlers.
//!
//! Command and query handlers for the booking lifecycle:
//!
//! ## Commands
//! - Creating pending bookings (with overlap guard)
//! - Owner approval and rejection
//! - Check-in confirmation
//! - Completion and tenant cancellation
//! - Rebooking a rejected booking as a new one
//!
//! ## Queries
//! - Role-scoped booking lists

mod approve_booking;
mod cancel_booking;
mod complete_booking;
mod confirm_booking;
mod create_booking;
mod list_bookings;
mod rebook_booking;
mod reject_booking;

#[cfg(test)]
pub(crate) mod test_support;

// Commands
pub use approve_booking::{ApproveBookingCommand, ApproveBookingHandler, ApproveBookingResult};
pub use cancel_booking::{CancelBookingCommand, CancelBookingHandler, CancelBookingResult};
pub use complete_booking::{
    CompleteBookingCommand, CompleteBookingHandler, CompleteBookingResult,
};
pub use confirm_booking::{ConfirmBookingCommand, ConfirmBookingHandler, ConfirmBookingResult};
pub use create_booking::{CreateBookingCommand, CreateBookingHandler, CreateBookingResult};
pub use rebook_booking::{RebookBookingCommand, RebookBookingHandler, RebookBookingResult};
pub use reject_booking::{RejectBookingCommand, RejectBookingHandler, RejectBookingResult};

// Queries
pub use list_bookings::{ListBookingsHandler, ListBookingsQuery, ListBookingsResult};
