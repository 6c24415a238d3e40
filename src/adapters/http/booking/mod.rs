//! HTTP adapter for booking endpoints.
//!
//! Exposes the booking lifecycle via REST API:
//! - `POST /api/bookings` - Request a new booking
//! - `GET /api/bookings` - List bookings scoped to the caller's role
//! - `POST /api/bookings/:id/approve` - Approve a pending booking
//! - `POST /api/bookings/:id/reject` - Reject a pending booking
//! - `POST /api/bookings/:id/confirm` - Record tenant check-in
//! - `POST /api/bookings/:id/complete` - Complete a confirmed booking
//! - `POST /api/bookings/:id/cancel` - Cancel an approved or confirmed booking
//! - `POST /api/bookings/:id/rebook` - Rebook a rejected booking

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{BookingApiError, BookingAppState};
pub use routes::booking_routes;
