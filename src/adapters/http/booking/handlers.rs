//! HTTP handlers for booking endpoints.
//!
//! These handlers connect Axum routes to application layer command/query
//! handlers. Authentication is enforced by the `RequireCaller` extractor;
//! authorization lives in the domain.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::middleware::RequireCaller;
use crate::application::handlers::booking::{
    ApproveBookingCommand, ApproveBookingHandler, CancelBookingCommand, CancelBookingHandler,
    CompleteBookingCommand, CompleteBookingHandler, ConfirmBookingCommand, ConfirmBookingHandler,
    CreateBookingCommand, CreateBookingHandler, ListBookingsHandler, ListBookingsQuery,
    RebookBookingCommand, RebookBookingHandler, RejectBookingCommand, RejectBookingHandler,
};
use crate::domain::booking::BookingError;
use crate::domain::foundation::{BookingId, Money};
use crate::ports::{BookingReader, BookingRepository, EventPublisher, PropertyDirectory};

use super::dto::{
    BookingResponse, BookingSummaryResponse, CreateBookingRequest, ErrorResponse,
    ListBookingsParams, ListBookingsResponse, RebookBookingRequest, RejectBookingRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all booking dependencies.
///
/// Cloned per request; all fields are Arc-wrapped.
#[derive(Clone)]
pub struct BookingAppState {
    pub booking_repository: Arc<dyn BookingRepository>,
    pub booking_reader: Arc<dyn BookingReader>,
    pub property_directory: Arc<dyn PropertyDirectory>,
    pub event_publisher: Arc<dyn EventPublisher>,
}

impl BookingAppState {
    /// Create handlers on demand from the shared state.
    pub fn create_handler(&self) -> CreateBookingHandler {
        CreateBookingHandler::new(
            self.booking_repository.clone(),
            self.property_directory.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn approve_handler(&self) -> ApproveBookingHandler {
        ApproveBookingHandler::new(
            self.booking_repository.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn reject_handler(&self) -> RejectBookingHandler {
        RejectBookingHandler::new(
            self.booking_repository.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn confirm_handler(&self) -> ConfirmBookingHandler {
        ConfirmBookingHandler::new(
            self.booking_repository.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn complete_handler(&self) -> CompleteBookingHandler {
        CompleteBookingHandler::new(
            self.booking_repository.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn cancel_handler(&self) -> CancelBookingHandler {
        CancelBookingHandler::new(
            self.booking_repository.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn rebook_handler(&self) -> RebookBookingHandler {
        RebookBookingHandler::new(
            self.booking_repository.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn list_handler(&self) -> ListBookingsHandler {
        ListBookingsHandler::new(self.booking_reader.clone())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Command Handlers (POST endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/bookings - Request a new booking (tenant only)
pub async fn create_booking(
    State(state): State<BookingAppState>,
    RequireCaller(caller): RequireCaller,
    Json(request): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, BookingApiError> {
    let handler = state.create_handler();
    let cmd = CreateBookingCommand {
        caller,
        property_id: request.property_id,
        room_type: request.room_type,
        check_in_date: request.check_in_date,
        amount: Money::from_minor_units(request.amount_minor_units),
    };

    let result = handler.handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(result.booking))))
}

/// POST /api/bookings/:id/approve - Approve a pending booking (verified owner only)
pub async fn approve_booking(
    State(state): State<BookingAppState>,
    RequireCaller(caller): RequireCaller,
    Path(booking_id): Path<BookingId>,
) -> Result<impl IntoResponse, BookingApiError> {
    let handler = state.approve_handler();
    let cmd = ApproveBookingCommand { caller, booking_id };

    let result = handler.handle(cmd).await?;

    Ok(Json(BookingResponse::from(result.booking)))
}

/// POST /api/bookings/:id/reject - Reject a pending booking (owner only)
pub async fn reject_booking(
    State(state): State<BookingAppState>,
    RequireCaller(caller): RequireCaller,
    Path(booking_id): Path<BookingId>,
    Json(request): Json<RejectBookingRequest>,
) -> Result<impl IntoResponse, BookingApiError> {
    let handler = state.reject_handler();
    let cmd = RejectBookingCommand {
        caller,
        booking_id,
        reject_reason: request.reject_reason,
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(BookingResponse::from(result.booking)))
}

/// POST /api/bookings/:id/confirm - Record tenant check-in
pub async fn confirm_booking(
    State(state): State<BookingAppState>,
    RequireCaller(caller): RequireCaller,
    Path(booking_id): Path<BookingId>,
) -> Result<impl IntoResponse, BookingApiError> {
    let handler = state.confirm_handler();
    let cmd = ConfirmBookingCommand { caller, booking_id };

    let result = handler.handle(cmd).await?;

    Ok(Json(BookingResponse::from(result.booking)))
}

/// POST /api/bookings/:id/complete - Complete a confirmed booking
pub async fn complete_booking(
    State(state): State<BookingAppState>,
    RequireCaller(caller): RequireCaller,
    Path(booking_id): Path<BookingId>,
) -> Result<impl IntoResponse, BookingApiError> {
    let handler = state.complete_handler();
    let cmd = CompleteBookingCommand { caller, booking_id };

    let result = handler.handle(cmd).await?;

    Ok(Json(BookingResponse::from(result.booking)))
}

/// POST /api/bookings/:id/cancel - Cancel an approved or confirmed booking (tenant only)
pub async fn cancel_booking(
    State(state): State<BookingAppState>,
    RequireCaller(caller): RequireCaller,
    Path(booking_id): Path<BookingId>,
) -> Result<impl IntoResponse, BookingApiError> {
    let handler = state.cancel_handler();
    let cmd = CancelBookingCommand { caller, booking_id };

    let result = handler.handle(cmd).await?;

    Ok(Json(BookingResponse::from(result.booking)))
}

/// POST /api/bookings/:id/rebook - Rebook a rejected booking as a new one
pub async fn rebook_booking(
    State(state): State<BookingAppState>,
    RequireCaller(caller): RequireCaller,
    Path(booking_id): Path<BookingId>,
    Json(request): Json<RebookBookingRequest>,
) -> Result<impl IntoResponse, BookingApiError> {
    let handler = state.rebook_handler();
    let cmd = RebookBookingCommand {
        caller,
        rejected_booking_id: booking_id,
        check_in_date: request.check_in_date,
    };

    let result = handler.handle(cmd).await?;

    Ok((StatusCode::CREATED, Json(BookingResponse::from(result.booking))))
}

// ════════════════════════════════════════════════════════════════════════════════
// Query Handlers (GET endpoints)
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/bookings - List bookings scoped to the caller's role
pub async fn list_bookings(
    State(state): State<BookingAppState>,
    RequireCaller(caller): RequireCaller,
    Query(params): Query<ListBookingsParams>,
) -> Result<impl IntoResponse, BookingApiError> {
    let handler = state.list_handler();
    let query = ListBookingsQuery {
        caller,
        property_id: params.property_id,
    };

    let result = handler.handle(query).await?;

    let response = ListBookingsResponse {
        bookings: result
            .bookings
            .into_iter()
            .map(BookingSummaryResponse::from)
            .collect(),
    };

    Ok(Json(response))
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts booking errors to HTTP responses.
pub struct BookingApiError(BookingError);

impl From<BookingError> for BookingApiError {
    fn from(err: BookingError) -> Self {
        Self(err)
    }
}

impl From<crate::domain::foundation::DomainError> for BookingApiError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for BookingApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            BookingError::NotFound(_) => (StatusCode::NOT_FOUND, "BOOKING_NOT_FOUND"),
            BookingError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            BookingError::OwnerNotVerified => (StatusCode::LOCKED, "OWNER_NOT_VERIFIED"),
            BookingError::InvalidTransition { .. } => {
                (StatusCode::CONFLICT, "INVALID_STATE_TRANSITION")
            }
            BookingError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            BookingError::Overlap { .. } => (StatusCode::CONFLICT, "OVERLAPPING_BOOKING"),
            BookingError::ValidationFailed { .. } => (StatusCode::BAD_REQUEST, "VALIDATION_FAILED"),
            BookingError::StoreTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, "STORE_TIMEOUT"),
            BookingError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ErrorResponse::new(error_code, self.0.message());
        (status, Json(body)).into_response()
    }
}
