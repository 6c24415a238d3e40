//! HTTP DTOs for booking endpoints.
//!
//! These types define the JSON request/response structure for the booking
//! API. Monetary amounts cross the wire as integer minor units; timestamps
//! as RFC 3339 strings.

use serde::{Deserialize, Serialize};

use crate::domain::booking::{Booking, BookingStatus};
use crate::domain::foundation::{PropertyId, Timestamp};
use crate::ports::BookingSummary;

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Request to create a pending booking.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingRequest {
    /// The property to book.
    pub property_id: PropertyId,
    /// Requested room type (free-form, validated non-empty).
    pub room_type: String,
    /// Requested check-in date (RFC 3339).
    pub check_in_date: Timestamp,
    /// Total amount in minor currency units.
    pub amount_minor_units: i64,
}

/// Request to reject a pending booking.
#[derive(Debug, Clone, Deserialize)]
pub struct RejectBookingRequest {
    /// Reason shown to the tenant. Required and non-empty.
    pub reject_reason: String,
}

/// Request to rebook a rejected booking as a new pending one.
#[derive(Debug, Clone, Deserialize)]
pub struct RebookBookingRequest {
    /// Check-in date for the new booking (RFC 3339).
    pub check_in_date: Timestamp,
}

/// Query parameters for listing bookings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListBookingsParams {
    /// Property scope. Required for admin callers, ignored otherwise.
    #[serde(default)]
    pub property_id: Option<PropertyId>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Full booking representation returned from command endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct BookingResponse {
    pub id: String,
    pub property_id: String,
    pub tenant_id: String,
    /// Owner frozen onto the booking at creation time.
    pub owner_id: String,
    pub room_type: String,
    pub check_in_date: String,
    pub amount_minor_units: i64,
    pub status: BookingStatus,
    /// Present exactly when status is `rejected`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
    /// Back-reference to the rejected booking this one was rebooked from.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rebooked_from: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub version: i64,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        Self {
            id: booking.id.to_string(),
            property_id: booking.property_id.to_string(),
            tenant_id: booking.tenant_id.to_string(),
            owner_id: booking.owner_id.to_string(),
            room_type: booking.room_type,
            check_in_date: booking.check_in_date.as_datetime().to_rfc3339(),
            amount_minor_units: booking.amount.minor_units(),
            status: booking.status,
            reject_reason: booking.reject_reason,
            rebooked_from: booking.rebooked_from.map(|id| id.to_string()),
            created_at: booking.created_at.as_datetime().to_rfc3339(),
            updated_at: booking.updated_at.as_datetime().to_rfc3339(),
            version: booking.version,
        }
    }
}

/// Compact booking row for list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct BookingSummaryResponse {
    pub id: String,
    pub property_id: String,
    pub tenant_id: String,
    pub status: BookingStatus,
    pub room_type: String,
    pub check_in_date: String,
    pub amount_minor_units: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reject_reason: Option<String>,
    pub created_at: String,
}

impl From<BookingSummary> for BookingSummaryResponse {
    fn from(summary: BookingSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            property_id: summary.property_id.to_string(),
            tenant_id: summary.tenant_id.to_string(),
            status: summary.status,
            room_type: summary.room_type,
            check_in_date: summary.check_in_date.as_datetime().to_rfc3339(),
            amount_minor_units: summary.amount.minor_units(),
            reject_reason: summary.reject_reason,
            created_at: summary.created_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Response for booking list endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct ListBookingsResponse {
    pub bookings: Vec<BookingSummaryResponse>,
}

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::{BookingId, Money, PropertyId, UserId};

    fn sample_booking() -> Booking {
        Booking::request(
            BookingId::new(),
            PropertyId::new(),
            UserId::new("tenant-1").unwrap(),
            UserId::new("owner-1").unwrap(),
            "double".to_string(),
            Timestamp::now().add_days(7),
            Money::from_minor_units(12_000),
        )
        .unwrap()
    }

    #[test]
    fn booking_response_from_aggregate() {
        let booking = sample_booking();
        let id = booking.id;
        let response = BookingResponse::from(booking);

        assert_eq!(response.id, id.to_string());
        assert_eq!(response.status, BookingStatus::Pending);
        assert_eq!(response.amount_minor_units, 12_000);
        assert_eq!(response.version, 0);
        assert!(response.reject_reason.is_none());
        assert!(response.rebooked_from.is_none());
    }

    #[test]
    fn booking_response_omits_null_optionals() {
        let booking = sample_booking();
        let json = serde_json::to_value(BookingResponse::from(booking)).unwrap();

        assert!(json.get("reject_reason").is_none());
        assert!(json.get("rebooked_from").is_none());
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn create_request_deserializes() {
        let property_id = PropertyId::new();
        let json = format!(
            r#"{{"property_id":"{property_id}","room_type":"single","check_in_date":"2026-09-01T14:00:00Z","amount_minor_units":8000}}"#
        );

        let request: CreateBookingRequest = serde_json::from_str(&json).unwrap();
        assert_eq!(request.property_id, property_id);
        assert_eq!(request.room_type, "single");
        assert_eq!(request.amount_minor_units, 8000);
    }

    #[test]
    fn list_params_property_id_optional() {
        let params: ListBookingsParams = serde_json::from_str("{}").unwrap();
        assert!(params.property_id.is_none());
    }

    #[test]
    fn error_response_serializes() {
        let response = ErrorResponse::new("OVERLAPPING_BOOKING", "Tenant already holds a booking");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["error_code"], "OVERLAPPING_BOOKING");
    }
}
