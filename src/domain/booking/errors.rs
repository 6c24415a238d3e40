//! Booking-specific error types.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | Forbidden | 403 |
//! | OwnerNotVerified | 423 |
//! | InvalidTransition | 409 |
//! | Conflict | 409 |
//! | Overlap | 409 |
//! | ValidationFailed | 400 |
//! | StoreTimeout | 504 |
//! | Infrastructure | 500 |

use crate::domain::foundation::{BookingId, DomainError, ErrorCode, PropertyId};

/// Booking-specific errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingError {
    /// Booking was not found.
    NotFound(BookingId),

    /// Caller is not the required actor for this transition.
    Forbidden(String),

    /// Owner must complete verification before approving.
    OwnerNotVerified,

    /// The state machine refused the transition.
    InvalidTransition {
        current: String,
        attempted: String,
    },

    /// A concurrent writer won; the caller should re-read and retry.
    Conflict(BookingId),

    /// The tenant already holds a pending or approved booking for this
    /// property overlapping the requested date.
    Overlap {
        property_id: PropertyId,
    },

    /// Validation failed.
    ValidationFailed {
        field: String,
        message: String,
    },

    /// The ledger store did not acknowledge within the request timeout.
    StoreTimeout(String),

    /// Infrastructure error.
    Infrastructure(String),
}

impl BookingError {
    pub fn not_found(id: BookingId) -> Self {
        BookingError::NotFound(id)
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        BookingError::Forbidden(message.into())
    }

    pub fn invalid_transition(current: impl Into<String>, attempted: impl Into<String>) -> Self {
        BookingError::InvalidTransition {
            current: current.into(),
            attempted: attempted.into(),
        }
    }

    pub fn conflict(id: BookingId) -> Self {
        BookingError::Conflict(id)
    }

    pub fn overlap(property_id: PropertyId) -> Self {
        BookingError::Overlap { property_id }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        BookingError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn store_timeout(message: impl Into<String>) -> Self {
        BookingError::StoreTimeout(message.into())
    }

    pub fn infrastructure(message: impl Into<String>) -> Self {
        BookingError::Infrastructure(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BookingError::NotFound(_) => ErrorCode::BookingNotFound,
            BookingError::Forbidden(_) => ErrorCode::Forbidden,
            BookingError::OwnerNotVerified => ErrorCode::OwnerNotVerified,
            BookingError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
            BookingError::Conflict(_) => ErrorCode::Conflict,
            BookingError::Overlap { .. } => ErrorCode::OverlappingBooking,
            BookingError::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            BookingError::StoreTimeout(_) => ErrorCode::StoreTimeout,
            BookingError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns a user-facing error message.
    ///
    /// Every refused transition reports a specific reason so callers can
    /// present actionable feedback.
    pub fn message(&self) -> String {
        match self {
            BookingError::NotFound(id) => format!("Booking not found: {}", id),
            BookingError::Forbidden(reason) => reason.clone(),
            BookingError::OwnerNotVerified => {
                "Complete owner verification before approving bookings".to_string()
            }
            BookingError::InvalidTransition { current, attempted } => {
                format!("Cannot {} booking in {} state", attempted, current)
            }
            BookingError::Conflict(id) => {
                format!("Booking {} was modified concurrently, retry with fresh state", id)
            }
            BookingError::Overlap { property_id } => format!(
                "An overlapping pending or approved booking already exists for property {}",
                property_id
            ),
            BookingError::ValidationFailed { field, message } => {
                format!("Validation failed for '{}': {}", field, message)
            }
            BookingError::StoreTimeout(msg) => format!("Ledger store timed out: {}", msg),
            BookingError::Infrastructure(msg) => format!("Error: {}", msg),
        }
    }

    /// Returns true if the caller may safely retry with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BookingError::StoreTimeout(_) | BookingError::Infrastructure(_)
        )
    }
}

impl std::fmt::Display for BookingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for BookingError {}

impl From<DomainError> for BookingError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden | ErrorCode::Unauthorized => {
                BookingError::Forbidden(err.message)
            }
            ErrorCode::OwnerNotVerified => BookingError::OwnerNotVerified,
            ErrorCode::InvalidStateTransition => BookingError::InvalidTransition {
                current: "unknown".to_string(),
                attempted: err.message,
            },
            ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
                BookingError::ValidationFailed {
                    field: "unknown".to_string(),
                    message: err.message,
                }
            }
            ErrorCode::StoreTimeout => BookingError::StoreTimeout(err.message),
            _ => BookingError::Infrastructure(err.to_string()),
        }
    }
}

impl From<BookingError> for DomainError {
    fn from(err: BookingError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_booking_not_found_code() {
        let id = BookingId::new();
        let err = BookingError::not_found(id);
        assert_eq!(err.code(), ErrorCode::BookingNotFound);
        assert!(err.message().contains(&id.to_string()));
    }

    #[test]
    fn owner_not_verified_carries_remediation_hint() {
        let err = BookingError::OwnerNotVerified;
        assert_eq!(err.code(), ErrorCode::OwnerNotVerified);
        assert!(err.message().contains("verification"));
    }

    #[test]
    fn conflict_names_the_booking() {
        let id = BookingId::new();
        let err = BookingError::conflict(id);
        assert_eq!(err.code(), ErrorCode::Conflict);
        assert!(err.message().contains(&id.to_string()));
    }

    #[test]
    fn overlap_maps_to_overlapping_booking_code() {
        let err = BookingError::overlap(PropertyId::new());
        assert_eq!(err.code(), ErrorCode::OverlappingBooking);
    }

    #[test]
    fn store_timeout_is_retryable_business_failures_are_not() {
        assert!(BookingError::store_timeout("5s elapsed").is_retryable());
        assert!(BookingError::infrastructure("pool exhausted").is_retryable());
        assert!(!BookingError::OwnerNotVerified.is_retryable());
        assert!(!BookingError::not_found(BookingId::new()).is_retryable());
        assert!(!BookingError::conflict(BookingId::new()).is_retryable());
    }

    #[test]
    fn display_matches_message() {
        let err = BookingError::invalid_transition("completed", "cancel");
        assert_eq!(format!("{}", err), err.message());
    }

    #[test]
    fn converts_to_domain_error() {
        let err = BookingError::forbidden("not your booking");
        let domain_err: DomainError = err.clone().into();
        assert_eq!(domain_err.code, err.code());
    }

    #[test]
    fn converts_from_domain_error() {
        let domain_err = DomainError::new(ErrorCode::OwnerNotVerified, "verify first");
        let booking_err: BookingError = domain_err.into();
        assert_eq!(booking_err, BookingError::OwnerNotVerified);
    }

    #[test]
    fn domain_validation_errors_become_validation_failed() {
        let domain_err = DomainError::new(ErrorCode::EmptyField, "Field 'room_type' cannot be empty");
        let booking_err: BookingError = domain_err.into();
        assert_eq!(booking_err.code(), ErrorCode::ValidationFailed);
    }
}
