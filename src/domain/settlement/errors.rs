//! Settlement operation errors.
//!
//! HTTP layers map these to responses via [`SettlementError::code`]:
//!
//! | Error            | Status |
//! |------------------|--------|
//! | ValidationFailed | 400    |
//! | Forbidden        | 403    |
//! | NotFound         | 404    |
//! | AlreadyExists    | 409    |
//! | Conflict         | 409    |
//! | StoreTimeout     | 504    |
//! | Infrastructure   | 500    |
//!
//! `AlreadySettled` is deliberately absent: a repeated settle request is an
//! idempotent success, reported as `SettleOutcome::AlreadySettled`, not an error.

use std::error::Error;
use std::fmt;

use crate::domain::foundation::{BookingId, DomainError, ErrorCode, SettlementId};

/// Errors from settlement operations.
#[derive(Debug, Clone)]
pub enum SettlementError {
    /// No settlement exists with this id.
    NotFound(SettlementId),

    /// A settlement already exists for this booking.
    AlreadyExists(BookingId),

    /// Caller is not allowed to perform this operation.
    Forbidden(String),

    /// Concurrent modification was detected; the caller lost the race.
    Conflict(SettlementId),

    /// Input failed validation.
    ValidationFailed { field: String, message: String },

    /// The backing store did not respond in time.
    StoreTimeout(String),

    /// Unexpected infrastructure failure.
    Infrastructure(String),
}

impl SettlementError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Stable error code for API responses and logs.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::SettlementNotFound,
            Self::AlreadyExists(_) => ErrorCode::SettlementExists,
            Self::Forbidden(_) => ErrorCode::Forbidden,
            Self::Conflict(_) => ErrorCode::Conflict,
            Self::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            Self::StoreTimeout(_) => ErrorCode::StoreTimeout,
            Self::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Human-readable message safe to return to callers.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound(id) => format!("Settlement {} not found", id),
            Self::AlreadyExists(booking_id) => {
                format!("A settlement already exists for booking {}", booking_id)
            }
            Self::Forbidden(msg) => msg.clone(),
            Self::Conflict(id) => {
                format!("Settlement {} was modified concurrently", id)
            }
            Self::ValidationFailed { field, message } => {
                format!("Validation failed for {}: {}", field, message)
            }
            Self::StoreTimeout(msg) => format!("Store timeout: {}", msg),
            Self::Infrastructure(msg) => format!("Infrastructure error: {}", msg),
        }
    }

    /// Whether retrying the same request may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreTimeout(_) | Self::Infrastructure(_))
    }
}

impl fmt::Display for SettlementError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl Error for SettlementError {}

impl From<DomainError> for SettlementError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden | ErrorCode::Unauthorized => Self::Forbidden(err.message),
            ErrorCode::Conflict => Self::Conflict(SettlementId::default()),
            ErrorCode::ValidationFailed | ErrorCode::EmptyField | ErrorCode::InvalidFormat => {
                Self::ValidationFailed {
                    field: "request".to_string(),
                    message: err.message,
                }
            }
            ErrorCode::StoreTimeout => Self::StoreTimeout(err.message),
            _ => Self::Infrastructure(err.message),
        }
    }
}

impl From<SettlementError> for DomainError {
    fn from(err: SettlementError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}
