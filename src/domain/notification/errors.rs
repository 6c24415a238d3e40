//! Notification and chat operation errors.

use std::error::Error;
use std::fmt;

use crate::domain::foundation::{DomainError, ErrorCode, NotificationId};

/// Errors from notification and channel operations.
#[derive(Debug, Clone)]
pub enum NotificationError {
    /// No notification exists with this id.
    NotFound(NotificationId),

    /// Caller is not allowed to perform this operation.
    Forbidden(String),

    /// Caller is not a member of the target channel.
    NotAMember { channel_id: String },

    /// Input failed validation.
    ValidationFailed { field: String, message: String },

    /// The backing store did not respond in time.
    StoreTimeout(String),

    /// Unexpected infrastructure failure.
    Infrastructure(String),
}

impl NotificationError {
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_a_member(channel_id: impl Into<String>) -> Self {
        Self::NotAMember {
            channel_id: channel_id.into(),
        }
    }

    /// Stable error code for API responses and logs.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotFound(_) => ErrorCode::NotificationNotFound,
            Self::Forbidden(_) | Self::NotAMember { .. } => ErrorCode::Forbidden,
            Self::ValidationFailed { .. } => ErrorCode::ValidationFailed,
            Self::StoreTimeout(_) => ErrorCode::StoreTimeout,
            Self::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Human-readable message safe to return to callers.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound(id) => format!("Notification {} not found", id),
            Self::Forbidden(msg) => msg.clone(),
            Self::NotAMember { channel_id } => {
                format!("Caller is not a member of channel {}", channel_id)
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

impl fmt::Display for NotificationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl Error for NotificationError {}

impl From<DomainError> for NotificationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::Forbidden | ErrorCode::Unauthorized => Self::Forbidden(err.message),
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

impl From<NotificationError> for DomainError {
    fn from(err: NotificationError) -> Self {
        DomainError::new(err.code(), err.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_maps_to_notification_not_found_code() {
        let err = NotificationError::NotFound(NotificationId::new());
        assert_eq!(err.code(), ErrorCode::NotificationNotFound);
        assert!(!err.is_retryable());
    }

    #[test]
    fn not_a_member_maps_to_forbidden() {
        let err = NotificationError::not_a_member("property:abc");
        assert_eq!(err.code(), ErrorCode::Forbidden);
        assert!(err.message().contains("property:abc"));
    }

    #[test]
    fn store_timeout_is_retryable() {
        let err = NotificationError::StoreTimeout("publish exceeded 5s".to_string());
        assert!(err.is_retryable());
    }

    #[test]
    fn domain_forbidden_converts_to_forbidden() {
        let domain = DomainError::new(ErrorCode::Forbidden, "Only owners may announce");
        let err = NotificationError::from(domain);
        assert!(matches!(err, NotificationError::Forbidden(_)));
    }
}
