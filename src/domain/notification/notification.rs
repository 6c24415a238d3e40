//! Personal notification entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    CallerContext, DomainError, ErrorCode, NotificationId, Timestamp, UserId, ValidationError,
};

/// Category of a notification, used by clients for rendering and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationType {
    BookingCreated,
    BookingApproved,
    BookingRejected,
    BookingCancelled,
    SettlementCompleted,
    ChatMessage,
    Announcement,
}

impl NotificationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BookingCreated => "booking_created",
            Self::BookingApproved => "booking_approved",
            Self::BookingRejected => "booking_rejected",
            Self::BookingCancelled => "booking_cancelled",
            Self::SettlementCompleted => "settlement_completed",
            Self::ChatMessage => "chat_message",
            Self::Announcement => "announcement",
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s {
            "booking_created" => Ok(Self::BookingCreated),
            "booking_approved" => Ok(Self::BookingApproved),
            "booking_rejected" => Ok(Self::BookingRejected),
            "booking_cancelled" => Ok(Self::BookingCancelled),
            "settlement_completed" => Ok(Self::SettlementCompleted),
            "chat_message" => Ok(Self::ChatMessage),
            "announcement" => Ok(Self::Announcement),
            other => Err(ValidationError::invalid_format(
                "notification_type",
                format!("unknown notification type: {}", other),
            )),
        }
    }
}

/// A notification delivered to exactly one recipient.
///
/// Created by fan-out when a domain event occurs. Only the recipient may
/// mutate it, and the only mutation is marking it read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub recipient_user_id: UserId,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: Timestamp,
}

impl Notification {
    /// Creates an unread notification for the given recipient.
    pub fn new(
        recipient_user_id: UserId,
        notification_type: NotificationType,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        let message = message.into();

        if title.trim().is_empty() {
            return Err(ValidationError::empty_field("title").into());
        }
        if message.trim().is_empty() {
            return Err(ValidationError::empty_field("message").into());
        }

        Ok(Self {
            id: NotificationId::new(),
            recipient_user_id,
            notification_type,
            title,
            message,
            is_read: false,
            created_at: Timestamp::now(),
        })
    }

    /// Marks the notification as read.
    ///
    /// Only the recipient may do this; anyone else gets `Forbidden`.
    /// Marking an already-read notification again is a no-op.
    pub fn mark_read(&mut self, caller: &CallerContext) -> Result<(), DomainError> {
        if !caller.is_user(&self.recipient_user_id) {
            return Err(DomainError::new(
                ErrorCode::Forbidden,
                "Only the recipient may mark a notification read",
            ));
        }
        self.is_read = true;
        Ok(())
    }
}
