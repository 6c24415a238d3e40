//! HTTP DTOs for notification and chat endpoints.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::notification::{
    ChannelMessage, MessageKind, Notification, NotificationType,
};

// ════════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// Query parameters for the notification pull endpoint.
///
/// `since` is the reconnect cursor: pass the created_at of the last seen
/// notification to receive only what came after it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListNotificationsParams {
    #[serde(default)]
    pub since: Option<Timestamp>,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Query parameters for tailing a channel log.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListChannelMessagesParams {
    /// Sequence of the last message the client has; 0 for everything.
    #[serde(default)]
    pub since_seq: i64,
    #[serde(default)]
    pub limit: Option<u32>,
}

/// Request to publish a chat message or announcement.
#[derive(Debug, Clone, Deserialize)]
pub struct PublishMessageRequest {
    pub kind: MessageKind,
    pub body: String,
}

// ════════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════════

/// A notification as delivered to the recipient.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub notification_type: NotificationType,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id.to_string(),
            notification_type: notification.notification_type,
            title: notification.title,
            message: notification.message,
            is_read: notification.is_read,
            created_at: notification.created_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Response for the notification pull endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ListNotificationsResponse {
    pub notifications: Vec<NotificationResponse>,
}

/// Response after a bulk mark-read.
#[derive(Debug, Clone, Serialize)]
pub struct MarkAllReadResponse {
    /// Number of notifications flipped to read.
    pub marked: u64,
}

/// A persisted channel message with its assigned sequence.
#[derive(Debug, Clone, Serialize)]
pub struct ChannelMessageResponse {
    pub id: String,
    pub channel_id: String,
    pub sender_id: String,
    pub kind: MessageKind,
    pub body: String,
    pub seq: i64,
    pub created_at: String,
}

impl From<ChannelMessage> for ChannelMessageResponse {
    fn from(message: ChannelMessage) -> Self {
        Self {
            id: message.id.to_string(),
            channel_id: message.channel_id.encode(),
            sender_id: message.sender_id.to_string(),
            kind: message.kind,
            body: message.body,
            seq: message.seq,
            created_at: message.created_at.as_datetime().to_rfc3339(),
        }
    }
}

/// Response for the channel tail endpoint. Messages are in sequence order.
#[derive(Debug, Clone, Serialize)]
pub struct ListChannelMessagesResponse {
    pub messages: Vec<ChannelMessageResponse>,
}

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error_code: String,
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
    use crate::domain::foundation::{PropertyId, UserId};
    use crate::domain::notification::ChannelId;

    #[test]
    fn notification_response_from_domain() {
        let recipient = UserId::new("tenant-1").unwrap();
        let notification = Notification::new(
            recipient,
            NotificationType::BookingApproved,
            "Booking approved",
            "Your booking was approved",
        )
        .unwrap();

        let response = NotificationResponse::from(notification);
        assert_eq!(response.title, "Booking approved");
        assert!(!response.is_read);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["notification_type"], "booking_approved");
    }

    #[test]
    fn channel_message_response_encodes_channel() {
        let property_id = PropertyId::new();
        let message = ChannelMessage::new(
            ChannelId::Property(property_id),
            UserId::new("owner-1").unwrap(),
            MessageKind::Announcement,
            "Water shutoff on Friday",
        )
        .unwrap();

        let response = ChannelMessageResponse::from(message);
        assert_eq!(response.channel_id, format!("property:{property_id}"));
        assert_eq!(response.seq, 0);

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["kind"], "announcement");
    }

    #[test]
    fn list_params_defaults() {
        let params: ListNotificationsParams = serde_json::from_str("{}").unwrap();
        assert!(params.since.is_none());
        assert!(params.limit.is_none());

        let params: ListChannelMessagesParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.since_seq, 0);
    }
}
