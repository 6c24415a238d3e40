//! Channels and chat messages.
//!
//! Two channel scopes exist: a private per-user channel for personal
//! notifications, and a per-property channel shared by the owner and
//! tenants with an active booking. Channels are append-only logs with a
//! monotonic sequence per channel.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    DomainError, ErrorCode, MessageId, PropertyId, Timestamp, UserId, ValidationError,
};

/// Identifies a fan-out channel.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ChannelId {
    /// Private channel for one user.
    User(UserId),
    /// Shared channel for one property.
    Property(PropertyId),
}

impl ChannelId {
    /// Wire encoding: `user:<id>` or `property:<uuid>`.
    pub fn encode(&self) -> String {
        match self {
            Self::User(id) => format!("user:{}", id.as_str()),
            Self::Property(id) => format!("property:{}", id),
        }
    }

    pub fn parse(s: &str) -> Result<Self, ValidationError> {
        match s.split_once(':') {
            Some(("user", rest)) => Ok(Self::User(UserId::new(rest)?)),
            Some(("property", rest)) => {
                let id = rest.parse().map_err(|_| {
                    ValidationError::invalid_format("channel_id", "property id is not a uuid")
                })?;
                Ok(Self::Property(id))
            }
            _ => Err(ValidationError::invalid_format(
                "channel_id",
                "expected user:<id> or property:<uuid>",
            )),
        }
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.encode())
    }
}

impl From<ChannelId> for String {
    fn from(id: ChannelId) -> Self {
        id.encode()
    }
}

impl TryFrom<String> for ChannelId {
    type Error = ValidationError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        ChannelId::parse(&s)
    }
}

/// Kind of message published to a channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    /// Ordinary chat, publishable by any channel member.
    Chat,
    /// Owner-only broadcast on a property channel.
    Announcement,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Announcement => "announcement",
        }
    }
}

/// A message appended to a channel log.
///
/// `seq` is assigned by the store at persist time and is strictly
/// increasing within a channel; it is 0 until the message is persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelMessage {
    pub id: MessageId,
    pub channel_id: ChannelId,
    pub sender_id: UserId,
    pub kind: MessageKind,
    pub body: String,
    pub seq: i64,
    pub created_at: Timestamp,
}

impl ChannelMessage {
    /// Creates an unpersisted message (seq 0).
    pub fn new(
        channel_id: ChannelId,
        sender_id: UserId,
        kind: MessageKind,
        body: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(ValidationError::empty_field("body").into());
        }
        if matches!(kind, MessageKind::Announcement)
            && !matches!(channel_id, ChannelId::Property(_))
        {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                "Announcements may only target property channels",
            ));
        }

        Ok(Self {
            id: MessageId::new(),
            channel_id,
            sender_id,
            kind,
            body,
            seq: 0,
            created_at: Timestamp::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sender() -> UserId {
        UserId::new("tenant-1").unwrap()
    }

    #[test]
    fn user_channel_encodes_and_parses() {
        let id = ChannelId::User(sender());
        let encoded = id.encode();
        assert_eq!(encoded, "user:tenant-1");
        assert_eq!(ChannelId::parse(&encoded).unwrap(), id);
    }

    #[test]
    fn property_channel_encodes_and_parses() {
        let id = ChannelId::Property(PropertyId::new());
        let encoded = id.encode();
        assert!(encoded.starts_with("property:"));
        assert_eq!(ChannelId::parse(&encoded).unwrap(), id);
    }

    #[test]
    fn malformed_channel_id_fails_to_parse() {
        assert!(ChannelId::parse("room:17").is_err());
        assert!(ChannelId::parse("property:not-a-uuid").is_err());
        assert!(ChannelId::parse("user:").is_err());
        assert!(ChannelId::parse("no-colon").is_err());
    }

    #[test]
    fn new_chat_message_starts_unsequenced() {
        let msg = ChannelMessage::new(
            ChannelId::Property(PropertyId::new()),
            sender(),
            MessageKind::Chat,
            "Is the room still available?",
        )
        .unwrap();

        assert_eq!(msg.seq, 0);
        assert_eq!(msg.kind, MessageKind::Chat);
    }

    #[test]
    fn empty_body_is_rejected() {
        let result = ChannelMessage::new(
            ChannelId::Property(PropertyId::new()),
            sender(),
            MessageKind::Chat,
            "   ",
        );
        assert_eq!(result.unwrap_err().code, ErrorCode::EmptyField);
    }

    #[test]
    fn announcement_on_user_channel_is_rejected() {
        let result = ChannelMessage::new(
            ChannelId::User(sender()),
            sender(),
            MessageKind::Announcement,
            "Water shutoff on Friday",
        );
        assert_eq!(result.unwrap_err().code, ErrorCode::ValidationFailed);
    }

    #[test]
    fn announcement_on_property_channel_is_allowed() {
        let msg = ChannelMessage::new(
            ChannelId::Property(PropertyId::new()),
            UserId::new("owner-1").unwrap(),
            MessageKind::Announcement,
            "Water shutoff on Friday",
        )
        .unwrap();
        assert_eq!(msg.kind, MessageKind::Announcement);
    }
}
