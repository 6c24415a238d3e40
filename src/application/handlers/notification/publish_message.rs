//! PublishMessageHandler - Command handler for channel publishing.
//!
//! Durability-first: the message is appended to the channel log before
//! any live delivery is attempted, so offline members always catch up.

use std::sync::Arc;

use crate::domain::foundation::{CallerContext, EventEnvelope};
use crate::domain::notification::{
    ChannelId, ChannelMessage, MessageKind, NotificationError,
};
use crate::ports::{ChannelStore, EventPublisher, PropertyDirectory};

/// Event type carrying a persisted chat message to live subscribers.
pub const CHAT_MESSAGE_EVENT_TYPE: &str = "chat.message.v1";

/// Command to publish a message to a channel.
#[derive(Debug, Clone)]
pub struct PublishMessageCommand {
    pub caller: CallerContext,
    pub channel_id: ChannelId,
    pub kind: MessageKind,
    pub body: String,
}

/// Result of a successful publish.
#[derive(Debug, Clone)]
pub struct PublishMessageResult {
    /// The persisted message with its channel sequence assigned.
    pub message: ChannelMessage,
}

/// Handler for publishing chat messages and announcements.
///
/// Property channels admit the owner and tenants with an active booking.
/// Announcements are owner-only; a tenant attempting one gets `Forbidden`.
pub struct PublishMessageHandler {
    channel_store: Arc<dyn ChannelStore>,
    property_directory: Arc<dyn PropertyDirectory>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl PublishMessageHandler {
    pub fn new(
        channel_store: Arc<dyn ChannelStore>,
        property_directory: Arc<dyn PropertyDirectory>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            channel_store,
            property_directory,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: PublishMessageCommand,
    ) -> Result<PublishMessageResult, NotificationError> {
        // 1. Build the message (domain validation)
        let message = ChannelMessage::new(
            cmd.channel_id.clone(),
            cmd.caller.user_id.clone(),
            cmd.kind,
            cmd.body,
        )?;

        // 2. Authorize against the channel
        match &cmd.channel_id {
            ChannelId::User(user_id) => {
                if !cmd.caller.is_user(user_id) {
                    return Err(NotificationError::forbidden(
                        "A user channel accepts messages only from its user",
                    ));
                }
            }
            ChannelId::Property(property_id) => {
                let property = self.property_directory.get_property(property_id).await?;
                let is_owner = cmd.caller.is_user(&property.owner_id);

                if cmd.kind == MessageKind::Announcement && !is_owner {
                    return Err(NotificationError::forbidden(
                        "Only the property owner may publish announcements",
                    ));
                }

                let is_member = is_owner
                    || self
                        .channel_store
                        .is_member(&cmd.channel_id, &cmd.caller.user_id)
                        .await?;
                if !is_member {
                    return Err(NotificationError::not_a_member(cmd.channel_id.encode()));
                }
            }
        }

        // 3. Persist first
        let persisted = self.channel_store.append(&message).await?;

        // 4. Then relay to live subscribers
        let payload = serde_json::to_value(&persisted)
            .map_err(|e| NotificationError::Infrastructure(e.to_string()))?;
        let envelope = EventEnvelope::new(
            CHAT_MESSAGE_EVENT_TYPE,
            cmd.channel_id.encode(),
            "Channel",
            payload,
        );
        self.event_publisher.publish(envelope).await?;

        Ok(PublishMessageResult { message: persisted })
    }
}
