//! ListChannelMessagesHandler - Tail query over a channel log.

use std::sync::Arc;

use crate::domain::foundation::CallerContext;
use crate::domain::notification::{ChannelId, ChannelMessage, NotificationError};
use crate::ports::{ChannelStore, PropertyDirectory};

const DEFAULT_PAGE_LIMIT: u32 = 100;

/// Query for messages after a sequence cursor.
#[derive(Debug, Clone)]
pub struct ListChannelMessagesQuery {
    pub caller: CallerContext,
    pub channel_id: ChannelId,
    /// Sequence of the last message the client has; 0 for everything.
    pub after_seq: i64,
    pub limit: Option<u32>,
}

/// Result of a channel tail query.
#[derive(Debug, Clone)]
pub struct ListChannelMessagesResult {
    /// Messages in sequence order.
    pub messages: Vec<ChannelMessage>,
}

/// Handler for reading a channel log.
///
/// Membership is checked on read as well as on publish; the owner reads
/// their property channel without a membership row.
pub struct ListChannelMessagesHandler {
    channel_store: Arc<dyn ChannelStore>,
    property_directory: Arc<dyn PropertyDirectory>,
}

impl ListChannelMessagesHandler {
    pub fn new(
        channel_store: Arc<dyn ChannelStore>,
        property_directory: Arc<dyn PropertyDirectory>,
    ) -> Self {
        Self {
            channel_store,
            property_directory,
        }
    }

    pub async fn handle(
        &self,
        query: ListChannelMessagesQuery,
    ) -> Result<ListChannelMessagesResult, NotificationError> {
        match &query.channel_id {
            ChannelId::User(user_id) => {
                if !query.caller.is_user(user_id) {
                    return Err(NotificationError::forbidden(
                        "A user channel is readable only by its user",
                    ));
                }
            }
            ChannelId::Property(property_id) => {
                let property = self.property_directory.get_property(property_id).await?;
                let allowed = query.caller.is_user(&property.owner_id)
                    || self
                        .channel_store
                        .is_member(&query.channel_id, &query.caller.user_id)
                        .await?;
                if !allowed {
                    return Err(NotificationError::not_a_member(query.channel_id.encode()));
                }
            }
        }

        let messages = self
            .channel_store
            .list_after(
                &query.channel_id,
                query.after_seq,
                query.limit.unwrap_or(DEFAULT_PAGE_LIMIT),
            )
            .await?;

        Ok(ListChannelMessagesResult { messages })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::booking::test_support::MockPropertyDirectory;
    use crate::application::handlers::notification::test_support::*;
    use crate::domain::foundation::PropertyId;
    use crate::domain::notification::MessageKind;

    async fn seed_messages(channels: &MockChannelStore, channel: &ChannelId, count: usize) {
        for i in 0..count {
            let message = ChannelMessage::new(
                channel.clone(),
                tenant_id(),
                MessageKind::Chat,
                format!("message {}", i),
            )
            .unwrap();
            channels.append(&message).await.unwrap();
        }
    }

    #[tokio::test]
    async fn member_tails_from_cursor_in_order() {
        let property_id = PropertyId::new();
        let channel = ChannelId::Property(property_id);
        let channels = Arc::new(MockChannelStore::new());
        channels.add_member_sync(&channel, &tenant_id());
        seed_messages(&channels, &channel, 3).await;
        let handler = ListChannelMessagesHandler::new(
            channels,
            Arc::new(MockPropertyDirectory::available_property(property_id)),
        );

        let result = handler
            .handle(ListChannelMessagesQuery {
                caller: tenant_caller(),
                channel_id: channel,
                after_seq: 1,
                limit: None,
            })
            .await
            .unwrap();

        assert_eq!(result.messages.len(), 2);
        assert_eq!(result.messages[0].seq, 2);
        assert_eq!(result.messages[1].seq, 3);
    }

    #[tokio::test]
    async fn owner_reads_without_membership_row() {
        let property_id = PropertyId::new();
        let channel = ChannelId::Property(property_id);
        let channels = Arc::new(MockChannelStore::new());
        seed_messages(&channels, &channel, 1).await;
        let handler = ListChannelMessagesHandler::new(
            channels,
            Arc::new(MockPropertyDirectory::available_property(property_id)),
        );

        let result = handler
            .handle(ListChannelMessagesQuery {
                caller: owner_caller(),
                channel_id: channel,
                after_seq: 0,
                limit: None,
            })
            .await
            .unwrap();

        assert_eq!(result.messages.len(), 1);
    }

    #[tokio::test]
    async fn non_member_cannot_read() {
        let property_id = PropertyId::new();
        let channel = ChannelId::Property(property_id);
        let channels = Arc::new(MockChannelStore::new());
        let handler = ListChannelMessagesHandler::new(
            channels,
            Arc::new(MockPropertyDirectory::available_property(property_id)),
        );

        let err = handler
            .handle(ListChannelMessagesQuery {
                caller: tenant_caller(),
                channel_id: channel,
                after_seq: 0,
                limit: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, NotificationError::NotAMember { .. }));
    }

    #[tokio::test]
    async fn user_channel_is_private() {
        let channels = Arc::new(MockChannelStore::new());
        let handler = ListChannelMessagesHandler::new(
            channels,
            Arc::new(MockPropertyDirectory::available_property(PropertyId::new())),
        );

        let err = handler
            .handle(ListChannelMessagesQuery {
                caller: owner_caller(),
                channel_id: ChannelId::User(tenant_id()),
                after_seq: 0,
                limit: None,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, NotificationError::Forbidden(_)));
    }
}
