//! Notification and chat handlers.
//!
//! ## Event handlers
//! - `NotificationFanout` - consumes booking and settlement events,
//!   persists notifications, maintains property-channel membership
//!
//! ## Commands
//! - Publishing chat messages and owner announcements (durability-first)
//! - Marking notifications read, singly or in bulk
//!
//! ## Queries
//! - Pull notifications since a cursor
//! - Tail a channel log after a sequence

mod fanout;
mod list_channel_messages;
mod list_notifications;
mod mark_read;
mod publish_message;

#[cfg(test)]
pub(crate) mod test_support;

pub use fanout::{NotificationFanout, FANOUT_EVENT_TYPES};
pub use list_channel_messages::{
    ListChannelMessagesHandler, ListChannelMessagesQuery, ListChannelMessagesResult,
};
pub use list_notifications::{
    ListNotificationsHandler, ListNotificationsQuery, ListNotificationsResult,
};
pub use mark_read::{
    MarkAllNotificationsReadCommand, MarkAllNotificationsReadHandler,
    MarkAllNotificationsReadResult, MarkNotificationReadCommand, MarkNotificationReadHandler,
    MarkNotificationReadResult,
};
pub use publish_message::{
    PublishMessageCommand, PublishMessageHandler, PublishMessageResult, CHAT_MESSAGE_EVENT_TYPE,
};
