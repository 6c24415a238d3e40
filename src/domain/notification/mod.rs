//! Notification domain: personal notifications and channel-based chat fan-out.

mod channel;
mod errors;
mod notification;

pub use channel::{ChannelId, ChannelMessage, MessageKind};
pub use errors::NotificationError;
pub use notification::{Notification, NotificationType};
