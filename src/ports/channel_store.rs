//! Channel store port - append-only message logs and channel membership.
//!
//! Each channel is an append-only log with a strictly increasing sequence.
//! Publishers append, subscribers tail from a sequence they remember.
//! Membership is tracked per property channel; user channels are implicit
//! (every user is the sole member of their own).

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, UserId};
use crate::domain::notification::{ChannelId, ChannelMessage};

/// Port for the durable channel log and membership table.
#[async_trait]
pub trait ChannelStore: Send + Sync {
    /// Append a message to its channel log.
    ///
    /// Assigns the next sequence number for the channel and returns the
    /// persisted message with `seq` set. Sequence assignment is atomic per
    /// channel: two concurrent appends receive distinct, ordered numbers.
    async fn append(&self, message: &ChannelMessage) -> Result<ChannelMessage, DomainError>;

    /// Messages in a channel with `seq` greater than `after_seq`, in
    /// sequence order.
    async fn list_after(
        &self,
        channel_id: &ChannelId,
        after_seq: i64,
        limit: u32,
    ) -> Result<Vec<ChannelMessage>, DomainError>;

    /// Add a user to a property channel. Adding an existing member is a
    /// no-op.
    async fn add_member(&self, channel_id: &ChannelId, user_id: &UserId)
        -> Result<(), DomainError>;

    /// Remove a user from a property channel. Removing a non-member is a
    /// no-op.
    async fn remove_member(
        &self,
        channel_id: &ChannelId,
        user_id: &UserId,
    ) -> Result<(), DomainError>;

    /// Whether a user is a member of the channel.
    ///
    /// A user channel has exactly one member: its user.
    async fn is_member(&self, channel_id: &ChannelId, user_id: &UserId)
        -> Result<bool, DomainError>;

    /// Current members of the channel.
    async fn members(&self, channel_id: &ChannelId) -> Result<Vec<UserId>, DomainError>;
}
