//! Notification repository port.
//!
//! Notifications are written by fan-out and read back by their recipient.
//! Persistence happens before any live push, so an offline recipient can
//! always catch up with `list_for_recipient`.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, NotificationId, Timestamp, UserId};
use crate::domain::notification::Notification;

/// Repository port for Notification persistence.
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    /// Save a new notification.
    async fn save(&self, notification: &Notification) -> Result<(), DomainError>;

    /// Save a batch of notifications, all or none.
    async fn save_all(&self, notifications: &[Notification]) -> Result<(), DomainError>;

    /// Find a notification by its ID.
    async fn find_by_id(&self, id: &NotificationId)
        -> Result<Option<Notification>, DomainError>;

    /// Persist a changed notification (read flag).
    async fn update(&self, notification: &Notification) -> Result<(), DomainError>;

    /// List a recipient's notifications, newest first.
    ///
    /// `since` limits the result to notifications created at or after the
    /// given time; `None` returns the most recent page unconditionally.
    async fn list_for_recipient(
        &self,
        recipient_user_id: &UserId,
        since: Option<Timestamp>,
        limit: u32,
    ) -> Result<Vec<Notification>, DomainError>;

    /// Mark all of a recipient's notifications read.
    ///
    /// Returns the number of rows changed.
    async fn mark_all_read(&self, recipient_user_id: &UserId) -> Result<u64, DomainError>;
}
