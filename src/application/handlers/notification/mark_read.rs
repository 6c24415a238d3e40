//! Mark-read command handlers.
//!
//! Only the recipient mutates a notification, and the only mutation is
//! the read flag, singly or in bulk.

use std::sync::Arc;

use crate::domain::foundation::{CallerContext, NotificationId};
use crate::domain::notification::{Notification, NotificationError};
use crate::ports::NotificationRepository;

/// Command to mark one notification read.
#[derive(Debug, Clone)]
pub struct MarkNotificationReadCommand {
    pub caller: CallerContext,
    pub notification_id: NotificationId,
}

/// Result of marking one notification read.
#[derive(Debug, Clone)]
pub struct MarkNotificationReadResult {
    pub notification: Notification,
}

/// Handler for marking a single notification read.
pub struct MarkNotificationReadHandler {
    repository: Arc<dyn NotificationRepository>,
}

impl MarkNotificationReadHandler {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: MarkNotificationReadCommand,
    ) -> Result<MarkNotificationReadResult, NotificationError> {
        let mut notification = self
            .repository
            .find_by_id(&cmd.notification_id)
            .await?
            .ok_or(NotificationError::NotFound(cmd.notification_id))?;

        notification.mark_read(&cmd.caller)?;
        self.repository.update(&notification).await?;

        Ok(MarkNotificationReadResult { notification })
    }
}

/// Command to mark all of the caller's notifications read.
#[derive(Debug, Clone)]
pub struct MarkAllNotificationsReadCommand {
    pub caller: CallerContext,
}

/// Result of a bulk mark-read.
#[derive(Debug, Clone)]
pub struct MarkAllNotificationsReadResult {
    pub marked: u64,
}

/// Handler for the bulk mark-read.
pub struct MarkAllNotificationsReadHandler {
    repository: Arc<dyn NotificationRepository>,
}

impl MarkAllNotificationsReadHandler {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: MarkAllNotificationsReadCommand,
    ) -> Result<MarkAllNotificationsReadResult, NotificationError> {
        let marked = self.repository.mark_all_read(&cmd.caller.user_id).await?;
        Ok(MarkAllNotificationsReadResult { marked })
    }
}
