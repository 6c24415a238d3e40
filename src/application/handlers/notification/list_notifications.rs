//! ListNotificationsHandler - Pull query for a caller's notifications.

use std::sync::Arc;

use crate::domain::foundation::{CallerContext, Timestamp};
use crate::domain::notification::{Notification, NotificationError};
use crate::ports::NotificationRepository;

const DEFAULT_PAGE_LIMIT: u32 = 50;
const MAX_PAGE_LIMIT: u32 = 200;

/// Query for the caller's recent notifications.
///
/// `since` is the reconnect cursor: a client that was offline passes the
/// time of its last seen notification and receives everything after it.
#[derive(Debug, Clone)]
pub struct ListNotificationsQuery {
    pub caller: CallerContext,
    pub since: Option<Timestamp>,
    pub limit: Option<u32>,
}

/// Result of a notification list query.
#[derive(Debug, Clone)]
pub struct ListNotificationsResult {
    pub notifications: Vec<Notification>,
}

/// Handler for listing notifications.
///
/// Always scoped to the caller; there is no cross-user query.
pub struct ListNotificationsHandler {
    repository: Arc<dyn NotificationRepository>,
}

impl ListNotificationsHandler {
    pub fn new(repository: Arc<dyn NotificationRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        query: ListNotificationsQuery,
    ) -> Result<ListNotificationsResult, NotificationError> {
        let limit = query
            .limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .min(MAX_PAGE_LIMIT)
            .max(1);

        let notifications = self
            .repository
            .list_for_recipient(&query.caller.user_id, query.since, limit)
            .await?;

        Ok(ListNotificationsResult { notifications })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::notification::test_support::*;
    use crate::domain::notification::NotificationType;

    fn notification_for(recipient: crate::domain::foundation::UserId) -> Notification {
        Notification::new(
            recipient,
            NotificationType::BookingApproved,
            "Booking approved",
            "Your booking was approved",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn lists_only_callers_notifications() {
        let repo = Arc::new(MockNotificationRepository::new());
        repo.save(&notification_for(tenant_id())).await.unwrap();
        repo.save(&notification_for(owner_id())).await.unwrap();
        let handler = ListNotificationsHandler::new(repo.clone());

        let result = handler
            .handle(ListNotificationsQuery {
                caller: tenant_caller(),
                since: None,
                limit: None,
            })
            .await
            .unwrap();

        assert_eq!(result.notifications.len(), 1);
        assert_eq!(result.notifications[0].recipient_user_id, tenant_id());
    }

    #[tokio::test]
    async fn since_cursor_excludes_older_notifications() {
        let repo = Arc::new(MockNotificationRepository::new());
        let old = notification_for(tenant_id());
        repo.save(&old).await.unwrap();
        let cursor = old.created_at.plus_secs(1);
        let handler = ListNotificationsHandler::new(repo);

        let result = handler
            .handle(ListNotificationsQuery {
                caller: tenant_caller(),
                since: Some(cursor),
                limit: None,
            })
            .await
            .unwrap();

        assert!(result.notifications.is_empty());
    }

    #[tokio::test]
    async fn limit_is_clamped() {
        let repo = Arc::new(MockNotificationRepository::new());
        for _ in 0..3 {
            repo.save(&notification_for(tenant_id())).await.unwrap();
        }
        let handler = ListNotificationsHandler::new(repo);

        let result = handler
            .handle(ListNotificationsQuery {
                caller: tenant_caller(),
                since: None,
                limit: Some(2),
            })
            .await
            .unwrap();

        assert_eq!(result.notifications.len(), 2);
    }
}
