//! Axum router configuration for notification and chat endpoints.

use axum::{
    routing::{get, patch, post},
    Router,
};

use super::handlers::{
    list_channel_messages, list_notifications, mark_all_notifications_read,
    mark_notification_read, publish_message, NotificationAppState,
};

/// Create the notification API router.
///
/// # Routes
///
/// - `GET /` - Pull the caller's notifications since a cursor
/// - `PATCH /:id/read` - Mark one notification read (recipient only)
/// - `POST /mark-all-read` - Mark all of the caller's unread
pub fn notification_routes() -> Router<NotificationAppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/:notification_id/read", patch(mark_notification_read))
        .route("/mark-all-read", post(mark_all_notifications_read))
}

/// Create the channel API router.
///
/// # Routes
///
/// - `POST /:channel_id/messages` - Publish a chat message or announcement
/// - `GET /:channel_id/messages` - Tail the channel log after a sequence
pub fn channel_routes() -> Router<NotificationAppState> {
    Router::new()
        .route("/:channel_id/messages", post(publish_message))
        .route("/:channel_id/messages", get(list_channel_messages))
}
