//! HTTP handlers for notification and chat endpoints.
//!
//! The pull side of the fan-out: notifications since a cursor, channel
//! logs after a sequence, mark-read. Publishing persists through the
//! channel store before anything reaches a live subscriber.

use std::sync::Arc;

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;

use crate::adapters::http::middleware::RequireCaller;
use crate::application::handlers::notification::{
    ListChannelMessagesHandler, ListChannelMessagesQuery, ListNotificationsHandler,
    ListNotificationsQuery, MarkAllNotificationsReadCommand, MarkAllNotificationsReadHandler,
    MarkNotificationReadCommand, MarkNotificationReadHandler, PublishMessageCommand,
    PublishMessageHandler,
};
use crate::domain::foundation::NotificationId;
use crate::domain::notification::{ChannelId, NotificationError};
use crate::ports::{ChannelStore, EventPublisher, NotificationRepository, PropertyDirectory};

use super::dto::{
    ChannelMessageResponse, ErrorResponse, ListChannelMessagesParams, ListChannelMessagesResponse,
    ListNotificationsParams, ListNotificationsResponse, MarkAllReadResponse, NotificationResponse,
    PublishMessageRequest,
};

// ════════════════════════════════════════════════════════════════════════════════
// Application State
// ════════════════════════════════════════════════════════════════════════════════

/// Shared application state containing all notification dependencies.
#[derive(Clone)]
pub struct NotificationAppState {
    pub notification_repository: Arc<dyn NotificationRepository>,
    pub channel_store: Arc<dyn ChannelStore>,
    pub property_directory: Arc<dyn PropertyDirectory>,
    pub event_publisher: Arc<dyn EventPublisher>,
}

impl NotificationAppState {
    /// Create handlers on demand from the shared state.
    pub fn list_handler(&self) -> ListNotificationsHandler {
        ListNotificationsHandler::new(self.notification_repository.clone())
    }

    pub fn mark_read_handler(&self) -> MarkNotificationReadHandler {
        MarkNotificationReadHandler::new(self.notification_repository.clone())
    }

    pub fn mark_all_read_handler(&self) -> MarkAllNotificationsReadHandler {
        MarkAllNotificationsReadHandler::new(self.notification_repository.clone())
    }

    pub fn publish_handler(&self) -> PublishMessageHandler {
        PublishMessageHandler::new(
            self.channel_store.clone(),
            self.property_directory.clone(),
            self.event_publisher.clone(),
        )
    }

    pub fn list_messages_handler(&self) -> ListChannelMessagesHandler {
        ListChannelMessagesHandler::new(
            self.channel_store.clone(),
            self.property_directory.clone(),
        )
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Notification Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// GET /api/notifications - Pull the caller's notifications since a cursor
pub async fn list_notifications(
    State(state): State<NotificationAppState>,
    RequireCaller(caller): RequireCaller,
    Query(params): Query<ListNotificationsParams>,
) -> Result<impl IntoResponse, NotificationApiError> {
    let handler = state.list_handler();
    let query = ListNotificationsQuery {
        caller,
        since: params.since,
        limit: params.limit,
    };

    let result = handler.handle(query).await?;

    Ok(Json(ListNotificationsResponse {
        notifications: result
            .notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    }))
}

/// PATCH /api/notifications/:id/read - Mark one notification read
///
/// Recipient-only; anyone else gets 403.
pub async fn mark_notification_read(
    State(state): State<NotificationAppState>,
    RequireCaller(caller): RequireCaller,
    Path(notification_id): Path<NotificationId>,
) -> Result<impl IntoResponse, NotificationApiError> {
    let handler = state.mark_read_handler();
    let cmd = MarkNotificationReadCommand {
        caller,
        notification_id,
    };

    let result = handler.handle(cmd).await?;

    Ok(Json(NotificationResponse::from(result.notification)))
}

/// POST /api/notifications/mark-all-read - Mark all of the caller's unread
pub async fn mark_all_notifications_read(
    State(state): State<NotificationAppState>,
    RequireCaller(caller): RequireCaller,
) -> Result<impl IntoResponse, NotificationApiError> {
    let handler = state.mark_all_read_handler();
    let result = handler
        .handle(MarkAllNotificationsReadCommand { caller })
        .await?;

    Ok(Json(MarkAllReadResponse {
        marked: result.marked,
    }))
}

// ════════════════════════════════════════════════════════════════════════════════
// Channel Handlers
// ════════════════════════════════════════════════════════════════════════════════

/// POST /api/channels/:channel_id/messages - Publish a message
///
/// Announcements are owner-only on property channels; chat requires
/// channel membership. The message is durable before this returns.
pub async fn publish_message(
    State(state): State<NotificationAppState>,
    RequireCaller(caller): RequireCaller,
    Path(channel_id): Path<String>,
    Json(request): Json<PublishMessageRequest>,
) -> Result<impl IntoResponse, NotificationApiError> {
    let channel_id = parse_channel_id(&channel_id)?;

    let handler = state.publish_handler();
    let cmd = PublishMessageCommand {
        caller,
        channel_id,
        kind: request.kind,
        body: request.body,
    };

    let result = handler.handle(cmd).await?;

    Ok((
        StatusCode::CREATED,
        Json(ChannelMessageResponse::from(result.message)),
    ))
}

/// GET /api/channels/:channel_id/messages - Tail the channel log
pub async fn list_channel_messages(
    State(state): State<NotificationAppState>,
    RequireCaller(caller): RequireCaller,
    Path(channel_id): Path<String>,
    Query(params): Query<ListChannelMessagesParams>,
) -> Result<impl IntoResponse, NotificationApiError> {
    let channel_id = parse_channel_id(&channel_id)?;

    let handler = state.list_messages_handler();
    let query = ListChannelMessagesQuery {
        caller,
        channel_id,
        after_seq: params.since_seq,
        limit: params.limit,
    };

    let result = handler.handle(query).await?;

    Ok(Json(ListChannelMessagesResponse {
        messages: result
            .messages
            .into_iter()
            .map(ChannelMessageResponse::from)
            .collect(),
    }))
}

fn parse_channel_id(raw: &str) -> Result<ChannelId, NotificationApiError> {
    ChannelId::parse(raw).map_err(|e| {
        NotificationApiError(NotificationError::ValidationFailed {
            field: "channel_id".to_string(),
            message: e.to_string(),
        })
    })
}

// ════════════════════════════════════════════════════════════════════════════════
// Error Handling
// ════════════════════════════════════════════════════════════════════════════════

/// API error type that converts notification errors to HTTP responses.
pub struct NotificationApiError(NotificationError);

impl From<NotificationError> for NotificationApiError {
    fn from(err: NotificationError) -> Self {
        Self(err)
    }
}

impl From<crate::domain::foundation::DomainError> for NotificationApiError {
    fn from(err: crate::domain::foundation::DomainError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for NotificationApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_code) = match &self.0 {
            NotificationError::NotFound(_) => (StatusCode::NOT_FOUND, "NOTIFICATION_NOT_FOUND"),
            NotificationError::Forbidden(_) => (StatusCode::FORBIDDEN, "FORBIDDEN"),
            NotificationError::NotAMember { .. } => (StatusCode::FORBIDDEN, "NOT_A_MEMBER"),
            NotificationError::ValidationFailed { .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_FAILED")
            }
            NotificationError::StoreTimeout(_) => (StatusCode::GATEWAY_TIMEOUT, "STORE_TIMEOUT"),
            NotificationError::Infrastructure(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };

        let body = ErrorResponse::new(error_code, self.0.message());
        (status, Json(body)).into_response()
    }
}
