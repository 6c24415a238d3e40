//! HTTP adapter for notification and chat endpoints.
//!
//! Exposes the fan-out pull path via REST API:
//! - `GET /api/notifications` - Pull notifications since a cursor
//! - `PATCH /api/notifications/:id/read` - Mark one notification read
//! - `POST /api/notifications/mark-all-read` - Bulk mark-read
//! - `POST /api/channels/:id/messages` - Publish a message
//! - `GET /api/channels/:id/messages` - Tail the channel log

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use handlers::{NotificationApiError, NotificationAppState};
pub use routes::{channel_routes, notification_routes};
