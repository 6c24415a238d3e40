//! WebSocket upgrade handler for live channel connections.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Verify the caller's token and channel membership
//! 2. Upgrade to WebSocket
//! 3. Join the channel room
//! 4. Forward broadcasts until disconnect
//! 5. Clean up room membership

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Path, Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast;

use crate::domain::foundation::{CallerContext, Timestamp};
use crate::domain::notification::ChannelId;
use crate::ports::{ChannelStore, IdentityProvider, PropertyDirectory};

use super::{
    messages::{ChannelUpdate, ClientMessage, ConnectedMessage, ServerMessage},
    rooms::{ClientId, RoomManager},
};

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    /// Room manager for channel-based routing.
    pub room_manager: Arc<RoomManager>,
    /// Token verification for connecting callers.
    pub identity_provider: Arc<dyn IdentityProvider>,
    /// Membership checks for property channels.
    pub channel_store: Arc<dyn ChannelStore>,
    /// Owner resolution for property channels.
    pub property_directory: Arc<dyn PropertyDirectory>,
}

impl WebSocketState {
    /// Create a new WebSocket state.
    pub fn new(
        room_manager: Arc<RoomManager>,
        identity_provider: Arc<dyn IdentityProvider>,
        channel_store: Arc<dyn ChannelStore>,
        property_directory: Arc<dyn PropertyDirectory>,
    ) -> Self {
        Self {
            room_manager,
            identity_provider,
            channel_store,
            property_directory,
        }
    }
}

/// Query parameters accepted on the upgrade request.
///
/// Browsers can't set headers on WebSocket requests, so the bearer
/// token may arrive as a query parameter instead.
#[derive(Debug, Deserialize)]
pub struct LiveParams {
    pub token: Option<String>,
}

/// Handle WebSocket upgrade requests for live channel delivery.
///
/// Route: `GET /api/channels/{channel_id}/live`
///
/// The caller must present a valid token and be a member of the channel:
/// a user channel admits only its user, a property channel admits the
/// owner and tenants with an active booking.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(channel_id): Path<String>,
    Query(params): Query<LiveParams>,
    headers: HeaderMap,
    State(state): State<WebSocketState>,
) -> Response {
    let channel_id = match ChannelId::parse(&channel_id) {
        Ok(id) => id,
        Err(_) => {
            return (StatusCode::BAD_REQUEST, "Invalid channel ID").into_response();
        }
    };

    let Some(token) = extract_token(&headers, &params) else {
        return (StatusCode::UNAUTHORIZED, "Missing token").into_response();
    };

    let caller = match state.identity_provider.verify_token(&token).await {
        Ok(caller) => caller,
        Err(e) => {
            tracing::debug!(error = %e, "WebSocket token verification failed");
            return (StatusCode::UNAUTHORIZED, "Invalid token").into_response();
        }
    };

    match authorize_subscription(&state, &channel_id, &caller).await {
        Ok(true) => {}
        Ok(false) => {
            return (StatusCode::FORBIDDEN, "Not a channel member").into_response();
        }
        Err(e) => {
            tracing::warn!(error = %e, channel = %channel_id, "Channel authorization failed");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Authorization check failed")
                .into_response();
        }
    }

    ws.on_upgrade(move |socket| handle_socket(socket, channel_id, state))
}

/// Pull the bearer token from the Authorization header or query string.
fn extract_token(headers: &HeaderMap, params: &LiveParams) -> Option<String> {
    if let Some(value) = headers.get(axum::http::header::AUTHORIZATION) {
        if let Ok(s) = value.to_str() {
            if let Some(token) = s.strip_prefix("Bearer ") {
                return Some(token.to_string());
            }
        }
    }
    params.token.clone()
}

/// Check that the caller may subscribe to the channel.
async fn authorize_subscription(
    state: &WebSocketState,
    channel_id: &ChannelId,
    caller: &CallerContext,
) -> Result<bool, crate::domain::foundation::DomainError> {
    match channel_id {
        ChannelId::User(user_id) => Ok(caller.is_user(user_id)),
        ChannelId::Property(property_id) => {
            let property = state.property_directory.get_property(property_id).await?;
            if caller.is_user(&property.owner_id) {
                return Ok(true);
            }
            state
                .channel_store
                .is_member(channel_id, &caller.user_id)
                .await
        }
    }
}

/// Handle an established WebSocket connection.
///
/// This function runs for the lifetime of the connection, handling:
/// - Joining the channel room
/// - Forwarding room broadcasts to the client
/// - Processing client pings
/// - Cleanup on disconnect
async fn handle_socket(socket: WebSocket, channel_id: ChannelId, state: WebSocketState) {
    let (mut sender, mut receiver) = socket.split();

    let client_id = ClientId::new();

    let mut room_rx: broadcast::Receiver<ChannelUpdate> = state
        .room_manager
        .join(&channel_id, client_id.clone())
        .await;

    let connected = ServerMessage::Connected(ConnectedMessage {
        channel_id: channel_id.encode(),
        client_id: client_id.to_string(),
        timestamp: Timestamp::now().as_datetime().to_rfc3339(),
    });

    if let Err(e) = send_message(&mut sender, &connected).await {
        tracing::debug!("Failed to send connected message: {}", e);
        return; // Client disconnected immediately
    }

    // Forward room broadcasts to the client
    let mut send_task = {
        let client_id_clone = client_id.clone();
        tokio::spawn(async move {
            while let Ok(update) = room_rx.recv().await {
                let msg = update.to_server_message();
                if let Err(e) = send_message(&mut sender, &msg).await {
                    tracing::debug!(
                        client_id = %client_id_clone,
                        "Send error, closing connection: {}",
                        e
                    );
                    break;
                }
            }
        })
    };

    // Handle incoming messages from client
    let room_manager = state.room_manager.clone();
    let client_id_for_recv = client_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    if let Ok(client_msg) = serde_json::from_str::<ClientMessage>(&text) {
                        match client_msg {
                            ClientMessage::Ping => {
                                tracing::trace!(
                                    client_id = %client_id_for_recv,
                                    "Received ping"
                                );
                            }
                        }
                    }
                }
                Ok(Message::Binary(_)) => {
                    tracing::warn!(
                        client_id = %client_id_for_recv,
                        "Received unsupported binary message"
                    );
                }
                Ok(Message::Ping(_)) | Ok(Message::Pong(_)) => {
                    // Protocol-level frames handled by axum
                }
                Ok(Message::Close(_)) => {
                    tracing::debug!(
                        client_id = %client_id_for_recv,
                        "Client sent close frame"
                    );
                    break;
                }
                Err(e) => {
                    tracing::debug!(
                        client_id = %client_id_for_recv,
                        "Receive error: {}",
                        e
                    );
                    break;
                }
            }
        }

        // Return room_manager for cleanup
        room_manager
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        result = &mut recv_task => {
            send_task.abort();
            if let Ok(room_manager) = result {
                room_manager.leave(&client_id).await;
            }
            return;
        }
    }

    // Cleanup: leave room (send_task finished first)
    state.room_manager.leave(&client_id).await;
}

/// Send a JSON message over the WebSocket.
async fn send_message(
    sender: &mut futures::stream::SplitSink<WebSocket, Message>,
    msg: &ServerMessage,
) -> Result<(), axum::Error> {
    let json = serde_json::to_string(msg).expect("ServerMessage serialization should not fail");
    sender.send(Message::Text(json)).await
}

/// Create axum router for the WebSocket endpoint.
///
/// # Example
///
/// ```ignore
/// let app = Router::new()
///     .nest("/api", websocket_router())
///     .with_state(ws_state);
/// ```
pub fn websocket_router() -> axum::Router<WebSocketState> {
    use axum::routing::get;

    axum::Router::new().route("/channels/:channel_id/live", get(ws_handler))
}
