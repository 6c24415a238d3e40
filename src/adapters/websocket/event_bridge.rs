//! Event bridge connecting channel events to WebSocket clients.
//!
//! Subscribes to chat message events and pushes them to connected
//! clients in the matching channel room. Delivery here is best-effort:
//! the message is already in the channel log before this bridge sees
//! it, so a missed push is recovered through the pull API.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::domain::notification::{ChannelId, MessageKind};
use crate::ports::{EventHandler, EventSubscriber};

use super::messages::ChannelUpdate;
use super::rooms::RoomManager;

/// Event types that are pushed to live channel subscribers.
pub const LIVE_EVENT_TYPES: &[&str] = &["chat.message.v1"];

/// Bridge between the event bus and WebSocket connections.
///
/// Implements `EventHandler` to receive chat events and broadcast them
/// to connected clients in the appropriate channel rooms.
pub struct WebSocketEventBridge {
    room_manager: Arc<RoomManager>,
}

impl WebSocketEventBridge {
    /// Create a new event bridge with the given room manager.
    pub fn new(room_manager: Arc<RoomManager>) -> Self {
        Self { room_manager }
    }

    /// Create as an Arc (for sharing with event subscriber).
    pub fn new_shared(room_manager: Arc<RoomManager>) -> Arc<Self> {
        Arc::new(Self::new(room_manager))
    }

    /// Register this bridge with an event subscriber.
    pub fn register(self: &Arc<Self>, subscriber: &impl EventSubscriber) {
        subscriber.subscribe_all(LIVE_EVENT_TYPES, self.clone());
    }

    /// Transform a chat event envelope into a channel update.
    ///
    /// Returns `None` if the event type is not pushed live or the
    /// payload doesn't carry the expected message fields.
    fn transform(&self, event: &EventEnvelope) -> Option<ChannelUpdate> {
        if !LIVE_EVENT_TYPES.contains(&event.event_type.as_str()) {
            return None;
        }

        let kind = event
            .payload
            .get("kind")
            .and_then(|v| serde_json::from_value::<MessageKind>(v.clone()).ok())?;
        let seq = event.payload.get("seq").and_then(|v| v.as_i64())?;

        Some(ChannelUpdate {
            kind,
            seq,
            data: event.payload.clone(),
            timestamp: event.occurred_at,
        })
    }

    /// Resolve the channel ID from an event envelope.
    ///
    /// Chat events carry the encoded channel id as their aggregate_id.
    fn resolve_channel_id(&self, event: &EventEnvelope) -> Option<ChannelId> {
        ChannelId::parse(&event.aggregate_id).ok()
    }
}

#[async_trait]
impl EventHandler for WebSocketEventBridge {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        let Some(update) = self.transform(&event) else {
            return Ok(()); // Event not pushed live
        };

        let Some(channel_id) = self.resolve_channel_id(&event) else {
            tracing::debug!(
                event_type = %event.event_type,
                aggregate_id = %event.aggregate_id,
                "Cannot resolve channel ID for event, skipping WebSocket broadcast"
            );
            return Ok(());
        };

        self.room_manager
            .broadcast_to_channel(&channel_id, update)
            .await;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "WebSocketEventBridge"
    }
}
