//! WebSocket room management for channel-based message routing.
//!
//! Rooms are organized by channel ID, allowing targeted broadcast of
//! channel messages to all clients subscribed to that channel.
//!
//! # Architecture
//!
//! ```text
//! Room: property:abc    Room: user:tenant-9
//! ├── client-a          └── client-d
//! ├── client-b
//! └── client-c
//! ```
//!
//! When a message lands in property:abc's log, only clients a, b, c are
//! pushed a copy.

use std::collections::HashMap;

use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

use crate::domain::notification::ChannelId;

use super::messages::ChannelUpdate;

/// Unique identifier for a WebSocket client connection.
///
/// Generated server-side when a client connects.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClientId(Uuid);

impl ClientId {
    /// Create a new random client ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClientId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Manages WebSocket connection rooms organized by channel.
///
/// Provides:
/// - Client join/leave operations
/// - Broadcast to all clients in a channel room
/// - Automatic cleanup of empty rooms
///
/// # Thread Safety
///
/// Uses `RwLock` for the room registry since broadcasts (reads) vastly
/// outnumber joins/leaves (writes). This allows concurrent broadcasts
/// to different rooms.
pub struct RoomManager {
    /// Map of channel_id → broadcast sender for that room.
    rooms: RwLock<HashMap<ChannelId, broadcast::Sender<ChannelUpdate>>>,

    /// Map of client_id → channel_id for O(1) cleanup on disconnect.
    client_channels: RwLock<HashMap<ClientId, ChannelId>>,

    /// Channel capacity for each room's broadcast channel.
    channel_capacity: usize,
}

impl RoomManager {
    /// Create a new room manager with specified channel capacity.
    ///
    /// `channel_capacity` is the buffer size for each room's broadcast
    /// channel. Slow clients that fall more than this many messages
    /// behind miss updates and reconcile through the pull API.
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            client_channels: RwLock::new(HashMap::new()),
            channel_capacity,
        }
    }

    /// Create with default capacity (128 messages).
    pub fn with_default_capacity() -> Self {
        Self::new(128)
    }

    /// Join a client to a channel room.
    ///
    /// If the room doesn't exist, it's created automatically.
    /// Returns a receiver for updates in that room.
    pub async fn join(
        &self,
        channel_id: &ChannelId,
        client_id: ClientId,
    ) -> broadcast::Receiver<ChannelUpdate> {
        let mut rooms = self.rooms.write().await;

        let sender = rooms.entry(channel_id.clone()).or_insert_with(|| {
            let (tx, _) = broadcast::channel(self.channel_capacity);
            tx
        });

        // Track client's channel for cleanup
        self.client_channels
            .write()
            .await
            .insert(client_id, channel_id.clone());

        sender.subscribe()
    }

    /// Remove a client from their channel room.
    ///
    /// If the room becomes empty, it's automatically cleaned up.
    pub async fn leave(&self, client_id: &ClientId) {
        let mut client_channels = self.client_channels.write().await;

        if let Some(channel_id) = client_channels.remove(client_id) {
            let rooms = self.rooms.read().await;
            if let Some(sender) = rooms.get(&channel_id) {
                if sender.receiver_count() == 0 {
                    drop(rooms);
                    self.rooms.write().await.remove(&channel_id);
                }
            }
        }
    }

    /// Broadcast an update to all clients in a channel room.
    ///
    /// If no clients are in the room, this is a no-op. If the broadcast
    /// buffer is full, oldest messages are dropped.
    pub async fn broadcast_to_channel(&self, channel_id: &ChannelId, update: ChannelUpdate) {
        let rooms = self.rooms.read().await;

        if let Some(sender) = rooms.get(channel_id) {
            // No receivers is fine
            let _ = sender.send(update);
        }
    }

    /// Get count of connected clients in a specific room.
    pub async fn client_count(&self, channel_id: &ChannelId) -> usize {
        let rooms = self.rooms.read().await;
        rooms
            .get(channel_id)
            .map(|s| s.receiver_count())
            .unwrap_or(0)
    }

    /// Get all active room IDs (for monitoring/debugging).
    pub async fn active_rooms(&self) -> Vec<ChannelId> {
        self.rooms.read().await.keys().cloned().collect()
    }

    /// Get total count of connected clients across all rooms.
    pub async fn total_client_count(&self) -> usize {
        self.client_channels.read().await.len()
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::with_default_capacity()
    }
}
