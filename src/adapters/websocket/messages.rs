//! WebSocket message types for live channel delivery.
//!
//! Defines the protocol between server and connected clients:
//! - Server → Client: Connection status, channel messages, errors, pings
//! - Client → Server: Pings
//!
//! Live delivery is best-effort; the channel log is the durable record
//! and clients reconcile through the pull API with their last seen `seq`.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;
use crate::domain::notification::MessageKind;

// ============================================
// Server → Client Messages
// ============================================

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established successfully.
    Connected(ConnectedMessage),

    /// A message was appended to the subscribed channel.
    #[serde(rename = "channel.message")]
    ChannelMessage(ChannelMessageEvent),

    /// Error occurred.
    Error(ErrorMessage),

    /// Heartbeat response.
    Pong(PongMessage),
}

/// Sent when a client successfully connects and joins a channel room.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedMessage {
    pub channel_id: String,
    pub client_id: String,
    pub timestamp: String,
}

/// A channel message pushed to subscribers.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelMessageEvent {
    pub kind: MessageKind,
    pub seq: i64,
    pub data: serde_json::Value,
    pub timestamp: String,
}

/// Error message sent to client.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorMessage {
    pub code: String,
    pub message: String,
    pub timestamp: String,
}

/// Heartbeat response.
#[derive(Debug, Clone, Serialize)]
pub struct PongMessage {
    pub timestamp: String,
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be received from client.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Heartbeat request.
    Ping,
}

// ============================================
// Internal Types
// ============================================

/// Internal representation of a channel update for broadcasting.
///
/// This is what the event bridge creates and sends to rooms.
#[derive(Debug, Clone)]
pub struct ChannelUpdate {
    pub kind: MessageKind,
    pub seq: i64,
    pub data: serde_json::Value,
    pub timestamp: Timestamp,
}

impl ChannelUpdate {
    /// Convert to a server message for sending to clients.
    pub fn to_server_message(self) -> ServerMessage {
        ServerMessage::ChannelMessage(ChannelMessageEvent {
            kind: self.kind,
            seq: self.seq,
            data: self.data,
            timestamp: self.timestamp.as_datetime().to_rfc3339(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_serializes_with_type_tag() {
        let msg = ServerMessage::Connected(ConnectedMessage {
            channel_id: "property:550e8400-e29b-41d4-a716-446655440000".to_string(),
            client_id: "client-456".to_string(),
            timestamp: "2026-01-10T00:00:00Z".to_string(),
        });

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"connected""#));
        assert!(json.contains(r#""channelId":"property:"#));
    }

    #[test]
    fn channel_message_serializes_correctly() {
        let msg = ServerMessage::ChannelMessage(ChannelMessageEvent {
            kind: MessageKind::Announcement,
            seq: 42,
            data: serde_json::json!({"body": "Water shutoff on Friday"}),
            timestamp: "2026-01-10T00:00:00Z".to_string(),
        });

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"channel.message""#));
        assert!(json.contains(r#""kind":"announcement""#));
        assert!(json.contains(r#""seq":42"#));
    }

    #[test]
    fn client_message_deserializes_ping() {
        let json = r#"{"type": "ping"}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert!(matches!(msg, ClientMessage::Ping));
    }

    #[test]
    fn channel_update_converts_to_server_message() {
        let update = ChannelUpdate {
            kind: MessageKind::Chat,
            seq: 7,
            data: serde_json::json!({"body": "hello"}),
            timestamp: Timestamp::now(),
        };

        let msg = update.to_server_message();
        match msg {
            ServerMessage::ChannelMessage(event) => assert_eq!(event.seq, 7),
            other => panic!("Expected channel message, got {:?}", other),
        }
    }

    #[test]
    fn error_message_serializes_correctly() {
        let msg = ServerMessage::Error(ErrorMessage {
            code: "FORBIDDEN".to_string(),
            message: "Not a channel member".to_string(),
            timestamp: "2026-01-10T00:00:00Z".to_string(),
        });

        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""type":"error""#));
        assert!(json.contains(r#""code":"FORBIDDEN""#));
    }
}
