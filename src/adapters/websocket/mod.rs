//! WebSocket adapters for live channel delivery.
//!
//! This module provides the infrastructure for pushing persisted channel
//! messages to connected clients via WebSocket connections.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Event Bus                                    │
//! │   InMemoryEventBus (test) │ RedisEventPublisher (production)        │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ subscribes
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                    WebSocketEventBridge                              │
//! │   - Subscribes to chat message events                               │
//! │   - Transforms EventEnvelope → ChannelUpdate                        │
//! │   - Routes to the matching channel room                             │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                     │
//!                                     │ broadcasts
//!                                     ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                      RoomManager                                     │
//! │   Room: property:abc   Room: property:def   Room: user:tenant-9     │
//! │   ├── client-a         ├── client-d         └── client-g            │
//! │   ├── client-b         └── client-e                                 │
//! │   └── client-c                                                       │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Delivery here is best-effort: the channel log is the durable record,
//! and clients reconcile missed messages through the pull API.
//!
//! # Components
//!
//! - [`messages`] - WebSocket message protocol types
//! - [`rooms`] - Room management for channel-based routing
//! - [`handler`] - Axum WebSocket upgrade handler
//! - [`event_bridge`] - Bridge between event bus and WebSocket rooms

pub mod event_bridge;
pub mod handler;
pub mod messages;
pub mod rooms;

pub use event_bridge::{WebSocketEventBridge, LIVE_EVENT_TYPES};
pub use handler::{websocket_router, ws_handler, LiveParams, WebSocketState};
pub use messages::{
    ChannelMessageEvent, ChannelUpdate, ClientMessage, ConnectedMessage, ErrorMessage,
    PongMessage, ServerMessage,
};
pub use rooms::{ClientId, RoomManager};
