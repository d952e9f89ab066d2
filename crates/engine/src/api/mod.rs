//! API layer - HTTP and WebSocket entry points, plus the room manager they
//! route sessions through.

pub mod http;
pub mod rooms;
pub mod websocket;

pub use rooms::{RoomManager, SessionError};
