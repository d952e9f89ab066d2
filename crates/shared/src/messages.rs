//! WebSocket message types for client-server communication
//!
//! ## Versioning Policy
//!
//! - New variants can be added at the end (forward compatible)
//! - Removing variants requires major version bump
//! - Renaming variants is a breaking change

use serde::{Deserialize, Serialize};

use emberfall_domain::{PlayerId, ZoneId};

use crate::feed::FeedEntry;
use crate::snapshot::RoomSnapshot;
use crate::transfer::TransferPayload;

// =============================================================================
// Client Messages (client → server)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ClientMessage {
    /// A raw text command (`go north`, `cast fireball wolf`, ...)
    Command { text: String },
    /// Analog movement input; the direction is normalized server-side.
    Move { dx: f32, dz: f32 },
    /// Request to move through a nearby door into another zone
    ZoneSwap { target_zone: ZoneId },
    /// Keep-alive
    Heartbeat,
}

// =============================================================================
// Server Messages (server → client)
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ServerMessage {
    /// The session has been admitted into a room
    Joined {
        player_id: PlayerId,
        zone: ZoneId,
        zone_name: String,
    },
    /// A single feed line
    Feed { entry: FeedEntry },
    /// Periodic room state
    State { snapshot: RoomSnapshot },
    /// The player left this room; reconnect to `target_zone` with `payload`
    ZoneTransfer {
        target_zone: ZoneId,
        payload: TransferPayload,
    },
    /// A zone swap request was refused; the player stays where they are
    ZoneSwapFailed { reason: String },
    /// Reply to `Heartbeat`
    Pong,
    /// Protocol-level error (malformed message, session problems)
    Error { code: String, message: String },
}

impl ServerMessage {
    pub fn feed(entry: FeedEntry) -> Self {
        Self::Feed { entry }
    }

    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_messages_are_internally_tagged() {
        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"Command","text":"go north"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Command {
                text: "go north".into()
            }
        );

        let swap: ClientMessage =
            serde_json::from_str(r#"{"type":"ZoneSwap","target_zone":"crypt"}"#).unwrap();
        assert_eq!(
            swap,
            ClientMessage::ZoneSwap {
                target_zone: ZoneId::new("crypt")
            }
        );
    }

    #[test]
    fn zone_swap_failure_carries_reason() {
        let json = serde_json::to_value(ServerMessage::ZoneSwapFailed {
            reason: "TooFarFromDoor".into(),
        })
        .unwrap();
        assert_eq!(json["type"], "ZoneSwapFailed");
        assert_eq!(json["reason"], "TooFarFromDoor");
    }
}
