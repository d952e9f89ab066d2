//! WebSocket handling for game clients.
//!
//! One socket is one player session. The socket's query string names the
//! character (`/ws?name=Aria&class=mage&zone=town`); after that every text
//! frame is a JSON `ClientMessage` and every outgoing frame a JSON
//! `ServerMessage`.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use emberfall_domain::{CharacterClass, PlayerId, PlayerName, ZoneId};
use emberfall_shared::{ClientMessage, ServerMessage};

use crate::app::App;

/// Buffer size for per-connection message channel.
const CONNECTION_CHANNEL_BUFFER: usize = 256;

/// Query parameters of the upgrade request.
#[derive(Debug, Clone, Deserialize)]
pub struct ConnectParams {
    pub name: String,
    #[serde(default)]
    pub class: Option<String>,
    #[serde(default)]
    pub zone: Option<String>,
}

/// A session request that passed validation.
#[derive(Debug, Clone, PartialEq)]
struct SessionRequest {
    name: PlayerName,
    class: CharacterClass,
    zone: Option<ZoneId>,
}

impl ConnectParams {
    fn validate(self) -> Result<SessionRequest, ServerMessage> {
        let name = PlayerName::new(self.name)
            .map_err(|e| ServerMessage::error("INVALID_NAME", e.to_string()))?;
        let class = match self.class.as_deref() {
            None => CharacterClass::Warrior,
            Some(raw) => raw.parse().map_err(|()| {
                ServerMessage::error(
                    "INVALID_CLASS",
                    format!("Unknown class '{raw}'. Choose warrior, ranger or mage."),
                )
            })?,
        };
        let zone = self
            .zone
            .map(|z| z.trim().to_ascii_lowercase())
            .filter(|z| !z.is_empty())
            .map(ZoneId::new);
        Ok(SessionRequest { name, class, zone })
    }
}

/// WebSocket upgrade handler - entry point for new connections.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(app): State<Arc<App>>,
) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, params, app))
}

/// Handle an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, params: ConnectParams, app: Arc<App>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Create a bounded channel for sending messages to this client
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(CONNECTION_CHANNEL_BUFFER);

    let admitted = match params.validate() {
        Ok(request) => app
            .rooms
            .connect(request.name, request.class, request.zone, tx.clone())
            .await
            .map_err(|e| ServerMessage::error(e.code(), e.to_string())),
        Err(error) => Err(error),
    };
    let player_id: PlayerId = match admitted {
        Ok(id) => id,
        Err(error) => {
            tracing::info!(error = ?error, "WebSocket session refused");
            if let Ok(json) = serde_json::to_string(&error) {
                let _ = ws_sender.send(Message::Text(json.into())).await;
            }
            let _ = ws_sender.send(Message::Close(None)).await;
            return;
        }
    };

    tracing::info!(player_id = %player_id, "WebSocket connection established");

    // Forward room messages to the socket. A `ZoneTransfer` starts the
    // handoff on its own task, which outlives this one if the socket closes.
    // The destination's `Joined` lands in `rx` behind the transfer itself.
    let rooms = Arc::clone(&app.rooms);
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if let ServerMessage::ZoneTransfer {
                target_zone,
                payload,
            } = &msg
            {
                rooms.begin_transfer(player_id, target_zone.clone(), payload.clone());
            }
            if let Ok(json) = serde_json::to_string(&msg) {
                if ws_sender.send(Message::Text(json.into())).await.is_err() {
                    break;
                }
            }
        }
    });

    // Handle incoming messages
    while let Some(result) = ws_receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(text.as_str()) {
                Ok(msg) => {
                    if let Err(e) = app.rooms.input(player_id, msg).await {
                        tracing::warn!(player_id = %player_id, error = %e, "Failed to route input");
                        let _ = tx.try_send(ServerMessage::error(e.code(), e.to_string()));
                    }
                }
                Err(e) => {
                    tracing::warn!(player_id = %player_id, error = %e, "Failed to parse message");
                    let error = ServerMessage::Error {
                        code: "PARSE_ERROR".to_string(),
                        message: format!("Invalid message format: {}", e),
                    };
                    let _ = tx.try_send(error);
                }
            },
            Ok(Message::Ping(_)) => {
                let _ = tx.try_send(ServerMessage::Pong);
            }
            Ok(Message::Close(_)) => {
                tracing::info!(player_id = %player_id, "WebSocket closed by client");
                break;
            }
            Err(e) => {
                tracing::error!(player_id = %player_id, error = %e, "WebSocket error");
                break;
            }
            _ => {}
        }
    }

    // Clean up
    app.rooms.disconnect(player_id).await;
    send_task.abort();

    tracing::info!(player_id = %player_id, "WebSocket connection terminated");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(name: &str, class: Option<&str>, zone: Option<&str>) -> ConnectParams {
        ConnectParams {
            name: name.into(),
            class: class.map(Into::into),
            zone: zone.map(Into::into),
        }
    }

    #[test]
    fn defaults_to_warrior_in_the_default_zone() {
        let request = params("Aria", None, None).validate().unwrap();
        assert_eq!(request.class, CharacterClass::Warrior);
        assert_eq!(request.zone, None);
    }

    #[test]
    fn class_and_zone_are_case_insensitive() {
        let request = params("Aria", Some("MAGE"), Some(" Wilds ")).validate().unwrap();
        assert_eq!(request.class, CharacterClass::Mage);
        assert_eq!(request.zone, Some(ZoneId::new("wilds")));
    }

    #[test]
    fn invalid_name_or_class_is_refused_with_a_code() {
        let err = params("two words", None, None).validate().unwrap_err();
        assert!(matches!(err, ServerMessage::Error { code, .. } if code == "INVALID_NAME"));

        let err = params("Aria", Some("bard"), None).validate().unwrap_err();
        assert!(matches!(err, ServerMessage::Error { code, .. } if code == "INVALID_CLASS"));
    }
}
