//! Room manager: one running room per zone plus session routing.
//!
//! The manager is the only place where two rooms meet. A zone handoff is a
//! value moving through here: the source room has already dropped the player
//! when `complete_transfer` runs, the destination is asked to admit the
//! payload, and if it refuses the payload goes back to the source.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use dashmap::{DashMap, DashSet};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use emberfall_domain::{CharacterClass, PlayerId, PlayerName, ZoneCategory, ZoneId};
use emberfall_shared::{ClientMessage, ServerMessage, TransferPayload};

use crate::infrastructure::ports::{PlayerStore, RepoError};
use crate::infrastructure::settings::EngineSettings;
use crate::room::{spawn_room, JoinError, JoinRequest, Room, RoomConfig, RoomDeps, RoomHandle};

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Join(#[from] JoinError),

    #[error("Could not load player record: {0}")]
    Store(#[from] RepoError),

    #[error("No active session for player {0}")]
    UnknownSession(PlayerId),
}

impl SessionError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Join(err) => err.code(),
            Self::Store(_) => "STORE_ERROR",
            Self::UnknownSession(_) => "UNKNOWN_SESSION",
        }
    }
}

#[derive(Debug, Clone)]
struct Session {
    name_key: String,
    zone: ZoneId,
    outbound: mpsc::Sender<ServerMessage>,
}

pub struct RoomManager {
    rooms: HashMap<ZoneId, RoomHandle>,
    default_zone: ZoneId,
    sessions: DashMap<PlayerId, Session>,
    /// Lowercased names of everyone connected, across all rooms.
    names: DashSet<String>,
    store: Arc<dyn PlayerStore>,
}

impl RoomManager {
    /// Spawns a room task for every zone in the content. Must be called from
    /// within a tokio runtime.
    pub fn start(deps: RoomDeps, settings: &EngineSettings, store: Arc<dyn PlayerStore>) -> Self {
        let zones = deps.content.zones().to_vec();
        let default_zone = zones
            .iter()
            .find(|z| z.category == ZoneCategory::Hub)
            .or(zones.first())
            .map_or_else(|| ZoneId::new("town"), |z| z.id.clone());

        let rooms = zones
            .into_iter()
            .map(|zone| {
                let id = zone.id.clone();
                let room = Room::new(RoomConfig::from_settings(zone, settings), deps.clone());
                let (handle, _task) = spawn_room(room);
                (id, handle)
            })
            .collect::<HashMap<_, _>>();

        tracing::info!(rooms = rooms.len(), default_zone = %default_zone, "Room manager started");
        Self {
            rooms,
            default_zone,
            sessions: DashMap::new(),
            names: DashSet::new(),
            store,
        }
    }

    pub fn default_zone(&self) -> &ZoneId {
        &self.default_zone
    }

    /// Player count per zone, as of each room's last tick.
    pub fn player_counts(&self) -> BTreeMap<ZoneId, usize> {
        self.rooms
            .iter()
            .map(|(zone, room)| (zone.clone(), room.player_count()))
            .collect()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    /// Zone the player's session currently routes to.
    pub fn session_zone(&self, id: PlayerId) -> Option<ZoneId> {
        self.sessions.get(&id).map(|s| s.zone.clone())
    }

    // =========================================================================
    // Sessions
    // =========================================================================

    /// Admits a new session. A stored record for the name is restored;
    /// otherwise a fresh character of `class` is created.
    pub async fn connect(
        &self,
        name: PlayerName,
        class: CharacterClass,
        zone: Option<ZoneId>,
        outbound: mpsc::Sender<ServerMessage>,
    ) -> Result<PlayerId, SessionError> {
        let name_key = name.as_str().to_ascii_lowercase();
        if !self.names.insert(name_key.clone()) {
            return Err(JoinError::NameTaken(name.to_string()).into());
        }
        let result = self.admit(name, class, zone, &name_key, outbound).await;
        if result.is_err() {
            self.names.remove(&name_key);
        }
        result
    }

    async fn admit(
        &self,
        name: PlayerName,
        class: CharacterClass,
        zone: Option<ZoneId>,
        name_key: &str,
        outbound: mpsc::Sender<ServerMessage>,
    ) -> Result<PlayerId, SessionError> {
        let zone = zone.unwrap_or_else(|| self.default_zone.clone());
        let room = self
            .rooms
            .get(&zone)
            .ok_or_else(|| JoinError::UnknownZone(zone.clone()))?;

        let request = match self.store.load(name.as_str()).await? {
            Some(record) => {
                tracing::debug!(player = %name, level = record.level, "Restoring stored player");
                JoinRequest::Arrive(record)
            }
            None => JoinRequest::Fresh { name, class },
        };
        let id = room.join(request, outbound.clone()).await?;
        self.sessions.insert(
            id,
            Session {
                name_key: name_key.to_string(),
                zone: zone.clone(),
                outbound,
            },
        );
        tracing::info!(player_id = %id, zone = %zone, "Session started");
        Ok(id)
    }

    /// Routes client input to the room the player is in.
    pub async fn input(&self, id: PlayerId, message: ClientMessage) -> Result<(), SessionError> {
        let zone = self
            .session_zone(id)
            .ok_or(SessionError::UnknownSession(id))?;
        let room = self
            .rooms
            .get(&zone)
            .ok_or_else(|| JoinError::UnknownZone(zone.clone()))?;
        if room.input(id, message).await {
            Ok(())
        } else {
            Err(JoinError::RoomClosed.into())
        }
    }

    /// Ends a session and saves the player in the background.
    pub async fn disconnect(&self, id: PlayerId) {
        let Some((_, session)) = self.sessions.remove(&id) else {
            return;
        };
        self.names.remove(&session.name_key);
        let payload = match self.rooms.get(&session.zone) {
            Some(room) => room.leave(id).await,
            None => None,
        };
        tracing::info!(player_id = %id, zone = %session.zone, "Session ended");
        if let Some(payload) = payload {
            self.save_in_background(payload);
        }
    }

    fn save_in_background(&self, payload: TransferPayload) {
        let store = Arc::clone(&self.store);
        tokio::spawn(async move {
            if let Err(e) = store.save(&payload).await {
                tracing::error!(player = %payload.name, error = %e, "Failed to save player");
            }
        });
    }

    // =========================================================================
    // Zone handoff
    // =========================================================================

    /// Runs the second phase of a zone swap on its own task, so it completes
    /// even if the connection that received the `ZoneTransfer` goes away.
    pub fn begin_transfer(
        self: &Arc<Self>,
        id: PlayerId,
        target: ZoneId,
        payload: TransferPayload,
    ) -> JoinHandle<()> {
        let manager = Arc::clone(self);
        tokio::spawn(async move { manager.complete_transfer(id, target, payload).await })
    }

    /// Second phase of a zone swap, run when a session receives its
    /// `ZoneTransfer`. On refusal the player is returned to the source room
    /// and told why.
    pub async fn complete_transfer(&self, id: PlayerId, target: ZoneId, payload: TransferPayload) {
        let Some(session) = self.sessions.get(&id).map(|s| s.value().clone()) else {
            tracing::warn!(player_id = %id, "Transfer for a closed session, saving record");
            self.save_in_background(payload);
            return;
        };
        let source = payload
            .source_zone
            .clone()
            .unwrap_or_else(|| session.zone.clone());

        let refusal = match self.rooms.get(&target) {
            Some(room) => {
                match room
                    .join(JoinRequest::Arrive(payload.clone()), session.outbound.clone())
                    .await
                {
                    Ok(_) => {
                        if self.settle(id, &target).await {
                            tracing::info!(player_id = %id, from = %source, to = %target, "Zone transfer complete");
                        }
                        return;
                    }
                    Err(err) => err,
                }
            }
            None => JoinError::UnknownZone(target.clone()),
        };

        tracing::info!(
            player_id = %id,
            to = %target,
            reason = refusal.code(),
            "Zone transfer refused, returning player"
        );
        let returned = match self.rooms.get(&source) {
            Some(room) => {
                room.join(
                    JoinRequest::Return {
                        payload: payload.clone(),
                        attempted: target,
                    },
                    session.outbound.clone(),
                )
                .await
            }
            None => Err(JoinError::UnknownZone(source.clone())),
        };
        if let Err(err) = returned {
            tracing::error!(player_id = %id, zone = %source, error = %err, "Could not return player");
            self.sessions.remove(&id);
            self.names.remove(&session.name_key);
            self.save_in_background(payload);
            let _ = session
                .outbound
                .try_send(ServerMessage::error(err.code(), err.to_string()));
            return;
        }
        if !self.settle(id, &source).await {
            return;
        }
        // Never wait on the session channel; a slow client may have filled it.
        let _ = session.outbound.try_send(ServerMessage::ZoneSwapFailed {
            reason: refusal.code().to_string(),
        });
    }

    /// Points the session at the room that just admitted the player. If the
    /// session ended while the join was in flight, the player is taken back
    /// out of that room and saved. Returns whether the session is still live.
    async fn settle(&self, id: PlayerId, zone: &ZoneId) -> bool {
        // The entry guard must not be held across the `leave` below.
        let live = match self.sessions.get_mut(&id) {
            Some(mut entry) => {
                entry.zone = zone.clone();
                true
            }
            None => false,
        };
        if live {
            return true;
        }
        tracing::info!(player_id = %id, zone = %zone, "Session ended during transfer, removing player");
        if let Some(room) = self.rooms.get(zone) {
            if let Some(payload) = room.leave(id).await {
                self.save_in_background(payload);
            }
        }
        false
    }

    /// Stops every room.
    pub async fn shutdown(&self) {
        for room in self.rooms.values() {
            room.shutdown().await;
        }
    }
}
