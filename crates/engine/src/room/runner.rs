//! Async wrapper around a [`Room`]: one tokio task per room.
//!
//! The task owns the room outright. Commands arrive over an mpsc inbox and
//! are drained at each tick boundary, then the room ticks and its outbox is
//! delivered to the session channels. No locks are involved.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::error::{TryRecvError, TrySendError};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use emberfall_domain::{PlayerId, ZoneId};
use emberfall_shared::{ClientMessage, ServerMessage, TransferPayload};

use super::{JoinError, JoinRequest, Outbound, Recipient, Room};

/// Capacity of a room's inbox.
const INBOX_BUFFER: usize = 1024;

/// Messages accepted by a running room.
#[derive(Debug)]
pub enum RoomCommand {
    Join {
        request: JoinRequest,
        outbound: mpsc::Sender<ServerMessage>,
        reply: oneshot::Sender<Result<PlayerId, JoinError>>,
    },
    Leave {
        player_id: PlayerId,
        reply: Option<oneshot::Sender<Option<TransferPayload>>>,
    },
    Input {
        player_id: PlayerId,
        message: ClientMessage,
    },
    Shutdown,
}

/// Cloneable handle to a running room.
#[derive(Debug, Clone)]
pub struct RoomHandle {
    zone: ZoneId,
    tx: mpsc::Sender<RoomCommand>,
    player_count: Arc<AtomicUsize>,
}

impl RoomHandle {
    pub fn zone(&self) -> &ZoneId {
        &self.zone
    }

    /// Players in the room as of the last tick.
    pub fn player_count(&self) -> usize {
        self.player_count.load(Ordering::Relaxed)
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    /// Admits a player. Messages for them are delivered to `outbound`.
    pub async fn join(
        &self,
        request: JoinRequest,
        outbound: mpsc::Sender<ServerMessage>,
    ) -> Result<PlayerId, JoinError> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(RoomCommand::Join {
                request,
                outbound,
                reply,
            })
            .await
            .map_err(|_| JoinError::RoomClosed)?;
        rx.await.map_err(|_| JoinError::RoomClosed)?
    }

    /// Removes a player, returning their record if they were in the room.
    pub async fn leave(&self, player_id: PlayerId) -> Option<TransferPayload> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(RoomCommand::Leave {
                player_id,
                reply: Some(reply),
            })
            .await
            .ok()?;
        rx.await.ok().flatten()
    }

    /// Queues client input. Returns false if the room has stopped.
    pub async fn input(&self, player_id: PlayerId, message: ClientMessage) -> bool {
        self.tx
            .send(RoomCommand::Input { player_id, message })
            .await
            .is_ok()
    }

    pub async fn shutdown(&self) {
        if self.tx.send(RoomCommand::Shutdown).await.is_err() {
            tracing::debug!(zone = %self.zone, "Room already stopped");
        }
    }
}

/// Starts the room's loop on the tokio runtime.
pub fn spawn_room(room: Room) -> (RoomHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(INBOX_BUFFER);
    let player_count = Arc::new(AtomicUsize::new(room.player_count()));
    let handle = RoomHandle {
        zone: room.zone_id().clone(),
        tx,
        player_count: Arc::clone(&player_count),
    };
    let task = tokio::spawn(run_room(room, rx, player_count));
    (handle, task)
}

async fn run_room(
    mut room: Room,
    mut inbox: mpsc::Receiver<RoomCommand>,
    player_count: Arc<AtomicUsize>,
) {
    let zone = room.zone_id().clone();
    let mut sessions: HashMap<PlayerId, mpsc::Sender<ServerMessage>> = HashMap::new();
    let mut interval = tokio::time::interval(room.config().tick_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    tracing::info!(
        room_id = %room.id(),
        zone = %zone,
        tick_rate = room.config().tick_rate,
        "Room started"
    );

    loop {
        interval.tick().await;

        let mut stop = false;
        loop {
            match inbox.try_recv() {
                Ok(RoomCommand::Shutdown) => {
                    stop = true;
                    break;
                }
                Ok(command) => apply_command(&mut room, &mut sessions, command),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    stop = true;
                    break;
                }
            }
        }
        if stop {
            // Deliver whatever the drained commands produced before stopping.
            deliver(&mut room, &mut sessions);
            break;
        }

        room.tick();
        deliver(&mut room, &mut sessions);
        player_count.store(room.player_count(), Ordering::Relaxed);
    }

    tracing::info!(zone = %zone, ticks = room.tick_count(), "Room stopped");
}

fn apply_command(
    room: &mut Room,
    sessions: &mut HashMap<PlayerId, mpsc::Sender<ServerMessage>>,
    command: RoomCommand,
) {
    match command {
        RoomCommand::Join {
            request,
            outbound,
            reply,
        } => {
            let result = room.join(request);
            if let Ok(id) = &result {
                sessions.insert(*id, outbound);
            }
            // The outbox already holds the welcome messages for this player;
            // send them before anyone else can observe the join result.
            deliver(room, sessions);
            if reply.send(result).is_err() {
                tracing::debug!(zone = %room.zone_id(), "Join requester went away");
            }
        }
        RoomCommand::Leave { player_id, reply } => {
            let payload = room.leave(player_id);
            sessions.remove(&player_id);
            if let Some(reply) = reply {
                let _ = reply.send(payload);
            }
        }
        RoomCommand::Input { player_id, message } => room.handle_input(player_id, message),
        RoomCommand::Shutdown => {}
    }
}

/// Sends every queued message to its session channel.
fn deliver(room: &mut Room, sessions: &mut HashMap<PlayerId, mpsc::Sender<ServerMessage>>) {
    for Outbound { to, message } in room.drain_outbox() {
        match to {
            Recipient::Player(id) => {
                let handed_off = matches!(message, ServerMessage::ZoneTransfer { .. });
                if let Some(session) = sessions.get(&id) {
                    send_to_session(id, session, message);
                }
                if handed_off {
                    sessions.remove(&id);
                }
            }
            Recipient::All => {
                for (id, session) in sessions.iter() {
                    send_to_session(*id, session, message.clone());
                }
            }
        }
    }
}

fn send_to_session(id: PlayerId, session: &mpsc::Sender<ServerMessage>, message: ServerMessage) {
    match session.try_send(message) {
        Ok(()) => {}
        Err(TrySendError::Full(_)) => {
            tracing::warn!(player_id = %id, "Session buffer full, dropping message");
        }
        Err(TrySendError::Closed(_)) => {
            tracing::trace!(player_id = %id, "Session channel closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use emberfall_domain::{CharacterClass, PlayerName};

    use super::*;
    use crate::room::tests::{test_room, town};

    async fn recv_until<F>(rx: &mut mpsc::Receiver<ServerMessage>, mut pred: F) -> ServerMessage
    where
        F: FnMut(&ServerMessage) -> bool,
    {
        tokio::time::timeout(Duration::from_secs(2), async {
            loop {
                let msg = rx.recv().await.expect("session channel closed");
                if pred(&msg) {
                    return msg;
                }
            }
        })
        .await
        .expect("timed out waiting for message")
    }

    fn fresh(name: &str) -> JoinRequest {
        JoinRequest::Fresh {
            name: PlayerName::new(name).unwrap(),
            class: CharacterClass::Warrior,
        }
    }

    #[tokio::test]
    async fn join_delivers_welcome_and_snapshots() {
        let (room, _clock) = test_room(town());
        let (handle, _task) = spawn_room(room);
        let (tx, mut rx) = mpsc::channel(64);

        let id = handle.join(fresh("Aria"), tx).await.unwrap();

        let joined = recv_until(&mut rx, |m| matches!(m, ServerMessage::Joined { .. })).await;
        assert!(matches!(joined, ServerMessage::Joined { player_id, .. } if player_id == id));
        recv_until(&mut rx, |m| matches!(m, ServerMessage::State { .. })).await;
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn input_is_applied_and_answered() {
        let (room, _clock) = test_room(town());
        let (handle, _task) = spawn_room(room);
        let (tx, mut rx) = mpsc::channel(256);
        let id = handle.join(fresh("Aria"), tx).await.unwrap();

        assert!(handle.input(id, ClientMessage::Heartbeat).await);
        recv_until(&mut rx, |m| matches!(m, ServerMessage::Pong)).await;
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn leave_returns_the_record() {
        let (room, _clock) = test_room(town());
        let (handle, _task) = spawn_room(room);
        let (tx, _rx) = mpsc::channel(256);
        let id = handle.join(fresh("Aria"), tx).await.unwrap();

        let payload = handle.leave(id).await.unwrap();
        assert_eq!(payload.player_id, id);
        assert_eq!(payload.source_zone, Some(ZoneId::new("town")));
        assert!(handle.leave(id).await.is_none());
        handle.shutdown().await;
    }

    #[tokio::test]
    async fn shutdown_stops_the_task() {
        let (room, _clock) = test_room(town());
        let (handle, task) = spawn_room(room);
        handle.shutdown().await;
        tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .unwrap()
            .unwrap();
        assert!(handle.is_closed());
        let (tx, _rx) = mpsc::channel(8);
        assert_eq!(
            handle.join(fresh("Late"), tx).await,
            Err(JoinError::RoomClosed)
        );
    }
}
