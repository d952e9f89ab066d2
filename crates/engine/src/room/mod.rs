//! Room orchestrator: the authoritative state of one zone.
//!
//! `Room` is a synchronous core. It owns every player and entity in its zone,
//! applies inputs, advances the simulation one fixed tick at a time and
//! queues outgoing messages in an outbox. `runner` wraps it in a tokio task
//! that feeds it from a channel and delivers the outbox to sessions.

mod config;
mod dispatch;
mod factory;
pub mod runner;

pub use config::{RoomConfig, STARTING_GOLD};
pub use factory::{default_player_factory, NewPlayer, PlayerFactory};
pub use runner::{spawn_room, RoomCommand, RoomHandle};

use std::collections::BTreeMap;
use std::sync::Arc;

use emberfall_domain::{
    CharacterClass, DomainError, Drop, EntityId, Player, PlayerId, PlayerName, RoomId, Vec3,
    ZoneCategory, ZoneId,
};
use emberfall_shared::{
    ClientMessage, DropView, EntityView, FeedEntry, PlayerView, RoomSnapshot, ServerMessage,
    TransferPayload,
};

use crate::entities::{EntityRegistry, SpawnSpec, ZoneRegistry};
use crate::infrastructure::content::ContentCatalog;
use crate::infrastructure::ports::{ClockPort, RandomPort};
use crate::use_cases::combat::{apply_damage, DamageResult};
use crate::use_cases::{ai, loot, movement, quests, transfer, CommandParser};

/// Who an outgoing message is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Player(PlayerId),
    All,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Outbound {
    pub to: Recipient,
    pub message: ServerMessage,
}

/// How a player enters a room.
#[derive(Debug, Clone)]
pub enum JoinRequest {
    /// A brand new character built by the room's player factory.
    Fresh {
        name: PlayerName,
        class: CharacterClass,
    },
    /// A stored character or one arriving through a door.
    Arrive(TransferPayload),
    /// A character sent back after its destination refused it. Skips the
    /// capacity check and places the player at the door they tried.
    Return {
        payload: TransferPayload,
        attempted: ZoneId,
    },
}

impl JoinRequest {
    pub fn name(&self) -> &PlayerName {
        match self {
            Self::Fresh { name, .. } => name,
            Self::Arrive(payload) | Self::Return { payload, .. } => &payload.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum JoinError {
    #[error("{0} is full")]
    ZoneFull(ZoneId),

    #[error("A player named {0} is already playing")]
    NameTaken(String),

    #[error("Invalid player record: {0}")]
    InvalidRecord(#[from] DomainError),

    #[error("There is no zone called {0}")]
    UnknownZone(ZoneId),

    #[error("The room is not accepting players")]
    RoomClosed,
}

impl JoinError {
    /// Stable code sent to clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::ZoneFull(_) => "ZoneFull",
            Self::NameTaken(_) => "NameTaken",
            Self::InvalidRecord(_) => "InvalidRecord",
            Self::UnknownZone(_) => "TargetZoneNotFound",
            Self::RoomClosed => "RoomClosed",
        }
    }
}

/// Shared collaborators handed to every room.
#[derive(Clone)]
pub struct RoomDeps {
    pub content: Arc<ContentCatalog>,
    pub zones: Arc<ZoneRegistry>,
    pub clock: Arc<dyn ClockPort>,
    pub rng: Arc<dyn RandomPort>,
    pub factory: PlayerFactory,
}

pub struct Room {
    id: RoomId,
    config: RoomConfig,
    content: Arc<ContentCatalog>,
    zones: Arc<ZoneRegistry>,
    clock: Arc<dyn ClockPort>,
    rng: Arc<dyn RandomPort>,
    factory: PlayerFactory,
    players: BTreeMap<PlayerId, Player>,
    entities: EntityRegistry,
    drops: Vec<Drop>,
    /// Dead entities waiting to come back, with the time they are due.
    respawns: Vec<(EntityId, i64)>,
    parser: CommandParser,
    tick: u64,
    last_tick_at: i64,
    last_regen_at: i64,
    outbox: Vec<Outbound>,
}

impl Room {
    /// Creates the room and places the zone's mobs and NPCs.
    pub fn new(config: RoomConfig, deps: RoomDeps) -> Self {
        let now = deps.clock.now_millis();
        let mut entities = EntityRegistry::new();
        for placement in &config.zone.mob_spawns {
            match deps.content.template(&placement.template) {
                Some(template) => {
                    entities.spawn(SpawnSpec::from_template(template, placement.position), now);
                }
                None => tracing::warn!(
                    zone = %config.zone.id,
                    template = %placement.template,
                    "Skipping placement of unknown template"
                ),
            }
        }
        let id = RoomId::new();
        tracing::info!(
            room_id = %id,
            zone = %config.zone.id,
            entities = entities.len(),
            "Room initialized"
        );
        Self {
            id,
            parser: CommandParser::new(config.rate_limit, config.rate_window_ms),
            config,
            content: deps.content,
            zones: deps.zones,
            clock: deps.clock,
            rng: deps.rng,
            factory: deps.factory,
            players: BTreeMap::new(),
            entities,
            drops: Vec::new(),
            respawns: Vec::new(),
            tick: 0,
            last_tick_at: now,
            last_regen_at: now,
            outbox: Vec::new(),
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub fn zone_id(&self) -> &ZoneId {
        &self.config.zone.id
    }

    pub fn config(&self) -> &RoomConfig {
        &self.config
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    pub fn entities_mut(&mut self) -> &mut EntityRegistry {
        &mut self.entities
    }

    pub fn drops(&self) -> &[Drop] {
        &self.drops
    }

    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Takes every queued outgoing message.
    pub fn drain_outbox(&mut self) -> Vec<Outbound> {
        std::mem::take(&mut self.outbox)
    }

    // =========================================================================
    // Membership
    // =========================================================================

    pub fn join(&mut self, request: JoinRequest) -> Result<PlayerId, JoinError> {
        let zone_id = self.zone_id().clone();
        let returning = matches!(request, JoinRequest::Return { .. });
        if !returning && !self.zones.has_capacity(&zone_id, self.players.len()) {
            return Err(JoinError::ZoneFull(zone_id));
        }
        let name = request.name().as_str().to_string();
        if self.players.values().any(|p| p.name.as_str().eq_ignore_ascii_case(&name)) {
            return Err(JoinError::NameTaken(name));
        }

        let now = self.clock.now_millis();
        let spawn = self.spawn_point();
        let player = match request {
            JoinRequest::Fresh { name, class } => (self.factory)(NewPlayer {
                id: PlayerId::new(),
                name,
                class,
                position: spawn,
            }),
            JoinRequest::Arrive(payload) => transfer::player_from_payload(&payload, spawn)?,
            JoinRequest::Return { payload, attempted } => {
                let position = self
                    .config
                    .zone
                    .doors
                    .iter()
                    .find(|door| door.to == attempted)
                    .map_or(spawn, |door| door.position);
                transfer::player_from_payload(&payload, position)?
            }
        };
        let id = player.id;
        self.players.insert(id, player);

        tracing::info!(
            room_id = %self.id,
            zone = %zone_id,
            player_id = %id,
            player = %name,
            "Player joined room"
        );
        self.send(
            id,
            ServerMessage::Joined {
                player_id: id,
                zone: zone_id,
                zone_name: self.config.zone.name.clone(),
            },
        );
        self.feed_to(
            id,
            FeedEntry::info(
                now,
                format!("Welcome to {}. Type 'help' for commands.", self.config.zone.name),
            ),
        );
        self.feed_all(FeedEntry::info(now, format!("{name} has entered the area.")));
        let snapshot = self.snapshot();
        self.send(id, ServerMessage::State { snapshot });
        Ok(id)
    }

    /// Removes a player and returns their record for saving.
    pub fn leave(&mut self, id: PlayerId) -> Option<TransferPayload> {
        let player = self.players.remove(&id)?;
        self.parser.forget(&id);
        let now = self.clock.now_millis();
        tracing::info!(room_id = %self.id, player_id = %id, "Player left room");
        self.feed_all(FeedEntry::info(now, format!("{} has left.", player.name)));
        Some(transfer::create_transfer_payload(&player, Some(self.zone_id())))
    }

    /// Applies one client message from a player.
    pub fn handle_input(&mut self, id: PlayerId, message: ClientMessage) {
        if !self.players.contains_key(&id) {
            tracing::debug!(room_id = %self.id, player_id = %id, "Input for unknown player");
            return;
        }
        match message {
            ClientMessage::Command { text } => self.handle_command(id, &text),
            ClientMessage::Move { dx, dz } => {
                let max_speed = self.config.movement.max_speed;
                if let Some(player) = self.players.get_mut(&id) {
                    movement::apply_input(player, dx, dz, max_speed);
                }
            }
            ClientMessage::ZoneSwap { target_zone } => self.request_zone_swap(id, target_zone),
            ClientMessage::Heartbeat => self.send(id, ServerMessage::Pong),
        }
    }

    // =========================================================================
    // Simulation
    // =========================================================================

    /// Advances the room by one fixed tick.
    pub fn tick(&mut self) {
        let now = self.clock.now_millis();
        let dt = self.config.tick_delta();

        for player in self.players.values_mut() {
            movement::step_player(player, dt, &self.config.movement);
        }

        let targets: Vec<ai::AiTarget> = self
            .players
            .values()
            .filter(|p| p.is_alive())
            .map(|p| ai::AiTarget {
                id: p.id,
                position: p.position,
            })
            .collect();
        let mut swings = Vec::new();
        for entity in self.entities.iter_mut() {
            let update = ai::update_entity(entity, &targets, now, dt, &self.config.ai);
            if let Some((from, to)) = update.transition {
                tracing::trace!(entity_id = %entity.id, %from, %to, "AI transition");
            }
            if let Some(target) = update.swing_at {
                swings.push((entity.id, target));
            }
        }
        for (entity_id, target) in swings {
            self.resolve_swing(entity_id, target, now);
        }

        self.expire_buffs(now);
        self.regenerate_mana(now);
        let expired = loot::expire_drops(&mut self.drops, now);
        if expired > 0 {
            tracing::trace!(room_id = %self.id, expired, "Drops expired");
        }
        self.process_respawns(now);

        self.tick += 1;
        self.last_tick_at = now;
        if self.tick % u64::from(self.config.snapshot_every.max(1)) == 0 {
            let snapshot = self.snapshot();
            self.broadcast(ServerMessage::State { snapshot });
        }
    }

    pub fn snapshot(&self) -> RoomSnapshot {
        RoomSnapshot {
            zone: self.zone_id().clone(),
            tick: self.tick,
            at: self.last_tick_at,
            players: self
                .players
                .values()
                .map(|p| PlayerView {
                    id: p.id,
                    name: p.name.to_string(),
                    class: p.class,
                    position: p.position,
                    facing: p.facing,
                    animation: p.animation.clone(),
                    hp: p.hp.current(),
                    max_hp: p.hp.max(),
                    mp: p.mp.current(),
                    max_mp: p.mp.max(),
                    level: p.level,
                })
                .collect(),
            entities: self
                .entities
                .iter()
                .filter(|e| e.is_alive())
                .map(|e| EntityView {
                    id: e.id,
                    name: e.name.clone(),
                    kind: e.kind,
                    position: e.position,
                    hp: e.hp.current(),
                    max_hp: e.hp.max(),
                    level: e.level,
                    state: e.ai.state,
                })
                .collect(),
            drops: self
                .drops
                .iter()
                .map(|d| DropView {
                    id: d.id,
                    position: d.position,
                    item_id: d.item_id.clone(),
                    quantity: d.quantity,
                })
                .collect(),
        }
    }

    fn resolve_swing(&mut self, entity_id: EntityId, target: PlayerId, now: i64) {
        let Some(entity) = self.entities.get(entity_id) else {
            return;
        };
        let name = entity.name.clone();
        let damage = self
            .content
            .template(&entity.template)
            .map_or(0, |t| t.swing_damage);
        if damage == 0 {
            return;
        }
        let Some(player) = self.players.get_mut(&target) else {
            return;
        };
        let result = apply_damage(&mut player.hp, damage);
        self.feed_to(
            target,
            FeedEntry::combat(
                now,
                format!("{name} hits you for {} damage ({} hp left).", result.dealt, result.remaining),
            ),
        );
        if result.killed {
            self.on_player_defeated(target, &name, now);
        }
    }

    fn on_player_defeated(&mut self, id: PlayerId, by: &str, now: i64) {
        let spawn = self.spawn_point();
        let Some(player) = self.players.get_mut(&id) else {
            return;
        };
        player.revive_at(spawn);
        let name = player.name.to_string();
        tracing::info!(room_id = %self.id, player_id = %id, "Player defeated");
        self.feed_all(FeedEntry::combat(now, format!("{name} was defeated by {by}.")));
        self.feed_to(id, FeedEntry::info(now, "You awaken at the zone's spawn point."));
    }

    /// Follow-up after a player damaged an entity.
    fn after_entity_hit(&mut self, attacker: PlayerId, entity_id: EntityId, result: DamageResult, now: i64) {
        if result.killed {
            self.on_entity_killed(attacker, entity_id, now);
        }
    }

    fn on_entity_killed(&mut self, killer: PlayerId, entity_id: EntityId, now: i64) {
        let Some(entity) = self.entities.get(entity_id) else {
            return;
        };
        let name = entity.name.clone();
        let position = entity.position;
        let Some(template) = self.content.template(&entity.template).cloned() else {
            self.entities.remove(entity_id);
            return;
        };
        let killer_name = self
            .players
            .get(&killer)
            .map_or_else(|| "someone".to_string(), |p| p.name.to_string());
        self.feed_all(FeedEntry::combat(now, format!("{name} has been slain by {killer_name}.")));

        let mut entries = Vec::new();
        if let Some(player) = self.players.get_mut(&killer) {
            if template.xp > 0 {
                let levels = player.grant_xp(template.xp);
                entries.push(FeedEntry::info(now, format!("You gain {} xp.", template.xp)));
                if levels > 0 {
                    entries.push(FeedEntry::info(
                        now,
                        format!("You reached level {}!", player.level),
                    ));
                }
            }
            for event in quests::record_kill(player, &self.content, &template.id) {
                entries.push(FeedEntry::quest(now, describe_quest_event(&event)));
            }
        }
        for entry in entries {
            self.feed_to(killer, entry);
        }

        let drops = loot::roll_drops(
            &template,
            killer,
            position,
            now,
            self.config.drop_ttl_ms,
            self.rng.as_ref(),
        );
        if !drops.is_empty() {
            self.feed_to(
                killer,
                FeedEntry::loot(now, format!("{name} dropped loot. Type 'loot' to collect it.")),
            );
            self.drops.extend(drops);
        }

        if self.config.zone.category == ZoneCategory::Dungeon || template.respawn_ms <= 0 {
            self.entities.remove(entity_id);
        } else {
            self.respawns.push((entity_id, now + template.respawn_ms));
        }
    }

    fn expire_buffs(&mut self, now: i64) {
        let mut faded = Vec::new();
        for player in self.players.values_mut() {
            for buff in player.expire_buffs(now) {
                faded.push((player.id, buff.name));
            }
        }
        for (id, name) in faded {
            self.feed_to(id, FeedEntry::info(now, format!("{name} fades.")));
        }
    }

    fn regenerate_mana(&mut self, now: i64) {
        if now - self.last_regen_at < self.config.mana_regen_interval_ms {
            return;
        }
        self.last_regen_at = now;
        for player in self.players.values_mut().filter(|p| p.is_alive()) {
            player.mp.restore(self.config.mana_regen);
        }
    }

    fn process_respawns(&mut self, now: i64) {
        let entities = &mut self.entities;
        self.respawns.retain(|&(id, due)| {
            if due > now {
                return true;
            }
            if entities.respawn(id, now) {
                tracing::trace!(entity_id = %id, "Entity respawned");
            }
            false
        });
    }

    // =========================================================================
    // Zone transfer
    // =========================================================================

    /// Validates a door transfer and, on success, hands the player out of the
    /// room as a `ZoneTransfer` message carrying their payload.
    fn request_zone_swap(&mut self, id: PlayerId, target: ZoneId) {
        let now = self.clock.now_millis();
        let Some(player) = self.players.get(&id) else {
            return;
        };
        let validated = transfer::validate_transfer_request(
            &self.zones,
            self.zone_id(),
            &target,
            player.position,
            self.config.max_door_distance,
            player.quests.completed(),
        );
        if let Err(err) = validated {
            tracing::debug!(player_id = %id, target = %target, reason = err.reason(), "Zone swap refused");
            self.send(
                id,
                ServerMessage::ZoneSwapFailed {
                    reason: err.reason().to_string(),
                },
            );
            self.feed_to(id, FeedEntry::error(now, err.to_string()));
            return;
        }

        let Some(player) = self.players.remove(&id) else {
            return;
        };
        self.parser.forget(&id);
        let payload = transfer::create_transfer_payload(&player, Some(self.zone_id()));
        let destination = self
            .zones
            .get(&target)
            .map_or_else(|| target.to_string(), |z| z.name.clone());
        tracing::info!(player_id = %id, from = %self.zone_id(), to = %target, "Player leaving through door");
        self.send(
            id,
            ServerMessage::ZoneTransfer {
                target_zone: target,
                payload,
            },
        );
        self.feed_all(FeedEntry::info(
            now,
            format!("{} leaves for {destination}.", player.name),
        ));
    }

    // =========================================================================
    // Outbox helpers
    // =========================================================================

    fn spawn_point(&self) -> Vec3 {
        self.zones
            .random_spawn_point(self.zone_id(), self.rng.as_ref())
            .or_else(|| self.config.zone.spawn_points.first().copied())
            .unwrap_or(Vec3::ZERO)
    }

    fn send(&mut self, to: PlayerId, message: ServerMessage) {
        self.outbox.push(Outbound {
            to: Recipient::Player(to),
            message,
        });
    }

    fn broadcast(&mut self, message: ServerMessage) {
        self.outbox.push(Outbound {
            to: Recipient::All,
            message,
        });
    }

    fn feed_to(&mut self, to: PlayerId, entry: FeedEntry) {
        let entry = entry.in_zone(self.zone_id().as_str());
        self.send(to, ServerMessage::feed(entry));
    }

    fn feed_all(&mut self, entry: FeedEntry) {
        let entry = entry.in_zone(self.zone_id().as_str());
        self.broadcast(ServerMessage::feed(entry));
    }
}

fn describe_quest_event(event: &quests::QuestEvent) -> String {
    match event {
        quests::QuestEvent::Progress {
            quest,
            progress,
            required,
        } => format!("{quest}: {progress}/{required}"),
        quests::QuestEvent::Completed {
            quest,
            gold,
            xp,
            levels_gained,
            item,
        } => {
            let mut text = format!("Quest complete: {quest}! Rewards: {gold} gold, {xp} xp");
            if let Some(item) = item {
                text.push_str(&format!(", {item}"));
            }
            if *levels_gained > 0 {
                text.push_str(". You feel stronger");
            }
            text.push('.');
            text
        }
    }
}

#[cfg(test)]
mod tests;
