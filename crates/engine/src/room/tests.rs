use std::sync::Arc;

use emberfall_domain::{CharacterClass, EntityId, PlayerId, PlayerName, QuestId, Vec3, Zone, ZoneId};
use emberfall_shared::{ClientMessage, FeedType, ServerMessage};

use super::*;
use crate::infrastructure::clock::{FixedRandom, ManualClock};

const START: i64 = 1_000_000;

pub(crate) fn zone(id: &str) -> Zone {
    ContentCatalog::builtin()
        .zones()
        .iter()
        .find(|z| z.id.as_str() == id)
        .cloned()
        .unwrap()
}

pub(crate) fn town() -> Zone {
    zone("town")
}

pub(crate) fn test_room(zone: Zone) -> (Room, Arc<ManualClock>) {
    let content = Arc::new(ContentCatalog::builtin());
    let zones = Arc::new(ZoneRegistry::new(content.zones().to_vec()));
    let clock = Arc::new(ManualClock::at_millis(START));
    let deps = RoomDeps {
        content,
        zones,
        clock: clock.clone(),
        rng: Arc::new(FixedRandom::midpoint()),
        factory: default_player_factory(),
    };
    (Room::new(RoomConfig::new(zone), deps), clock)
}

fn fresh(name: &str, class: CharacterClass) -> JoinRequest {
    JoinRequest::Fresh {
        name: PlayerName::new(name).unwrap(),
        class,
    }
}

fn join(room: &mut Room, name: &str, class: CharacterClass) -> PlayerId {
    let id = room.join(fresh(name, class)).unwrap();
    room.drain_outbox();
    id
}

fn command(room: &mut Room, id: PlayerId, text: &str) -> Vec<Outbound> {
    room.handle_input(id, ClientMessage::Command { text: text.into() });
    room.drain_outbox()
}

fn feed_texts(outbox: &[Outbound], kind: FeedType) -> Vec<String> {
    outbox
        .iter()
        .filter_map(|o| match &o.message {
            ServerMessage::Feed { entry } if entry.kind == kind => Some(entry.text.clone()),
            _ => None,
        })
        .collect()
}

/// Moves the player next to a living entity called `name` and leaves it at 1 hp.
fn wound(room: &mut Room, id: PlayerId, name: &str) -> EntityId {
    let entity = room.entities().find_by_name(name).unwrap();
    let (entity_id, position) = (entity.id, entity.position);
    room.player_mut(id).unwrap().position = position + Vec3::ground(0.0, 1.0);
    let entity = room.entities_mut().get_mut(entity_id).unwrap();
    let excess = entity.hp.current() - 1;
    entity.hp.drain(excess);
    entity_id
}

fn kill(room: &mut Room, clock: &ManualClock, id: PlayerId, name: &str) -> EntityId {
    let entity_id = wound(room, id, name);
    clock.advance(1_000);
    command(room, id, &format!("attack {name}"));
    assert!(!room.entities().get(entity_id).is_some_and(|e| e.is_alive()));
    entity_id
}

// =============================================================================
// Membership
// =============================================================================

#[test]
fn join_sends_welcome_and_initial_state() {
    let (mut room, _clock) = test_room(town());
    let id = room
        .join(fresh("Aria", CharacterClass::Mage))
        .unwrap();
    let outbox = room.drain_outbox();

    assert!(matches!(
        &outbox[0],
        Outbound { to: Recipient::Player(p), message: ServerMessage::Joined { zone, .. } }
            if *p == id && zone.as_str() == "town"
    ));
    assert!(outbox.iter().any(|o| matches!(o.message, ServerMessage::State { .. })));
    let player = room.player(id).unwrap();
    assert_eq!(player.gold, STARTING_GOLD);
    assert_eq!(player.position, Vec3::ground(2.0, 2.0));
}

#[test]
fn join_rejects_duplicate_names_ignoring_case() {
    let (mut room, _clock) = test_room(town());
    join(&mut room, "Aria", CharacterClass::Mage);
    assert_eq!(
        room.join(fresh("aria", CharacterClass::Warrior)),
        Err(JoinError::NameTaken("aria".into()))
    );
}

#[test]
fn full_zone_refuses_arrivals_but_accepts_returns() {
    let (mut room, _clock) = test_room(zone("crypt"));
    for i in 0..5 {
        join(&mut room, &format!("Delver{i}"), CharacterClass::Warrior);
    }
    assert_eq!(
        room.join(fresh("Late", CharacterClass::Ranger)),
        Err(JoinError::ZoneFull(ZoneId::new("crypt")))
    );

    let (mut wilds, _clock) = test_room(zone("wilds"));
    let late = join(&mut wilds, "Late", CharacterClass::Ranger);
    let payload = wilds.leave(late).unwrap();

    let id = room
        .join(JoinRequest::Return {
            payload,
            attempted: ZoneId::new("wilds"),
        })
        .unwrap();
    assert_eq!(room.player_count(), 6);
    assert_eq!(room.player(id).unwrap().position, Vec3::ground(0.0, 12.0));
}

#[test]
fn leave_returns_payload_and_notifies_others() {
    let (mut room, _clock) = test_room(town());
    let aria = join(&mut room, "Aria", CharacterClass::Mage);
    join(&mut room, "Bram", CharacterClass::Warrior);

    let payload = room.leave(aria).unwrap();
    assert_eq!(payload.name.as_str(), "Aria");
    assert_eq!(payload.source_zone, Some(ZoneId::new("town")));
    let outbox = room.drain_outbox();
    assert!(feed_texts(&outbox, FeedType::Info).contains(&"Aria has left.".to_string()));
    assert!(room.leave(aria).is_none());
}

// =============================================================================
// Commands
// =============================================================================

#[test]
fn parse_errors_become_error_feed_entries() {
    let (mut room, _clock) = test_room(town());
    let id = join(&mut room, "Aria", CharacterClass::Mage);

    let outbox = command(&mut room, id, "dance");
    let errors = feed_texts(&outbox, FeedType::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("Unknown command"));
    assert_eq!(outbox[0].to, Recipient::Player(id));
}

#[test]
fn eleventh_command_in_a_second_is_rate_limited() {
    let (mut room, _clock) = test_room(town());
    let id = join(&mut room, "Aria", CharacterClass::Mage);
    for _ in 0..10 {
        let outbox = command(&mut room, id, "help");
        assert!(feed_texts(&outbox, FeedType::Error).is_empty());
    }
    let outbox = command(&mut room, id, "help");
    assert_eq!(
        feed_texts(&outbox, FeedType::Error),
        vec!["You are sending commands too quickly.".to_string()]
    );
}

#[test]
fn say_is_broadcast_to_the_room() {
    let (mut room, _clock) = test_room(town());
    let id = join(&mut room, "Aria", CharacterClass::Mage);
    let outbox = command(&mut room, id, "say well met");
    assert_eq!(outbox.len(), 1);
    assert_eq!(outbox[0].to, Recipient::All);
    assert_eq!(feed_texts(&outbox, FeedType::Info), vec!["Aria says: well met".to_string()]);
}

#[test]
fn attacking_an_npc_is_refused() {
    let (mut room, _clock) = test_room(town());
    let id = join(&mut room, "Aria", CharacterClass::Warrior);
    let outbox = command(&mut room, id, "attack elder");
    assert_eq!(
        feed_texts(&outbox, FeedType::Error),
        vec!["Elder is not hostile.".to_string()]
    );
}

#[test]
fn out_of_range_cast_is_rejected_without_spending_mana() {
    let (mut room, _clock) = test_room(zone("wilds"));
    let id = join(&mut room, "Aria", CharacterClass::Mage);
    let mana = room.player(id).unwrap().mp.current();

    let outbox = command(&mut room, id, "cast fireball");
    let errors = feed_texts(&outbox, FeedType::Error);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].starts_with("Target is out of range"));
    assert_eq!(room.player(id).unwrap().mp.current(), mana);
}

#[test]
fn class_restricted_ability_is_refused() {
    let (mut room, _clock) = test_room(town());
    let id = join(&mut room, "Bram", CharacterClass::Warrior);
    let outbox = command(&mut room, id, "cast fireball");
    assert_eq!(
        feed_texts(&outbox, FeedType::Error),
        vec!["A warrior cannot use Fireball.".to_string()]
    );
}

#[test]
fn killing_a_field_mob_grants_xp_drops_and_schedules_respawn() {
    let (mut room, clock) = test_room(zone("wilds"));
    let id = join(&mut room, "Bram", CharacterClass::Warrior);

    let wolf = kill(&mut room, &clock, id, "wolf");
    assert_eq!(room.player(id).unwrap().xp, 30);
    assert!(!room.drops().is_empty());
    assert_eq!(room.entities().len(), 4);

    command(&mut room, id, "loot");
    assert!(room.player(id).unwrap().gold > STARTING_GOLD);

    clock.advance(15_000);
    room.tick();
    let respawned = room.entities().get(wolf).unwrap();
    assert!(respawned.is_alive());
    assert!(respawned.hp.is_full());
}

#[test]
fn dungeon_kills_are_permanent() {
    let (mut room, clock) = test_room(zone("crypt"));
    let id = join(&mut room, "Bram", CharacterClass::Mage);
    let before = room.entities().len();

    let skeleton = kill(&mut room, &clock, id, "skeleton");
    assert_eq!(room.entities().len(), before - 1);
    assert!(room.entities().get(skeleton).is_none());
}

#[test]
fn kill_quest_completes_and_opens_the_crypt() {
    let (mut room, clock) = test_room(zone("wilds"));
    let id = join(&mut room, "Bram", CharacterClass::Warrior);

    let outbox = command(&mut room, id, "quest start clear_wilds");
    assert!(feed_texts(&outbox, FeedType::Quest)[0].starts_with("Quest started: Clear the Wilds"));
    for _ in 0..3 {
        kill(&mut room, &clock, id, "wolf");
    }
    let player = room.player(id).unwrap();
    assert!(player.quests.is_completed(&QuestId::new("clear_wilds")));
    assert_eq!(player.gold, STARTING_GOLD + 25);

    room.player_mut(id).unwrap().position = Vec3::ground(0.0, -24.0);
    room.drain_outbox();
    room.handle_input(
        id,
        ClientMessage::ZoneSwap {
            target_zone: ZoneId::new("crypt"),
        },
    );
    let outbox = room.drain_outbox();
    assert!(outbox
        .iter()
        .any(|o| matches!(&o.message, ServerMessage::ZoneTransfer { target_zone, .. } if target_zone.as_str() == "crypt")));
    assert_eq!(room.player_count(), 0);
}

#[test]
fn vendor_trades_only_where_a_vendor_stands() {
    let (mut room, _clock) = test_room(town());
    let id = join(&mut room, "Bram", CharacterClass::Warrior);

    let outbox = command(&mut room, id, "buy health_potion 2");
    assert_eq!(
        feed_texts(&outbox, FeedType::Loot),
        vec!["You buy Health Potion x2 for 20 gold.".to_string()]
    );
    let player = room.player(id).unwrap();
    assert_eq!(player.gold, 0);
    assert_eq!(player.inventory.used_slots(), 1);

    let (mut wilds, _clock) = test_room(zone("wilds"));
    let other = join(&mut wilds, "Cato", CharacterClass::Warrior);
    let outbox = command(&mut wilds, other, "vendor");
    assert_eq!(
        feed_texts(&outbox, FeedType::Error),
        vec!["There is no vendor here.".to_string()]
    );
}

#[test]
fn summoned_pet_strikes_the_nearest_mob() {
    let (mut room, _clock) = test_room(zone("wilds"));
    let id = join(&mut room, "Bram", CharacterClass::Ranger);
    room.player_mut(id).unwrap().gold = 100;

    command(&mut room, id, "pet adopt wolf_pup Rex");
    assert_eq!(room.player(id).unwrap().gold, 60);
    command(&mut room, id, "pet summon 1");

    let wolf = room.entities().find_by_name("wolf").unwrap();
    let (wolf_id, position) = (wolf.id, wolf.position);
    room.player_mut(id).unwrap().position = position + Vec3::ground(1.0, 0.0);
    let outbox = command(&mut room, id, "pet use 1 bite");

    assert_eq!(feed_texts(&outbox, FeedType::Combat).len(), 1);
    let wolf = room.entities().get(wolf_id).unwrap();
    assert!(wolf.hp.current() < wolf.hp.max());
}

// =============================================================================
// Zone swaps
// =============================================================================

#[test]
fn zone_swap_near_a_door_hands_the_player_off() {
    let (mut room, _clock) = test_room(zone("wilds"));
    let id = join(&mut room, "Aria", CharacterClass::Mage);
    room.handle_input(
        id,
        ClientMessage::ZoneSwap {
            target_zone: ZoneId::new("town"),
        },
    );
    let outbox = room.drain_outbox();
    let transfer = outbox
        .iter()
        .find_map(|o| match &o.message {
            ServerMessage::ZoneTransfer { payload, .. } => Some((o.to, payload.clone())),
            _ => None,
        })
        .unwrap();
    assert_eq!(transfer.0, Recipient::Player(id));
    assert_eq!(transfer.1.player_id, id);
    assert_eq!(transfer.1.source_zone, Some(ZoneId::new("wilds")));
    assert!(room.player(id).is_none());
}

#[test]
fn refused_zone_swaps_report_a_reason() {
    let (mut room, _clock) = test_room(zone("wilds"));
    let id = join(&mut room, "Aria", CharacterClass::Mage);
    let reason = |outbox: Vec<Outbound>| {
        outbox.into_iter().find_map(|o| match o.message {
            ServerMessage::ZoneSwapFailed { reason } => Some(reason),
            _ => None,
        })
    };

    let outbox = command(&mut room, id, "travel crypt");
    assert_eq!(reason(outbox).as_deref(), Some("TooFarFromDoor"));

    room.player_mut(id).unwrap().position = Vec3::ground(0.0, -24.0);
    let outbox = command(&mut room, id, "travel crypt");
    assert_eq!(reason(outbox).as_deref(), Some("QuestRequirementNotMet"));
    assert!(room.player(id).is_some());
}

// =============================================================================
// Tick
// =============================================================================

#[test]
fn snapshots_are_broadcast_every_third_tick() {
    let (mut room, _clock) = test_room(town());
    join(&mut room, "Aria", CharacterClass::Mage);
    let mut states = 0;
    for _ in 0..6 {
        room.tick();
        states += room
            .drain_outbox()
            .iter()
            .filter(|o| o.to == Recipient::All && matches!(o.message, ServerMessage::State { .. }))
            .count();
    }
    assert_eq!(states, 2);
    assert_eq!(room.tick_count(), 6);
}

#[test]
fn snapshot_hides_dead_entities() {
    let (mut room, _clock) = test_room(zone("wilds"));
    let first = room.entities().iter().next().unwrap().id;
    room.entities_mut().get_mut(first).unwrap().hp.drain(1_000);
    let snapshot = room.snapshot();
    assert_eq!(snapshot.entities.len(), 3);
    assert!(snapshot.entities.iter().all(|e| e.id != first));
}

#[test]
fn mob_swings_can_defeat_a_player_who_then_revives() {
    let (mut room, _clock) = test_room(zone("wilds"));
    let id = join(&mut room, "Aria", CharacterClass::Mage);
    let wolf = room.entities().find_by_name("wolf").unwrap().position;
    let player = room.player_mut(id).unwrap();
    player.position = wolf + Vec3::ground(0.0, 1.0);
    let excess = player.hp.current() - 3;
    player.hp.drain(excess);

    // Idle -> Alert -> Attack -> swing.
    let mut outbox = Vec::new();
    for _ in 0..3 {
        room.tick();
        outbox.extend(room.drain_outbox());
    }

    let player = room.player(id).unwrap();
    assert!(player.hp.is_full());
    assert_eq!(player.position, Vec3::ground(0.0, 18.0));
    assert!(feed_texts(&outbox, FeedType::Combat)
        .iter()
        .any(|t| t == "Aria was defeated by Wolf."));
}

#[test]
fn mana_regenerates_once_per_interval() {
    let (mut room, clock) = test_room(town());
    let id = join(&mut room, "Aria", CharacterClass::Mage);
    room.player_mut(id).unwrap().mp.drain(50);

    room.tick();
    assert_eq!(room.player(id).unwrap().mp.current(), 50);
    clock.advance(1_000);
    room.tick();
    assert_eq!(room.player(id).unwrap().mp.current(), 52);
    room.tick();
    assert_eq!(room.player(id).unwrap().mp.current(), 52);
}
