//! Command handlers. Each handler turns one parsed command into state changes
//! and feed entries.

use emberfall_domain::{AbilityTarget, Direction, EntityKind, PlayerId, ZoneId};
use emberfall_shared::FeedEntry;

use super::Room;
use crate::use_cases::commands::HELP_LINES;
use crate::use_cases::{
    combat, loot, movement, pets, quests, vendor, Command, PetAction, QuestAction,
};

/// Ability used by the plain `attack` command.
const MELEE_ABILITY: &str = "strike";

impl Room {
    pub(super) fn handle_command(&mut self, id: PlayerId, text: &str) {
        let now = self.clock.now_millis();
        let command = match self.parser.parse(id, text, now) {
            Ok(command) => command,
            Err(err) => {
                tracing::debug!(player_id = %id, error = %err, "Command rejected");
                self.feed_to(id, FeedEntry::error(now, err.to_string()));
                return;
            }
        };
        tracing::trace!(player_id = %id, ?command, "Command accepted");

        match command {
            Command::Go(direction) => self.handle_go(id, direction, now),
            Command::Attack { target } => self.handle_cast(id, MELEE_ABILITY, Some(target), now),
            Command::Cast { ability, target } => self.handle_cast(id, &ability, target, now),
            Command::Say { message } => self.handle_say(id, &message, now),
            Command::Look => self.handle_look(id, now),
            Command::Loot => self.handle_loot(id, now),
            Command::Help => self.handle_help(id, now),
            Command::Inventory => self.handle_inventory(id, now),
            Command::Vendor => self.handle_vendor(id, now),
            Command::Buy { item, quantity } => self.handle_buy(id, &item, quantity, now),
            Command::Sell { slot, quantity } => self.handle_sell(id, slot, quantity, now),
            Command::Travel { zone } => self.request_zone_swap(id, ZoneId::new(zone)),
            Command::Quest(action) => self.handle_quest(id, action, now),
            Command::Pet(action) => self.handle_pet(id, action, now),
        }
    }

    fn handle_go(&mut self, id: PlayerId, direction: Direction, now: i64) {
        let max_speed = self.config.movement.max_speed;
        if let Some(player) = self.players.get_mut(&id) {
            movement::apply_direction(player, direction, max_speed);
        }
        self.feed_to(id, FeedEntry::info(now, format!("You head {direction}.")));
    }

    fn handle_cast(&mut self, id: PlayerId, ability_id: &str, target_name: Option<String>, now: i64) {
        let Some(ability) = self.content.ability(ability_id).cloned() else {
            self.feed_to(id, FeedEntry::error(now, format!("Unknown ability '{ability_id}'.")));
            return;
        };
        let Some(player) = self.players.get(&id) else {
            return;
        };
        if !ability.usable_by(player.class) {
            let class = player.class;
            self.feed_to(
                id,
                FeedEntry::error(now, format!("A {class} cannot use {}.", ability.name)),
            );
            return;
        }

        let target = match ability.target {
            AbilityTarget::SelfOnly => None,
            AbilityTarget::Enemy => {
                let found = match &target_name {
                    Some(name) => self.entities.find_by_name(name),
                    None => self
                        .entities
                        .by_kind(EntityKind::Mob)
                        .filter(|e| e.is_alive())
                        .min_by(|a, b| {
                            a.position
                                .ground_distance(player.position)
                                .total_cmp(&b.position.ground_distance(player.position))
                        }),
                };
                let Some(entity) = found else {
                    let text = match target_name {
                        Some(name) => format!("There is no '{name}' here."),
                        None => "You have no target.".to_string(),
                    };
                    self.feed_to(id, FeedEntry::error(now, text));
                    return;
                };
                if entity.kind == EntityKind::Npc {
                    let text = format!("{} is not hostile.", entity.name);
                    self.feed_to(id, FeedEntry::error(now, text));
                    return;
                }
                if !entity.is_alive() {
                    let text = format!("{} is already dead.", entity.name);
                    self.feed_to(id, FeedEntry::error(now, text));
                    return;
                }
                Some((entity.id, entity.name.clone(), entity.position))
            }
        };

        let Some(player) = self.players.get_mut(&id) else {
            return;
        };
        let outcome = match combat::try_cast(
            player,
            &ability,
            target.as_ref().map(|(_, _, position)| *position),
            now,
            self.rng.as_ref(),
        ) {
            Ok(outcome) => outcome,
            Err(rejection) => {
                self.feed_to(id, FeedEntry::error(now, rejection.to_string()));
                return;
            }
        };
        let caster = player.name.to_string();

        if outcome.healed > 0 {
            self.feed_to(
                id,
                FeedEntry::combat(now, format!("{} restores {} hp.", ability.name, outcome.healed)),
            );
        }
        if let Some(buff) = &outcome.buff {
            self.feed_all(FeedEntry::combat(now, format!("{caster} is empowered by {buff}.")));
        }
        let Some((entity_id, entity_name, _)) = target else {
            if outcome.healed == 0 && outcome.buff.is_none() {
                self.feed_to(id, FeedEntry::combat(now, format!("You use {}.", ability.name)));
            }
            return;
        };
        let Some(entity) = self.entities.get_mut(entity_id) else {
            return;
        };
        let result = combat::apply_damage(&mut entity.hp, outcome.damage);
        self.feed_all(FeedEntry::combat(
            now,
            format!(
                "{caster}'s {} hits {entity_name} for {} damage.",
                ability.name, result.dealt
            ),
        ));
        self.after_entity_hit(id, entity_id, result, now);
    }

    fn handle_say(&mut self, id: PlayerId, message: &str, now: i64) {
        let Some(player) = self.players.get(&id) else {
            return;
        };
        let text = format!("{} says: {message}", player.name);
        self.feed_all(FeedEntry::info(now, text));
    }

    fn handle_look(&mut self, id: PlayerId, now: i64) {
        let Some(player) = self.players.get(&id) else {
            return;
        };
        let zone = &self.config.zone;
        let mut lines = vec![format!(
            "{} ({:?}). You are at ({:.1}, {:.1}).",
            zone.name, zone.category, player.position.x, player.position.z
        )];
        let others: Vec<String> = self
            .players
            .values()
            .filter(|p| p.id != id)
            .map(|p| format!("{} (level {} {})", p.name, p.level, p.class))
            .collect();
        if !others.is_empty() {
            lines.push(format!("Players here: {}.", others.join(", ")));
        }
        for entity in self.entities.iter().filter(|e| e.is_alive()) {
            lines.push(format!(
                "{} (level {}, {}/{} hp, {}) {:.1}m away",
                entity.name,
                entity.level,
                entity.hp.current(),
                entity.hp.max(),
                entity.ai.state,
                entity.position.ground_distance(player.position)
            ));
        }
        for door in &zone.doors {
            lines.push(format!(
                "A door to {} lies {:.1}m away.",
                door.to,
                door.position.ground_distance(player.position)
            ));
        }
        let nearby_drops = self
            .drops
            .iter()
            .filter(|d| d.can_be_looted_by(id))
            .filter(|d| d.position.ground_distance(player.position) <= loot::LOOT_RADIUS)
            .count();
        if nearby_drops > 0 {
            lines.push(format!("{nearby_drops} pile(s) of loot lie at your feet."));
        }
        if zone.has_vendor {
            lines.push("A vendor is here. Type 'vendor' to browse.".to_string());
        }
        self.feed_lines(id, now, lines);
    }

    fn handle_loot(&mut self, id: PlayerId, now: i64) {
        let Some(player) = self.players.get_mut(&id) else {
            return;
        };
        let report = loot::collect_drops(player, &mut self.drops, &self.content);
        if report.is_empty() {
            self.feed_to(id, FeedEntry::info(now, "There is nothing here to loot."));
            return;
        }
        if report.gold > 0 {
            self.feed_to(id, FeedEntry::loot(now, format!("You pick up {} gold.", report.gold)));
        }
        for (item, quantity) in report.items {
            self.feed_to(id, FeedEntry::loot(now, format!("You pick up {item} x{quantity}.")));
        }
        if report.left_behind > 0 {
            self.feed_to(
                id,
                FeedEntry::error(now, "Your inventory is full; some items were left behind."),
            );
        }
    }

    fn handle_help(&mut self, id: PlayerId, now: i64) {
        let lines = HELP_LINES.iter().map(|line| line.to_string()).collect();
        self.feed_lines(id, now, lines);
    }

    fn handle_inventory(&mut self, id: PlayerId, now: i64) {
        let Some(player) = self.players.get(&id) else {
            return;
        };
        let inventory = &player.inventory;
        let mut lines = vec![format!(
            "Gold: {}. Slots: {}/{}.",
            player.gold,
            inventory.used_slots(),
            inventory.capacity()
        )];
        for (index, slot) in inventory.slots().iter().enumerate() {
            let name = self
                .content
                .item(&slot.item_id)
                .map_or(slot.item_id.as_str(), |def| def.name.as_str());
            lines.push(format!("{}. {name} x{}", index + 1, slot.quantity));
        }
        self.feed_lines(id, now, lines);
    }

    fn require_vendor(&mut self, id: PlayerId, now: i64) -> bool {
        if self.config.zone.has_vendor {
            return true;
        }
        self.feed_to(id, FeedEntry::error(now, "There is no vendor here."));
        false
    }

    fn handle_vendor(&mut self, id: PlayerId, now: i64) {
        if !self.require_vendor(id, now) {
            return;
        }
        let mut lines = vec!["The vendor offers:".to_string()];
        lines.extend(
            self.content
                .vendor_stock()
                .iter()
                .map(|item| format!("{} - {}: {} gold", item.id, item.name, item.price)),
        );
        self.feed_lines(id, now, lines);
    }

    fn handle_buy(&mut self, id: PlayerId, item: &str, quantity: u32, now: i64) {
        if !self.require_vendor(id, now) {
            return;
        }
        let Some(player) = self.players.get_mut(&id) else {
            return;
        };
        let entry = match vendor::buy(player, &self.content, item, quantity) {
            Ok(trade) => FeedEntry::loot(
                now,
                format!("You buy {} x{} for {} gold.", trade.item, trade.quantity, trade.gold),
            ),
            Err(err) => FeedEntry::error(now, err.to_string()),
        };
        self.feed_to(id, entry);
    }

    fn handle_sell(&mut self, id: PlayerId, slot: usize, quantity: u32, now: i64) {
        if !self.require_vendor(id, now) {
            return;
        }
        let Some(player) = self.players.get_mut(&id) else {
            return;
        };
        let entry = match vendor::sell(player, &self.content, slot, quantity) {
            Ok(trade) => FeedEntry::loot(
                now,
                format!("You sell {} x{} for {} gold.", trade.item, trade.quantity, trade.gold),
            ),
            Err(err) => FeedEntry::error(now, err.to_string()),
        };
        self.feed_to(id, entry);
    }

    fn handle_quest(&mut self, id: PlayerId, action: QuestAction, now: i64) {
        let Some(player) = self.players.get_mut(&id) else {
            return;
        };
        let lines: Result<Vec<String>, _> = match action {
            QuestAction::List => Ok(self
                .content
                .quests()
                .iter()
                .map(|quest| {
                    let status = if player.quests.is_completed(&quest.id) {
                        " [completed]"
                    } else if player.quests.is_active(&quest.id) {
                        " [active]"
                    } else {
                        ""
                    };
                    format!("{} - {}: {}{status}", quest.id, quest.name, quest.description)
                })
                .collect()),
            QuestAction::Start(quest) => quests::start_quest(player, &self.content, &quest)
                .map(|def| vec![format!("Quest started: {}. {}", def.name, def.description)]),
            QuestAction::Abandon(quest) => quests::abandon_quest(player, &self.content, &quest)
                .map(|def| vec![format!("Quest abandoned: {}.", def.name)]),
            QuestAction::Status => {
                let mut lines: Vec<String> = player
                    .quests
                    .active()
                    .map(|(quest_id, progress)| {
                        let (name, required) = self
                            .content
                            .quest(quest_id)
                            .map_or((quest_id.as_str(), 0), |q| {
                                (q.name.as_str(), q.objective.required())
                            });
                        format!("{name}: {progress}/{required}")
                    })
                    .collect();
                if lines.is_empty() {
                    lines.push("You have no active quests.".to_string());
                }
                let completed = player.quests.completed();
                if !completed.is_empty() {
                    let names: Vec<&str> = completed.iter().map(|q| q.as_str()).collect();
                    lines.push(format!("Completed: {}.", names.join(", ")));
                }
                Ok(lines)
            }
        };
        match lines {
            Ok(lines) => {
                for line in lines {
                    self.feed_to(id, FeedEntry::quest(now, line));
                }
            }
            Err(err) => self.feed_to(id, FeedEntry::error(now, err.to_string())),
        }
    }

    fn handle_pet(&mut self, id: PlayerId, action: PetAction, now: i64) {
        let Some(player) = self.players.get_mut(&id) else {
            return;
        };
        let result: Result<Vec<String>, _> = match action {
            PetAction::List => Ok(self
                .content
                .pet_kinds()
                .iter()
                .map(|kind| format!("{} - {}: {} gold", kind.id, kind.name, kind.price))
                .collect()),
            PetAction::Adopt { kind, name } => pets::adopt_pet(player, &self.content, &kind, &name)
                .map(|pet_id| vec![format!("You adopt {name} (pet #{pet_id}).")]),
            PetAction::Summon(pet_id) => player
                .pets
                .summon(pet_id)
                .map(|pet| vec![format!("{} answers your call.", pet.name)]),
            PetAction::Dismiss(pet_id) => player
                .pets
                .dismiss(pet_id)
                .map(|pet| vec![format!("{} returns home.", pet.name)]),
            PetAction::Status => {
                let mut lines: Vec<String> = player
                    .pets
                    .pets()
                    .iter()
                    .map(|pet| {
                        let state = if pet.summoned { "summoned" } else { "resting" };
                        format!("#{} {} the {} ({state})", pet.id, pet.name, pet.kind)
                    })
                    .collect();
                if lines.is_empty() {
                    lines.push("You have no pets.".to_string());
                }
                Ok(lines)
            }
            PetAction::Use { pet, ability } => {
                let strike = match pets::use_pet_ability(
                    player,
                    pet,
                    &ability,
                    &self.content,
                    &self.entities,
                    now,
                    self.rng.as_ref(),
                ) {
                    Ok(strike) => strike,
                    Err(err) => {
                        self.feed_to(id, FeedEntry::error(now, err.to_string()));
                        return;
                    }
                };
                self.resolve_pet_strike(id, strike, now);
                return;
            }
        };
        match result {
            Ok(lines) => self.feed_lines(id, now, lines),
            Err(err) => self.feed_to(id, FeedEntry::error(now, err.to_string())),
        }
    }

    fn resolve_pet_strike(&mut self, owner: PlayerId, strike: pets::PetStrike, now: i64) {
        let Some(entity) = self.entities.get_mut(strike.target) else {
            return;
        };
        let result = combat::apply_damage(&mut entity.hp, strike.damage);
        let text = format!(
            "{}'s {} hits {} for {} damage.",
            strike.pet, strike.ability, entity.name, result.dealt
        );
        self.feed_all(FeedEntry::combat(now, text));
        self.after_entity_hit(owner, strike.target, result, now);
    }

    fn feed_lines(&mut self, id: PlayerId, now: i64, lines: Vec<String>) {
        for line in lines {
            self.feed_to(id, FeedEntry::info(now, line));
        }
    }
}
