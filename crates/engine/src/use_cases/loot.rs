//! Loot: rolling drops from a kill and collecting them.

use emberfall_domain::{Drop, DropId, EntityTemplate, PlayerId, Player, Vec3};

use crate::infrastructure::content::ContentCatalog;
use crate::infrastructure::ports::RandomPort;

/// Players collect drops within this distance.
pub const LOOT_RADIUS: f32 = 3.0;

/// Rolls gold and the loot table of `template`. Gold rides on the first pile.
pub fn roll_drops(
    template: &EntityTemplate,
    killer: PlayerId,
    position: Vec3,
    now: i64,
    ttl_ms: i64,
    rng: &dyn RandomPort,
) -> Vec<Drop> {
    let pile = |item_id, quantity, gold| Drop {
        id: DropId::new(),
        item_id,
        quantity,
        gold,
        position,
        owner: Some(killer),
        created_at: now,
        ttl_ms,
    };

    let gold = rng.gen_range(template.gold_min, template.gold_max.max(template.gold_min));
    let mut drops: Vec<Drop> = template
        .loot
        .iter()
        .filter(|entry| rng.gen_f32(0.0, 1.0) < entry.chance)
        .map(|entry| pile(Some(entry.item.clone()), entry.quantity, 0))
        .collect();
    match drops.first_mut() {
        Some(first) => first.gold = gold,
        None if gold > 0 => drops.push(pile(None, 0, gold)),
        None => {}
    }
    drops
}

/// What a `loot` command picked up.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LootReport {
    pub gold: u64,
    pub items: Vec<(String, u32)>,
    /// Items left on the ground because the inventory was full.
    pub left_behind: u32,
}

impl LootReport {
    pub fn is_empty(&self) -> bool {
        self.gold == 0 && self.items.is_empty() && self.left_behind == 0
    }
}

/// Collects every drop near the player that they may loot. Gold is always
/// taken; an item that does not fit stays on the ground.
pub fn collect_drops(player: &mut Player, drops: &mut Vec<Drop>, catalog: &ContentCatalog) -> LootReport {
    let mut report = LootReport::default();
    let position = player.position;
    drops.retain_mut(|drop| {
        if !drop.can_be_looted_by(player.id) || drop.position.ground_distance(position) > LOOT_RADIUS {
            return true;
        }
        player.earn_gold(drop.gold);
        report.gold += drop.gold;
        drop.gold = 0;

        let Some(item_id) = drop.item_id.clone() else {
            return false;
        };
        let Some(def) = catalog.item(&item_id) else {
            return false;
        };
        match player.inventory.add(&item_id, drop.quantity, def.max_stack) {
            Ok(()) => {
                report.items.push((def.name.clone(), drop.quantity));
                false
            }
            Err(_) => {
                report.left_behind += drop.quantity;
                true
            }
        }
    });
    report
}

/// Removes drops past their TTL. Returns how many expired.
pub fn expire_drops(drops: &mut Vec<Drop>, now: i64) -> usize {
    let before = drops.len();
    drops.retain(|drop| !drop.is_expired(now));
    before - drops.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedRandom;
    use emberfall_domain::{CharacterClass, ItemId, PlayerName, TemplateId};

    fn looter() -> Player {
        Player::new(
            PlayerId::new(),
            PlayerName::new("Aria").unwrap(),
            CharacterClass::Ranger,
            Vec3::ZERO,
        )
    }

    fn wolf() -> EntityTemplate {
        ContentCatalog::builtin()
            .template(&TemplateId::new("wolf"))
            .cloned()
            .unwrap()
    }

    #[test]
    fn lucky_roll_drops_item_with_gold() {
        let killer = PlayerId::new();
        let drops = roll_drops(&wolf(), killer, Vec3::ZERO, 100, 60_000, &FixedRandom(0.5));
        assert_eq!(drops.len(), 1);
        assert_eq!(drops[0].item_id, Some(ItemId::new("wolf_pelt")));
        assert_eq!(drops[0].gold, 4);
        assert_eq!(drops[0].owner, Some(killer));
    }

    #[test]
    fn unlucky_roll_leaves_gold_only() {
        let drops = roll_drops(&wolf(), PlayerId::new(), Vec3::ZERO, 0, 60_000, &FixedRandom(0.9));
        assert_eq!(drops.len(), 1);
        assert_eq!(drops[0].item_id, None);
        assert!(drops[0].gold >= 2);
    }

    #[test]
    fn collects_only_owned_nearby_drops() {
        let catalog = ContentCatalog::builtin();
        let mut player = looter();
        let mut drops = roll_drops(&wolf(), player.id, Vec3::ground(1.0, 0.0), 0, 60_000, &FixedRandom(0.5));
        drops.extend(roll_drops(&wolf(), PlayerId::new(), Vec3::ZERO, 0, 60_000, &FixedRandom(0.5)));
        drops.extend(roll_drops(&wolf(), player.id, Vec3::ground(9.0, 0.0), 0, 60_000, &FixedRandom(0.5)));

        let report = collect_drops(&mut player, &mut drops, &catalog);
        assert_eq!(report.gold, 4);
        assert_eq!(report.items, vec![("Wolf Pelt".to_string(), 1)]);
        assert_eq!(drops.len(), 2);
        assert_eq!(player.inventory.count(&ItemId::new("wolf_pelt")), 1);
    }

    #[test]
    fn full_inventory_leaves_items_on_the_ground() {
        let catalog = ContentCatalog::builtin();
        let mut player = looter();
        for _ in 0..20 {
            player.inventory.add(&ItemId::new("iron_sword"), 1, 1).unwrap();
        }
        let mut drops = roll_drops(&wolf(), player.id, Vec3::ZERO, 0, 60_000, &FixedRandom(0.5));
        let report = collect_drops(&mut player, &mut drops, &catalog);
        assert_eq!(report.gold, 4);
        assert_eq!(report.left_behind, 1);
        assert_eq!(drops.len(), 1);
        assert_eq!(drops[0].gold, 0);
    }

    #[test]
    fn drops_expire_after_ttl() {
        let mut drops = roll_drops(&wolf(), PlayerId::new(), Vec3::ZERO, 0, 60_000, &FixedRandom(0.5));
        assert_eq!(expire_drops(&mut drops, 59_999), 0);
        assert_eq!(expire_drops(&mut drops, 60_000), 1);
        assert!(drops.is_empty());
    }
}
