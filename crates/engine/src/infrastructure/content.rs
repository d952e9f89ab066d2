//! Static content catalog: abilities, items, quests, pets, entity templates
//! and zones.
//!
//! Loaded once at startup, either from the built-in set or a JSON file, then
//! shared read-only (`Arc<ContentCatalog>`) by every room.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use emberfall_domain::{
    Ability, AbilityEffect, AbilityId, AbilityTarget, CharacterClass, Door, DoorId, EntityKind,
    EntityTemplate, ItemDef, ItemId, LootEntry, MobPlacement, PetKind, PetKindId, QuestDef,
    QuestId, QuestObjective, TemplateId, Vec3, Zone, ZoneCategory, ZoneId,
};

/// Errors raised while loading or validating content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Failed to read content file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed content: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid content: {0}")]
    Invalid(String),
}

/// On-disk shape of a content file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentFile {
    #[serde(default)]
    pub abilities: Vec<Ability>,
    #[serde(default)]
    pub items: Vec<ItemDef>,
    #[serde(default)]
    pub quests: Vec<QuestDef>,
    #[serde(default)]
    pub pet_kinds: Vec<PetKind>,
    #[serde(default)]
    pub templates: Vec<EntityTemplate>,
    #[serde(default)]
    pub zones: Vec<Zone>,
}

/// Immutable lookup tables built from a `ContentFile`.
#[derive(Debug, Clone)]
pub struct ContentCatalog {
    abilities: HashMap<AbilityId, Ability>,
    items: HashMap<ItemId, ItemDef>,
    quests: Vec<QuestDef>,
    pet_kinds: HashMap<PetKindId, PetKind>,
    templates: HashMap<TemplateId, EntityTemplate>,
    zones: Vec<Zone>,
}

impl ContentCatalog {
    /// Builds and validates a catalog.
    pub fn from_file(file: ContentFile) -> Result<Self, ContentError> {
        let catalog = Self {
            abilities: file
                .abilities
                .into_iter()
                .map(|a| (AbilityId::new(a.id.as_str().to_ascii_lowercase()), a))
                .collect(),
            items: file.items.into_iter().map(|i| (i.id.clone(), i)).collect(),
            quests: file.quests,
            pet_kinds: file.pet_kinds.into_iter().map(|p| (p.id.clone(), p)).collect(),
            templates: file.templates.into_iter().map(|t| (t.id.clone(), t)).collect(),
            zones: file.zones,
        };
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> Result<Self, ContentError> {
        Self::from_file(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let json = std::fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_str(&json)?;
        tracing::info!(
            path = %path.display(),
            abilities = catalog.abilities.len(),
            zones = catalog.zones.len(),
            "Loaded content file"
        );
        Ok(catalog)
    }

    fn validate(&self) -> Result<(), ContentError> {
        for item in self.items.values() {
            if item.max_stack == 0 {
                return Err(ContentError::Invalid(format!(
                    "item {} has a zero stack size",
                    item.id
                )));
            }
        }
        if self.zones.is_empty() {
            return Err(ContentError::Invalid("content defines no zones".to_string()));
        }
        for zone in &self.zones {
            if zone.spawn_points.is_empty() {
                return Err(ContentError::Invalid(format!(
                    "zone {} has no spawn points",
                    zone.id
                )));
            }
            for door in &zone.doors {
                if door.from != zone.id {
                    return Err(ContentError::Invalid(format!(
                        "door {} is listed in zone {} but leaves from {}",
                        door.id, zone.id, door.from
                    )));
                }
                if let Some(quest) = &door.required_quest {
                    if self.quest(quest).is_none() {
                        return Err(ContentError::Invalid(format!(
                            "door {} is gated on unknown quest {quest}",
                            door.id
                        )));
                    }
                }
            }
            for placement in &zone.mob_spawns {
                if !self.templates.contains_key(&placement.template) {
                    return Err(ContentError::Invalid(format!(
                        "zone {} places unknown template {}",
                        zone.id, placement.template
                    )));
                }
            }
        }
        for template in self.templates.values() {
            if let Some(entry) = template.loot.iter().find(|e| !self.items.contains_key(&e.item)) {
                return Err(ContentError::Invalid(format!(
                    "template {} drops unknown item {}",
                    template.id, entry.item
                )));
            }
        }
        for kind in self.pet_kinds.values() {
            if let Some(ability) = kind.abilities.iter().find(|a| self.ability(a.as_str()).is_none()) {
                return Err(ContentError::Invalid(format!(
                    "pet kind {} uses unknown ability {ability}",
                    kind.id
                )));
            }
        }
        for quest in &self.quests {
            let QuestObjective::Kill { template, .. } = &quest.objective;
            if !self.templates.contains_key(template) {
                return Err(ContentError::Invalid(format!(
                    "quest {} targets unknown template {template}",
                    quest.id
                )));
            }
        }
        Ok(())
    }

    /// Case-insensitive ability lookup.
    pub fn ability(&self, id: &str) -> Option<&Ability> {
        self.abilities.get(&AbilityId::new(id.to_ascii_lowercase()))
    }

    pub fn item(&self, id: &ItemId) -> Option<&ItemDef> {
        self.items.get(id)
    }

    /// Items vendors stock, cheapest first.
    pub fn vendor_stock(&self) -> Vec<&ItemDef> {
        let mut stock: Vec<&ItemDef> = self.items.values().filter(|i| i.sold_by_vendor).collect();
        stock.sort_by(|a, b| a.price.cmp(&b.price).then_with(|| a.id.cmp(&b.id)));
        stock
    }

    pub fn quests(&self) -> &[QuestDef] {
        &self.quests
    }

    pub fn quest(&self, id: &QuestId) -> Option<&QuestDef> {
        self.quests.iter().find(|q| &q.id == id)
    }

    pub fn pet_kind(&self, id: &PetKindId) -> Option<&PetKind> {
        self.pet_kinds.get(id)
    }

    /// Pet kinds sorted by price.
    pub fn pet_kinds(&self) -> Vec<&PetKind> {
        let mut kinds: Vec<&PetKind> = self.pet_kinds.values().collect();
        kinds.sort_by(|a, b| a.price.cmp(&b.price).then_with(|| a.id.cmp(&b.id)));
        kinds
    }

    pub fn template(&self, id: &TemplateId) -> Option<&EntityTemplate> {
        self.templates.get(id)
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    /// The built-in content set: a town hub, a field and a gated dungeon.
    pub fn builtin() -> Self {
        Self {
            abilities: builtin_abilities()
                .into_iter()
                .map(|a| (a.id.clone(), a))
                .collect(),
            items: builtin_items().into_iter().map(|i| (i.id.clone(), i)).collect(),
            quests: builtin_quests(),
            pet_kinds: builtin_pet_kinds()
                .into_iter()
                .map(|p| (p.id.clone(), p))
                .collect(),
            templates: builtin_templates()
                .into_iter()
                .map(|t| (t.id.clone(), t))
                .collect(),
            zones: builtin_zones(),
        }
    }
}

fn ability(
    id: &str,
    name: &str,
    class: Option<CharacterClass>,
    (gcd, cooldown): (f32, f32),
    cost: u32,
    range: f32,
    power: u32,
    target: AbilityTarget,
    effect: Option<AbilityEffect>,
) -> Ability {
    Ability {
        id: AbilityId::new(id),
        name: name.to_string(),
        class,
        gcd,
        cooldown,
        cost,
        range,
        power,
        target,
        effect,
    }
}

fn builtin_abilities() -> Vec<Ability> {
    use AbilityTarget::{Enemy, SelfOnly};
    use CharacterClass::{Mage, Ranger, Warrior};
    vec![
        ability("strike", "Strike", None, (1.0, 0.0), 0, 2.5, 5, Enemy, None),
        ability("rend", "Rend", Some(Warrior), (1.0, 6.0), 10, 2.5, 14, Enemy, None),
        ability(
            "battle_cry",
            "Battle Cry",
            Some(Warrior),
            (1.0, 30.0),
            15,
            0.0,
            0,
            SelfOnly,
            Some(AbilityEffect::Buff {
                name: "battle_cry".to_string(),
                duration_ms: 10_000,
                damage_bonus: 0.2,
            }),
        ),
        ability("aimed_shot", "Aimed Shot", Some(Ranger), (1.0, 4.0), 12, 15.0, 16, Enemy, None),
        ability("fireball", "Fireball", Some(Mage), (1.5, 0.0), 20, 12.0, 22, Enemy, None),
        ability("frost_bolt", "Frost Bolt", Some(Mage), (1.0, 8.0), 15, 10.0, 14, Enemy, None),
        ability("heal", "Heal", None, (1.0, 8.0), 20, 0.0, 20, SelfOnly, Some(AbilityEffect::Heal)),
        ability("bite", "Bite", None, (0.0, 3.0), 0, 3.0, 6, Enemy, None),
        ability("talon", "Talon Rake", None, (0.0, 5.0), 0, 6.0, 9, Enemy, None),
    ]
}

fn item(id: &str, name: &str, price: u64, max_stack: u32, sold_by_vendor: bool) -> ItemDef {
    ItemDef {
        id: ItemId::new(id),
        name: name.to_string(),
        description: None,
        price,
        max_stack,
        sold_by_vendor,
    }
}

fn builtin_items() -> Vec<ItemDef> {
    vec![
        item("health_potion", "Health Potion", 10, 10, true),
        item("mana_potion", "Mana Potion", 12, 10, true),
        item("iron_sword", "Iron Sword", 50, 1, true),
        item("wolf_pelt", "Wolf Pelt", 8, 20, false),
        item("bone_charm", "Bone Charm", 30, 5, false),
    ]
}

fn builtin_quests() -> Vec<QuestDef> {
    vec![
        QuestDef {
            id: QuestId::new("clear_wilds"),
            name: "Clear the Wilds".to_string(),
            description: "Thin out the wolves prowling outside town.".to_string(),
            objective: QuestObjective::Kill {
                template: TemplateId::new("wolf"),
                count: 3,
            },
            reward_gold: 25,
            reward_xp: 80,
            reward_item: None,
        },
        QuestDef {
            id: QuestId::new("crypt_cleansing"),
            name: "Crypt Cleansing".to_string(),
            description: "Put the restless skeletons of the crypt to rest.".to_string(),
            objective: QuestObjective::Kill {
                template: TemplateId::new("skeleton"),
                count: 4,
            },
            reward_gold: 60,
            reward_xp: 150,
            reward_item: Some((ItemId::new("bone_charm"), 1)),
        },
    ]
}

fn builtin_pet_kinds() -> Vec<PetKind> {
    vec![
        PetKind {
            id: PetKindId::new("wolf_pup"),
            name: "Wolf Pup".to_string(),
            price: 40,
            abilities: vec![AbilityId::new("bite")],
        },
        PetKind {
            id: PetKindId::new("hawk"),
            name: "Hawk".to_string(),
            price: 60,
            abilities: vec![AbilityId::new("talon")],
        },
    ]
}

fn builtin_templates() -> Vec<EntityTemplate> {
    vec![
        EntityTemplate {
            id: TemplateId::new("wolf"),
            name: "Wolf".to_string(),
            kind: EntityKind::Mob,
            level: 2,
            max_hp: 40,
            swing_damage: 4,
            xp: 30,
            gold_min: 2,
            gold_max: 6,
            loot: vec![LootEntry {
                item: ItemId::new("wolf_pelt"),
                quantity: 1,
                chance: 0.6,
            }],
            respawn_ms: 15_000,
            leash_distance: 10.0,
        },
        EntityTemplate {
            id: TemplateId::new("skeleton"),
            name: "Skeleton".to_string(),
            kind: EntityKind::Mob,
            level: 4,
            max_hp: 70,
            swing_damage: 7,
            xp: 60,
            gold_min: 5,
            gold_max: 12,
            loot: vec![LootEntry {
                item: ItemId::new("bone_charm"),
                quantity: 1,
                chance: 0.3,
            }],
            respawn_ms: 0,
            leash_distance: 12.0,
        },
        EntityTemplate {
            id: TemplateId::new("elder"),
            name: "Elder".to_string(),
            kind: EntityKind::Npc,
            level: 10,
            max_hp: 200,
            swing_damage: 0,
            xp: 0,
            gold_min: 0,
            gold_max: 0,
            loot: Vec::new(),
            respawn_ms: 0,
            leash_distance: 10.0,
        },
    ]
}

fn door(id: &str, from: &str, to: &str, position: Vec3, required_quest: Option<&str>) -> Door {
    Door {
        id: DoorId::new(id),
        from: ZoneId::new(from),
        to: ZoneId::new(to),
        position,
        required_quest: required_quest.map(QuestId::new),
    }
}

fn placements(template: &str, positions: &[(f32, f32)]) -> Vec<MobPlacement> {
    positions
        .iter()
        .map(|&(x, z)| MobPlacement {
            template: TemplateId::new(template),
            position: Vec3::ground(x, z),
        })
        .collect()
}

fn builtin_zones() -> Vec<Zone> {
    vec![
        Zone {
            id: ZoneId::new("town"),
            name: "Emberfall Town".to_string(),
            category: ZoneCategory::Hub,
            max_players: 50,
            doors: vec![door("town_to_wilds", "town", "wilds", Vec3::ground(0.0, -20.0), None)],
            spawn_points: vec![Vec3::ground(0.0, 0.0), Vec3::ground(2.0, 2.0)],
            mob_spawns: placements("elder", &[(3.0, 3.0)]),
            has_vendor: true,
        },
        Zone {
            id: ZoneId::new("wilds"),
            name: "Ashen Wilds".to_string(),
            category: ZoneCategory::Field,
            max_players: 30,
            doors: vec![
                door("wilds_to_town", "wilds", "town", Vec3::ground(0.0, 20.0), None),
                door(
                    "wilds_to_crypt",
                    "wilds",
                    "crypt",
                    Vec3::ground(0.0, -25.0),
                    Some("clear_wilds"),
                ),
            ],
            spawn_points: vec![Vec3::ground(0.0, 18.0)],
            mob_spawns: placements(
                "wolf",
                &[(5.0, 0.0), (-6.0, -4.0), (8.0, -10.0), (-10.0, -15.0)],
            ),
            has_vendor: false,
        },
        Zone {
            id: ZoneId::new("crypt"),
            name: "Sunken Crypt".to_string(),
            category: ZoneCategory::Dungeon,
            max_players: 5,
            doors: vec![door("crypt_to_wilds", "crypt", "wilds", Vec3::ground(0.0, 12.0), None)],
            spawn_points: vec![Vec3::ground(0.0, 10.0)],
            mob_spawns: placements(
                "skeleton",
                &[(0.0, -5.0), (4.0, -8.0), (-4.0, -8.0), (0.0, -14.0)],
            ),
            has_vendor: false,
        },
    ]
}
