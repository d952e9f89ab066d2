//! Pet adoption, summoning and pet abilities.

use emberfall_domain::{DomainError, EntityId, EntityKind, PetKindId, Player};

use crate::entities::EntityRegistry;
use crate::infrastructure::content::ContentCatalog;
use crate::infrastructure::ports::RandomPort;
use crate::use_cases::combat::{roll_damage, DAMAGE_ROLL};

/// A pet ability that landed.
#[derive(Debug, Clone, PartialEq)]
pub struct PetStrike {
    pub pet: String,
    pub ability: String,
    pub target: EntityId,
    pub damage: u32,
}

/// Adopts a pet of `kind`, charging its price. Returns the new pet id.
pub fn adopt_pet(
    player: &mut Player,
    catalog: &ContentCatalog,
    kind: &str,
    name: &str,
) -> Result<u32, DomainError> {
    let kind = catalog
        .pet_kind(&PetKindId::new(kind))
        .ok_or_else(|| DomainError::not_found("Pet kind", kind))?;
    if player.gold < kind.price {
        return Err(DomainError::insufficient_gold(kind.price, player.gold));
    }
    let id = player.pets.adopt(kind.id.clone(), name)?;
    player.spend_gold(kind.price)?;
    Ok(id)
}

/// Orders a summoned pet to use one of its abilities on the nearest living
/// mob within the ability's range of its owner.
pub fn use_pet_ability(
    player: &mut Player,
    pet_id: u32,
    ability: &str,
    catalog: &ContentCatalog,
    entities: &EntityRegistry,
    now: i64,
    rng: &dyn RandomPort,
) -> Result<PetStrike, DomainError> {
    let level = player.level;
    let position = player.position;
    let pet = player
        .pets
        .get_mut(pet_id)
        .ok_or_else(|| DomainError::not_found("Pet", pet_id.to_string()))?;
    if !pet.summoned {
        return Err(DomainError::constraint(format!("{} is not summoned", pet.name)));
    }
    let kind = catalog
        .pet_kind(&pet.kind)
        .ok_or_else(|| DomainError::not_found("Pet kind", pet.kind.as_str()))?;
    let def = kind
        .abilities
        .iter()
        .find(|id| id.as_str().eq_ignore_ascii_case(ability))
        .and_then(|id| catalog.ability(id.as_str()))
        .ok_or_else(|| {
            DomainError::constraint(format!("{} does not know {ability}", pet.name))
        })?;

    if let Some(&last) = pet.cooldowns.get(&def.id) {
        let remaining = def.cooldown_ms() - (now - last);
        if remaining > 0 {
            return Err(DomainError::constraint(format!(
                "{} can use {} again in {remaining} ms",
                pet.name, def.name
            )));
        }
    }

    let target = entities
        .within_radius(position, def.range)
        .filter(|e| e.kind == EntityKind::Mob)
        .min_by(|a, b| {
            a.position
                .ground_distance(position)
                .total_cmp(&b.position.ground_distance(position))
        })
        .ok_or_else(|| DomainError::constraint(format!("No enemy within range of {}", pet.name)))?;

    pet.cooldowns.insert(def.id.clone(), now);
    let factor = rng.gen_f32(DAMAGE_ROLL.0, DAMAGE_ROLL.1);
    Ok(PetStrike {
        pet: pet.name.clone(),
        ability: def.name.clone(),
        target: target.id,
        damage: roll_damage(def.power, level, 1.0, 1.0, factor),
    })
}
