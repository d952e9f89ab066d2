//! Ability resolution and damage application.
//!
//! `try_cast` runs its checks in a fixed order (global cooldown, ability
//! cooldown, resource, range) and returns the first failure without touching
//! the caster.

use emberfall_domain::{Ability, AbilityEffect, Buff, Player, ResourcePool, Vec3};

use crate::infrastructure::ports::RandomPort;

/// Bounds of the uniform damage roll.
pub const DAMAGE_ROLL: (f32, f32) = (0.9, 1.1);

#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum CastRejection {
    #[error("You must wait {remaining_ms} ms before casting again.")]
    GlobalCooldown { remaining_ms: i64 },

    #[error("That ability is on cooldown for {remaining_ms} ms.")]
    Cooldown { remaining_ms: i64 },

    #[error("Not enough mana ({available}/{needed}).")]
    InsufficientResources { needed: u32, available: u32 },

    #[error("Target is out of range ({distance:.1} > {range:.1}).")]
    OutOfRange { distance: f32, range: f32 },
}

/// What a successful cast did.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CastOutcome {
    /// Damage to apply to the target; zero without a target.
    pub damage: u32,
    /// Hp restored to the caster.
    pub healed: u32,
    /// Name of a buff applied to the caster.
    pub buff: Option<String>,
}

/// Result of applying damage to a pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DamageResult {
    pub dealt: u32,
    pub remaining: u32,
    pub killed: bool,
}

/// `floor((power + level) * multiplier * bonus * factor)`.
pub fn roll_damage(power: u32, level: u32, multiplier: f32, bonus: f32, factor: f32) -> u32 {
    let raw = (f64::from(power) + f64::from(level))
        * f64::from(multiplier)
        * f64::from(bonus)
        * f64::from(factor);
    raw.floor().max(0.0) as u32
}

/// Validates and performs a cast at `now`. `target` is the target's position.
pub fn try_cast(
    caster: &mut Player,
    ability: &Ability,
    target: Option<Vec3>,
    now: i64,
    rng: &dyn RandomPort,
) -> Result<CastOutcome, CastRejection> {
    if let Some(last) = caster.last_global_cooldown {
        let elapsed = now - last;
        if elapsed < ability.gcd_ms() {
            return Err(CastRejection::GlobalCooldown {
                remaining_ms: ability.gcd_ms() - elapsed,
            });
        }
    }
    if let Some(&last) = caster.cooldowns.get(&ability.id) {
        let elapsed = now - last;
        if elapsed < ability.cooldown_ms() {
            return Err(CastRejection::Cooldown {
                remaining_ms: ability.cooldown_ms() - elapsed,
            });
        }
    }
    if caster.mp.current() < ability.cost {
        return Err(CastRejection::InsufficientResources {
            needed: ability.cost,
            available: caster.mp.current(),
        });
    }
    if let Some(target) = target {
        let distance = caster.position.ground_distance(target);
        if distance > ability.range {
            return Err(CastRejection::OutOfRange {
                distance,
                range: ability.range,
            });
        }
    }

    caster.last_global_cooldown = Some(now);
    caster.cooldowns.insert(ability.id.clone(), now);
    caster.mp.drain(ability.cost);

    let mut outcome = CastOutcome::default();
    if target.is_some() {
        let factor = rng.gen_f32(DAMAGE_ROLL.0, DAMAGE_ROLL.1);
        outcome.damage = roll_damage(
            ability.power,
            caster.level,
            caster.class.damage_multiplier(),
            caster.damage_bonus(),
            factor,
        );
    }
    match &ability.effect {
        Some(AbilityEffect::Heal) => {
            outcome.healed = caster.hp.restore(ability.power + caster.level);
        }
        Some(AbilityEffect::Buff {
            name,
            duration_ms,
            damage_bonus,
        }) => {
            caster.apply_buff(Buff {
                name: name.clone(),
                damage_bonus: *damage_bonus,
                expires_at: now + duration_ms,
            });
            outcome.buff = Some(name.clone());
        }
        None => {}
    }
    Ok(outcome)
}

/// Removes up to `amount` hp, clamped at zero.
pub fn apply_damage(hp: &mut ResourcePool, amount: u32) -> DamageResult {
    let was_alive = !hp.is_empty();
    let dealt = hp.drain(amount);
    DamageResult {
        dealt,
        remaining: hp.current(),
        killed: was_alive && hp.is_empty(),
    }
}
