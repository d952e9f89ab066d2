//! Player construction for fresh characters.
//!
//! Rooms differ only by configuration; how a new character starts out is
//! injected as a factory instead of being baked into a room type.

use std::sync::Arc;

use emberfall_domain::{CharacterClass, Player, PlayerId, PlayerName, Vec3};

use super::config::STARTING_GOLD;

/// Inputs for a brand new character.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlayer {
    pub id: PlayerId,
    pub name: PlayerName,
    pub class: CharacterClass,
    pub position: Vec3,
}

pub type PlayerFactory = Arc<dyn Fn(NewPlayer) -> Player + Send + Sync>;

/// Level 1, class pools, a little starting gold.
pub fn default_player_factory() -> PlayerFactory {
    Arc::new(|new: NewPlayer| {
        Player::new(new.id, new.name, new.class, new.position).with_gold(STARTING_GOLD)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_factory_uses_class_pools() {
        let factory = default_player_factory();
        let player = factory(NewPlayer {
            id: PlayerId::new(),
            name: PlayerName::new("Aria").unwrap(),
            class: CharacterClass::Mage,
            position: Vec3::ground(1.0, 2.0),
        });
        assert_eq!(player.hp.max(), 80);
        assert_eq!(player.mp.max(), 100);
        assert_eq!(player.gold, STARTING_GOLD);
        assert_eq!(player.position, Vec3::ground(1.0, 2.0));
    }
}
