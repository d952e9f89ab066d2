//! Loot lying on the ground.

use serde::{Deserialize, Serialize};

use crate::ids::{DropId, ItemId, PlayerId};
use crate::value_objects::Vec3;

/// A pile left behind by a defeated mob.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Drop {
    pub id: DropId,
    /// `None` for a gold-only pile.
    pub item_id: Option<ItemId>,
    pub quantity: u32,
    pub gold: u64,
    pub position: Vec3,
    /// Only the owner may pick it up; `None` means anyone.
    pub owner: Option<PlayerId>,
    pub created_at: i64,
    pub ttl_ms: i64,
}

impl Drop {
    pub fn is_expired(&self, now: i64) -> bool {
        now - self.created_at >= self.ttl_ms
    }

    pub fn can_be_looted_by(&self, player: PlayerId) -> bool {
        self.owner.is_none_or(|owner| owner == player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pile(owner: Option<PlayerId>) -> Drop {
        Drop {
            id: DropId::new(),
            item_id: None,
            quantity: 0,
            gold: 5,
            position: Vec3::ZERO,
            owner,
            created_at: 1_000,
            ttl_ms: 60_000,
        }
    }

    #[test]
    fn expires_after_ttl() {
        let drop = pile(None);
        assert!(!drop.is_expired(60_999));
        assert!(drop.is_expired(61_000));
    }

    #[test]
    fn ownership_restricts_looting() {
        let owner = PlayerId::new();
        let drop = pile(Some(owner));
        assert!(drop.can_be_looted_by(owner));
        assert!(!drop.can_be_looted_by(PlayerId::new()));
        assert!(pile(None).can_be_looted_by(PlayerId::new()));
    }
}
