//! Zone registry: zone lookup, door resolution and spawn placement.

use std::collections::{BTreeSet, HashMap};

use emberfall_domain::{Door, QuestId, Vec3, Zone, ZoneId};

use crate::infrastructure::ports::RandomPort;

/// Why a door refused passage.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DoorAccessError {
    #[error("You are too far from the door ({distance:.1} > {max:.1})")]
    TooFar { distance: f32, max: f32 },

    #[error("The way is sealed until you complete {quest}")]
    QuestRequired { quest: QuestId },
}

#[derive(Debug, Clone, Default)]
pub struct ZoneRegistry {
    zones: HashMap<ZoneId, Zone>,
}

impl ZoneRegistry {
    pub fn new(zones: impl IntoIterator<Item = Zone>) -> Self {
        Self {
            zones: zones.into_iter().map(|z| (z.id.clone(), z)).collect(),
        }
    }

    pub fn get(&self, id: &ZoneId) -> Option<&Zone> {
        self.zones.get(id)
    }

    pub fn contains(&self, id: &ZoneId) -> bool {
        self.zones.contains_key(id)
    }

    /// Zone ids in a stable order.
    pub fn ids(&self) -> Vec<ZoneId> {
        let mut ids: Vec<ZoneId> = self.zones.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// The closest door of `zone` within `max_distance` of `point`, optionally
    /// restricted to doors leading to `destination`.
    pub fn nearest_door(
        &self,
        zone: &ZoneId,
        point: Vec3,
        max_distance: f32,
        destination: Option<&ZoneId>,
    ) -> Option<&Door> {
        self.zones
            .get(zone)?
            .doors
            .iter()
            .filter(|door| destination.is_none_or(|to| &door.to == to))
            .map(|door| (door, door.position.ground_distance(point)))
            .filter(|(_, distance)| *distance <= max_distance)
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(door, _)| door)
    }

    /// Checks distance and the optional quest gate.
    pub fn validate_door_access(
        &self,
        door: &Door,
        point: Vec3,
        max_distance: f32,
        completed_quests: &BTreeSet<QuestId>,
    ) -> Result<(), DoorAccessError> {
        let distance = door.position.ground_distance(point);
        if distance > max_distance {
            return Err(DoorAccessError::TooFar {
                distance,
                max: max_distance,
            });
        }
        if let Some(quest) = &door.required_quest {
            if !completed_quests.contains(quest) {
                return Err(DoorAccessError::QuestRequired {
                    quest: quest.clone(),
                });
            }
        }
        Ok(())
    }

    /// A uniformly chosen spawn point, or `None` for an unknown zone.
    pub fn random_spawn_point(&self, zone: &ZoneId, rng: &dyn RandomPort) -> Option<Vec3> {
        let points = &self.zones.get(zone)?.spawn_points;
        if points.is_empty() {
            return None;
        }
        points.get(rng.gen_index(points.len())).copied()
    }

    /// `current < max_players`. Unknown zones have no capacity.
    pub fn has_capacity(&self, zone: &ZoneId, current: usize) -> bool {
        self.zones
            .get(zone)
            .is_some_and(|z| current < z.max_players)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::clock::FixedRandom;
    use crate::infrastructure::content::ContentCatalog;

    fn registry() -> ZoneRegistry {
        ZoneRegistry::new(ContentCatalog::builtin().zones().to_vec())
    }

    #[test]
    fn nearest_door_respects_distance_and_destination() {
        let zones = registry();
        let wilds = ZoneId::new("wilds");

        let door = zones
            .nearest_door(&wilds, Vec3::ground(0.0, 19.0), 3.0, None)
            .unwrap();
        assert_eq!(door.to, ZoneId::new("town"));

        assert!(zones
            .nearest_door(&wilds, Vec3::ground(0.0, 19.0), 3.0, Some(&ZoneId::new("crypt")))
            .is_none());
        assert!(zones.nearest_door(&wilds, Vec3::ZERO, 3.0, None).is_none());
    }

    #[test]
    fn quest_gate_blocks_until_completed() {
        let zones = registry();
        let wilds = ZoneId::new("wilds");
        let at_gate = Vec3::ground(0.0, -24.0);
        let door = zones
            .nearest_door(&wilds, at_gate, 3.0, Some(&ZoneId::new("crypt")))
            .unwrap()
            .clone();

        let mut completed = BTreeSet::new();
        assert_eq!(
            zones.validate_door_access(&door, at_gate, 3.0, &completed),
            Err(DoorAccessError::QuestRequired {
                quest: QuestId::new("clear_wilds")
            })
        );
        completed.insert(QuestId::new("clear_wilds"));
        assert!(zones.validate_door_access(&door, at_gate, 3.0, &completed).is_ok());
        assert!(matches!(
            zones.validate_door_access(&door, Vec3::ZERO, 3.0, &completed),
            Err(DoorAccessError::TooFar { .. })
        ));
    }

    #[test]
    fn capacity_is_strictly_below_max() {
        let zones = registry();
        let crypt = ZoneId::new("crypt");
        assert!(zones.has_capacity(&crypt, 4));
        assert!(!zones.has_capacity(&crypt, 5));
        assert!(!zones.has_capacity(&ZoneId::new("void"), 0));
    }

    #[test]
    fn random_spawn_point_comes_from_the_zone() {
        let zones = registry();
        let town = ZoneId::new("town");
        let point = zones.random_spawn_point(&town, &FixedRandom(0.99)).unwrap();
        assert!(zones.get(&town).unwrap().spawn_points.contains(&point));
        assert!(zones
            .random_spawn_point(&ZoneId::new("void"), &FixedRandom::midpoint())
            .is_none());
    }
}
