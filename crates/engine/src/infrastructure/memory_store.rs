//! In-memory `PlayerStore`.
//!
//! Records live for the lifetime of the process. Keys are lowercased names so
//! "Aria" and "aria" resolve to the same character.

use async_trait::async_trait;
use dashmap::DashMap;

use emberfall_shared::TransferPayload;

use super::ports::{PlayerStore, RepoError};

#[derive(Default)]
pub struct InMemoryPlayerStore {
    records: DashMap<String, TransferPayload>,
}

impl InMemoryPlayerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn key(name: &str) -> String {
    name.trim().to_ascii_lowercase()
}

#[async_trait]
impl PlayerStore for InMemoryPlayerStore {
    async fn load(&self, name: &str) -> Result<Option<TransferPayload>, RepoError> {
        Ok(self.records.get(&key(name)).map(|entry| entry.value().clone()))
    }

    async fn save(&self, record: &TransferPayload) -> Result<(), RepoError> {
        let mut stored = record.clone();
        stored.source_zone = None;
        self.records.insert(key(record.name.as_str()), stored);
        tracing::debug!(player = %record.name, "Player record saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use emberfall_domain::{CharacterClass, PlayerId, PlayerName, ZoneId};

    use super::*;

    fn record(name: &str, gold: u64) -> TransferPayload {
        TransferPayload {
            player_id: PlayerId::new(),
            name: PlayerName::new(name).unwrap(),
            class: CharacterClass::Ranger,
            level: 3,
            xp: 40,
            hp: 90,
            max_hp: 120,
            mp: 10,
            max_mp: 70,
            gold,
            buffs: Vec::new(),
            last_global_cooldown: None,
            cooldowns: HashMap::new(),
            inventory: Default::default(),
            quests: Default::default(),
            pets: Default::default(),
            source_zone: Some(ZoneId::new("wilds")),
        }
    }

    #[tokio::test]
    async fn load_is_case_insensitive_and_strips_source_zone() {
        let store = InMemoryPlayerStore::new();
        store.save(&record("Aria", 55)).await.unwrap();

        let loaded = store.load("aria").await.unwrap().unwrap();
        assert_eq!(loaded.gold, 55);
        assert_eq!(loaded.source_zone, None);
        assert!(store.load("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_overwrites_previous_record() {
        let store = InMemoryPlayerStore::new();
        store.save(&record("Aria", 1)).await.unwrap();
        store.save(&record("Aria", 2)).await.unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.load("Aria").await.unwrap().unwrap().gold, 2);
    }
}
