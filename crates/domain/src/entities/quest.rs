//! Quest definitions and the per-player quest log.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{ItemId, QuestId, TemplateId};

/// What has to be done to finish a quest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QuestObjective {
    Kill { template: TemplateId, count: u32 },
}

impl QuestObjective {
    pub fn required(&self) -> u32 {
        match self {
            Self::Kill { count, .. } => *count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestDef {
    pub id: QuestId,
    pub name: String,
    pub description: String,
    pub objective: QuestObjective,
    #[serde(default)]
    pub reward_gold: u64,
    #[serde(default)]
    pub reward_xp: u64,
    #[serde(default)]
    pub reward_item: Option<(ItemId, u32)>,
}

/// Active quest progress plus the set of completed quest ids.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestLog {
    active: BTreeMap<QuestId, u32>,
    completed: BTreeSet<QuestId>,
}

impl QuestLog {
    pub fn active(&self) -> impl Iterator<Item = (&QuestId, u32)> {
        self.active.iter().map(|(id, progress)| (id, *progress))
    }

    pub fn completed(&self) -> &BTreeSet<QuestId> {
        &self.completed
    }

    pub fn is_active(&self, id: &QuestId) -> bool {
        self.active.contains_key(id)
    }

    pub fn is_completed(&self, id: &QuestId) -> bool {
        self.completed.contains(id)
    }

    pub fn progress(&self, id: &QuestId) -> Option<u32> {
        self.active.get(id).copied()
    }

    /// Begins tracking a quest.
    ///
    /// # Errors
    ///
    /// `DomainError::Constraint` when the quest is already active or completed.
    pub fn start(&mut self, id: &QuestId) -> Result<(), DomainError> {
        if self.completed.contains(id) {
            return Err(DomainError::constraint(format!("quest {id} is already completed")));
        }
        if self.active.contains_key(id) {
            return Err(DomainError::constraint(format!("quest {id} is already active")));
        }
        self.active.insert(id.clone(), 0);
        Ok(())
    }

    pub fn abandon(&mut self, id: &QuestId) -> Result<(), DomainError> {
        self.active
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| DomainError::not_found("Active quest", id.as_str()))
    }

    /// Adds one unit of progress, capped at `required`. Returns the new value.
    pub fn advance(&mut self, id: &QuestId, required: u32) -> Option<u32> {
        let progress = self.active.get_mut(id)?;
        *progress = (*progress + 1).min(required);
        Some(*progress)
    }

    /// Moves an active quest to the completed set.
    pub fn complete(&mut self, id: &QuestId) -> bool {
        if self.active.remove(id).is_some() {
            self.completed.insert(id.clone());
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_rejects_duplicates_and_completed() {
        let mut log = QuestLog::default();
        let id = QuestId::new("clear_wilds");
        log.start(&id).unwrap();
        assert!(log.start(&id).is_err());
        assert!(log.complete(&id));
        assert!(log.start(&id).is_err());
        assert!(log.is_completed(&id));
    }

    #[test]
    fn advance_caps_at_required() {
        let mut log = QuestLog::default();
        let id = QuestId::new("rats");
        log.start(&id).unwrap();
        assert_eq!(log.advance(&id, 2), Some(1));
        assert_eq!(log.advance(&id, 2), Some(2));
        assert_eq!(log.advance(&id, 2), Some(2));
        assert_eq!(log.advance(&QuestId::new("other"), 2), None);
    }

    #[test]
    fn abandon_requires_active_quest() {
        let mut log = QuestLog::default();
        assert!(log.abandon(&QuestId::new("nope")).is_err());
    }
}
