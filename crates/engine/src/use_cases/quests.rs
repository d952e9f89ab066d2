//! Quest log operations and kill tracking.

use emberfall_domain::{DomainError, Player, QuestDef, QuestId, QuestObjective, TemplateId};

use crate::infrastructure::content::ContentCatalog;

/// A change to one quest caused by a kill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestEvent {
    Progress {
        quest: String,
        progress: u32,
        required: u32,
    },
    Completed {
        quest: String,
        gold: u64,
        xp: u64,
        levels_gained: u32,
        item: Option<String>,
    },
}

pub fn start_quest<'a>(
    player: &mut Player,
    catalog: &'a ContentCatalog,
    id: &str,
) -> Result<&'a QuestDef, DomainError> {
    let quest = catalog
        .quest(&QuestId::new(id))
        .ok_or_else(|| DomainError::not_found("Quest", id))?;
    player.quests.start(&quest.id)?;
    Ok(quest)
}

pub fn abandon_quest<'a>(
    player: &mut Player,
    catalog: &'a ContentCatalog,
    id: &str,
) -> Result<&'a QuestDef, DomainError> {
    let quest = catalog
        .quest(&QuestId::new(id))
        .ok_or_else(|| DomainError::not_found("Quest", id))?;
    player.quests.abandon(&quest.id)?;
    Ok(quest)
}

/// Advances every active kill objective for `template` and pays out any
/// quest that completes.
pub fn record_kill(
    player: &mut Player,
    catalog: &ContentCatalog,
    template: &TemplateId,
) -> Vec<QuestEvent> {
    let matching: Vec<&QuestDef> = catalog
        .quests()
        .iter()
        .filter(|q| player.quests.is_active(&q.id))
        .filter(|q| matches!(&q.objective, QuestObjective::Kill { template: t, .. } if t == template))
        .collect();

    let mut events = Vec::new();
    for quest in matching {
        let required = quest.objective.required();
        let Some(progress) = player.quests.advance(&quest.id, required) else {
            continue;
        };
        if progress < required {
            events.push(QuestEvent::Progress {
                quest: quest.name.clone(),
                progress,
                required,
            });
            continue;
        }
        player.quests.complete(&quest.id);
        player.earn_gold(quest.reward_gold);
        let levels_gained = player.grant_xp(quest.reward_xp);
        let item = quest.reward_item.as_ref().and_then(|(item_id, qty)| {
            let def = catalog.item(item_id)?;
            match player.inventory.add(item_id, *qty, def.max_stack) {
                Ok(()) => Some(def.name.clone()),
                Err(err) => {
                    tracing::debug!(quest = %quest.id, error = %err, "Quest item reward skipped");
                    None
                }
            }
        });
        events.push(QuestEvent::Completed {
            quest: quest.name.clone(),
            gold: quest.reward_gold,
            xp: quest.reward_xp,
            levels_gained,
            item,
        });
    }
    events
}
