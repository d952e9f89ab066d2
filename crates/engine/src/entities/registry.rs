//! Entity registry: the mobs and NPCs living in one room.
//!
//! Entities are kept in spawn order so queries and snapshots are stable from
//! tick to tick.

use emberfall_domain::{
    AiStatus, Entity, EntityId, EntityKind, EntityTemplate, ResourcePool, TemplateId, Vec3,
};

/// Leash distance used when a spawn spec does not set one.
pub const DEFAULT_LEASH_DISTANCE: f32 = 10.0;

/// Everything needed to place a new entity.
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnSpec {
    pub template: TemplateId,
    pub name: String,
    pub kind: EntityKind,
    pub position: Vec3,
    pub max_hp: u32,
    pub level: u32,
    pub leash_distance: Option<f32>,
}

impl SpawnSpec {
    pub fn from_template(template: &EntityTemplate, position: Vec3) -> Self {
        Self {
            template: template.id.clone(),
            name: template.name.clone(),
            kind: template.kind,
            position,
            max_hp: template.max_hp,
            level: template.level,
            leash_distance: Some(template.leash_distance),
        }
    }
}

#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: Vec<Entity>,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Places an entity at its spawn point, full hp, AI idle.
    pub fn spawn(&mut self, spec: SpawnSpec, now: i64) -> EntityId {
        let id = EntityId::new();
        self.entities.push(Entity {
            id,
            template: spec.template,
            name: spec.name,
            kind: spec.kind,
            position: spec.position,
            velocity: Vec3::ZERO,
            hp: ResourcePool::full(spec.max_hp),
            level: spec.level,
            ai: AiStatus::idle(now),
            spawn_position: spec.position,
            leash_distance: spec.leash_distance.unwrap_or(DEFAULT_LEASH_DISTANCE),
            last_swing_at: None,
        });
        tracing::trace!(entity_id = %id, "Entity spawned");
        id
    }

    pub fn remove(&mut self, id: EntityId) -> Option<Entity> {
        let index = self.entities.iter().position(|e| e.id == id)?;
        Some(self.entities.remove(index))
    }

    /// Restores an entity to its spawn values. Returns false if it is unknown.
    pub fn respawn(&mut self, id: EntityId, now: i64) -> bool {
        let Some(entity) = self.get_mut(id) else {
            return false;
        };
        entity.position = entity.spawn_position;
        entity.velocity = Vec3::ZERO;
        entity.hp.refill();
        entity.ai = AiStatus::idle(now);
        entity.last_swing_at = None;
        true
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// Exact name match ignoring ASCII case. Living entities win over corpses
    /// that share the name.
    pub fn find_by_name(&self, name: &str) -> Option<&Entity> {
        let mut matches = self
            .entities
            .iter()
            .filter(|e| e.name.eq_ignore_ascii_case(name));
        let first = matches.next()?;
        if first.is_alive() {
            return Some(first);
        }
        matches.find(|e| e.is_alive()).or(Some(first))
    }

    /// Nearest living entity to `point`, optionally restricted to a name.
    pub fn nearest(&self, point: Vec3, name: Option<&str>) -> Option<&Entity> {
        self.entities
            .iter()
            .filter(|e| e.is_alive())
            .filter(|e| name.is_none_or(|n| e.name.eq_ignore_ascii_case(n)))
            .min_by(|a, b| {
                a.position
                    .ground_distance(point)
                    .total_cmp(&b.position.ground_distance(point))
            })
    }

    /// Living entities within `radius` of `point`.
    pub fn within_radius(&self, point: Vec3, radius: f32) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .filter(move |e| e.is_alive() && e.position.ground_distance(point) <= radius)
    }

    pub fn by_kind(&self, kind: EntityKind) -> impl Iterator<Item = &Entity> {
        self.entities.iter().filter(move |e| e.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Entity> {
        self.entities.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
