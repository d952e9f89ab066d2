//! Pet kinds (static content) and the pets a player owns.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::{AbilityId, PetKindId};

/// Maximum number of pets one player may own.
pub const MAX_PETS: usize = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PetKind {
    pub id: PetKindId,
    pub name: String,
    /// Adoption cost in gold.
    pub price: u64,
    pub abilities: Vec<AbilityId>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    pub id: u32,
    pub kind: PetKindId,
    pub name: String,
    pub summoned: bool,
    #[serde(default)]
    pub cooldowns: HashMap<AbilityId, i64>,
}

/// The pets owned by one player. Ids are small per-player integers so they
/// are easy to type in commands.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PetRoster {
    pets: Vec<Pet>,
    next_id: u32,
}

impl PetRoster {
    pub fn pets(&self) -> &[Pet] {
        &self.pets
    }

    pub fn get(&self, id: u32) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.id == id)
    }

    pub fn get_mut(&mut self, id: u32) -> Option<&mut Pet> {
        self.pets.iter_mut().find(|pet| pet.id == id)
    }

    pub fn summoned(&self) -> Option<&Pet> {
        self.pets.iter().find(|pet| pet.summoned)
    }

    /// Adds a pet and returns its id.
    pub fn adopt(&mut self, kind: PetKindId, name: impl Into<String>) -> Result<u32, DomainError> {
        if self.pets.len() >= MAX_PETS {
            return Err(DomainError::constraint(format!(
                "cannot own more than {MAX_PETS} pets"
            )));
        }
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("pet name cannot be empty"));
        }
        self.next_id += 1;
        let id = self.next_id;
        self.pets.push(Pet {
            id,
            kind,
            name,
            summoned: false,
            cooldowns: HashMap::new(),
        });
        Ok(id)
    }

    /// Summons one pet; any other summoned pet is sent back.
    pub fn summon(&mut self, id: u32) -> Result<&Pet, DomainError> {
        if self.get(id).is_none() {
            return Err(DomainError::not_found("Pet", id.to_string()));
        }
        for pet in &mut self.pets {
            pet.summoned = pet.id == id;
        }
        self.get(id)
            .ok_or_else(|| DomainError::not_found("Pet", id.to_string()))
    }

    pub fn dismiss(&mut self, id: u32) -> Result<&Pet, DomainError> {
        let pet = self
            .get_mut(id)
            .ok_or_else(|| DomainError::not_found("Pet", id.to_string()))?;
        if !pet.summoned {
            return Err(DomainError::constraint(format!("{} is not summoned", pet.name)));
        }
        pet.summoned = false;
        Ok(&*pet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adopt_enforces_roster_limit() {
        let mut roster = PetRoster::default();
        for i in 0..MAX_PETS {
            roster.adopt(PetKindId::new("wolf"), format!("Rex{i}")).unwrap();
        }
        assert!(roster.adopt(PetKindId::new("wolf"), "Extra").is_err());
    }

    #[test]
    fn only_one_pet_summoned_at_a_time() {
        let mut roster = PetRoster::default();
        let a = roster.adopt(PetKindId::new("wolf"), "Rex").unwrap();
        let b = roster.adopt(PetKindId::new("owl"), "Hoot").unwrap();
        roster.summon(a).unwrap();
        roster.summon(b).unwrap();
        assert_eq!(roster.summoned().map(|p| p.id), Some(b));
        assert!(roster.dismiss(a).is_err());
        roster.dismiss(b).unwrap();
        assert!(roster.summoned().is_none());
    }
}
