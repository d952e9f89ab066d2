//! Slot-based inventory owned by a player.
//!
//! Each slot holds a single item id with a quantity. Adding stacks into
//! existing slots first and only then claims empty ones; an add that cannot fit
//! completely is rejected without touching the inventory.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::ids::ItemId;

/// Default number of slots on a fresh inventory.
pub const DEFAULT_INVENTORY_SLOTS: u32 = 20;

/// A stack of one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySlot {
    pub item_id: ItemId,
    pub quantity: u32,
}

/// Bounded list of item stacks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<InventorySlot>,
    capacity: u32,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_INVENTORY_SLOTS)
    }
}

impl Inventory {
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
        }
    }

    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    pub fn slots(&self) -> &[InventorySlot] {
        &self.slots
    }

    pub fn used_slots(&self) -> u32 {
        self.slots.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total quantity of `item_id` across all stacks.
    pub fn count(&self, item_id: &ItemId) -> u32 {
        self.slots
            .iter()
            .filter(|slot| &slot.item_id == item_id)
            .map(|slot| slot.quantity)
            .sum()
    }

    /// Adds `quantity` of an item, topping up partial stacks before opening new slots.
    ///
    /// # Errors
    ///
    /// - `DomainError::Validation` for a zero quantity or zero stack size
    /// - `DomainError::ContainerFull` when the items would not all fit
    pub fn add(&mut self, item_id: &ItemId, quantity: u32, max_stack: u32) -> Result<(), DomainError> {
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        if max_stack == 0 {
            return Err(DomainError::validation("stack size must be at least 1"));
        }

        let room_in_stacks: u32 = self
            .slots
            .iter()
            .filter(|slot| &slot.item_id == item_id)
            .map(|slot| max_stack.saturating_sub(slot.quantity))
            .sum();
        let overflow = quantity.saturating_sub(room_in_stacks);
        let new_slots = overflow.div_ceil(max_stack);
        if self.used_slots() + new_slots > self.capacity {
            return Err(DomainError::container_full(self.used_slots(), self.capacity));
        }

        let mut remaining = quantity;
        for slot in self.slots.iter_mut().filter(|slot| &slot.item_id == item_id) {
            let take = remaining.min(max_stack.saturating_sub(slot.quantity));
            slot.quantity += take;
            remaining -= take;
        }
        while remaining > 0 {
            let take = remaining.min(max_stack);
            self.slots.push(InventorySlot {
                item_id: item_id.clone(),
                quantity: take,
            });
            remaining -= take;
        }
        Ok(())
    }

    /// Removes up to `quantity` from the slot at `index` (0-based).
    ///
    /// Returns the item and the amount actually removed; an emptied slot is
    /// dropped and later slots shift down.
    pub fn take_from_slot(&mut self, index: usize, quantity: u32) -> Result<InventorySlot, DomainError> {
        let slot = self
            .slots
            .get_mut(index)
            .ok_or_else(|| DomainError::not_found("Inventory slot", (index + 1).to_string()))?;
        if quantity == 0 {
            return Err(DomainError::validation("quantity must be at least 1"));
        }
        let removed = quantity.min(slot.quantity);
        slot.quantity -= removed;
        let item_id = slot.item_id.clone();
        if slot.quantity == 0 {
            self.slots.remove(index);
        }
        Ok(InventorySlot {
            item_id,
            quantity: removed,
        })
    }
}
