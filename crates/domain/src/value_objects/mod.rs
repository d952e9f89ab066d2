//! Value objects: small, self-validating types shared by entities.

mod buff;
mod direction;
mod inventory;
mod names;
mod resource;
mod vec3;

pub use buff::Buff;
pub use direction::Direction;
pub use inventory::{Inventory, InventorySlot, DEFAULT_INVENTORY_SLOTS};
pub use names::PlayerName;
pub use resource::ResourcePool;
pub use vec3::Vec3;
