//! Room-scoped world state: the entity registry and the zone registry.
//!
//! These are plain owned structures. A room holds one `EntityRegistry`; the
//! `ZoneRegistry` is built once from content and shared behind an `Arc`.

pub mod registry;
pub mod zones;

pub use registry::{EntityRegistry, SpawnSpec, DEFAULT_LEASH_DISTANCE};
pub use zones::{DoorAccessError, ZoneRegistry};
