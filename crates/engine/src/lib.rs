//! Emberfall Engine library.
//!
//! This crate contains all server-side code for the Emberfall simulation.
//!
//! ## Structure
//!
//! - `entities/` - Entity and zone registries a room owns
//! - `use_cases/` - Game rules: parsing, movement, combat, AI, transfers, loot,
//!   quests, pets, vendor trades
//! - `room/` - The room orchestrator and its tokio runner
//! - `infrastructure/` - External dependency implementations (ports + adapters)
//! - `api/` - HTTP and WebSocket entry points and the room manager
//! - `app` - Application composition

pub mod api;
pub mod app;
pub mod entities;
pub mod infrastructure;
pub mod room;
pub mod use_cases;

pub use app::App;
