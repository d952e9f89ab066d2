//! Emberfall Shared - wire types exchanged between the engine and clients
//!
//! - WebSocket message types (`ClientMessage`, `ServerMessage`)
//! - Feed entries and room snapshots
//! - The transfer payload used for zone handoffs
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - serde and serde_json on top of the domain crate
//! 2. **No business logic** - pure data types and serialization

pub mod feed;
pub mod messages;
pub mod snapshot;
pub mod transfer;

pub use feed::{FeedEntry, FeedType};
pub use messages::{ClientMessage, ServerMessage};
pub use snapshot::{DropView, EntityView, PlayerView, RoomSnapshot};
pub use transfer::TransferPayload;
