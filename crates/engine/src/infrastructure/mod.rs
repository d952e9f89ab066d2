//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies, settings
//! and the static content catalog.

pub mod clock;
pub mod content;
pub mod memory_store;
pub mod ports;
pub mod settings;
