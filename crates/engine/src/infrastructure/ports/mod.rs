//! Port traits for infrastructure boundaries.
//!
//! These are the ONLY abstractions in the engine. Everything else is concrete types.
//! Ports exist for:
//! - Player persistence (in-memory today, a database tomorrow)
//! - Clock/Random (for testing)

mod error;
mod repos;
mod testing;

pub use error::RepoError;
pub use repos::PlayerStore;
pub use testing::{ClockPort, RandomPort};

#[cfg(test)]
pub use repos::MockPlayerStore;
