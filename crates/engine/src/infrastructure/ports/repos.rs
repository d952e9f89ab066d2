//! Persistence port for player records.

use async_trait::async_trait;
use emberfall_shared::TransferPayload;

use super::error::RepoError;

/// Long-term player storage. Consulted when a session starts (load) and when it
/// ends (save); never from inside a tick.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerStore: Send + Sync {
    /// Loads the last saved record for a player name.
    async fn load(&self, name: &str) -> Result<Option<TransferPayload>, RepoError>;
    /// Persists a player record, replacing any previous one with the same name.
    async fn save(&self, record: &TransferPayload) -> Result<(), RepoError>;
}
