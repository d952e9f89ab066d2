//! Feed entries: the user-facing event lines delivered to clients.

use serde::{Deserialize, Serialize};

/// Category of a feed line, used by clients for coloring and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedType {
    Info,
    Combat,
    Loot,
    Quest,
    Error,
}

/// One line of game activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedEntry {
    /// Epoch milliseconds.
    pub at: i64,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: FeedType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
}

impl FeedEntry {
    pub fn new(at: i64, kind: FeedType, text: impl Into<String>) -> Self {
        Self {
            at,
            text: text.into(),
            kind,
            zone: None,
        }
    }

    pub fn info(at: i64, text: impl Into<String>) -> Self {
        Self::new(at, FeedType::Info, text)
    }

    pub fn combat(at: i64, text: impl Into<String>) -> Self {
        Self::new(at, FeedType::Combat, text)
    }

    pub fn loot(at: i64, text: impl Into<String>) -> Self {
        Self::new(at, FeedType::Loot, text)
    }

    pub fn quest(at: i64, text: impl Into<String>) -> Self {
        Self::new(at, FeedType::Quest, text)
    }

    pub fn error(at: i64, text: impl Into<String>) -> Self {
        Self::new(at, FeedType::Error, text)
    }

    pub fn in_zone(mut self, zone: impl Into<String>) -> Self {
        self.zone = Some(zone.into());
        self
    }
}
