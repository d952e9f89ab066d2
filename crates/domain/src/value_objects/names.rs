//! Validated player name.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

const MAX_NAME_LENGTH: usize = 24;

/// A validated player name (non-empty, <=24 chars, trimmed, no whitespace inside)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    /// Create a new validated player name.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Validation` if the trimmed name is empty, longer
    /// than 24 characters, or contains whitespace (names are single command tokens).
    pub fn new(name: impl Into<String>) -> Result<Self, DomainError> {
        let name = name.into();
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(DomainError::validation("Player name cannot be empty"));
        }
        if trimmed.chars().count() > MAX_NAME_LENGTH {
            return Err(DomainError::validation(format!(
                "Player name cannot exceed {} characters",
                MAX_NAME_LENGTH
            )));
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(DomainError::validation("Player name cannot contain spaces"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for PlayerName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PlayerName> for String {
    fn from(name: PlayerName) -> Self {
        name.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_accepts_valid_names() {
        assert_eq!(PlayerName::new("  Aria ").unwrap().as_str(), "Aria");
    }

    #[test]
    fn rejects_empty_long_and_spaced_names() {
        assert!(PlayerName::new("   ").is_err());
        assert!(PlayerName::new("x".repeat(25)).is_err());
        assert!(PlayerName::new("two words").is_err());
    }
}
