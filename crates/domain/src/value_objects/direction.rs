//! Cardinal movement directions.

use serde::{Deserialize, Serialize};

use super::Vec3;

/// One of the four compass directions accepted by `go`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Unit vector on the ground plane. North is -z.
    pub fn unit(self) -> Vec3 {
        match self {
            Self::North => Vec3::ground(0.0, -1.0),
            Self::South => Vec3::ground(0.0, 1.0),
            Self::East => Vec3::ground(1.0, 0.0),
            Self::West => Vec3::ground(-1.0, 0.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Self::North),
            "south" | "s" => Ok(Self::South),
            "east" | "e" => Ok(Self::East),
            "west" | "w" => Ok(Self::West),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_forms_normalize() {
        assert_eq!("n".parse::<Direction>(), Ok(Direction::North));
        assert_eq!("S".parse::<Direction>(), Ok(Direction::South));
        assert_eq!("e".parse::<Direction>(), Ok(Direction::East));
        assert_eq!("West".parse::<Direction>(), Ok(Direction::West));
        assert!("up".parse::<Direction>().is_err());
    }
}
