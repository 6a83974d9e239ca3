// level.rs — Risk levels and their fixed total order.
//
// P0 is the most restrictive (highest risk) level, P2 the least. The derived
// `Ord` follows declaration order, so `Level::P0 < Level::P2` holds and
// "less restrictive" simply means "greater".

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Risk classification of a change.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Level {
    P0,
    P1,
    P2,
}

/// Raised when a string is not one of `P0`, `P1`, `P2`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown level '{0}' (expected P0, P1 or P2)")]
pub struct ParseLevelError(pub String);

impl Level {
    /// Every level, most restrictive first.
    pub const ALL: [Level; 3] = [Level::P0, Level::P1, Level::P2];

    /// Level assigned to changes no pattern recognises.
    pub const UNCLASSIFIED: Level = Level::P1;

    /// Position in the total order (P0 = 0).
    pub fn rank(self) -> u8 {
        match self {
            Level::P0 => 0,
            Level::P1 => 1,
            Level::P2 => 2,
        }
    }

    /// True when `self` carries less review weight than `other`.
    pub fn is_less_restrictive_than(self, other: Level) -> bool {
        self.rank() > other.rank()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Level::P0 => "P0",
            Level::P1 => "P1",
            Level::P2 => "P2",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "P0" => Ok(Level::P0),
            "P1" => Ok(Level::P1),
            "P2" => Ok(Level::P2),
            other => Err(ParseLevelError(other.to_string())),
        }
    }
}
