//! The fixed set of bag colours a user can pick

use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Bag colour offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BagColor {
    White,
    Black,
    Lilac,
}

impl BagColor {
    pub const ALL: [BagColor; 3] = [BagColor::White, BagColor::Black, BagColor::Lilac];

    /// Wire tag sent to the generation service and used in callback data
    pub fn as_str(self) -> &'static str {
        match self {
            BagColor::White => "white",
            BagColor::Black => "black",
            BagColor::Lilac => "lilac",
        }
    }

    /// Human-readable button text
    pub fn label(self) -> &'static str {
        match self {
            BagColor::White => "White bag",
            BagColor::Black => "Black bag",
            BagColor::Lilac => "Lilac bag",
        }
    }
}

impl fmt::Display for BagColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A choice tag outside the enumeration
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown bag colour: {0:?}")]
pub struct UnknownChoice(pub String);

impl FromStr for BagColor {
    type Err = UnknownChoice;

    /// Exact, case-sensitive match on the wire tag.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "white" => Ok(BagColor::White),
            "black" => Ok(BagColor::Black),
            "lilac" => Ok(BagColor::Lilac),
            other => Err(UnknownChoice(other.to_string())),
        }
    }
}
