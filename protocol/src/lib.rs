//! Wire types spoken between the Minesweeper client and the remote game engine.

use serde::{Deserialize, Serialize};

pub use board::*;
pub use cell::*;
pub use error::*;
pub use frame::*;
pub use message::*;

mod board;
mod cell;
mod error;
mod frame;
mod message;

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Two-dimensional coordinates `(x, y)`, column first.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

/// Board size category picked when a game is started.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameSize {
    Small,
    Medium,
    #[default]
    Large,
}

impl GameSize {
    pub const ALL: [GameSize; 3] = [GameSize::Small, GameSize::Medium, GameSize::Large];

    pub const fn as_str(self) -> &'static str {
        use GameSize::*;
        match self {
            Small => "small",
            Medium => "medium",
            Large => "large",
        }
    }

    pub const fn label(self) -> &'static str {
        use GameSize::*;
        match self {
            Small => "Small",
            Medium => "Medium",
            Large => "Large",
        }
    }

    /// Classic `(columns, rows)` for the category.
    pub const fn dimensions(self) -> Coord2 {
        use GameSize::*;
        match self {
            Small => (9, 9),
            Medium => (16, 16),
            Large => (30, 16),
        }
    }

    pub const fn mine_count(self) -> u16 {
        use GameSize::*;
        match self {
            Small => 10,
            Medium => 40,
            Large => 99,
        }
    }
}

impl core::fmt::Display for GameSize {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::str::FromStr for GameSize {
    type Err = ProtocolError;

    fn from_str(s: &str) -> Result<Self> {
        GameSize::ALL
            .into_iter()
            .find(|size| size.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ProtocolError::UnknownSize(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn game_size_uses_lowercase_wire_names() {
        assert_eq!(
            serde_json::to_value(GameSize::Medium).unwrap(),
            serde_json::json!("medium")
        );
        assert_eq!(
            serde_json::from_value::<GameSize>(serde_json::json!("large")).unwrap(),
            GameSize::Large
        );
    }

    #[test]
    fn game_size_parses_case_insensitively() {
        assert_eq!("Small".parse::<GameSize>().unwrap(), GameSize::Small);
        assert!(matches!(
            "huge".parse::<GameSize>(),
            Err(ProtocolError::UnknownSize(_))
        ));
    }

    #[test]
    fn large_is_the_default_size() {
        assert_eq!(GameSize::default(), GameSize::Large);
        assert_eq!(GameSize::Large.dimensions(), (30, 16));
    }
}
