//! Faction definitions and map glyphs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The two sides of a skirmish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Faction {
    /// Elves, drawn as `E`.
    Elf,
    /// Goblins, drawn as `G`.
    Goblin,
}

impl Faction {
    /// Both factions, in a fixed order.
    pub const ALL: [Faction; 2] = [Faction::Elf, Faction::Goblin];

    /// Parse a map glyph into a faction, if it names one.
    #[must_use]
    pub const fn from_glyph(glyph: char) -> Option<Self> {
        match glyph {
            'E' => Some(Self::Elf),
            'G' => Some(Self::Goblin),
            _ => None,
        }
    }

    /// Map glyph for this faction.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Elf => 'E',
            Self::Goblin => 'G',
        }
    }

    /// The opposing faction.
    #[must_use]
    pub const fn enemy(self) -> Self {
        match self {
            Self::Elf => Self::Goblin,
            Self::Goblin => Self::Elf,
        }
    }

    /// Plural display name.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Elf => "Elves",
            Self::Goblin => "Goblins",
        }
    }
}

impl fmt::Display for Faction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_round_trip() {
        for faction in Faction::ALL {
            assert_eq!(Faction::from_glyph(faction.glyph()), Some(faction));
        }
        assert_eq!(Faction::from_glyph('#'), None);
        assert_eq!(Faction::from_glyph('.'), None);
    }

    #[test]
    fn test_enemy_is_symmetric() {
        assert_eq!(Faction::Elf.enemy(), Faction::Goblin);
        assert_eq!(Faction::Goblin.enemy(), Faction::Elf);
    }
}
