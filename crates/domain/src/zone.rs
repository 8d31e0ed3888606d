//! Zones (home island or an adventure map) and grid positions within them.

use serde::{Deserialize, Serialize};

/// A cell on the current zone's map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid(u32);

impl Grid {
    #[must_use]
    pub const fn new(cell: u32) -> Self {
        Self(cell)
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Where the player currently is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "snake_case")]
pub enum Zone {
    /// The player's home island.
    #[default]
    Home,
    /// A named adventure map.
    Adventure(String),
}

impl Zone {
    #[must_use]
    pub fn is_adventure(&self) -> bool {
        matches!(self, Self::Adventure(_))
    }
}

impl std::fmt::Display for Zone {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Home => f.write_str("home"),
            Self::Adventure(name) => write!(f, "adventure({name})"),
        }
    }
}
