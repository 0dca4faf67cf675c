//! The four-color palette shared by announcements and tiles

use serde::{Deserialize, Serialize};

/// A palette color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameColor {
    Red,
    Blue,
    Green,
    Yellow,
}

impl GameColor {
    /// Whole palette, in announcement order
    pub const ALL: [GameColor; 4] = [
        GameColor::Red,
        GameColor::Blue,
        GameColor::Green,
        GameColor::Yellow,
    ];

    /// Canonical name, used for speech and text-label matching
    pub fn name(&self) -> &'static str {
        match self {
            GameColor::Red => "red",
            GameColor::Blue => "blue",
            GameColor::Green => "green",
            GameColor::Yellow => "yellow",
        }
    }

    /// Label as printed on a tile
    pub fn label(&self) -> &'static str {
        match self {
            GameColor::Red => "RED",
            GameColor::Blue => "BLUE",
            GameColor::Green => "GREEN",
            GameColor::Yellow => "YELLOW",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
    }

    /// True if `text` names this color (case-insensitive)
    pub fn is_named_by(&self, text: &str) -> bool {
        self.name().eq_ignore_ascii_case(text.trim())
    }

    /// Palette minus this color
    pub fn others(&self) -> [GameColor; 3] {
        let mut out = [GameColor::Red; 3];
        let mut i = 0;
        for c in Self::ALL {
            if c != *self {
                out[i] = c;
                i += 1;
            }
        }
        out
    }
}

impl std::fmt::Display for GameColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
