//! Palette catalog: named light/dark endpoint pairs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Named two-stop color palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Palette {
    #[default]
    Red,
    Blue,
    Green,
    Orange,
    Purple,
    Yellow,
}

impl Palette {
    pub const ALL: [Palette; 6] = [
        Palette::Red,
        Palette::Blue,
        Palette::Green,
        Palette::Orange,
        Palette::Purple,
        Palette::Yellow,
    ];

    /// Catalog name, also used in links.
    pub fn name(self) -> &'static str {
        match self {
            Palette::Red => "red",
            Palette::Blue => "blue",
            Palette::Green => "green",
            Palette::Orange => "orange",
            Palette::Purple => "purple",
            Palette::Yellow => "yellow",
        }
    }

    /// Look up a palette by catalog name. Names are case-sensitive.
    pub fn from_name(name: &str) -> Option<Palette> {
        Palette::ALL.iter().copied().find(|p| p.name() == name)
    }

    /// (light, dark) endpoint colors as `#rrggbb`.
    pub fn stops(self) -> (&'static str, &'static str) {
        match self {
            Palette::Red => ("#fee2e2", "#7f1d1d"),
            Palette::Blue => ("#dbeafe", "#1e3a8a"),
            Palette::Green => ("#dcfce7", "#14532d"),
            Palette::Orange => ("#ffedd5", "#7c2d12"),
            Palette::Purple => ("#f3e8ff", "#581c87"),
            Palette::Yellow => ("#fef9c3", "#854d0e"),
        }
    }
}

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Palette {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Palette::from_name(s).ok_or_else(|| format!("unknown palette '{}'", s))
    }
}

/// Parse hex color string to RGB
pub fn hex_to_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some((r, g, b))
}
