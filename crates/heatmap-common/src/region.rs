//! The fixed catalog of governorates.
//!
//! Declaration order is the canonical display order. The link codec and the
//! value map both rely on it, so new variants must never be reordered.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of regions in the catalog.
pub const REGION_COUNT: usize = 14;

/// One of the 14 governorates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Region {
    Aleppo,
    Damascus,
    RuralDamascus,
    Daraa,
    Quneitra,
    AsSweida,
    Homs,
    Hama,
    Tartous,
    Lattakia,
    Idleb,
    ArRaqqa,
    DeirEzZor,
    AlHasakeh,
}

impl Region {
    /// All regions in canonical order.
    pub const ALL: [Region; REGION_COUNT] = [
        Region::Aleppo,
        Region::Damascus,
        Region::RuralDamascus,
        Region::Daraa,
        Region::Quneitra,
        Region::AsSweida,
        Region::Homs,
        Region::Hama,
        Region::Tartous,
        Region::Lattakia,
        Region::Idleb,
        Region::ArRaqqa,
        Region::DeirEzZor,
        Region::AlHasakeh,
    ];

    /// Stable key, as it appears in the boundary dataset's `shapeName`.
    pub fn key(self) -> &'static str {
        match self {
            Region::Aleppo => "Aleppo",
            Region::Damascus => "Damascus",
            Region::RuralDamascus => "Rural Damascus",
            Region::Daraa => "Dar'a",
            Region::Quneitra => "Quneitra",
            Region::AsSweida => "As-Sweida",
            Region::Homs => "Homs",
            Region::Hama => "Hama",
            Region::Tartous => "Tartous",
            Region::Lattakia => "Lattakia",
            Region::Idleb => "Idleb",
            Region::ArRaqqa => "Ar-Raqqa",
            Region::DeirEzZor => "Deir-ez-Zor",
            Region::AlHasakeh => "Al-Hasakeh",
        }
    }

    /// Look up a region by its dataset key.
    pub fn from_key(key: &str) -> Option<Region> {
        Region::ALL.iter().copied().find(|r| r.key() == key)
    }

    /// Position in canonical order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// English display name. Only Idleb differs from its key.
    pub fn english_name(self) -> &'static str {
        match self {
            Region::Idleb => "Idlib",
            other => other.key(),
        }
    }

    pub fn arabic_name(self) -> &'static str {
        match self {
            Region::Aleppo => "حلب",
            Region::Damascus => "دمشق",
            Region::RuralDamascus => "ريف دمشق",
            Region::Daraa => "درعا",
            Region::Quneitra => "القنيطرة",
            Region::AsSweida => "السويداء",
            Region::Homs => "حمص",
            Region::Hama => "حماة",
            Region::Tartous => "طرطوس",
            Region::Lattakia => "اللاذقية",
            Region::Idleb => "إدلب",
            Region::ArRaqqa => "الرقة",
            Region::DeirEzZor => "دير الزور",
            Region::AlHasakeh => "الحسكة",
        }
    }

    /// Latitude nudge (degrees) applied to the label anchor.
    ///
    /// Damascus is a small polygon enclosed by Rural Damascus; its label moves
    /// north so it does not cover the shape.
    pub fn label_lat_offset(self) -> Option<f64> {
        match self {
            Region::Damascus => Some(0.15),
            _ => None,
        }
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
