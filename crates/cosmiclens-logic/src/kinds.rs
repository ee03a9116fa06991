//! Cosmic object kinds: the closed set of things a scene can contain.
//!
//! Each kind carries its own presentation parameters:
//! - a display-name pool, cycled in creation order by the scene generator
//! - a magnitude range (a fixed size when the range is degenerate)
//! - a tint palette

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Category of a placed cosmic object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CosmicKind {
    Star,
    Planet,
    Nebula,
    Anomaly,
    BlackHole,
}

impl CosmicKind {
    /// All kinds, in the order used for uniform random selection.
    pub const ALL: [CosmicKind; 5] = [
        CosmicKind::Star,
        CosmicKind::Planet,
        CosmicKind::Nebula,
        CosmicKind::Anomaly,
        CosmicKind::BlackHole,
    ];

    pub const COUNT: usize = Self::ALL.len();

    /// Position of this kind in [`CosmicKind::ALL`].
    pub fn index(self) -> usize {
        match self {
            CosmicKind::Star => 0,
            CosmicKind::Planet => 1,
            CosmicKind::Nebula => 2,
            CosmicKind::Anomaly => 3,
            CosmicKind::BlackHole => 4,
        }
    }

    /// Stable upper-case tag, used as the archive key for per-kind fallbacks
    /// and in provider prompts.
    pub fn tag(self) -> &'static str {
        match self {
            CosmicKind::Star => "STAR",
            CosmicKind::Planet => "PLANET",
            CosmicKind::Nebula => "NEBULA",
            CosmicKind::Anomaly => "ANOMALY",
            CosmicKind::BlackHole => "BLACK_HOLE",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            CosmicKind::Star => "Star",
            CosmicKind::Planet => "Planet",
            CosmicKind::Nebula => "Nebula",
            CosmicKind::Anomaly => "Anomaly",
            CosmicKind::BlackHole => "Black Hole",
        }
    }

    /// Display names handed out to entities of this kind, in cycling order.
    pub fn name_pool(self) -> &'static [&'static str] {
        match self {
            CosmicKind::Star => STAR_NAMES,
            CosmicKind::Planet => PLANET_NAMES,
            CosmicKind::Nebula => NEBULA_NAMES,
            CosmicKind::Anomaly => ANOMALY_NAMES,
            CosmicKind::BlackHole => BLACK_HOLE_NAMES,
        }
    }

    /// Inclusive-exclusive magnitude range. `min == max` means a fixed size.
    pub fn magnitude_range(self) -> (f64, f64) {
        match self {
            CosmicKind::Star => (2.0, 6.0),
            CosmicKind::Planet => (8.0, 20.0),
            CosmicKind::Nebula => (20.0, 50.0),
            CosmicKind::Anomaly => (10.0, 10.0),
            CosmicKind::BlackHole => (15.0, 15.0),
        }
    }

    /// Tint palette for this kind. Never empty.
    pub fn palette(self) -> &'static [Tint] {
        match self {
            CosmicKind::Star => STAR_PALETTE,
            CosmicKind::Planet => PLANET_PALETTE,
            CosmicKind::Nebula => NEBULA_PALETTE,
            CosmicKind::Anomaly => ANOMALY_PALETTE,
            CosmicKind::BlackHole => BLACK_HOLE_PALETTE,
        }
    }

    /// Parse a tag or label, case-insensitively.
    pub fn parse(s: &str) -> Option<CosmicKind> {
        let wanted = s.trim();
        Self::ALL.into_iter().find(|k| {
            k.tag().eq_ignore_ascii_case(wanted) || k.label().eq_ignore_ascii_case(wanted)
        })
    }
}

impl fmt::Display for CosmicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

// ── Tint ────────────────────────────────────────────────────────────────

/// 24-bit RGB colour, rendered as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tint(pub u32);

impl Tint {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Tint(((r as u32) << 16) | ((g as u32) << 8) | b as u32)
    }

    pub fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn b(self) -> u8 {
        self.0 as u8
    }
}

impl fmt::Display for Tint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06X}", self.0 & 0x00FF_FFFF)
    }
}

/// Error returned when a tint string is not `#RGB` or `#RRGGBB`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid tint '{0}', expected #RGB or #RRGGBB")]
pub struct ParseTintError(String);

impl FromStr for Tint {
    type Err = ParseTintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseTintError(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        match hex.len() {
            6 => u32::from_str_radix(hex, 16).map(Tint).map_err(|_| err()),
            3 => {
                // #abc → #aabbcc
                let expanded: String = hex.chars().flat_map(|c| [c, c]).collect();
                u32::from_str_radix(&expanded, 16)
                    .map(Tint)
                    .map_err(|_| err())
            }
            _ => Err(err()),
        }
    }
}

impl Serialize for Tint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Tint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

// ── Pools & palettes ────────────────────────────────────────────────────

static STAR_NAMES: &[&str] = &[
    "Distant Star",
    "Betelgeuse",
    "Sirius",
    "Proxima Centauri",
    "Vega",
    "Polaris",
    "Rigel",
    "Aldebaran",
    "Antares",
    "Canopus",
];

static PLANET_NAMES: &[&str] = &[
    "Exoplanet",
    "Kepler-22b",
    "TRAPPIST-1e",
    "Gliese 581g",
    "HD 209458 b",
    "Proxima Centauri b",
    "Kepler-452b",
    "WASP-121b",
];

static NEBULA_NAMES: &[&str] = &[
    "Nebula Cloud",
    "Crab Nebula",
    "Orion Nebula",
    "Helix Nebula",
    "Ring Nebula",
    "Horsehead Nebula",
];

static ANOMALY_NAMES: &[&str] = &[
    "Cosmic Anomaly",
    "Tabby's Star",
    "Fast Radio Burst",
    "Gamma-Ray Burst",
    "Oumuamua",
];

static BLACK_HOLE_NAMES: &[&str] = &[
    "Singularity",
    "Sagittarius A*",
    "M87*",
    "Cygnus X-1",
    "V404 Cygni",
];

static STAR_PALETTE: &[Tint] = &[
    Tint::rgb(0xFF, 0xFF, 0xFF),
    Tint::rgb(0xA5, 0xF2, 0xF3),
    Tint::rgb(0xFF, 0xEB, 0xAE),
    Tint::rgb(0xFF, 0xD1, 0xD1),
];

static PLANET_PALETTE: &[Tint] = &[
    Tint::rgb(0xFF, 0x6B, 0x6B),
    Tint::rgb(0x4E, 0xCD, 0xC4),
    Tint::rgb(0x45, 0xB7, 0xD1),
    Tint::rgb(0x96, 0xCE, 0xB4),
    Tint::rgb(0xD4, 0xA5, 0xA5),
];

static NEBULA_PALETTE: &[Tint] = &[
    Tint::rgb(0xFF, 0x00, 0xFF),
    Tint::rgb(0x00, 0xFF, 0xFF),
    Tint::rgb(0x7B, 0x68, 0xEE),
];

static ANOMALY_PALETTE: &[Tint] = &[Tint::rgb(0x00, 0xFF, 0x00)];

static BLACK_HOLE_PALETTE: &[Tint] = &[Tint::rgb(0x00, 0x00, 0x00)];
