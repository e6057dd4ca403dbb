//! Zodiac signs and the degree-to-sign reduction

use serde::{Deserialize, Serialize};
use std::fmt;

/// The twelve zodiac signs, in ecliptic order starting at 0° Aries
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

const ALL_SIGNS: [ZodiacSign; 12] = [
    ZodiacSign::Aries,
    ZodiacSign::Taurus,
    ZodiacSign::Gemini,
    ZodiacSign::Cancer,
    ZodiacSign::Leo,
    ZodiacSign::Virgo,
    ZodiacSign::Libra,
    ZodiacSign::Scorpio,
    ZodiacSign::Sagittarius,
    ZodiacSign::Capricorn,
    ZodiacSign::Aquarius,
    ZodiacSign::Pisces,
];

impl ZodiacSign {
    /// Reduce an ecliptic longitude to its sign
    ///
    /// The longitude is normalized into [0, 360) first, so any finite degree
    /// value maps to exactly one sign (30° per band).
    pub fn from_degree(degree: f64) -> Self {
        let normalized = degree.rem_euclid(360.0);
        let index = (normalized / 30.0).floor() as usize;
        ALL_SIGNS[index.min(11)]
    }

    /// All twelve signs in ecliptic order
    pub fn all() -> impl Iterator<Item = ZodiacSign> {
        ALL_SIGNS.iter().copied()
    }

    /// English sign name, as used for description lookup and display
    pub fn name(&self) -> &'static str {
        match self {
            ZodiacSign::Aries => "Aries",
            ZodiacSign::Taurus => "Taurus",
            ZodiacSign::Gemini => "Gemini",
            ZodiacSign::Cancer => "Cancer",
            ZodiacSign::Leo => "Leo",
            ZodiacSign::Virgo => "Virgo",
            ZodiacSign::Libra => "Libra",
            ZodiacSign::Scorpio => "Scorpio",
            ZodiacSign::Sagittarius => "Sagittarius",
            ZodiacSign::Capricorn => "Capricorn",
            ZodiacSign::Aquarius => "Aquarius",
            ZodiacSign::Pisces => "Pisces",
        }
    }

    /// Parse a sign from its English name (case-insensitive)
    pub fn from_name(name: &str) -> Option<Self> {
        ZodiacSign::all().find(|s| s.name().eq_ignore_ascii_case(name.trim()))
    }
}

impl fmt::Display for ZodiacSign {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
