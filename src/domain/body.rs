//! Celestial bodies and chart points
//!
//! `CelestialBody` carries the ephemeris body index (0–9, Sun through Pluto).
//! `ChartPoint` is the strongly-typed key used for description lookup and for
//! selection labels, covering the ten bodies plus the ascendant.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The ten bodies of a natal chart, in fixed computation order
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum CelestialBody {
    Sun = 0,
    Moon = 1,
    Mercury = 2,
    Venus = 3,
    Mars = 4,
    Jupiter = 5,
    Saturn = 6,
    Uranus = 7,
    Neptune = 8,
    Pluto = 9,
}

const ALL_BODIES: [CelestialBody; 10] = [
    CelestialBody::Sun,
    CelestialBody::Moon,
    CelestialBody::Mercury,
    CelestialBody::Venus,
    CelestialBody::Mars,
    CelestialBody::Jupiter,
    CelestialBody::Saturn,
    CelestialBody::Uranus,
    CelestialBody::Neptune,
    CelestialBody::Pluto,
];

impl CelestialBody {
    /// All bodies in computation order
    pub fn all() -> impl Iterator<Item = CelestialBody> {
        ALL_BODIES.iter().copied()
    }

    /// Ephemeris body index (Sun = 0 .. Pluto = 9)
    pub fn index(&self) -> u8 {
        *self as u8
    }

    /// English body name
    pub fn name(&self) -> &'static str {
        match self {
            CelestialBody::Sun => "Sun",
            CelestialBody::Moon => "Moon",
            CelestialBody::Mercury => "Mercury",
            CelestialBody::Venus => "Venus",
            CelestialBody::Mars => "Mars",
            CelestialBody::Jupiter => "Jupiter",
            CelestialBody::Saturn => "Saturn",
            CelestialBody::Uranus => "Uranus",
            CelestialBody::Neptune => "Neptune",
            CelestialBody::Pluto => "Pluto",
        }
    }
}

impl fmt::Display for CelestialBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A selectable point of the chart: one of the ten bodies, or the ascendant
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartPoint {
    Body(CelestialBody),
    Ascendant,
}

impl ChartPoint {
    /// Every chart point in presentation order (bodies first, ascendant last)
    pub fn all() -> impl Iterator<Item = ChartPoint> {
        CelestialBody::all()
            .map(ChartPoint::Body)
            .chain(std::iter::once(ChartPoint::Ascendant))
    }

    /// The label shown to the user and used as the description lookup key
    pub fn label(&self) -> &'static str {
        match self {
            ChartPoint::Body(body) => body.name(),
            ChartPoint::Ascendant => "Ascendant",
        }
    }

    /// Resolve a selection label back to a chart point (case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        ChartPoint::all().find(|p| p.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl fmt::Display for ChartPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
