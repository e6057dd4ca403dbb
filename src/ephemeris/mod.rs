//! Ephemeris collaborator boundary
//!
//! The chart calculator talks to the ephemeris engine only through the
//! [`Ephemeris`] trait: an observer-context setter, per-body ecliptic
//! longitudes by julian day, and a house computation that yields the
//! ascendant. The built-in [`MeanEphemeris`] is a low-precision analytic
//! engine so the binary works without external data files; any other engine
//! (e.g. a Swiss Ephemeris binding) can be dropped in behind the same trait.
//!
//! The observer context is engine-wide mutable state. Callers must hold one
//! lock around the whole set-observer-then-read-all sequence; the calculator
//! does exactly that.

mod julian;
mod mean;

pub use julian::{julian_day, julian_day_utc};
pub use mean::MeanEphemeris;

use thiserror::Error;

use crate::domain::{CelestialBody, Coordinates};

/// Errors from the ephemeris engine
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("calculation failed for {body}: {message}")]
    Calculation { body: CelestialBody, message: String },

    #[error("house calculation failed: {0}")]
    Houses(String),
}

/// Observer location for topocentric computation context
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ObserverPosition {
    pub longitude: f64,
    pub latitude: f64,
    /// Meters above sea level
    pub altitude: f64,
}

impl ObserverPosition {
    pub fn at(coords: Coordinates, altitude: f64) -> Self {
        Self {
            longitude: coords.longitude,
            latitude: coords.latitude,
            altitude,
        }
    }
}

/// House system for the ascendant computation
///
/// Only Placidus is supported; the variant exists so the wire contract with
/// the engine stays explicit.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum HouseSystem {
    Placidus,
}

impl HouseSystem {
    /// Single-byte system code as used by ephemeris engines
    pub fn code(&self) -> u8 {
        match self {
            HouseSystem::Placidus => b'P',
        }
    }
}

/// Result of a house computation: the two chart angles
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Houses {
    /// Ecliptic longitude of the ascendant, in [0, 360)
    pub ascendant: f64,
    /// Ecliptic longitude of the midheaven, in [0, 360)
    pub midheaven: f64,
}

/// Black-box ephemeris engine contract
///
/// Methods take `&mut self` because real engines keep process-wide context
/// (observer location, data file handles). Serialization of full computation
/// passes is the caller's responsibility.
pub trait Ephemeris {
    /// Set the topocentric observer context for subsequent body reads
    fn set_observer(&mut self, observer: ObserverPosition);

    /// Ecliptic longitude of one body at a julian day, in [0, 360)
    fn body_position(&mut self, julian_day: f64, body: CelestialBody) -> Result<f64, EphemerisError>;

    /// House angles at a julian day and location
    fn house_cusps(
        &mut self,
        julian_day: f64,
        coords: Coordinates,
        system: HouseSystem,
    ) -> Result<Houses, EphemerisError>;
}
