//! Validated birth input and computed chart data

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::body::{CelestialBody, ChartPoint};
use super::sign::ZodiacSign;

/// A validated birth date
///
/// Only constructed by the date validator, so holders can rely on it being a
/// real calendar date within the supported year range.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    pub(crate) fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn day(&self) -> u32 {
        self.0.day()
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }
}

/// A validated birth time (hour 0–23, minute 0–59)
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthTime {
    hour: u32,
    minute: u32,
}

impl BirthTime {
    pub(crate) fn new(hour: u32, minute: u32) -> Self {
        debug_assert!(hour <= 23 && minute <= 59);
        Self { hour, minute }
    }

    pub fn hour(&self) -> u32 {
        self.hour
    }

    pub fn minute(&self) -> u32 {
        self.minute
    }

    pub fn naive(&self) -> NaiveTime {
        NaiveTime::from_hms_opt(self.hour, self.minute, 0).unwrap_or(NaiveTime::MIN)
    }
}

/// Complete, validated birth data for one chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthInput {
    pub date: BirthDate,
    pub time: BirthTime,
    pub place: String,
}

impl BirthInput {
    /// The civil birth moment with no timezone attached
    pub fn naive_datetime(&self) -> NaiveDateTime {
        self.date.naive().and_time(self.time.naive())
    }
}

/// Geographic coordinates resolved from the birth place
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Coordinate construction failure
#[derive(Debug, Error, PartialEq)]
pub enum CoordinatesError {
    #[error("latitude {0} outside [-90, 90]")]
    Latitude(f64),
    #[error("longitude {0} outside [-180, 180]")]
    Longitude(f64),
}

impl Coordinates {
    /// Build coordinates, rejecting out-of-range values
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoordinatesError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(CoordinatesError::Latitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(CoordinatesError::Longitude(longitude));
        }
        Ok(Self { latitude, longitude })
    }
}

/// One computed position: a body, its ecliptic longitude, sign, and text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelestialPosition {
    pub body: CelestialBody,
    pub degree: f64,
    pub sign: ZodiacSign,
    pub description: String,
}

/// The ascendant: same shape as a body position, computed from houses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ascendant {
    pub degree: f64,
    pub sign: ZodiacSign,
    pub description: String,
}

/// A complete natal chart: ten body positions plus the ascendant
///
/// Immutable once computed; positions are stored in body computation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NatalChart {
    positions: Vec<CelestialPosition>,
    ascendant: Ascendant,
}

impl NatalChart {
    pub fn new(positions: Vec<CelestialPosition>, ascendant: Ascendant) -> Self {
        debug_assert_eq!(positions.len(), 10);
        Self { positions, ascendant }
    }

    /// Positions in body computation order
    pub fn positions(&self) -> &[CelestialPosition] {
        &self.positions
    }

    /// Look up one body's stored position
    pub fn position(&self, body: CelestialBody) -> Option<&CelestialPosition> {
        self.positions.iter().find(|p| p.body == body)
    }

    pub fn ascendant(&self) -> &Ascendant {
        &self.ascendant
    }

    /// Degree and sign of a selectable point, with its description
    pub fn point(&self, point: ChartPoint) -> Option<(f64, ZodiacSign, &str)> {
        match point {
            ChartPoint::Body(body) => self
                .position(body)
                .map(|p| (p.degree, p.sign, p.description.as_str())),
            ChartPoint::Ascendant => Some((
                self.ascendant.degree,
                self.ascendant.sign,
                self.ascendant.description.as_str(),
            )),
        }
    }
}
