//! Core domain types for natal chart computation
//!
//! Everything here is plain data: bodies, signs, validated birth input, and
//! the computed chart. No collaborator calls happen in this module.

mod body;
mod chart;
mod sign;

pub use body::{CelestialBody, ChartPoint};
pub use chart::{
    Ascendant, BirthDate, BirthInput, BirthTime, CelestialPosition, Coordinates, CoordinatesError, NatalChart,
};
pub use sign::ZodiacSign;
