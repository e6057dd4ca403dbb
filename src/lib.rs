//! Astrobot - conversational natal chart assistant
//!
//! Astrobot collects a birth date, time, and place through a per-user
//! conversation, resolves the place to coordinates and a timezone, computes
//! planetary ecliptic longitudes and the ascendant for that moment, and
//! serves the resulting chart as an interactive read-only view.
//!
//! # Core Concepts
//!
//! - **Strict validation first**: free text becomes typed birth data or a
//!   fixed retry message; session state never moves on bad input
//! - **Explicit session states**: the collection sequence is a tagged state
//!   per user, and a chart can only exist in a completed session
//! - **Collaborators behind traits**: geocoding, timezone lookup, the
//!   ephemeris engine, and the description store are swappable boundaries
//! - **Serialized dispatch**: one actor task processes one event at a time,
//!   so no two events ever race on a session or the ephemeris context
//!
//! # Modules
//!
//! - [`domain`] - bodies, signs, birth input, and chart data
//! - [`validation`] - date and time validators
//! - [`geo`] - place-to-coordinates and coordinates-to-timezone resolution
//! - [`ephemeris`] - ephemeris collaborator trait and the built-in engine
//! - [`descriptions`] - description text store
//! - [`chart`] - the chart computation sequence
//! - [`session`] - per-user session store
//! - [`conversation`] - state machine, presenter, and dispatch actor
//! - [`repl`] - interactive terminal frontend
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod chart;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod descriptions;
pub mod domain;
pub mod ephemeris;
pub mod geo;
pub mod repl;
pub mod session;
pub mod validation;

// Re-export commonly used types
pub use chart::{ChartCalculator, ChartError};
pub use config::{ChartConfig, Config, DescriptionsConfig, GeocoderConfig};
pub use conversation::{ConversationEngine, ConversationHandle, Event, Reply};
pub use descriptions::{DescriptionSource, FALLBACK_DESCRIPTION, SeedEntry, SqliteDescriptions};
pub use domain::{
    Ascendant, BirthDate, BirthInput, BirthTime, CelestialBody, CelestialPosition, ChartPoint, Coordinates,
    NatalChart, ZodiacSign,
};
pub use ephemeris::{Ephemeris, EphemerisError, HouseSystem, MeanEphemeris, ObserverPosition};
pub use geo::{FinderTimezoneLookup, GeoError, GeoResolver, Geocoder, NominatimGeocoder, TimezoneLookup};
pub use session::{Session, SessionState, SessionStore, StateTag, UserId};
pub use validation::{ValidationError, validate_date, validate_time};
