//! Geographic resolution: place text to coordinates, coordinates to timezone
//!
//! Both lookups are single round-trips to collaborators behind traits; a
//! failed lookup propagates immediately with no retry, and the conversation
//! engine turns it into a retry prompt for the user.

mod nominatim;
mod timezone;

pub use nominatim::NominatimGeocoder;
pub use timezone::FinderTimezoneLookup;

use std::sync::Arc;

use async_trait::async_trait;
use chrono_tz::Tz;
use thiserror::Error;

use crate::domain::Coordinates;

/// Geographic resolution failures
#[derive(Debug, Error)]
pub enum GeoError {
    #[error("place not found")]
    PlaceNotFound,

    #[error("timezone could not be determined")]
    TimezoneUnknown,

    #[error("geocoder transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("malformed geocoder response: {0}")]
    Malformed(String),
}

/// Forward geocoding collaborator
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Coordinates for a free-text place name, or `None` when unresolvable
    async fn geocode(&self, place: &str) -> Result<Option<Coordinates>, GeoError>;
}

/// Coordinate-to-timezone collaborator
pub trait TimezoneLookup: Send + Sync {
    /// IANA zone id for a location, or `None` when undetermined
    fn timezone_for(&self, coords: Coordinates) -> Option<String>;
}

/// Combined resolver owning one geocoder and one timezone source
pub struct GeoResolver {
    geocoder: Arc<dyn Geocoder>,
    timezones: Arc<dyn TimezoneLookup>,
}

impl GeoResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>, timezones: Arc<dyn TimezoneLookup>) -> Self {
        Self { geocoder, timezones }
    }

    /// Resolve a place name to coordinates; an empty result is an error
    pub async fn resolve_coordinates(&self, place: &str) -> Result<Coordinates, GeoError> {
        match self.geocoder.geocode(place).await? {
            Some(coords) => Ok(coords),
            None => Err(GeoError::PlaceNotFound),
        }
    }

    /// Resolve a location to a parsed IANA timezone
    pub fn resolve_timezone(&self, coords: Coordinates) -> Result<Tz, GeoError> {
        let name = self.timezones.timezone_for(coords).ok_or(GeoError::TimezoneUnknown)?;
        name.parse::<Tz>().map_err(|_| GeoError::TimezoneUnknown)
    }
}
