//! Offline coordinate-to-timezone lookup

use tzf_rs::DefaultFinder;

use crate::domain::Coordinates;

use super::TimezoneLookup;

/// Timezone source backed by the embedded tzf dataset
///
/// Construction parses the bundled polygon data, so build one finder and
/// share it rather than creating one per lookup.
pub struct FinderTimezoneLookup {
    finder: DefaultFinder,
}

impl FinderTimezoneLookup {
    pub fn new() -> Self {
        Self {
            finder: DefaultFinder::new(),
        }
    }
}

impl Default for FinderTimezoneLookup {
    fn default() -> Self {
        Self::new()
    }
}

impl TimezoneLookup for FinderTimezoneLookup {
    fn timezone_for(&self, coords: Coordinates) -> Option<String> {
        let name = self.finder.get_tz_name(coords.longitude, coords.latitude);
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_city_zones() {
        let finder = FinderTimezoneLookup::new();

        let moscow = Coordinates::new(55.7558, 37.6173).unwrap();
        assert_eq!(finder.timezone_for(moscow).as_deref(), Some("Europe/Moscow"));

        let berlin = Coordinates::new(52.52, 13.405).unwrap();
        assert_eq!(finder.timezone_for(berlin).as_deref(), Some("Europe/Berlin"));
    }
}
