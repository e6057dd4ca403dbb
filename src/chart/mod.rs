//! Chart computation sequence
//!
//! Turns a validated birth moment and resolved coordinates into a full natal
//! chart: timezone localization, UTC conversion, julian day, one ephemeris
//! pass over the ten bodies, the ascendant from the house computation, sign
//! reduction, and description lookup. The whole pass is atomic; any failure
//! yields no partial chart.

use std::sync::{Arc, Mutex};

use chrono::{DateTime, LocalResult, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use thiserror::Error;
use tracing::debug;

use crate::descriptions::{DescriptionError, DescriptionSource, FALLBACK_DESCRIPTION};
use crate::domain::{
    Ascendant, BirthDate, BirthTime, CelestialBody, CelestialPosition, ChartPoint, Coordinates, NatalChart,
    ZodiacSign,
};
use crate::ephemeris::{Ephemeris, EphemerisError, HouseSystem, ObserverPosition, julian_day_utc};
use crate::geo::{GeoError, GeoResolver};

/// Chart computation failures
#[derive(Debug, Error)]
pub enum ChartError {
    #[error(transparent)]
    Geo(#[from] GeoError),

    #[error(transparent)]
    Ephemeris(#[from] EphemerisError),

    #[error(transparent)]
    Descriptions(#[from] DescriptionError),

    #[error("local time {0} does not exist in timezone {1}")]
    NonexistentLocalTime(NaiveDateTime, Tz),

    #[error("ephemeris engine unavailable")]
    EngineUnavailable,
}

/// Computes natal charts through the ephemeris and description collaborators
///
/// The ephemeris sits behind a mutex held across the whole
/// set-observer-then-read-all sequence, so the engine's process-wide observer
/// context is never interleaved between two computations.
pub struct ChartCalculator {
    ephemeris: Mutex<Box<dyn Ephemeris + Send>>,
    descriptions: Arc<dyn DescriptionSource>,
    geo: Arc<GeoResolver>,
    observer_altitude: f64,
}

impl ChartCalculator {
    pub fn new(
        ephemeris: Box<dyn Ephemeris + Send>,
        descriptions: Arc<dyn DescriptionSource>,
        geo: Arc<GeoResolver>,
        observer_altitude: f64,
    ) -> Self {
        Self {
            ephemeris: Mutex::new(ephemeris),
            descriptions,
            geo,
            observer_altitude,
        }
    }

    /// Compute the full chart: ten body positions plus the ascendant
    pub fn compute(&self, date: BirthDate, time: BirthTime, coords: Coordinates) -> Result<NatalChart, ChartError> {
        let jd = self.birth_julian_day(date, time, coords)?;

        let mut engine = self.ephemeris.lock().map_err(|_| ChartError::EngineUnavailable)?;
        let positions = self.positions_at(engine.as_mut(), jd, coords)?;
        let ascendant = self.ascendant_at(engine.as_mut(), jd, coords)?;

        debug!(jd, "compute: chart complete");
        Ok(NatalChart::new(positions, ascendant))
    }

    /// Positions of the ten bodies, in fixed enumeration order
    pub fn compute_positions(
        &self,
        date: BirthDate,
        time: BirthTime,
        coords: Coordinates,
    ) -> Result<Vec<CelestialPosition>, ChartError> {
        let jd = self.birth_julian_day(date, time, coords)?;
        let mut engine = self.ephemeris.lock().map_err(|_| ChartError::EngineUnavailable)?;
        self.positions_at(engine.as_mut(), jd, coords)
    }

    /// The ascendant from the fixed house system
    pub fn compute_ascendant(
        &self,
        date: BirthDate,
        time: BirthTime,
        coords: Coordinates,
    ) -> Result<Ascendant, ChartError> {
        let jd = self.birth_julian_day(date, time, coords)?;
        let mut engine = self.ephemeris.lock().map_err(|_| ChartError::EngineUnavailable)?;
        self.ascendant_at(engine.as_mut(), jd, coords)
    }

    /// Julian day of the birth moment: localized to the birthplace timezone,
    /// converted to UTC, then to julian day. Every ephemeris call of one
    /// chart uses this single value.
    fn birth_julian_day(&self, date: BirthDate, time: BirthTime, coords: Coordinates) -> Result<f64, ChartError> {
        let tz = self.geo.resolve_timezone(coords)?;
        let naive = date.naive().and_time(time.naive());

        let local = match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt,
            // DST fold: take the earlier instant
            LocalResult::Ambiguous(earliest, _) => earliest,
            LocalResult::None => return Err(ChartError::NonexistentLocalTime(naive, tz)),
        };

        let utc: DateTime<Utc> = local.with_timezone(&Utc);
        Ok(julian_day_utc(utc))
    }

    fn positions_at(
        &self,
        engine: &mut dyn Ephemeris,
        jd: f64,
        coords: Coordinates,
    ) -> Result<Vec<CelestialPosition>, ChartError> {
        engine.set_observer(ObserverPosition::at(coords, self.observer_altitude));

        let mut positions = Vec::with_capacity(10);
        for body in CelestialBody::all() {
            let degree = engine.body_position(jd, body)?;
            let sign = ZodiacSign::from_degree(degree);
            let description = self.describe(ChartPoint::Body(body), sign)?;
            positions.push(CelestialPosition {
                body,
                degree,
                sign,
                description,
            });
        }
        Ok(positions)
    }

    fn ascendant_at(
        &self,
        engine: &mut dyn Ephemeris,
        jd: f64,
        coords: Coordinates,
    ) -> Result<Ascendant, ChartError> {
        let houses = engine.house_cusps(jd, coords, HouseSystem::Placidus)?;
        let sign = ZodiacSign::from_degree(houses.ascendant);
        let description = self.describe(ChartPoint::Ascendant, sign)?;
        Ok(Ascendant {
            degree: houses.ascendant,
            sign,
            description,
        })
    }

    /// Description text, degrading to the fixed fallback when absent
    fn describe(&self, point: ChartPoint, sign: ZodiacSign) -> Result<String, ChartError> {
        Ok(self
            .descriptions
            .lookup(point, sign)?
            .unwrap_or_else(|| FALLBACK_DESCRIPTION.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Geocoder, TimezoneLookup};
    use crate::validation::{validate_date, validate_time};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct NoGeocoder;

    #[async_trait]
    impl Geocoder for NoGeocoder {
        async fn geocode(&self, _place: &str) -> Result<Option<Coordinates>, GeoError> {
            Ok(None)
        }
    }

    struct FixedTimezone(Option<&'static str>);

    impl TimezoneLookup for FixedTimezone {
        fn timezone_for(&self, _coords: Coordinates) -> Option<String> {
            self.0.map(str::to_string)
        }
    }

    /// Call log shared between a scripted engine and the test body
    #[derive(Default)]
    struct EphemerisLog {
        body_calls: Vec<(f64, CelestialBody)>,
        house_calls: Vec<f64>,
        observer: Option<ObserverPosition>,
    }

    /// Scripted engine that records every call it receives
    struct ScriptedEphemeris {
        log: Arc<Mutex<EphemerisLog>>,
    }

    impl ScriptedEphemeris {
        fn new() -> (Self, Arc<Mutex<EphemerisLog>>) {
            let log = Arc::new(Mutex::new(EphemerisLog::default()));
            (Self { log: Arc::clone(&log) }, log)
        }
    }

    impl Ephemeris for ScriptedEphemeris {
        fn set_observer(&mut self, observer: ObserverPosition) {
            self.log.lock().unwrap().observer = Some(observer);
        }

        fn body_position(&mut self, jd: f64, body: CelestialBody) -> Result<f64, EphemerisError> {
            self.log.lock().unwrap().body_calls.push((jd, body));
            Ok(body.index() as f64 * 33.0)
        }

        fn house_cusps(
            &mut self,
            jd: f64,
            _coords: Coordinates,
            _system: HouseSystem,
        ) -> Result<crate::ephemeris::Houses, EphemerisError> {
            self.log.lock().unwrap().house_calls.push(jd);
            Ok(crate::ephemeris::Houses {
                ascendant: 123.0,
                midheaven: 33.0,
            })
        }
    }

    struct EmptyDescriptions;

    impl DescriptionSource for EmptyDescriptions {
        fn lookup(&self, _point: ChartPoint, _sign: ZodiacSign) -> Result<Option<String>, DescriptionError> {
            Ok(None)
        }
    }

    struct CountingDescriptions(AtomicUsize);

    impl DescriptionSource for CountingDescriptions {
        fn lookup(&self, point: ChartPoint, sign: ZodiacSign) -> Result<Option<String>, DescriptionError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(Some(format!("{} in {}", point.label(), sign.name())))
        }
    }

    fn resolver(tz: Option<&'static str>) -> Arc<GeoResolver> {
        Arc::new(GeoResolver::new(Arc::new(NoGeocoder), Arc::new(FixedTimezone(tz))))
    }

    fn birth_moment() -> (BirthDate, BirthTime, Coordinates) {
        (
            validate_date("15.06.1990", 2024).unwrap(),
            validate_time("08:45").unwrap(),
            Coordinates::new(55.75, 37.61).unwrap(),
        )
    }

    #[test]
    fn test_full_chart_has_ten_positions_and_ascendant() {
        let (date, time, coords) = birth_moment();
        let (engine, _log) = ScriptedEphemeris::new();
        let calc = ChartCalculator::new(
            Box::new(engine),
            Arc::new(CountingDescriptions(AtomicUsize::new(0))),
            resolver(Some("Europe/Moscow")),
            0.0,
        );

        let chart = calc.compute(date, time, coords).unwrap();
        assert_eq!(chart.positions().len(), 10);
        assert_eq!(chart.positions()[0].body, CelestialBody::Sun);
        assert_eq!(chart.positions()[9].body, CelestialBody::Pluto);
        assert_eq!(chart.ascendant().sign, ZodiacSign::Leo);
        assert_eq!(chart.ascendant().description, "Ascendant in Leo");
    }

    #[test]
    fn test_single_julian_day_for_all_eleven_calls() {
        let (date, time, coords) = birth_moment();
        let (engine, log) = ScriptedEphemeris::new();
        let calc = ChartCalculator::new(
            Box::new(engine),
            Arc::new(EmptyDescriptions),
            resolver(Some("Europe/Moscow")),
            0.0,
        );

        calc.compute(date, time, coords).unwrap();

        let log = log.lock().unwrap();
        assert_eq!(log.body_calls.len(), 10);
        assert_eq!(log.house_calls.len(), 1);

        let jd = log.body_calls[0].0;
        assert!(log.body_calls.iter().all(|(call_jd, _)| *call_jd == jd));
        assert_eq!(log.house_calls[0], jd);

        // The shared julian day reflects the timezone shift away from raw
        // civil time (Moscow summer time in 1990)
        let civil = crate::ephemeris::julian_day(1990, 6, 15, 8.75);
        assert!((jd - civil).abs() > 1e-6);
    }

    #[test]
    fn test_timezone_failure_aborts_whole_chart() {
        let (date, time, coords) = birth_moment();
        let (engine, log) = ScriptedEphemeris::new();
        let calc = ChartCalculator::new(Box::new(engine), Arc::new(EmptyDescriptions), resolver(None), 0.0);

        let err = calc.compute(date, time, coords).unwrap_err();
        assert!(matches!(err, ChartError::Geo(GeoError::TimezoneUnknown)));

        // No ephemeris call happened
        let log = log.lock().unwrap();
        assert!(log.body_calls.is_empty());
        assert!(log.house_calls.is_empty());
    }

    #[test]
    fn test_absent_description_uses_fallback() {
        let (date, time, coords) = birth_moment();
        let (engine, _log) = ScriptedEphemeris::new();
        let calc = ChartCalculator::new(
            Box::new(engine),
            Arc::new(EmptyDescriptions),
            resolver(Some("Europe/Moscow")),
            0.0,
        );

        let chart = calc.compute(date, time, coords).unwrap();
        assert!(chart.positions().iter().all(|p| p.description == FALLBACK_DESCRIPTION));
        assert_eq!(chart.ascendant().description, FALLBACK_DESCRIPTION);
    }

    #[test]
    fn test_observer_context_set_from_coordinates() {
        let (date, time, coords) = birth_moment();
        let (engine, log) = ScriptedEphemeris::new();
        let calc = ChartCalculator::new(
            Box::new(engine),
            Arc::new(EmptyDescriptions),
            resolver(Some("Europe/Moscow")),
            120.0,
        );

        calc.compute(date, time, coords).unwrap();

        let observer = log.lock().unwrap().observer.unwrap();
        assert_eq!(observer.latitude, 55.75);
        assert_eq!(observer.longitude, 37.61);
        assert_eq!(observer.altitude, 120.0);
    }
}
