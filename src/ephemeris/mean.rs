//! Built-in analytic ephemeris
//!
//! Low-precision but fully deterministic engine: the Sun from the standard
//! solar longitude series, the Moon from a truncated lunar series, and the
//! planets from mean Keplerian elements (valid 1800–2050) referred to the
//! Earth-Moon barycenter. House angles come from local sidereal time and the
//! mean obliquity. Accuracy is on the order of arcminutes, which is far
//! inside a 30° sign band.

use crate::domain::{CelestialBody, Coordinates};

use super::{Ephemeris, EphemerisError, Houses, HouseSystem, ObserverPosition};

const J2000: f64 = 2_451_545.0;

fn norm_deg(degrees: f64) -> f64 {
    degrees.rem_euclid(360.0)
}

/// Keplerian elements and their per-century rates (J2000 ecliptic)
struct OrbitalElements {
    a: [f64; 2],
    e: [f64; 2],
    i: [f64; 2],
    l: [f64; 2],
    peri: [f64; 2],
    node: [f64; 2],
}

const MERCURY: OrbitalElements = OrbitalElements {
    a: [0.387_099_27, 0.000_000_37],
    e: [0.205_635_93, 0.000_019_06],
    i: [7.004_979_02, -0.005_947_49],
    l: [252.250_323_50, 149_472.674_111_75],
    peri: [77.457_796_28, 0.160_476_89],
    node: [48.330_765_93, -0.125_340_81],
};

const VENUS: OrbitalElements = OrbitalElements {
    a: [0.723_335_66, 0.000_003_90],
    e: [0.006_776_72, -0.000_041_07],
    i: [3.394_676_05, -0.000_788_90],
    l: [181.979_099_50, 58_517.815_387_29],
    peri: [131.602_467_18, 0.002_683_29],
    node: [76.679_842_55, -0.277_694_18],
};

const EARTH_MOON_BARYCENTER: OrbitalElements = OrbitalElements {
    a: [1.000_002_61, 0.000_005_62],
    e: [0.016_711_23, -0.000_043_92],
    i: [-0.000_015_31, -0.012_946_68],
    l: [100.464_571_66, 35_999.372_449_81],
    peri: [102.937_681_93, 0.323_273_64],
    node: [0.0, 0.0],
};

const MARS: OrbitalElements = OrbitalElements {
    a: [1.523_710_34, 0.000_018_47],
    e: [0.093_394_10, 0.000_078_82],
    i: [1.849_691_42, -0.008_131_31],
    l: [-4.553_432_05, 19_140.302_684_99],
    peri: [-23.943_629_59, 0.444_410_88],
    node: [49.559_538_91, -0.292_573_43],
};

const JUPITER: OrbitalElements = OrbitalElements {
    a: [5.202_887_00, -0.000_116_07],
    e: [0.048_386_24, -0.000_132_53],
    i: [1.304_396_95, -0.001_837_14],
    l: [34.396_440_51, 3_034.746_127_75],
    peri: [14.728_479_83, 0.212_526_68],
    node: [100.473_909_09, 0.204_691_06],
};

const SATURN: OrbitalElements = OrbitalElements {
    a: [9.536_675_94, -0.001_250_60],
    e: [0.053_861_79, -0.000_509_91],
    i: [2.485_991_87, 0.001_936_09],
    l: [49.954_244_23, 1_222.493_622_01],
    peri: [92.598_878_31, -0.418_972_16],
    node: [113.662_424_48, -0.288_677_94],
};

const URANUS: OrbitalElements = OrbitalElements {
    a: [19.189_164_64, -0.001_961_76],
    e: [0.047_257_44, -0.000_043_97],
    i: [0.772_637_83, -0.002_429_39],
    l: [313.238_104_51, 428.482_027_85],
    peri: [170.954_276_30, 0.408_052_81],
    node: [74.016_925_03, 0.042_405_89],
};

const NEPTUNE: OrbitalElements = OrbitalElements {
    a: [30.069_922_76, 0.000_262_91],
    e: [0.008_590_48, 0.000_051_05],
    i: [1.770_043_47, 0.000_353_72],
    l: [-55.120_029_69, 218.459_453_25],
    peri: [44.964_762_27, -0.322_414_64],
    node: [131.784_225_74, -0.005_086_64],
};

const PLUTO: OrbitalElements = OrbitalElements {
    a: [39.482_116_75, -0.000_315_96],
    e: [0.248_827_30, 0.000_051_70],
    i: [17.140_012_06, 0.000_048_18],
    l: [238.929_038_33, 145.207_805_15],
    peri: [224.068_916_29, -0.040_629_42],
    node: [110.303_936_84, -0.011_834_82],
};

fn planet_elements(body: CelestialBody) -> Option<&'static OrbitalElements> {
    match body {
        CelestialBody::Mercury => Some(&MERCURY),
        CelestialBody::Venus => Some(&VENUS),
        CelestialBody::Mars => Some(&MARS),
        CelestialBody::Jupiter => Some(&JUPITER),
        CelestialBody::Saturn => Some(&SATURN),
        CelestialBody::Uranus => Some(&URANUS),
        CelestialBody::Neptune => Some(&NEPTUNE),
        CelestialBody::Pluto => Some(&PLUTO),
        CelestialBody::Sun | CelestialBody::Moon => None,
    }
}

/// Solve Kepler's equation for the eccentric anomaly (radians)
fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> Option<f64> {
    let mut eccentric = mean_anomaly + eccentricity * mean_anomaly.sin();
    for _ in 0..30 {
        let delta = (mean_anomaly - (eccentric - eccentricity * eccentric.sin()))
            / (1.0 - eccentricity * eccentric.cos());
        eccentric += delta;
        if delta.abs() < 1e-9 {
            return Some(eccentric);
        }
    }
    None
}

/// Heliocentric ecliptic position of a body from its mean elements
fn heliocentric_position(elements: &OrbitalElements, t: f64) -> Option<[f64; 3]> {
    let a = elements.a[0] + elements.a[1] * t;
    let e = elements.e[0] + elements.e[1] * t;
    let i = (elements.i[0] + elements.i[1] * t).to_radians();
    let l = elements.l[0] + elements.l[1] * t;
    let peri = elements.peri[0] + elements.peri[1] * t;
    let node = (elements.node[0] + elements.node[1] * t).to_radians();

    let mean_anomaly = norm_deg(l - peri).to_radians();
    let omega = (peri).to_radians() - node;

    let eccentric = solve_kepler(mean_anomaly, e)?;

    let xp = a * (eccentric.cos() - e);
    let yp = a * (1.0 - e * e).sqrt() * eccentric.sin();

    let (sin_o, cos_o) = omega.sin_cos();
    let (sin_n, cos_n) = node.sin_cos();
    let (sin_i, cos_i) = i.sin_cos();

    let x = (cos_o * cos_n - sin_o * sin_n * cos_i) * xp + (-sin_o * cos_n - cos_o * sin_n * cos_i) * yp;
    let y = (cos_o * sin_n + sin_o * cos_n * cos_i) * xp + (-sin_o * sin_n + cos_o * cos_n * cos_i) * yp;
    let z = (sin_o * sin_i) * xp + (cos_o * sin_i) * yp;

    Some([x, y, z])
}

/// Geometric solar longitude from the standard low-precision series
fn solar_longitude(t: f64) -> f64 {
    let l0 = 280.46646 + 36_000.76983 * t + 0.000_303_2 * t * t;
    let m = (357.52911 + 35_999.05029 * t - 0.000_153_7 * t * t).to_radians();

    let center = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * m.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * m).sin()
        + 0.000_289 * (3.0 * m).sin();

    norm_deg(l0 + center)
}

/// Lunar ecliptic longitude from the principal series terms
fn lunar_longitude(t: f64) -> f64 {
    let lp = norm_deg(218.316_447_7 + 481_267.881_234_21 * t);
    let d = norm_deg(297.850_192_1 + 445_267.111_403_4 * t).to_radians();
    let m = norm_deg(357.529_109_2 + 35_999.050_290_9 * t).to_radians();
    let mp = norm_deg(134.963_396_4 + 477_198.867_505_5 * t).to_radians();
    let f = norm_deg(93.272_095_0 + 483_202.017_523_3 * t).to_radians();

    let correction = 6.288_774 * mp.sin()
        + 1.274_027 * (2.0 * d - mp).sin()
        + 0.658_314 * (2.0 * d).sin()
        + 0.213_618 * (2.0 * mp).sin()
        - 0.185_116 * m.sin()
        - 0.114_332 * (2.0 * f).sin()
        + 0.058_793 * (2.0 * d - 2.0 * mp).sin()
        + 0.057_066 * (2.0 * d - m - mp).sin()
        + 0.053_322 * (2.0 * d + mp).sin()
        + 0.045_758 * (2.0 * d - m).sin();

    norm_deg(lp + correction)
}

/// Greenwich mean sidereal time in degrees
fn gmst_degrees(julian_day: f64) -> f64 {
    let t = (julian_day - J2000) / 36_525.0;
    norm_deg(
        280.460_618_37 + 360.985_647_366_29 * (julian_day - J2000) + 0.000_387_933 * t * t
            - t * t * t / 38_710_000.0,
    )
}

/// Mean obliquity of the ecliptic in radians
fn obliquity(t: f64) -> f64 {
    (23.439_291_1 - 0.013_004_2 * t - 1.64e-7 * t * t).to_radians()
}

/// Mean-element ephemeris engine
///
/// Output longitudes are geocentric; the observer context is kept for the
/// collaborator contract, and its parallax effect is below the model's
/// resolution.
#[derive(Debug, Default)]
pub struct MeanEphemeris {
    observer: Option<ObserverPosition>,
}

impl MeanEphemeris {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently configured observer context, if any
    pub fn observer(&self) -> Option<ObserverPosition> {
        self.observer
    }
}

impl Ephemeris for MeanEphemeris {
    fn set_observer(&mut self, observer: ObserverPosition) {
        self.observer = Some(observer);
    }

    fn body_position(&mut self, julian_day: f64, body: CelestialBody) -> Result<f64, EphemerisError> {
        let t = (julian_day - J2000) / 36_525.0;

        match body {
            CelestialBody::Sun => Ok(solar_longitude(t)),
            CelestialBody::Moon => Ok(lunar_longitude(t)),
            planet => {
                let elements = planet_elements(planet).ok_or_else(|| EphemerisError::Calculation {
                    body: planet,
                    message: "no orbital model".to_string(),
                })?;

                let kepler_failed = || EphemerisError::Calculation {
                    body: planet,
                    message: "Kepler iteration did not converge".to_string(),
                };

                let helio = heliocentric_position(elements, t).ok_or_else(kepler_failed)?;
                let earth = heliocentric_position(&EARTH_MOON_BARYCENTER, t).ok_or_else(kepler_failed)?;

                let x = helio[0] - earth[0];
                let y = helio[1] - earth[1];
                Ok(norm_deg(y.atan2(x).to_degrees()))
            }
        }
    }

    fn house_cusps(
        &mut self,
        julian_day: f64,
        coords: Coordinates,
        _system: HouseSystem,
    ) -> Result<Houses, EphemerisError> {
        let t = (julian_day - J2000) / 36_525.0;
        let theta = norm_deg(gmst_degrees(julian_day) + coords.longitude).to_radians();
        let eps = obliquity(t);
        let phi = coords.latitude.to_radians();

        let ascendant = norm_deg(
            theta
                .cos()
                .atan2(-(theta.sin() * eps.cos() + phi.tan() * eps.sin()))
                .to_degrees(),
        );
        let midheaven = norm_deg(theta.sin().atan2(theta.cos() * eps.cos()).to_degrees());

        if !ascendant.is_finite() {
            return Err(EphemerisError::Houses(format!(
                "ascendant undefined at latitude {}",
                coords.latitude
            )));
        }

        Ok(Houses { ascendant, midheaven })
    }
}
