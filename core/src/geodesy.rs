//! Great-circle distance and initial bearing on a spherical Earth.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::Country;

/// Earth radius used for every reported distance. Not the IUGG mean radius.
pub const EARTH_RADIUS_KM: f64 = 6378.8;

/// Anything with a latitude/longitude in degrees.
pub trait GeoPoint {
    fn latitude(&self) -> f64;
    fn longitude(&self) -> f64;
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

impl GeoPoint for Coordinates {
    fn latitude(&self) -> f64 {
        self.latitude
    }

    fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl GeoPoint for Country {
    fn latitude(&self) -> f64 {
        self.latitude
    }

    fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Spherical law of cosines. The cosine term is clamped so coincident points
/// give 0 instead of NaN.
pub fn distance_km<A, B>(a: &A, b: &B) -> f64
where
    A: GeoPoint + ?Sized,
    B: GeoPoint + ?Sized,
{
    let lat1 = a.latitude().to_radians();
    let lon1 = a.longitude().to_radians();
    let lat2 = b.latitude().to_radians();
    let lon2 = b.longitude().to_radians();

    let cosine = lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * (lon2 - lon1).cos();
    EARTH_RADIUS_KM * cosine.clamp(-1.0, 1.0).acos()
}

/// Initial compass bearing from `from` toward `to`, in `[0, 360)`.
///
/// Coincident points are not special-cased; the result for them is whatever
/// `atan2` makes of the rounding noise.
pub fn bearing_degrees<A, B>(from: &A, to: &B) -> f64
where
    A: GeoPoint + ?Sized,
    B: GeoPoint + ?Sized,
{
    let lat1 = from.latitude().to_radians();
    let lon1 = from.longitude().to_radians();
    let lat2 = to.latitude().to_radians();
    let lon2 = to.longitude().to_radians();
    let delta_lon = lon2 - lon1;

    let y = delta_lon.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * delta_lon.cos();
    let degrees = y.atan2(x).to_degrees();

    if degrees < 0.0 {
        // tiny negatives round up to exactly 360.0
        let shifted = degrees + 360.0;
        if shifted >= 360.0 { 0.0 } else { shifted }
    } else {
        degrees
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompassPoint {
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
    NorthWest,
}

impl CompassPoint {
    const ORDER: [CompassPoint; 8] = [
        CompassPoint::North,
        CompassPoint::NorthEast,
        CompassPoint::East,
        CompassPoint::SouthEast,
        CompassPoint::South,
        CompassPoint::SouthWest,
        CompassPoint::West,
        CompassPoint::NorthWest,
    ];

    /// 45° sectors centred on each point, so 22.5 is the first NE bearing.
    pub fn from_bearing(bearing: f64) -> Self {
        let normalised = bearing.rem_euclid(360.0);
        let sector = ((normalised + 22.5) / 45.0).floor() as usize % 8;
        Self::ORDER[sector]
    }

    pub fn abbreviation(&self) -> &'static str {
        match self {
            CompassPoint::North => "N",
            CompassPoint::NorthEast => "NE",
            CompassPoint::East => "E",
            CompassPoint::SouthEast => "SE",
            CompassPoint::South => "S",
            CompassPoint::SouthWest => "SW",
            CompassPoint::West => "W",
            CompassPoint::NorthWest => "NW",
        }
    }

    pub fn arrow(&self) -> char {
        match self {
            CompassPoint::North => '↑',
            CompassPoint::NorthEast => '↗',
            CompassPoint::East => '→',
            CompassPoint::SouthEast => '↘',
            CompassPoint::South => '↓',
            CompassPoint::SouthWest => '↙',
            CompassPoint::West => '←',
            CompassPoint::NorthWest => '↖',
        }
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRANCE: Coordinates = Coordinates {
        latitude: 46.2276,
        longitude: 2.2137,
    };
    const GERMANY: Coordinates = Coordinates {
        latitude: 51.1657,
        longitude: 10.4515,
    };

    fn law_of_cosines(a: Coordinates, b: Coordinates) -> f64 {
        let (p1, p2) = (a.latitude.to_radians(), b.latitude.to_radians());
        let dl = (b.longitude - a.longitude).to_radians();
        6378.8 * (p1.sin() * p2.sin() + p1.cos() * p2.cos() * dl.cos()).acos()
    }

    #[test]
    fn france_to_germany_matches_declared_radius() {
        let distance = distance_km(&FRANCE, &GERMANY);
        assert!((distance - law_of_cosines(FRANCE, GERMANY)).abs() < 1e-9);
        assert!((distance - 816.83).abs() < 0.01, "got {distance}");
    }

    #[test]
    fn identical_points_are_zero_apart() {
        for point in [
            FRANCE,
            GERMANY,
            Coordinates::new(0.0, 0.0),
            Coordinates::new(89.9999, -179.9999),
            Coordinates::new(-33.856784, 151.215297),
        ] {
            let distance = distance_km(&point, &point);
            assert!(!distance.is_nan());
            assert!(distance.abs() < 1e-3, "got {distance} for {point:?}");
        }
    }

    #[test]
    fn distance_is_symmetric() {
        let tokyo = Coordinates::new(35.6762, 139.6503);
        let lima = Coordinates::new(-12.0464, -77.0428);
        assert_eq!(distance_km(&tokyo, &lima), distance_km(&lima, &tokyo));
        assert_eq!(distance_km(&FRANCE, &GERMANY), distance_km(&GERMANY, &FRANCE));
    }

    #[test]
    fn antipodes_are_half_a_circumference_apart() {
        let a = Coordinates::new(0.0, 0.0);
        let b = Coordinates::new(0.0, 180.0);
        let distance = distance_km(&a, &b);
        assert!((distance - std::f64::consts::PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn bearing_cardinal_directions() {
        let origin = Coordinates::new(0.0, 0.0);
        let north = bearing_degrees(&origin, &Coordinates::new(10.0, 0.0));
        let east = bearing_degrees(&origin, &Coordinates::new(0.0, 10.0));
        let south = bearing_degrees(&origin, &Coordinates::new(-10.0, 0.0));
        let west = bearing_degrees(&origin, &Coordinates::new(0.0, -10.0));
        assert!(north.abs() < 1e-9);
        assert!((east - 90.0).abs() < 1e-9);
        assert!((south - 180.0).abs() < 1e-9);
        assert!((west - 270.0).abs() < 1e-9);
    }

    #[test]
    fn bearing_between_neighbours() {
        let outbound = bearing_degrees(&FRANCE, &GERMANY);
        let inbound = bearing_degrees(&GERMANY, &FRANCE);
        assert!((outbound - 44.71).abs() < 0.01, "got {outbound}");
        assert!((inbound - 230.91).abs() < 0.01, "got {inbound}");
    }

    #[test]
    fn bearing_stays_in_range() {
        let points = [
            FRANCE,
            GERMANY,
            Coordinates::new(-45.0, 170.0),
            Coordinates::new(60.0, -150.0),
            Coordinates::new(-0.5, -0.5),
            Coordinates::new(0.0, 179.9),
        ];
        for from in &points {
            for to in &points {
                if from == to {
                    continue;
                }
                let bearing = bearing_degrees(from, to);
                assert!((0.0..360.0).contains(&bearing), "{from:?} -> {to:?}: {bearing}");
            }
        }
    }

    #[test]
    fn compass_sectors() {
        assert_eq!(CompassPoint::from_bearing(0.0), CompassPoint::North);
        assert_eq!(CompassPoint::from_bearing(22.4), CompassPoint::North);
        assert_eq!(CompassPoint::from_bearing(22.5), CompassPoint::NorthEast);
        assert_eq!(CompassPoint::from_bearing(44.71), CompassPoint::NorthEast);
        assert_eq!(CompassPoint::from_bearing(180.0), CompassPoint::South);
        assert_eq!(CompassPoint::from_bearing(230.91), CompassPoint::SouthWest);
        assert_eq!(CompassPoint::from_bearing(337.5), CompassPoint::North);
        assert_eq!(CompassPoint::from_bearing(359.99), CompassPoint::North);
        assert_eq!(CompassPoint::from_bearing(-90.0), CompassPoint::West);
    }
}
