mod catalog;
mod error;
mod geodesy;
mod round;
mod suggestions;

pub use catalog::{Catalog, Country};
pub use error::{DataLoadError, GuessError};
pub use geodesy::{
    CompassPoint, Coordinates, EARTH_RADIUS_KM, GeoPoint, bearing_degrees, distance_km,
};
pub use round::{
    GuessOutcome, GuessResult, RoundController, RoundEvent, RoundObserver, RoundOptions,
    RoundPhase,
};
pub use suggestions::filter_suggestions;
