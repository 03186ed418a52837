//! WGS84 coordinate helpers.
//!
//! Locations use `geo::Coord<f64>` with `x = longitude` and `y = latitude`,
//! both in degrees. Callers usually think in (latitude, longitude) order, so
//! [`lat_lon`] performs the swap in one place.

use geo::Coord;

/// Build a coordinate from latitude and longitude in degrees.
///
/// # Examples
/// ```
/// use volio_core::lat_lon;
///
/// let almaty = lat_lon(43.25, 76.95);
/// assert_eq!(almaty.y, 43.25);
/// assert_eq!(almaty.x, 76.95);
/// ```
#[must_use]
pub const fn lat_lon(latitude: f64, longitude: f64) -> Coord<f64> {
    Coord {
        x: longitude,
        y: latitude,
    }
}

/// Report whether a coordinate is finite and inside the WGS84 ranges.
#[must_use]
pub fn is_valid_location(location: Coord<f64>) -> bool {
    location.x.is_finite()
        && location.y.is_finite()
        && (-180.0..=180.0).contains(&location.x)
        && (-90.0..=90.0).contains(&location.y)
}
