//! Great-circle distance and radius tests.

/// Mean Earth radius in meters used by the haversine formula.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

const METERS_PER_MILE: f64 = 1_609.344;
const FEET_PER_MILE: f64 = 5_280.0;

/// Haversine great-circle distance between two coordinates, in meters.
///
/// Symmetric in its arguments and zero for identical points. Inputs are not
/// range checked; build a [`GeoPoint`](super::GeoPoint) first if they come
/// from an untrusted source.
///
/// # Examples
///
/// ```
/// use checkin_core::geo::distance;
///
/// // One degree of longitude along the equator
/// let meters = distance(0.0, 0.0, 0.0, 1.0);
/// assert!((meters - 111_194.93).abs() < 0.01);
/// ```
#[must_use]
pub fn distance(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let delta_phi = (lat2 - lat1).to_radians();
    let delta_lambda = (lng2 - lng1).to_radians();

    // Rounding can push `a` a hair above 1 for near-antipodal points
    let a = ((delta_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (delta_lambda / 2.0).sin().powi(2))
    .min(1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_METERS * c
}

/// Returns true if the two coordinates are at most `radius_m` meters apart.
///
/// The boundary is inclusive.
#[must_use]
pub fn within_radius(lat1: f64, lng1: f64, lat2: f64, lng2: f64, radius_m: f64) -> bool {
    distance(lat1, lng1, lat2, lng2) <= radius_m
}

/// Formats a distance for metric display: whole meters below one kilometer,
/// otherwise kilometers with one decimal.
///
/// ```
/// use checkin_core::geo::format_metric;
///
/// assert_eq!(format_metric(87.4), "87m");
/// assert_eq!(format_metric(2_345.0), "2.3km");
/// ```
#[must_use]
pub fn format_metric(meters: f64) -> String {
    if meters < 1_000.0 {
        format!("{}m", meters.round())
    } else {
        format!("{:.1}km", meters / 1_000.0)
    }
}

/// Formats a distance for imperial display: whole feet below one mile,
/// otherwise miles with one decimal.
///
/// ```
/// use checkin_core::geo::format_imperial;
///
/// assert_eq!(format_imperial(100.0), "328 ft");
/// assert_eq!(format_imperial(3_218.688), "2.0 mi");
/// ```
#[must_use]
pub fn format_imperial(meters: f64) -> String {
    let miles = meters / METERS_PER_MILE;
    if miles < 1.0 {
        format!("{} ft", (miles * FEET_PER_MILE).round())
    } else {
        format!("{miles:.1} mi")
    }
}
