//! Geographic point value type.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A latitude/longitude pair in decimal degrees.
///
/// Points built through [`GeoPoint::new`] are guaranteed to be finite and
/// inside `lat ∈ [-90, 90]`, `lng ∈ [-180, 180]`. Deserialization goes
/// through the same check.
///
/// # Examples
///
/// ```
/// use checkin_core::geo::GeoPoint;
///
/// let ferry_building = GeoPoint::new(37.7955, -122.3937).unwrap();
/// assert_eq!(ferry_building.lat, 37.7955);
///
/// assert!(GeoPoint::new(91.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    /// Latitude in degrees, -90 to 90
    pub lat: f64,

    /// Longitude in degrees, -180 to 180
    pub lng: f64,
}

impl GeoPoint {
    /// Creates a validated point.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`] if either value is NaN,
    /// infinite, or outside its valid range.
    pub fn new(lat: f64, lng: f64) -> Result<Self> {
        if is_valid_latitude(lat) && is_valid_longitude(lng) {
            Ok(Self { lat, lng })
        } else {
            log::warn!("rejected out-of-range coordinate");
            Err(CoreError::InvalidCoordinate { lat, lng })
        }
    }

    /// Great-circle distance to `other` in meters.
    ///
    /// ```
    /// use checkin_core::geo::GeoPoint;
    ///
    /// let a = GeoPoint::new(0.0, 0.0).unwrap();
    /// let b = GeoPoint::new(0.0, 1.0).unwrap();
    /// assert!((a.distance_to(b) - 111_194.93).abs() < 0.01);
    /// ```
    #[must_use]
    pub fn distance_to(self, other: Self) -> f64 {
        super::distance::distance(self.lat, self.lng, other.lat, other.lng)
    }

    /// Returns true if `other` is no further than `radius_m` meters away.
    #[must_use]
    pub fn is_within(self, other: Self, radius_m: f64) -> bool {
        self.distance_to(other) <= radius_m
    }
}

/// Unchecked wire form of [`GeoPoint`].
#[derive(Deserialize)]
struct RawGeoPoint {
    lat: f64,
    lng: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = CoreError;

    fn try_from(raw: RawGeoPoint) -> Result<Self> {
        Self::new(raw.lat, raw.lng)
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.lat, self.lng)
    }
}

pub(crate) fn is_valid_latitude(lat: f64) -> bool {
    lat.is_finite() && (-90.0..=90.0).contains(&lat)
}

pub(crate) fn is_valid_longitude(lng: f64) -> bool {
    lng.is_finite() && (-180.0..=180.0).contains(&lng)
}
