//! Geospatial kernel.
//!
//! Pure functions for working with venue and user coordinates:
//! - Geohash encoding and decoding (proximity grouping keys)
//! - Haversine great-circle distance
//! - Radius tests and distance display
//!
//! Nothing in this module holds state; every function is safe to call from
//! any thread.
//!
//! # Example Usage
//!
//! ```
//! use checkin_core::geo::{decode, distance, encode, within_radius};
//!
//! let hash = encode(37.7749, -122.4194, 6).unwrap();
//! assert_eq!(hash, "9q8yyk");
//!
//! let cell = decode(&hash).unwrap();
//! assert!((cell.lat - 37.7749).abs() <= cell.error.lat);
//!
//! // Two corners of the same city block
//! let meters = distance(37.7749, -122.4194, 37.7758, -122.4194);
//! assert!(meters > 99.0 && meters < 101.0);
//! assert!(within_radius(37.7749, -122.4194, 37.7758, -122.4194, 150.0));
//! ```

pub mod distance;
pub mod geohash;
pub mod point;

pub use self::distance::{
    distance, format_imperial, format_metric, within_radius, EARTH_RADIUS_METERS,
};
pub use self::geohash::{
    decode, encode, encode_default, proximity_cells, DecodedGeohash, GeohashMargin,
    DEFAULT_PRECISION, MAX_PRECISION,
};
pub use self::point::GeoPoint;
