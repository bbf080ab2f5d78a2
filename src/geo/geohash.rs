//! Geohash encoding and decoding.
//!
//! A geohash interleaves longitude and latitude bisection bits (longitude
//! first) and writes them five at a time through a base32 alphabet. Hashes
//! sharing a prefix lie in the same cell at that prefix's precision, which is
//! what makes them useful as grouping keys for nearby venues and messages.
//!
//! # Precision Table
//!
//! | Length | Cell Size (approx.) | Use Case |
//! |--------|---------------------|----------|
//! | 5      | 4.9 km × 4.9 km     | City district |
//! | 6      | 1.2 km × 0.6 km     | Check-ins and messages (default) |
//! | 7      | 153 m × 153 m       | Street |
//! | 8      | 38 m × 19 m         | Venue records |

use serde::{Deserialize, Serialize};

use super::point::{is_valid_latitude, is_valid_longitude};
use crate::error::{CoreError, Result};

/// Base32 alphabet used by geohash (no `a`, `i`, `l`, `o`).
const BASE32: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Precision used for check-in and message grouping keys.
pub const DEFAULT_PRECISION: usize = 6;

/// Longest supported geohash. Twelve characters is 60 bits, past which `f64`
/// bisection no longer adds information.
pub const MAX_PRECISION: usize = 12;

/// Half-extent of a decoded geohash cell, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeohashMargin {
    /// Half the cell height
    pub lat: f64,
    /// Half the cell width
    pub lng: f64,
}

/// Centre of a geohash cell plus its error margin.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecodedGeohash {
    /// Latitude of the cell centre
    pub lat: f64,
    /// Longitude of the cell centre
    pub lng: f64,
    /// Distance from the centre to the cell edges
    pub error: GeohashMargin,
}

impl DecodedGeohash {
    /// Returns true if (`lat`, `lng`) falls inside the decoded cell.
    #[must_use]
    pub fn contains(&self, lat: f64, lng: f64) -> bool {
        (lat - self.lat).abs() <= self.error.lat && (lng - self.lng).abs() <= self.error.lng
    }
}

/// Bisection interval for one axis.
#[derive(Debug, Clone, Copy)]
struct Range {
    min: f64,
    max: f64,
}

impl Range {
    const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    fn mid(self) -> f64 {
        (self.min + self.max) / 2.0
    }

    /// Narrows to the upper half when `bit` is set, else the lower half.
    fn narrow(&mut self, bit: bool) {
        let mid = self.mid();
        if bit {
            self.min = mid;
        } else {
            self.max = mid;
        }
    }
}

/// Encodes a coordinate as a geohash of `precision` characters.
///
/// The same input always produces the same output.
///
/// # Errors
///
/// - [`CoreError::InvalidCoordinate`] if `lat`/`lng` is non-finite or out of range
/// - [`CoreError::InvalidPrecision`] if `precision` is not in `1..=12`
///
/// # Examples
///
/// ```
/// use checkin_core::geo::encode;
///
/// assert_eq!(encode(37.7749, -122.4194, 8).unwrap(), "9q8yyk8y");
/// assert_eq!(encode(0.0, 0.0, 6).unwrap(), "s00000");
/// ```
pub fn encode(lat: f64, lng: f64, precision: usize) -> Result<String> {
    if !is_valid_latitude(lat) || !is_valid_longitude(lng) {
        log::warn!("refusing to geohash out-of-range coordinate");
        return Err(CoreError::InvalidCoordinate { lat, lng });
    }
    if !(1..=MAX_PRECISION).contains(&precision) {
        return Err(CoreError::InvalidPrecision(precision));
    }

    let mut lat_range = Range::new(-90.0, 90.0);
    let mut lng_range = Range::new(-180.0, 180.0);
    let mut hash = String::with_capacity(precision);
    let mut even_bit = true;

    while hash.len() < precision {
        let mut idx = 0usize;
        for _ in 0..5 {
            let (range, value) = if even_bit {
                (&mut lng_range, lng)
            } else {
                (&mut lat_range, lat)
            };
            let bit = value >= range.mid();
            range.narrow(bit);
            idx = (idx << 1) | usize::from(bit);
            even_bit = !even_bit;
        }
        hash.push(char::from(BASE32[idx]));
    }

    Ok(hash)
}

/// Encodes at [`DEFAULT_PRECISION`] (6 characters, about 1.2 km × 0.6 km).
///
/// # Errors
///
/// Returns [`CoreError::InvalidCoordinate`] for out-of-range input.
pub fn encode_default(lat: f64, lng: f64) -> Result<String> {
    encode(lat, lng, DEFAULT_PRECISION)
}

/// Decodes a geohash to its cell centre and error margin.
///
/// The empty string decodes to the whole world: centre (0, 0), margin
/// (90, 180).
///
/// # Errors
///
/// Returns [`CoreError::InvalidGeohash`] if any character is outside the
/// base32 alphabet. Matching is case sensitive.
///
/// # Examples
///
/// ```
/// use checkin_core::geo::decode;
///
/// let cell = decode("9q8yyk").unwrap();
/// assert!(cell.contains(37.7749, -122.4194));
///
/// assert!(decode("!!!").is_err());
/// ```
pub fn decode(hash: &str) -> Result<DecodedGeohash> {
    let mut lat_range = Range::new(-90.0, 90.0);
    let mut lng_range = Range::new(-180.0, 180.0);
    let mut even_bit = true;

    for (position, character) in hash.chars().enumerate() {
        let idx = symbol_index(character).ok_or_else(|| CoreError::InvalidGeohash {
            hash: hash.to_string(),
            character,
            position,
        })?;

        for n in (0..5).rev() {
            let bit = (idx >> n) & 1 == 1;
            if even_bit {
                lng_range.narrow(bit);
            } else {
                lat_range.narrow(bit);
            }
            even_bit = !even_bit;
        }
    }

    let lat = lat_range.mid();
    let lng = lng_range.mid();
    Ok(DecodedGeohash {
        lat,
        lng,
        error: GeohashMargin {
            lat: lat_range.max - lat,
            lng: lng_range.max - lng,
        },
    })
}

/// Returns `hash` followed by every adjacent cell of the same precision.
///
/// Nearby-venue queries match on this set rather than on a single prefix so
/// that a user standing near a cell edge still sees venues across it. Cells
/// that would lie past a pole or the antimeridian are left out, so the result
/// has between 4 and 9 entries.
///
/// # Errors
///
/// Returns [`CoreError::InvalidGeohash`] if `hash` contains a character
/// outside the base32 alphabet.
///
/// # Examples
///
/// ```
/// use checkin_core::geo::proximity_cells;
///
/// let cells = proximity_cells("9q8yyk").unwrap();
/// assert_eq!(cells.len(), 9);
/// assert_eq!(cells[0], "9q8yyk");
/// ```
pub fn proximity_cells(hash: &str) -> Result<Vec<String>> {
    use ::geohash::Direction;

    decode(hash)?;

    let mut cells = Vec::with_capacity(9);
    cells.push(hash.to_string());
    for direction in [
        Direction::N,
        Direction::NE,
        Direction::E,
        Direction::SE,
        Direction::S,
        Direction::SW,
        Direction::W,
        Direction::NW,
    ] {
        match ::geohash::neighbor(hash, direction) {
            Ok(cell) if !cells.contains(&cell) => cells.push(cell),
            Ok(_) => {}
            Err(err) => log::debug!("no {direction:?} neighbour for {hash}: {err}"),
        }
    }
    Ok(cells)
}

fn symbol_index(character: char) -> Option<usize> {
    u8::try_from(character)
        .ok()
        .and_then(|byte| BASE32.iter().position(|&symbol| symbol == byte))
}
