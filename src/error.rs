//! Error types for geospatial and check-in validation operations.
//!
//! Policy denials are not errors: they are reported through
//! [`Verdict`](crate::antispoof::Verdict). The variants here cover malformed
//! input that indicates corrupted data or a caller bug.

use thiserror::Error;

/// Error type for check-in core operations.
#[derive(Error, Debug)]
pub enum CoreError {
    /// A geohash contained a character outside the base32 alphabet.
    #[error("Invalid geohash {hash:?}: character {character:?} at position {position}")]
    InvalidGeohash {
        /// The full geohash that failed to decode.
        hash: String,
        /// The offending character.
        character: char,
        /// Zero-based character position of the offending character.
        position: usize,
    },

    /// Latitude or longitude was non-finite or out of range.
    #[error("Invalid coordinate: lat {lat}, lng {lng}")]
    InvalidCoordinate {
        /// Rejected latitude.
        lat: f64,
        /// Rejected longitude.
        lng: f64,
    },

    /// Geohash precision outside the supported range.
    #[error("Invalid geohash precision {0} (expected 1..=12)")]
    InvalidPrecision(usize),

    /// Anti-spoof policy thresholds are unusable.
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// JSON (de)serialization failed.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for check-in core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
