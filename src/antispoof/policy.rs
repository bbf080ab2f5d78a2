//! Anti-spoof policy thresholds.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Check-ins allowed in any rolling hour before the next one is denied.
pub const MAX_CHECKINS_PER_HOUR: usize = 5;

/// Fastest plausible travel between venues, in meters per second (~540 km/h).
/// Faster than any car, slower than a plane.
pub const MAX_VELOCITY_MPS: f64 = 150.0;

/// How close the user's fix must be to the venue, in meters.
pub const LOCATION_VERIFICATION_RADIUS: f64 = 100.0;

/// Gap after which any travel speed is considered plausible, in seconds.
pub const VELOCITY_GRACE_SECONDS: u64 = 3_600;

/// Thresholds used by [`AntiSpoofValidator`](super::AntiSpoofValidator).
///
/// Fields missing from a JSON document take their default value.
///
/// # Examples
///
/// ```
/// use checkin_core::antispoof::AntiSpoofPolicy;
///
/// let policy = AntiSpoofPolicy::from_json(r#"{"max_checkins_per_hour": 10}"#).unwrap();
/// assert_eq!(policy.max_checkins_per_hour, 10);
/// assert_eq!(policy.max_velocity_mps, 150.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AntiSpoofPolicy {
    /// Maximum check-ins per rolling hour (a count at or above this denies)
    pub max_checkins_per_hour: usize,

    /// Maximum implied speed between consecutive venues, meters/second
    pub max_velocity_mps: f64,

    /// Maximum distance between user fix and venue, meters (inclusive)
    pub location_verification_radius_m: f64,

    /// Seconds after the last check-in beyond which velocity is not checked
    pub velocity_grace_seconds: u64,
}

impl Default for AntiSpoofPolicy {
    fn default() -> Self {
        Self {
            max_checkins_per_hour: MAX_CHECKINS_PER_HOUR,
            max_velocity_mps: MAX_VELOCITY_MPS,
            location_verification_radius_m: LOCATION_VERIFICATION_RADIUS,
            velocity_grace_seconds: VELOCITY_GRACE_SECONDS,
        }
    }
}

impl AntiSpoofPolicy {
    /// Checks that every threshold is usable.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPolicy`] if the check-in limit is zero or a
    /// speed/radius threshold is non-finite or not positive.
    pub fn validate(&self) -> Result<()> {
        if self.max_checkins_per_hour == 0 {
            return Err(CoreError::InvalidPolicy(
                "max_checkins_per_hour must be at least 1".to_string(),
            ));
        }
        if !(self.max_velocity_mps.is_finite() && self.max_velocity_mps > 0.0) {
            return Err(CoreError::InvalidPolicy(
                "max_velocity_mps must be a positive number".to_string(),
            ));
        }
        if !(self.location_verification_radius_m.is_finite()
            && self.location_verification_radius_m > 0.0)
        {
            return Err(CoreError::InvalidPolicy(
                "location_verification_radius_m must be a positive number".to_string(),
            ));
        }
        Ok(())
    }

    /// Parses and validates a policy from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Serialization`] for malformed JSON and
    /// [`CoreError::InvalidPolicy`] for unusable thresholds.
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: Self = serde_json::from_str(json)?;
        policy.validate()?;
        Ok(policy)
    }

    /// Converts this policy to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails (extremely rare).
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}
