//! Check-in history records and check results.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// The part of a stored check-in the validator needs.
///
/// Richer application records (ids, user, comment) are mapped down to this
/// shape by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CheckInRecord {
    /// When the check-in was made (UTC)
    pub timestamp: DateTime<Utc>,

    /// Coordinates of the venue checked in at
    pub venue: GeoPoint,
}

impl CheckInRecord {
    /// Creates a record for a check-in at `venue` made at `timestamp`.
    #[must_use]
    pub const fn new(timestamp: DateTime<Utc>, venue: GeoPoint) -> Self {
        Self { timestamp, venue }
    }
}

/// Outcome of the rate limit check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitResult {
    /// Whether another check-in is allowed
    pub allowed: bool,

    /// Human readable denial reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Check-ins counted in the last hour, reported on denial
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

impl RateLimitResult {
    pub(crate) const fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
            count: None,
        }
    }
}

/// Outcome of the velocity check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VelocityResult {
    /// Whether the implied travel speed is plausible
    pub allowed: bool,

    /// Human readable denial reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,

    /// Implied speed in meters/second, when one was computed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub velocity: Option<f64>,
}

impl VelocityResult {
    pub(crate) const fn allow(velocity: Option<f64>) -> Self {
        Self {
            allowed: true,
            reason: None,
            velocity,
        }
    }
}

/// Combined allow/deny decision for one check-in attempt.
///
/// `allowed` is true exactly when `reasons` is empty. Reasons are ordered
/// rate limit, velocity, location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the check-in may be recorded
    pub allowed: bool,

    /// Every failed check's reason, for display to the user
    pub reasons: Vec<String>,
}

impl Verdict {
    /// Builds a verdict from the collected denial reasons.
    #[must_use]
    pub fn from_reasons(reasons: Vec<String>) -> Self {
        Self {
            allowed: reasons.is_empty(),
            reasons,
        }
    }

    /// Returns true if at least one check failed.
    #[must_use]
    pub const fn is_denied(&self) -> bool {
        !self.allowed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_without_reasons_is_allowed() {
        let verdict = Verdict::from_reasons(Vec::new());
        assert!(verdict.allowed);
        assert!(!verdict.is_denied());
    }

    #[test]
    fn verdict_with_reasons_is_denied() {
        let verdict = Verdict::from_reasons(vec!["too fast".to_string()]);
        assert!(!verdict.allowed);
        assert!(verdict.is_denied());
        assert_eq!(verdict.reasons, vec!["too fast"]);
    }

    #[test]
    fn verdict_json_shape() {
        let verdict = Verdict::from_reasons(vec!["too far".to_string()]);
        let json = serde_json::to_string(&verdict).unwrap();
        assert_eq!(json, r#"{"allowed":false,"reasons":["too far"]}"#);
    }

    #[test]
    fn allowed_rate_limit_omits_optional_fields() {
        let json = serde_json::to_string(&RateLimitResult::allow()).unwrap();
        assert_eq!(json, r#"{"allowed":true}"#);
    }

    #[test]
    fn check_in_record_roundtrip() {
        let record = CheckInRecord::new(
            "2024-06-01T12:00:00Z".parse().unwrap(),
            GeoPoint::new(37.7955, -122.3937).unwrap(),
        );
        let json = serde_json::to_string(&record).unwrap();
        let back: CheckInRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn check_in_record_rejects_invalid_venue() {
        let json = r#"{"timestamp":"2024-06-01T12:00:00Z","venue":{"lat":500.0,"lng":0.0}}"#;
        assert!(serde_json::from_str::<CheckInRecord>(json).is_err());
    }
}
