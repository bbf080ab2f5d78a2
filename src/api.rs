//! Check-in entry point used by the client's check-in workflow.

use serde::{Deserialize, Serialize};

use crate::antispoof::{
    AntiSpoofPolicy, AntiSpoofValidator, CheckInRecord, Clock, SystemClock, Verdict,
};
use crate::error::Result;
use crate::geo::{encode_default, GeoPoint};

/// Everything the caller needs to accept or reject a check-in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckInAssessment {
    /// Anti-spoof decision with every failed check's reason
    pub verdict: Verdict,

    /// Distance from the user's fix to the venue, in meters
    pub distance_m: f64,

    /// Precision-6 geohash of the user's fix, stored with the check-in record
    pub geohash: String,
}

/// Evaluates check-in attempts.
///
/// Combines the geospatial kernel with the anti-spoof validator: the caller
/// supplies the user's fix, the venue, and history fetched from storage, and
/// decides from the returned assessment whether to write the check-in.
///
/// # Examples
///
/// ```
/// use checkin_core::CheckInGate;
///
/// let gate = CheckInGate::new();
/// let assessment = gate.assess(37.79560, -122.3937, 37.7955, -122.3937, &[], None).unwrap();
///
/// assert!(assessment.verdict.allowed);
/// assert!(assessment.distance_m < 20.0);
/// assert_eq!(assessment.geohash.len(), 6);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CheckInGate<C = SystemClock> {
    validator: AntiSpoofValidator<C>,
}

impl CheckInGate<SystemClock> {
    /// Creates a gate with the default policy and wall-clock time.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a gate with a custom policy and wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPolicy`](crate::CoreError::InvalidPolicy)
    /// if the policy fails validation.
    pub fn with_policy(policy: AntiSpoofPolicy) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            validator: AntiSpoofValidator::with_policy(policy),
        })
    }
}

impl<C: Clock> CheckInGate<C> {
    /// Creates a gate reading "now" from `clock`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPolicy`](crate::CoreError::InvalidPolicy)
    /// if the policy fails validation.
    pub fn with_clock(policy: AntiSpoofPolicy, clock: C) -> Result<Self> {
        policy.validate()?;
        Ok(Self {
            validator: AntiSpoofValidator::with_clock(policy, clock),
        })
    }

    /// Returns the underlying validator for running checks individually.
    pub const fn validator(&self) -> &AntiSpoofValidator<C> {
        &self.validator
    }

    /// Assesses a check-in by the user at (`user_lat`, `user_lng`) at the
    /// venue at (`venue_lat`, `venue_lng`).
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinate`](crate::CoreError::InvalidCoordinate)
    /// if either coordinate pair is out of range. Policy denials are not
    /// errors; they are reported in the returned verdict.
    pub fn assess(
        &self,
        user_lat: f64,
        user_lng: f64,
        venue_lat: f64,
        venue_lng: f64,
        recent_checkins: &[CheckInRecord],
        last_checkin: Option<&CheckInRecord>,
    ) -> Result<CheckInAssessment> {
        let user = GeoPoint::new(user_lat, user_lng)?;
        let venue = GeoPoint::new(venue_lat, venue_lng)?;

        let verdict = self
            .validator
            .perform_anti_spoof_checks(user, venue, recent_checkins, last_checkin);
        if verdict.is_denied() {
            log::debug!("check-in denied with {} reason(s)", verdict.reasons.len());
        }

        Ok(CheckInAssessment {
            verdict,
            distance_m: user.distance_to(venue),
            geohash: encode_default(user.lat, user.lng)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;
    use crate::antispoof::FixedClock;
    use crate::error::CoreError;

    fn gate() -> CheckInGate<FixedClock> {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        CheckInGate::with_clock(AntiSpoofPolicy::default(), FixedClock::new(now)).unwrap()
    }

    #[test]
    fn new_uses_default_policy() {
        let gate = CheckInGate::new();
        assert_eq!(gate.validator().policy(), &AntiSpoofPolicy::default());
    }

    #[test]
    fn with_policy_rejects_invalid_policy() {
        let policy = AntiSpoofPolicy {
            max_checkins_per_hour: 0,
            ..AntiSpoofPolicy::default()
        };
        assert!(matches!(
            CheckInGate::with_policy(policy),
            Err(CoreError::InvalidPolicy(_))
        ));
    }

    #[test]
    fn assess_allows_nearby_user() {
        let assessment = gate()
            .assess(37.7956, -122.3937, 37.7955, -122.3937, &[], None)
            .unwrap();
        assert!(assessment.verdict.allowed);
        assert!((assessment.distance_m - 11.1).abs() < 0.1);
        assert_eq!(assessment.geohash, "9q8znb");
    }

    #[test]
    fn assess_geohash_follows_user_not_venue() {
        // 22 m apart, on either side of the 9q8yyk/9q8yym cell edge
        let assessment = gate()
            .assess(37.7766, -122.4194, 37.7764, -122.4194, &[], None)
            .unwrap();
        assert!(assessment.verdict.allowed);
        assert_eq!(assessment.geohash, "9q8yym");
        assert_ne!(
            assessment.geohash,
            encode_default(37.7764, -122.4194).unwrap()
        );
    }

    #[test]
    fn assess_reports_denial_with_distance() {
        let assessment = gate()
            .assess(37.8055, -122.3937, 37.7955, -122.3937, &[], None)
            .unwrap();
        assert!(!assessment.verdict.allowed);
        assert!(assessment.distance_m > 1_000.0);
        assert_eq!(assessment.verdict.reasons.len(), 1);
    }

    #[test]
    fn assess_uses_history() {
        let gate = gate();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let venue = GeoPoint::new(37.7955, -122.3937).unwrap();
        let recent: Vec<CheckInRecord> = (1..=5)
            .map(|m| CheckInRecord::new(now - Duration::minutes(m), venue))
            .collect();

        let assessment = gate
            .assess(37.7955, -122.3937, 37.7955, -122.3937, &recent, recent.first())
            .unwrap();
        assert_eq!(
            assessment.verdict.reasons,
            vec!["Maximum 5 check-ins per hour exceeded".to_string()]
        );
    }

    #[test]
    fn assess_rejects_invalid_coordinates() {
        assert!(matches!(
            gate().assess(120.0, 0.0, 0.0, 0.0, &[], None),
            Err(CoreError::InvalidCoordinate { .. })
        ));
        assert!(gate().assess(0.0, 0.0, 0.0, f64::NAN, &[], None).is_err());
    }
}
