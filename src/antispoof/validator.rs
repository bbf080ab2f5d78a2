//! The anti-spoof validator.

use chrono::Duration;

use super::clock::{Clock, SystemClock};
use super::policy::AntiSpoofPolicy;
use super::types::{CheckInRecord, RateLimitResult, VelocityResult, Verdict};
use crate::geo::GeoPoint;

/// Runs the anti-spoof checks against a policy and a clock.
///
/// The validator holds no check-in state: history is passed in on every call,
/// so one instance can serve any number of users and threads.
#[derive(Debug, Clone, Default)]
pub struct AntiSpoofValidator<C = SystemClock> {
    policy: AntiSpoofPolicy,
    clock: C,
}

impl AntiSpoofValidator<SystemClock> {
    /// Creates a validator with the default policy and wall-clock time.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator with a custom policy and wall-clock time.
    #[must_use]
    pub const fn with_policy(policy: AntiSpoofPolicy) -> Self {
        Self {
            policy,
            clock: SystemClock,
        }
    }
}

impl<C: Clock> AntiSpoofValidator<C> {
    /// Creates a validator reading "now" from `clock`.
    pub const fn with_clock(policy: AntiSpoofPolicy, clock: C) -> Self {
        Self { policy, clock }
    }

    /// Returns the active policy.
    pub const fn policy(&self) -> &AntiSpoofPolicy {
        &self.policy
    }

    /// Denies when the user already has `max_checkins_per_hour` or more
    /// check-ins timestamped after one hour ago.
    ///
    /// Records may be in any order and may include older entries; they are
    /// filtered here.
    pub fn check_rate_limit(&self, recent_checkins: &[CheckInRecord]) -> RateLimitResult {
        let window_start = self.clock.now() - Duration::hours(1);
        let count = recent_checkins
            .iter()
            .filter(|record| record.timestamp > window_start)
            .count();

        if count >= self.policy.max_checkins_per_hour {
            log::debug!(
                "rate limit hit: {count} check-ins in the last hour (max {})",
                self.policy.max_checkins_per_hour
            );
            return RateLimitResult {
                allowed: false,
                reason: Some(format!(
                    "Maximum {} check-ins per hour exceeded",
                    self.policy.max_checkins_per_hour
                )),
                count: Some(count),
            };
        }

        RateLimitResult::allow()
    }

    /// Denies when travelling from the last check-in's venue to `venue`
    /// would have required more than `max_velocity_mps`.
    ///
    /// Both legs use venue coordinates; the live fix `_current` is checked
    /// only by [`verify_location`](Self::verify_location). A last check-in
    /// older than the grace window always passes. A last check-in at the
    /// same instant as now passes only if it was at the same venue; one
    /// stamped later than now yields a negative velocity and passes.
    #[allow(clippy::cast_precision_loss)]
    pub fn check_velocity(
        &self,
        last_checkin: Option<&CheckInRecord>,
        _current: GeoPoint,
        venue: GeoPoint,
    ) -> VelocityResult {
        let Some(last) = last_checkin else {
            return VelocityResult::allow(None);
        };

        let elapsed_ms = (self.clock.now() - last.timestamp).num_milliseconds();
        let elapsed_seconds = elapsed_ms as f64 / 1_000.0;
        if elapsed_seconds > self.policy.velocity_grace_seconds as f64 {
            return VelocityResult::allow(None);
        }

        let meters = last.venue.distance_to(venue);
        let velocity = match elapsed_ms {
            0 if meters > 0.0 => f64::INFINITY,
            0 => 0.0,
            _ => meters / elapsed_seconds,
        };

        if velocity > self.policy.max_velocity_mps {
            log::debug!(
                "velocity check failed: {meters:.0} m in {elapsed_seconds:.0} s ({velocity:.1} m/s)"
            );
            let speed = if velocity.is_finite() {
                format!("{} km/h", (velocity * 3.6).round())
            } else {
                "instantaneous".to_string()
            };
            return VelocityResult {
                allowed: false,
                reason: Some(format!("Impossible travel speed detected ({speed})")),
                velocity: Some(velocity),
            };
        }

        VelocityResult::allow(Some(velocity))
    }

    /// Returns true if the user's fix is within the verification radius of
    /// the venue (inclusive).
    pub fn verify_location(&self, user: GeoPoint, venue: GeoPoint) -> bool {
        user.is_within(venue, self.policy.location_verification_radius_m)
    }

    /// Runs every check and collects each failure's reason.
    ///
    /// Checks are not short-circuited, so the user sees every violated
    /// constraint at once. Reasons are ordered rate limit, velocity, location.
    pub fn perform_anti_spoof_checks(
        &self,
        user: GeoPoint,
        venue: GeoPoint,
        recent_checkins: &[CheckInRecord],
        last_checkin: Option<&CheckInRecord>,
    ) -> Verdict {
        let mut reasons = Vec::new();

        if let Some(reason) = self.check_rate_limit(recent_checkins).reason {
            reasons.push(reason);
        }

        if let Some(reason) = self.check_velocity(last_checkin, user, venue).reason {
            reasons.push(reason);
        }

        if !self.verify_location(user, venue) {
            log::debug!(
                "user is {:.0} m from venue (max {})",
                user.distance_to(venue),
                self.policy.location_verification_radius_m
            );
            reasons.push(format!(
                "You must be within {}m of the venue to check in",
                self.policy.location_verification_radius_m
            ));
        }

        Verdict::from_reasons(reasons)
    }
}
