//! Anti-spoofing checks for venue check-ins.
//!
//! Decides whether a claimed check-in is physically plausible given the
//! user's recent history:
//! - Rate limiting (check-ins per rolling hour)
//! - Velocity (implied travel speed between consecutive venues)
//! - Location verification (user fix within range of the venue)
//!
//! Every check is a pure function of its inputs plus the injected
//! [`Clock`]. Denials are ordinary return values carrying human readable
//! reasons; nothing in this module returns an error.
//!
//! # Example Usage
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use checkin_core::antispoof::{AntiSpoofPolicy, AntiSpoofValidator, CheckInRecord, FixedClock};
//! use checkin_core::geo::GeoPoint;
//!
//! let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
//! let validator = AntiSpoofValidator::with_clock(AntiSpoofPolicy::default(), FixedClock::new(now));
//!
//! let cafe = GeoPoint::new(37.7955, -122.3937).unwrap();
//! let user = GeoPoint::new(37.7956, -122.3937).unwrap();
//! let earlier = CheckInRecord::new(now - Duration::minutes(30), cafe);
//!
//! let verdict = validator.perform_anti_spoof_checks(user, cafe, &[earlier], Some(&earlier));
//! assert!(verdict.allowed);
//! assert!(verdict.reasons.is_empty());
//! ```

pub mod clock;
pub mod policy;
pub mod types;
pub mod validator;

pub use clock::{Clock, FixedClock, SystemClock};
pub use policy::{
    AntiSpoofPolicy, LOCATION_VERIFICATION_RADIUS, MAX_CHECKINS_PER_HOUR, MAX_VELOCITY_MPS,
    VELOCITY_GRACE_SECONDS,
};
pub use types::{CheckInRecord, RateLimitResult, VelocityResult, Verdict};
pub use validator::AntiSpoofValidator;
