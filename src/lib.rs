//! Check-in Core Library
//!
//! Client-side logic for venue check-ins: geohash and distance math, and the
//! anti-spoofing checks that decide whether a claimed check-in is physically
//! plausible. Persistence, auth and delivery live in the backend; this crate
//! only computes over the values the caller passes in.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![deny(unsafe_code)]

mod api;
pub mod antispoof;
pub mod error;
pub mod geo;
pub mod venue;

pub use api::{CheckInAssessment, CheckInGate};
pub use error::{CoreError, Result};
