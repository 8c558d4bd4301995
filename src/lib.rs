//! Time-constrained speed advisory (advanced FMS) for multi-waypoint routes.
//!
//! Attach a required time of arrival or a time window to a waypoint, and the
//! advisory engine computes, each cycle, the calibrated airspeed that meets
//! the constraint given the remaining distance/altitude profile.

pub mod aero;
pub mod afms;
pub mod clock;
pub mod constants;
pub mod geo;
pub mod route;
pub mod sim;
pub mod traffic;
