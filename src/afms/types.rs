//! Shared types for the speed advisory system.

use chrono::NaiveTime;

use crate::aero;

/// Per-waypoint advisory mode. `Continue` is the default annotation and means
/// "inherit the nearest prior explicit setting"; it never survives mode
/// resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AfmsMode {
    Off,
    Continue,
    Own,
    Rta,
    Tw,
}

impl AfmsMode {
    /// Parse a command-line mode token (case-insensitive).
    pub fn parse(token: &str) -> Option<Self> {
        match token.to_ascii_uppercase().as_str() {
            "OFF" => Some(AfmsMode::Off),
            "CONTINUE" => Some(AfmsMode::Continue),
            "OWN" => Some(AfmsMode::Own),
            "RTA" => Some(AfmsMode::Rta),
            "TW" => Some(AfmsMode::Tw),
            _ => None,
        }
    }
}

/// Preferred ("own") speed annotation: a Mach number below 1.0 or a CAS in
/// m/s at or above 1.0, matching how flight crews enter it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PreferredSpeed {
    Mach(f64),
    CasMs(f64),
}

impl PreferredSpeed {
    /// Classify a raw command value. Negative values mean "no speed".
    pub fn from_value(value: f64) -> Option<Self> {
        if value < 0.0 {
            None
        } else if value < 1.0 {
            Some(PreferredSpeed::Mach(value))
        } else {
            Some(PreferredSpeed::CasMs(value))
        }
    }

    /// Convert to a CAS (m/s) at the given altitude.
    pub fn as_cas(&self, alt_m: f64) -> f64 {
        match *self {
            PreferredSpeed::Mach(m) => aero::tas_to_cas(aero::mach_to_tas(m, alt_m), alt_m),
            PreferredSpeed::CasMs(cas) => cas,
        }
    }
}

/// An active time constraint: the leg from the route cursor (`start`) to the
/// first constrained waypoint at or after it (`end`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimeConstraint {
    pub start: usize,
    pub end: usize,
    pub time: NaiveTime,
}
