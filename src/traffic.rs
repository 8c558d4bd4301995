//! Vehicle-state container and the simulation loop's traffic step.
//!
//! The advisory engine reads aircraft state and writes the autopilot slot;
//! everything here (position integration, cursor advance, speed slewing) is
//! owned by the traffic loop and runs strictly between advisory cycles.

use crate::aero;
use crate::constants::{ACCEL_M_S2, DECEL_M_S2, MPS_TO_KTS};
use crate::geo;
use crate::route::Route;

/// Vertical rate used when slewing toward a waypoint crossing altitude (m/s).
const CLIMB_RATE_M_S: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlightPhase {
    Ground,
    Takeoff,
    Climb,
    Cruise,
    Approach,
    Landing,
}

/// Autopilot output slot: the one thing the advisory engine writes.
#[derive(Clone, Copy, Debug, Default)]
pub struct Autopilot {
    pub selected_cas_m_s: Option<f64>,
    pub vnav: bool,
}

pub struct Aircraft {
    pub id: String,
    pub lat_deg: f64,
    pub lon_deg: f64,
    pub alt_m: f64,
    pub cas_m_s: f64,
    pub phase: FlightPhase,
    /// Performance reference Mach, the fallback for a preferred-speed
    /// command given without a value.
    pub reference_mach: f64,
    pub route: Route,
    pub autopilot: Autopilot,
}

impl Aircraft {
    pub fn new(id: &str, lat_deg: f64, lon_deg: f64, alt_m: f64, cas_m_s: f64) -> Self {
        Self {
            id: id.to_string(),
            lat_deg,
            lon_deg,
            alt_m,
            cas_m_s,
            phase: FlightPhase::Cruise,
            reference_mach: 0.78,
            route: Route::new(),
            autopilot: Autopilot::default(),
        }
    }

    pub fn tas_m_s(&self) -> f64 {
        aero::cas_to_tas(self.cas_m_s, self.alt_m)
    }

    fn step(&mut self, dt: f64) {
        // Slew CAS toward the autopilot-selected value at the standard rates
        if let Some(target) = self.autopilot.selected_cas_m_s {
            let delta = target - self.cas_m_s;
            if delta.abs() < ACCEL_M_S2 * dt {
                self.cas_m_s = target;
            } else if delta > 0.0 {
                self.cas_m_s += ACCEL_M_S2 * dt;
            } else {
                self.cas_m_s += DECEL_M_S2 * dt;
            }
        }

        let Some(wp) = self.route.get(self.route.active) else {
            return;
        };
        let (wp_lat, wp_lon, wp_alt) = (wp.lat_deg, wp.lon_deg, wp.alt_m);

        // Track the crossing altitude when the waypoint specifies one
        if wp_alt >= 0.0 {
            let dalt = wp_alt - self.alt_m;
            if dalt.abs() < CLIMB_RATE_M_S * dt {
                self.alt_m = wp_alt;
            } else {
                self.alt_m += CLIMB_RATE_M_S * dt * dalt.signum();
            }
        }

        // Fly the great circle toward the active waypoint
        let (qdr, dist) = geo::qdr_dist(self.lat_deg, self.lon_deg, wp_lat, wp_lon);
        let step_m = self.tas_m_s() * dt;
        if dist <= step_m {
            self.lat_deg = wp_lat;
            self.lon_deg = wp_lon;
            if self.route.active + 1 < self.route.len() {
                log::debug!(
                    "[traffic] {} passed {} -> wp {}",
                    self.id,
                    self.route.get(self.route.active).map(|w| w.name.as_str()).unwrap_or("?"),
                    self.route.active + 1
                );
                self.route.active += 1;
            }
        } else {
            let (lat, lon) = geo::pos_after(self.lat_deg, self.lon_deg, qdr, step_m);
            self.lat_deg = lat;
            self.lon_deg = lon;
        }
    }
}

#[derive(Default)]
pub struct Traffic {
    aircraft: Vec<Aircraft>,
}

impl Traffic {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spawn(&mut self, ac: Aircraft) {
        log::info!(
            "[traffic] spawned {} at ({:.4}, {:.4}) alt {:.0} m, {:.0} kts",
            ac.id,
            ac.lat_deg,
            ac.lon_deg,
            ac.alt_m,
            ac.cas_m_s * MPS_TO_KTS
        );
        self.aircraft.push(ac);
    }

    pub fn aircraft(&self) -> &[Aircraft] {
        &self.aircraft
    }

    pub fn aircraft_mut(&mut self) -> &mut [Aircraft] {
        &mut self.aircraft
    }

    pub fn by_id(&self, id: &str) -> Option<&Aircraft> {
        self.aircraft.iter().find(|ac| ac.id.eq_ignore_ascii_case(id))
    }

    pub fn by_id_mut(&mut self, id: &str) -> Option<&mut Aircraft> {
        self.aircraft.iter_mut().find(|ac| ac.id.eq_ignore_ascii_case(id))
    }

    /// Advance every aircraft by dt seconds.
    pub fn step(&mut self, dt: f64) {
        for ac in &mut self.aircraft {
            ac.step(dt);
        }
    }
}
