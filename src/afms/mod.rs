//! Advanced FMS speed advisory.
//!
//! Once per cycle, for every aircraft in cruise, resolve the advisory mode
//! annotated on the route, locate the next time constraint, and command the
//! calibrated airspeed that meets it. The engine holds nothing between
//! cycles except its configuration.

pub mod commands;
pub mod solver;
pub mod types;

use std::path::Path;

use chrono::{Duration, NaiveTime};
use serde::Deserialize;

use crate::clock::{seconds_until, SimClock};
use crate::constants::{ACCEL_M_S2, DECEL_M_S2, MPS_TO_KTS};
use crate::geo;
use crate::route::DEFAULT_WINDOW_S;
use crate::traffic::{Aircraft, Autopilot, FlightPhase, Traffic};
use types::{AfmsMode, TimeConstraint};

// --- Configuration ---

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AfmsConfig {
    /// Seconds of simulated time between advisory cycles.
    pub update_interval_s: f64,
    /// Below this many seconds to a constraint, retarget the next one.
    pub skip_threshold_s: f64,
    pub accel_m_s2: f64,
    pub decel_m_s2: f64,
}

impl Default for AfmsConfig {
    fn default() -> Self {
        Self {
            update_interval_s: 60.0,
            skip_threshold_s: 120.0,
            accel_m_s2: ACCEL_M_S2,
            decel_m_s2: DECEL_M_S2,
        }
    }
}

impl AfmsConfig {
    /// Load from a YAML file, falling back to defaults on any failure.
    pub fn load(path: &Path) -> Self {
        let yaml = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("[afms] could not read {}: {}, using defaults", path.display(), e);
                return Self::default();
            }
        };
        match serde_yaml::from_str(&yaml) {
            Ok(config) => {
                log::info!("[afms] loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("[afms] could not parse {}: {}, using defaults", path.display(), e);
                Self::default()
            }
        }
    }
}

// --- Engine ---

pub struct Afms {
    pub config: AfmsConfig,
}

impl Afms {
    pub fn new(config: AfmsConfig) -> Self {
        Self { config }
    }

    /// Run one advisory cycle over all traffic. Aircraft outside the cruise
    /// phase are left alone.
    pub fn update(&self, traffic: &mut Traffic, clock: &SimClock) {
        let now = clock.time_of_day();
        for ac in traffic.aircraft_mut() {
            if ac.phase != FlightPhase::Cruise {
                continue;
            }
            match ac.route.effective_mode() {
                // Continue always resolves away to an explicit mode or Off
                AfmsMode::Off | AfmsMode::Continue => {}
                AfmsMode::Own => self.advise_own(ac),
                AfmsMode::Rta => self.advise_rta(ac, now),
                AfmsMode::Tw => self.advise_tw(ac, now),
            }
        }
    }

    fn advise_own(&self, ac: &mut Aircraft) {
        match ac.route.effective_preferred() {
            None => {
                log::warn!("[afms] {}: OWN mode but no own speed specified", ac.id);
            }
            Some(preferred) => {
                let cas = preferred.as_cas(ac.alt_m);
                emit(ac, cas);
            }
        }
    }

    fn advise_rta(&self, ac: &mut Aircraft, now: NaiveTime) {
        let Some(mut tc) = ac.route.next_constraint(ac.route.active) else {
            log::debug!("[afms] {}: RTA mode with no time constraint ahead", ac.id);
            return;
        };

        // Constraint too close to still influence: retarget the next one
        if (seconds_until(tc.time, now) as f64) < self.config.skip_threshold_s {
            tc = ac.route.constraint_past(&tc);
        }

        let (dists, alts) = profile_to(ac, &tc);
        let budget = seconds_until(tc.time, now) as f64;
        let cas = solver::solve_cas_for_time_budget(
            &dists,
            &alts,
            budget,
            ac.cas_m_s,
            self.config.accel_m_s2,
            self.config.decel_m_s2,
        );
        emit(ac, cas);
    }

    fn advise_tw(&self, ac: &mut Aircraft, now: NaiveTime) {
        let Some(mut tc) = ac.route.next_constraint(ac.route.active) else {
            log::debug!("[afms] {}: TW mode with no time constraint ahead", ac.id);
            return;
        };

        // Preferred speed resolves once; skip-ahead rebuilds the profile
        // but deliberately does not re-resolve it.
        let pref_cas = ac
            .route
            .effective_preferred()
            .map(|p| p.as_cas(ac.alt_m))
            .unwrap_or(ac.cas_m_s);

        let (mut dists, mut alts) = profile_to(ac, &tc);
        if solver::eta_for_cas(&dists, &alts, pref_cas) < self.config.skip_threshold_s {
            let next = ac.route.constraint_past(&tc);
            if next != tc {
                tc = next;
                let (d, a) = profile_to(ac, &tc);
                dists = d;
                alts = a;
            }
        }

        let half_window = Duration::seconds(
            (ac.route.get(tc.end).map(|wp| wp.window_s).unwrap_or(DEFAULT_WINDOW_S) / 2.0) as i64,
        );
        let earliest = seconds_until(tc.time - half_window, now) as f64;
        let latest = seconds_until(tc.time + half_window, now) as f64;

        let eta_pref = solver::eta_for_cas(&dists, &alts, pref_cas);
        let cas = if eta_pref < earliest {
            // Too early: slow to the front edge of the window
            self.solve(&dists, &alts, earliest, ac.cas_m_s)
        } else if eta_pref > latest {
            // Too late: speed up to the back edge
            self.solve(&dists, &alts, latest, ac.cas_m_s)
        } else {
            pref_cas
        };
        emit(ac, cas);
    }

    fn solve(&self, dists: &[f64], alts: &[f64], budget_s: f64, current_cas: f64) -> f64 {
        solver::solve_cas_for_time_budget(
            dists,
            alts,
            budget_s,
            current_cas,
            self.config.accel_m_s2,
            self.config.decel_m_s2,
        )
    }
}

/// Distance/altitude profile from the aircraft's present position through
/// the constrained waypoint. Segment 0 runs to the cursor waypoint and falls
/// back to the aircraft's own altitude when the waypoint has none.
fn profile_to(ac: &Aircraft, tc: &TimeConstraint) -> (Vec<f64>, Vec<f64>) {
    let mut dists = Vec::with_capacity(tc.end - tc.start + 1);
    let mut alts = Vec::with_capacity(tc.end - tc.start + 1);

    if let Some(first) = ac.route.get(tc.start) {
        dists.push(geo::dist_m(ac.lat_deg, ac.lon_deg, first.lat_deg, first.lon_deg));
        alts.push(if first.alt_m >= 0.0 { first.alt_m } else { ac.alt_m });
    }
    for idx in tc.start + 1..=tc.end {
        if let Some(wp) = ac.route.get(idx) {
            dists.push(wp.leg_dist_m);
            alts.push(wp.alt_m);
        }
    }
    (dists, alts)
}

fn emit(ac: &mut Aircraft, cas_m_s: f64) {
    ac.autopilot = Autopilot { selected_cas_m_s: Some(cas_m_s), vnav: true };
    log::info!("[afms] {}: SPD {:.0} kts, VNAV on", ac.id, cas_m_s * MPS_TO_KTS);
}
