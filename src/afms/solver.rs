//! Kinematic speed solver: invert "time over a multi-segment profile" into a
//! calibrated airspeed.
//!
//! There is no closed form for CAS given a time budget across several flight
//! levels (the CAS→TAS conversion changes per segment), so the solver runs a
//! fixed three-round rescaling iteration. Three rounds is enough for cruise
//! geometries; no convergence check is made and whatever comes out is the
//! advisory.

use crate::aero;

/// Sum of per-segment times `d / tas(cas, alt)` for a profile, with no
/// acceleration transient. Segment altitudes below zero hold the previous
/// segment's altitude.
pub fn eta_for_cas(dists_m: &[f64], alts_m: &[f64], cas_m_s: f64) -> f64 {
    let mut alt_m = 0.0;
    let mut total_s = 0.0;
    for (i, &d) in dists_m.iter().enumerate() {
        if let Some(&a) = alts_m.get(i) {
            if a >= 0.0 {
                alt_m = a;
            }
        }
        if d <= 0.0 {
            continue;
        }
        let tas = aero::cas_to_tas(cas_m_s, alt_m);
        if tas > 1.0 {
            total_s += d / tas;
        }
    }
    total_s
}

/// Estimate the CAS that consumes the profile in `time_budget_s`, starting
/// from `current_cas`. One accel/decel transient is modelled on the first
/// segment; the rest fly constant speed.
///
/// A non-positive budget or a degenerate profile returns `current_cas`
/// unchanged: with no time or no distance left there is nothing to solve and
/// holding speed is the only sane advisory.
pub fn solve_cas_for_time_budget(
    dists_m: &[f64],
    alts_m: &[f64],
    time_budget_s: f64,
    current_cas: f64,
    accel_m_s2: f64,
    decel_m_s2: f64,
) -> f64 {
    if time_budget_s <= 0.0 {
        return current_cas;
    }
    if dists_m.iter().filter(|d| **d > 0.0).sum::<f64>() <= 0.0 {
        return current_cas;
    }

    let mut estimate = current_cas;
    let mut candidate = current_cas;
    for _ in 0..3 {
        let total_s =
            profile_time(dists_m, alts_m, estimate, current_cas, accel_m_s2, decel_m_s2);
        if total_s <= 0.0 {
            break;
        }
        // The value that produced this total is the candidate; the rescale
        // below only seeds the next round.
        candidate = estimate;
        estimate = estimate * total_s / time_budget_s;
    }
    candidate
}

/// Forward-simulate the profile at `est_cas`, with the speed-change transient
/// applied to the first segment.
fn profile_time(
    dists_m: &[f64],
    alts_m: &[f64],
    est_cas: f64,
    current_cas: f64,
    accel_m_s2: f64,
    decel_m_s2: f64,
) -> f64 {
    let mut alt_m = 0.0;
    let mut total_s = 0.0;
    for (i, &dist) in dists_m.iter().enumerate() {
        if let Some(&a) = alts_m.get(i) {
            if a >= 0.0 {
                alt_m = a;
            }
        }
        let mut d = dist;
        if d <= 0.0 {
            continue;
        }
        let tas = aero::cas_to_tas(est_cas, alt_m);
        if tas <= 1.0 {
            continue;
        }

        if i == 0 {
            let tas_now = aero::cas_to_tas(current_cas, alt_m);
            let dv = tas - tas_now;
            let a = if dv > 1.0 {
                accel_m_s2
            } else if dv < -1.0 {
                decel_m_s2
            } else {
                0.0
            };
            if a != 0.0 {
                let t1 = dv / a; // positive for both signs by construction
                let d1 = tas_now * t1 + 0.5 * a * t1 * t1;
                if d1.is_finite() && d1 >= 0.0 && d1 < d {
                    total_s += t1;
                    d -= d1;
                }
                // Transient doesn't fit in the first segment: treat the
                // whole segment as constant-speed instead.
            }
        }

        total_s += d / tas;
    }
    total_s
}
