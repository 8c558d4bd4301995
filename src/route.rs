//! Waypoint routes with speed-advisory annotations.
//!
//! Each waypoint carries its advisory fields directly, so route edits can
//! never leave an annotation array out of step with the waypoint list. The
//! active-waypoint cursor is advanced by the traffic loop; the advisory
//! engine only reads it.

use chrono::NaiveTime;

use crate::afms::types::{AfmsMode, PreferredSpeed, TimeConstraint};
use crate::geo;

/// Standard time-window size (s) applied to every new waypoint.
pub const DEFAULT_WINDOW_S: f64 = 60.0;

/// Altitude below this is "unspecified at this waypoint".
pub const ALT_UNSET: f64 = -999.0;

#[derive(Clone, Debug)]
pub struct Waypoint {
    pub name: String,
    pub lat_deg: f64,
    pub lon_deg: f64,
    /// Crossing altitude (m); negative = unspecified, hold previous.
    pub alt_m: f64,
    /// Great-circle distance (m) from the previous waypoint; 0 for the first.
    pub leg_dist_m: f64,

    // Advisory annotations
    pub rta: Option<NaiveTime>,
    pub window_s: f64,
    pub mode: AfmsMode,
    pub preferred: Option<PreferredSpeed>,
}

impl Waypoint {
    pub fn new(name: &str, lat_deg: f64, lon_deg: f64, alt_m: f64) -> Self {
        Self {
            name: name.to_string(),
            lat_deg,
            lon_deg,
            alt_m,
            leg_dist_m: 0.0,
            rta: None,
            window_s: DEFAULT_WINDOW_S,
            mode: AfmsMode::Continue,
            preferred: None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct Route {
    waypoints: Vec<Waypoint>,
    /// Index of the waypoint currently being flown toward.
    pub active: usize,
}

impl Route {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waypoints(&self) -> &[Waypoint] {
        &self.waypoints
    }

    pub fn len(&self) -> usize {
        self.waypoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.waypoints.is_empty()
    }

    pub fn get(&self, idx: usize) -> Option<&Waypoint> {
        self.waypoints.get(idx)
    }

    pub fn get_mut(&mut self, idx: usize) -> Option<&mut Waypoint> {
        self.waypoints.get_mut(idx)
    }

    /// Find a waypoint by name (case-insensitive).
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.waypoints
            .iter()
            .position(|wp| wp.name.eq_ignore_ascii_case(name))
    }

    // --- Structural edits ---
    //
    // Each edit re-derives the leg distances adjacent to the touched index,
    // so `leg_dist_m` stays consistent with the waypoint positions.

    pub fn push(&mut self, wp: Waypoint) {
        let idx = self.waypoints.len();
        self.waypoints.push(wp);
        self.refresh_leg(idx);
    }

    /// Insert before `idx` (`idx == len` appends). Returns false, changing
    /// nothing, when `idx` is past the end.
    pub fn insert(&mut self, idx: usize, wp: Waypoint) -> bool {
        if idx > self.waypoints.len() {
            return false;
        }
        self.waypoints.insert(idx, wp);
        self.refresh_leg(idx);
        self.refresh_leg(idx + 1);
        true
    }

    /// Replace the waypoint at `idx`, resetting its annotations to defaults
    /// like any other new waypoint. Returns false, changing nothing, when
    /// `idx` is out of range.
    pub fn overwrite(&mut self, idx: usize, wp: Waypoint) -> bool {
        if idx >= self.waypoints.len() {
            return false;
        }
        self.waypoints[idx] = wp;
        self.refresh_leg(idx);
        self.refresh_leg(idx + 1);
        true
    }

    /// Remove the waypoint at `idx`. Returns false, changing nothing, when
    /// `idx` is out of range.
    pub fn delete(&mut self, idx: usize) -> bool {
        if idx >= self.waypoints.len() {
            return false;
        }
        self.waypoints.remove(idx);
        self.refresh_leg(idx);
        if self.active >= self.waypoints.len() && self.active > 0 {
            self.active = self.waypoints.len() - 1;
        }
        true
    }

    fn refresh_leg(&mut self, idx: usize) {
        if idx >= self.waypoints.len() {
            return;
        }
        self.waypoints[idx].leg_dist_m = if idx == 0 {
            0.0
        } else {
            let prev = &self.waypoints[idx - 1];
            let cur = &self.waypoints[idx];
            geo::dist_m(prev.lat_deg, prev.lon_deg, cur.lat_deg, cur.lon_deg)
        };
    }

    // --- Mode resolution ---

    /// Effective advisory mode at the cursor: the nearest already-passed
    /// waypoint with an explicit (non-Continue) mode wins; none means Off.
    pub fn effective_mode(&self) -> AfmsMode {
        self.waypoints[..self.active.min(self.waypoints.len())]
            .iter()
            .rev()
            .map(|wp| wp.mode)
            .find(|&m| m != AfmsMode::Continue)
            .unwrap_or(AfmsMode::Off)
    }

    /// Effective preferred speed at the cursor: nearest prior explicit value.
    pub fn effective_preferred(&self) -> Option<PreferredSpeed> {
        self.waypoints[..self.active.min(self.waypoints.len())]
            .iter()
            .rev()
            .find_map(|wp| wp.preferred)
    }

    // --- Constraint location ---

    /// First waypoint at or after `from` carrying an arrival-time constraint.
    pub fn next_constraint(&self, from: usize) -> Option<TimeConstraint> {
        self.waypoints
            .iter()
            .enumerate()
            .skip(from)
            .find_map(|(idx, wp)| {
                wp.rta.map(|time| TimeConstraint { start: from, end: idx, time })
            })
    }

    /// The constraint strictly past `tc.end`, or `tc` itself when there is
    /// none further down-route.
    pub fn constraint_past(&self, tc: &TimeConstraint) -> TimeConstraint {
        self.next_constraint(tc.end + 1)
            .map(|next| TimeConstraint { start: tc.start, ..next })
            .unwrap_or(*tc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::parse_time_of_day;

    fn bay_route() -> Route {
        let mut route = Route::new();
        route.push(Waypoint::new("SFO", 37.6213, -122.3790, ALT_UNSET));
        route.push(Waypoint::new("EMZ", 37.792415, -122.297972, 3_000.0));
        route.push(Waypoint::new("GGB", 37.818184, -122.484053, 5_000.0));
        route.push(Waypoint::new("PTR", 38.0700, -122.8700, 7_000.0));
        route.push(Waypoint::new("SAC", 38.5125, -121.4944, 7_000.0));
        route
    }

    #[test]
    fn leg_distances_follow_edits() {
        let mut route = bay_route();
        assert_eq!(route.get(0).unwrap().leg_dist_m, 0.0);
        let before = route.get(3).unwrap().leg_dist_m;
        assert!(before > 1_000.0);

        // Insert between GGB and PTR: both adjacent legs re-derived
        route.insert(3, Waypoint::new("MID", 37.95, -122.70, ALT_UNSET));
        let to_mid = route.get(3).unwrap().leg_dist_m;
        let from_mid = route.get(4).unwrap().leg_dist_m;
        assert!(to_mid > 0.0 && from_mid > 0.0);
        assert!(to_mid < before && from_mid < before);

        // Delete it again: the direct leg comes back
        assert!(route.delete(3));
        assert!((route.get(3).unwrap().leg_dist_m - before).abs() < 1.0);
    }

    #[test]
    fn edits_out_of_range_are_rejected() {
        let mut route = bay_route();
        let len = route.len();

        assert!(!route.overwrite(len, Waypoint::new("X", 0.0, 0.0, ALT_UNSET)));
        assert!(!route.delete(len));
        assert!(!route.insert(len + 1, Waypoint::new("X", 0.0, 0.0, ALT_UNSET)));
        assert_eq!(route.len(), len);

        // Insert at the end is a plain append
        assert!(route.insert(len, Waypoint::new("TAIL", 38.6, -121.0, ALT_UNSET)));
        assert_eq!(route.len(), len + 1);
        assert!(route.get(len).unwrap().leg_dist_m > 0.0);
    }

    #[test]
    fn overwrite_resets_annotations() {
        let mut route = bay_route();
        route.get_mut(2).unwrap().rta = Some(parse_time_of_day("14:00:00").unwrap());
        route.get_mut(2).unwrap().mode = AfmsMode::Rta;

        route.overwrite(2, Waypoint::new("GGB", 37.818184, -122.484053, 5_000.0));
        let wp = route.get(2).unwrap();
        assert_eq!(wp.rta, None);
        assert_eq!(wp.mode, AfmsMode::Continue);
        assert_eq!(wp.preferred, None);
        assert_eq!(wp.window_s, DEFAULT_WINDOW_S);
    }

    #[test]
    fn all_continue_resolves_off() {
        let mut route = bay_route();
        route.active = 3;
        assert_eq!(route.effective_mode(), AfmsMode::Off);
    }

    #[test]
    fn nearest_prior_explicit_mode_wins() {
        let mut route = bay_route();
        route.get_mut(0).unwrap().mode = AfmsMode::Rta;
        route.get_mut(2).unwrap().mode = AfmsMode::Tw;
        route.active = 4;
        assert_eq!(route.effective_mode(), AfmsMode::Tw);

        // Passed only the first: RTA applies
        route.active = 2;
        assert_eq!(route.effective_mode(), AfmsMode::Rta);

        // Haven't passed anything yet
        route.active = 0;
        assert_eq!(route.effective_mode(), AfmsMode::Off);
    }

    #[test]
    fn mode_at_cursor_does_not_count() {
        let mut route = bay_route();
        route.get_mut(2).unwrap().mode = AfmsMode::Own;
        route.active = 2;
        // Explicit mode sits at the cursor, not before it
        assert_eq!(route.effective_mode(), AfmsMode::Off);
    }

    #[test]
    fn preferred_speed_inherits_backward() {
        let mut route = bay_route();
        route.get_mut(0).unwrap().preferred = Some(PreferredSpeed::CasMs(210.0));
        route.get_mut(1).unwrap().preferred = Some(PreferredSpeed::Mach(0.78));
        route.active = 3;
        assert_eq!(route.effective_preferred(), Some(PreferredSpeed::Mach(0.78)));

        route.active = 1;
        assert_eq!(route.effective_preferred(), Some(PreferredSpeed::CasMs(210.0)));

        route.active = 0;
        assert_eq!(route.effective_preferred(), None);
    }

    #[test]
    fn locator_finds_first_constraint_at_or_after() {
        let mut route = bay_route();
        let t = parse_time_of_day("14:00:00").unwrap();
        route.get_mut(3).unwrap().rta = Some(t);

        let tc = route.next_constraint(1).unwrap();
        assert_eq!(tc.start, 1);
        assert_eq!(tc.end, 3);
        assert_eq!(tc.time, t);

        // At the constrained waypoint itself
        let tc = route.next_constraint(3).unwrap();
        assert_eq!((tc.start, tc.end), (3, 3));

        // Past it: nothing ahead
        assert!(route.next_constraint(4).is_none());
    }

    #[test]
    fn constraint_past_never_moves_backward() {
        let mut route = bay_route();
        let t1 = parse_time_of_day("14:00:00").unwrap();
        let t2 = parse_time_of_day("14:20:00").unwrap();
        route.get_mut(2).unwrap().rta = Some(t1);
        route.get_mut(4).unwrap().rta = Some(t2);

        let tc = route.next_constraint(1).unwrap();
        let next = route.constraint_past(&tc);
        assert_eq!(next.end, 4);
        assert_eq!(next.start, tc.start);
        assert_eq!(next.time, t2);

        // No further constraint: unchanged
        let last = route.constraint_past(&next);
        assert_eq!(last, next);
    }
}
