//! Simulated wall clock and time-of-day arithmetic.
//!
//! Arrival constraints are pure times of day with no date attached, so the
//! difference "now until target" has to wrap across midnight explicitly.

use chrono::{NaiveTime, Timelike};

use crate::constants::SECONDS_PER_DAY;

/// Seconds from `now` until the next calendar occurrence of `target`.
/// Always in `[0, 86400)`: a target one second in the past reads as almost a
/// full day away, because with no date there is nothing else it can mean.
/// Imminent-deadline handling is the advisory engine's skip-ahead threshold,
/// not this function.
pub fn seconds_until(target: NaiveTime, now: NaiveTime) -> i64 {
    let diff = target.num_seconds_from_midnight() as i64 - now.num_seconds_from_midnight() as i64;
    if diff < 0 {
        diff + SECONDS_PER_DAY
    } else {
        diff
    }
}

/// Parse "HH:MM:SS" into a time of day.
pub fn parse_time_of_day(s: &str) -> Result<NaiveTime, chrono::ParseError> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M:%S")
}

// --- SimClock ---

pub struct SimClock {
    /// Time of day at simulation start.
    start: NaiveTime,
    /// Elapsed simulation seconds since start.
    elapsed_sim: f64,
    /// Time warp factor (1.0 = real-time).
    pub time_scale: f64,
}

impl SimClock {
    pub fn new(start: NaiveTime) -> Self {
        Self { start, elapsed_sim: 0.0, time_scale: 1.0 }
    }

    /// Advance simulation clock by wall-clock dt (seconds).
    pub fn advance(&mut self, dt: f64) {
        self.elapsed_sim += dt * self.time_scale;
    }

    pub fn elapsed(&self) -> f64 {
        self.elapsed_sim
    }

    /// Current simulated time of day, wrapping across midnight.
    pub fn time_of_day(&self) -> NaiveTime {
        let total = self.start.num_seconds_from_midnight() as i64 + self.elapsed_sim as i64;
        let secs = total.rem_euclid(SECONDS_PER_DAY);
        NaiveTime::from_num_seconds_from_midnight_opt(secs as u32, 0)
            .unwrap_or(self.start)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t(s: &str) -> NaiveTime {
        parse_time_of_day(s).unwrap()
    }

    #[test]
    fn same_time_is_zero() {
        for s in ["00:00:00", "13:50:00", "23:59:59"] {
            assert_eq!(seconds_until(t(s), t(s)), 0);
        }
    }

    #[test]
    fn forward_same_day() {
        assert_eq!(seconds_until(t("14:00:00"), t("13:50:00")), 600);
    }

    #[test]
    fn wraps_across_midnight() {
        // Two seconds before midnight to one second after
        assert_eq!(seconds_until(t("00:00:01"), t("23:59:59")), 2);
    }

    #[test]
    fn target_just_past_reads_as_tomorrow() {
        // Target earlier in the day than now: next occurrence is tomorrow
        assert_eq!(seconds_until(t("23:59:59"), t("00:00:01")), SECONDS_PER_DAY - 2);
    }

    #[test]
    fn always_in_day_range() {
        let samples = ["00:00:00", "05:30:10", "12:00:00", "18:45:33", "23:59:59"];
        for a in samples {
            for b in samples {
                let s = seconds_until(t(a), t(b));
                assert!((0..SECONDS_PER_DAY).contains(&s), "{a} from {b}: {s}");
            }
        }
    }

    #[test]
    fn clock_advances_and_wraps() {
        let mut clock = SimClock::new(t("23:59:00"));
        clock.advance(90.0);
        assert_eq!(clock.time_of_day(), t("00:00:30"));
    }

    #[test]
    fn time_scale_applies() {
        let mut clock = SimClock::new(t("12:00:00"));
        clock.time_scale = 60.0;
        clock.advance(1.0);
        assert_eq!(clock.time_of_day(), t("12:01:00"));
    }
}
