//! Pause-aware simulated time for flight.
//!
//! Wall-clock frame deltas enter through [`clamp_frame_dt`]; everything past
//! that point reads only [`SimClock`].

use bevy::prelude::*;

/// Days in the in-game calendar year used for date display.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// First year of the in-game calendar (date zero).
pub const EPOCH_YEAR: i64 = 3200;

/// Simulated clock driving everything time-phased in flight.
///
/// Two clocks advance together while unpaused:
/// - `flight_secs` counts simulated seconds of flight (portal expansion,
///   debounce windows, laser lifetimes, star flicker).
/// - `date_days` is the in-game calendar date (orbital phase, station spin,
///   gas-giant banding). It advances `days_per_second` per flight second.
///
/// Neither ever reads wall-clock time, so pausing is exact.
#[derive(Resource, Clone, Debug)]
pub struct SimClock {
    /// Simulated seconds of flight since the session started.
    pub flight_secs: f64,
    /// In-game date in days since the calendar epoch.
    pub date_days: f64,
    /// Calendar days that pass per simulated flight second.
    pub days_per_second: f64,
    /// Whether simulation is paused.
    pub paused: bool,
}

impl Default for SimClock {
    fn default() -> Self {
        Self::at_date(0.0)
    }
}

impl SimClock {
    /// Create a clock starting at a specific in-game date.
    pub fn at_date(date_days: f64) -> Self {
        Self {
            flight_secs: 0.0,
            date_days,
            days_per_second: 1.0 / 60.0,
            paused: false,
        }
    }

    /// Advance both clocks by `dt` simulated seconds. No-op while paused.
    pub fn advance(&mut self, dt: f64) {
        if self.paused || dt <= 0.0 {
            return;
        }
        self.flight_secs += dt;
        self.date_days += dt * self.days_per_second;
    }

    /// Toggle pause, returning the new paused state.
    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        self.paused
    }
}

/// Clamp a wall-clock frame delta to a usable simulation step. Negative or
/// non-finite deltas become zero.
pub fn clamp_frame_dt(real_dt: f64, max_dt: f64) -> f64 {
    if real_dt.is_finite() {
        real_dt.clamp(0.0, max_dt.max(0.0))
    } else {
        0.0
    }
}

/// Format an in-game date as `YYYY.DDD` (year and day of year).
pub fn date_string(date_days: f64) -> String {
    let whole = date_days.max(0.0).floor();
    let year = (whole / DAYS_PER_YEAR).floor();
    let day = (whole - year * DAYS_PER_YEAR).floor() as i64 + 1;
    format!("{:04}.{:03}", EPOCH_YEAR + year as i64, day)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_clock_advances_both_timelines() {
        let mut clock = SimClock::at_date(10.0);
        clock.days_per_second = 0.5;
        clock.advance(2.0);
        assert_relative_eq!(clock.flight_secs, 2.0);
        assert_relative_eq!(clock.date_days, 11.0);
    }

    #[test]
    fn test_clock_frozen_while_paused() {
        let mut clock = SimClock::default();
        clock.paused = true;
        clock.advance(5.0);
        assert_eq!(clock.flight_secs, 0.0);
        assert_eq!(clock.date_days, 0.0);
    }

    #[test]
    fn test_toggle_pause() {
        let mut clock = SimClock::default();
        assert!(clock.toggle_pause());
        assert!(!clock.toggle_pause());
    }

    #[test]
    fn test_frame_dt_clamp() {
        assert_eq!(clamp_frame_dt(0.016, 0.05), 0.016);
        assert_eq!(clamp_frame_dt(2.0, 0.05), 0.05);
        assert_eq!(clamp_frame_dt(-1.0, 0.05), 0.0);
        assert_eq!(clamp_frame_dt(f64::NAN, 0.05), 0.0);
    }

    #[test]
    fn test_date_string() {
        assert_eq!(date_string(0.0), "3200.001");
        assert_eq!(date_string(366.0), "3201.001");
        assert_eq!(date_string(40.5), "3200.041");
    }
}
