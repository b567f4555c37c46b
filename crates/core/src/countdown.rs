//! Remaining-time computation for exam countdowns.
//!
//! Pure functions of two timestamps; callers supply `now` (usually from a
//! [`Clock`](crate::Clock)) so results are deterministic.

use std::fmt;

use chrono::{DateTime, Utc};

/// Window, in days, over which [`proximity_percent`] fills from 0 to 100.
pub const PROXIMITY_WINDOW_DAYS: i64 = 30;

/// Time left until a target, or the fact that it has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    /// Whole days, hours modulo 24 and minutes modulo 60. Seconds are dropped.
    Remaining { days: i64, hours: i64, minutes: i64 },
    /// The target lies strictly before `now`.
    Elapsed,
}

impl Countdown {
    #[must_use]
    pub fn is_elapsed(&self) -> bool {
        matches!(self, Countdown::Elapsed)
    }
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Countdown::Remaining {
                days,
                hours,
                minutes,
            } => write!(f, "{days}d {hours}h {minutes}m"),
            Countdown::Elapsed => f.write_str("Exam has passed"),
        }
    }
}

/// Computes the time remaining from `now` until `target`.
///
/// A target equal to `now` is `0d 0h 0m`, not elapsed.
#[must_use]
pub fn countdown(target: DateTime<Utc>, now: DateTime<Utc>) -> Countdown {
    if target < now {
        return Countdown::Elapsed;
    }
    let remaining = target - now;
    Countdown::Remaining {
        days: remaining.num_days(),
        hours: remaining.num_hours() % 24,
        minutes: remaining.num_minutes() % 60,
    }
}

/// How close `target` is, as a 0–100 fill level: 0 at thirty or more whole
/// days out, 100 on the day itself and after it has passed.
#[must_use]
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn proximity_percent(target: DateTime<Utc>, now: DateTime<Utc>) -> u8 {
    let days = (target - now).num_days();
    let filled = 100.0 - (days as f64 / PROXIMITY_WINDOW_DAYS as f64) * 100.0;
    filled.clamp(0.0, 100.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;
    use chrono::Duration;

    #[test]
    fn ninety_minutes_out() {
        let now = fixed_now();
        let c = countdown(now + Duration::minutes(90), now);
        assert_eq!(
            c,
            Countdown::Remaining {
                days: 0,
                hours: 1,
                minutes: 30
            }
        );
        assert_eq!(c.to_string(), "0d 1h 30m");
    }

    #[test]
    fn one_day_ago_is_elapsed() {
        let now = fixed_now();
        let c = countdown(now - Duration::days(1), now);
        assert!(c.is_elapsed());
        assert_eq!(c.to_string(), "Exam has passed");
    }

    #[test]
    fn a_second_ago_is_elapsed() {
        let now = fixed_now();
        assert!(countdown(now - Duration::seconds(1), now).is_elapsed());
    }

    #[test]
    fn same_instant_is_zero_remaining() {
        let now = fixed_now();
        assert_eq!(countdown(now, now).to_string(), "0d 0h 0m");
    }

    #[test]
    fn multi_day_wraps_hours_and_minutes() {
        let now = fixed_now();
        let target = now + Duration::days(3) + Duration::hours(26) + Duration::minutes(61);
        // 4 days, 3 hours, 1 minute
        assert_eq!(countdown(target, now).to_string(), "4d 3h 1m");
    }

    #[test]
    fn seconds_are_truncated() {
        let now = fixed_now();
        let target = now + Duration::minutes(5) + Duration::seconds(59);
        assert_eq!(countdown(target, now).to_string(), "0d 0h 5m");
    }

    #[test]
    fn proximity_fills_over_thirty_days() {
        let now = fixed_now();
        assert_eq!(proximity_percent(now + Duration::days(45), now), 0);
        assert_eq!(proximity_percent(now + Duration::days(30), now), 0);
        assert_eq!(proximity_percent(now + Duration::days(15), now), 50);
        assert_eq!(proximity_percent(now + Duration::hours(5), now), 100);
        assert_eq!(proximity_percent(now - Duration::days(3), now), 100);
    }
}
