//! Bounded hours/minutes/seconds triple with borrow-decrement.

use serde::{Deserialize, Serialize};

/// Time remaining on a countdown, always within 0..=23 hours and
/// 0..=59 minutes/seconds. Out-of-range input is clamped at construction,
/// never rejected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLeft {
    pub hours: u8,
    pub minutes: u8,
    pub seconds: u8,
}

impl TimeLeft {
    pub const MAX_HOURS: u8 = 23;
    pub const MAX_MINUTES: u8 = 59;
    pub const MAX_SECONDS: u8 = 59;

    /// Build a triple from wide input, clamping each unit into range.
    pub fn new(hours: i64, minutes: i64, seconds: i64) -> Self {
        Self {
            hours: Self::clamp_hours(hours),
            minutes: Self::clamp_minutes(minutes),
            seconds: Self::clamp_seconds(seconds),
        }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    pub fn clamp_hours(value: i64) -> u8 {
        value.clamp(0, Self::MAX_HOURS as i64) as u8
    }

    pub fn clamp_minutes(value: i64) -> u8 {
        value.clamp(0, Self::MAX_MINUTES as i64) as u8
    }

    pub fn clamp_seconds(value: i64) -> u8 {
        value.clamp(0, Self::MAX_SECONDS as i64) as u8
    }

    pub fn is_zero(&self) -> bool {
        self.hours == 0 && self.minutes == 0 && self.seconds == 0
    }

    pub fn total_seconds(&self) -> u32 {
        self.hours as u32 * 3600 + self.minutes as u32 * 60 + self.seconds as u32
    }

    /// Apply one borrow-decrement step. Exactly one branch fires; at zero
    /// this is a no-op (the completion edge is the caller's decision).
    pub fn decrement(&mut self) {
        if self.seconds > 0 {
            self.seconds -= 1;
        } else if self.minutes > 0 {
            self.minutes -= 1;
            self.seconds = 59;
        } else if self.hours > 0 {
            self.hours -= 1;
            self.minutes = 59;
            self.seconds = 59;
        }
    }
}

impl std::fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn new_clamps_both_bounds() {
        let left = TimeLeft::new(30, -4, 99);
        assert_eq!(left, TimeLeft { hours: 23, minutes: 0, seconds: 59 });
    }

    #[test]
    fn decrement_simple() {
        let mut left = TimeLeft::new(0, 0, 5);
        left.decrement();
        assert_eq!(left, TimeLeft::new(0, 0, 4));
    }

    #[test]
    fn decrement_borrows_from_minutes() {
        let mut left = TimeLeft::new(0, 1, 0);
        left.decrement();
        assert_eq!(left, TimeLeft::new(0, 0, 59));
    }

    #[test]
    fn decrement_borrows_from_hours() {
        let mut left = TimeLeft::new(1, 0, 0);
        left.decrement();
        assert_eq!(left, TimeLeft::new(0, 59, 59));
    }

    #[test]
    fn decrement_at_zero_is_noop() {
        let mut left = TimeLeft::zero();
        left.decrement();
        assert!(left.is_zero());
    }

    #[test]
    fn display_pads_units() {
        assert_eq!(TimeLeft::new(1, 2, 3).to_string(), "01:02:03");
    }

    proptest! {
        #[test]
        fn always_in_bounds(h in -5i64..40, m in -5i64..80, s in -5i64..80, ticks in 0usize..500) {
            let mut left = TimeLeft::new(h, m, s);
            for _ in 0..ticks {
                left.decrement();
                prop_assert!(left.hours <= TimeLeft::MAX_HOURS);
                prop_assert!(left.minutes <= TimeLeft::MAX_MINUTES);
                prop_assert!(left.seconds <= TimeLeft::MAX_SECONDS);
            }
        }

        #[test]
        fn decrement_removes_exactly_one_second(h in 0i64..24, m in 0i64..60, s in 0i64..60) {
            let mut left = TimeLeft::new(h, m, s);
            let before = left.total_seconds();
            left.decrement();
            prop_assert_eq!(left.total_seconds(), before.saturating_sub(1));
        }
    }
}
