//! Time-decaying rank function
//!
//! Maps (base level, minutes until due, consumed) to an effective rank. The
//! result is never cached: minutes-until-due moves with the clock, so every
//! comparison recomputes it.
//!
//! Base levels are inverted before weighting (level 1 weighs 5, level 5
//! weighs 1). The dashboard labels level 5 as "highest", so the two
//! conventions disagree; the inversion is kept as-is until the intended
//! meaning is confirmed.

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const MIN_LEVEL: u8 = 1;
pub const MAX_LEVEL: u8 = 5;

/// Effective urgency of an item at one instant. Higher is more urgent.
///
/// `Consumed` sorts below every `Active` rank, whatever the multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Rank {
    Consumed,
    Active(u32),
}

impl Rank {
    /// Numeric form for display. Consumed items report the `u32::MAX` sentinel.
    pub fn value(&self) -> u32 {
        match self {
            Rank::Consumed => u32::MAX,
            Rank::Active(value) => *value,
        }
    }

    pub fn is_consumed(&self) -> bool {
        matches!(self, Rank::Consumed)
    }
}

impl std::fmt::Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rank::Consumed => write!(f, "consumed"),
            Rank::Active(value) => write!(f, "{value}"),
        }
    }
}

/// Anything the heap can order. The rank may depend on `now`.
pub trait Prioritized {
    fn effective_rank(&self, now: DateTime<Utc>) -> Rank;
}

impl<T: Prioritized + ?Sized> Prioritized for &T {
    fn effective_rank(&self, now: DateTime<Utc>) -> Rank {
        (**self).effective_rank(now)
    }
}

/// Clamp a caller-supplied urgency into `[1, 5]`
pub fn clamp_level(level: i64) -> u8 {
    level.clamp(MIN_LEVEL as i64, MAX_LEVEL as i64) as u8
}

/// Time-bucket multiplier for a signed minutes-until-due value
pub fn time_multiplier(minutes_until_due: i64) -> u32 {
    match minutes_until_due {
        m if m < 0 => 100,
        0..=29 => 50,
        30..=59 => 20,
        60..=239 => 10,
        _ => 1,
    }
}

/// Compute the effective rank. Out-of-range levels are clamped, never rejected.
pub fn effective_rank(base_level: i64, minutes_until_due: i64, consumed: bool) -> Rank {
    if consumed {
        return Rank::Consumed;
    }

    // 1 -> 5, 2 -> 4, 3 -> 3, 4 -> 2, 5 -> 1
    let weight = u32::from(MAX_LEVEL + 1 - clamp_level(base_level));
    Rank::Active(weight * time_multiplier(minutes_until_due))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_boundaries() {
        assert_eq!(time_multiplier(-1), 100);
        assert_eq!(time_multiplier(0), 50);
        assert_eq!(time_multiplier(29), 50);
        assert_eq!(time_multiplier(30), 20);
        assert_eq!(time_multiplier(59), 20);
        assert_eq!(time_multiplier(60), 10);
        assert_eq!(time_multiplier(239), 10);
        assert_eq!(time_multiplier(240), 1);
        assert_eq!(time_multiplier(i64::MAX), 1);
        assert_eq!(time_multiplier(i64::MIN), 100);
    }

    #[test]
    fn test_level_inversion() {
        assert_eq!(effective_rank(1, 500, false), Rank::Active(5));
        assert_eq!(effective_rank(2, 500, false), Rank::Active(4));
        assert_eq!(effective_rank(3, 500, false), Rank::Active(3));
        assert_eq!(effective_rank(4, 500, false), Rank::Active(2));
        assert_eq!(effective_rank(5, 500, false), Rank::Active(1));
    }

    #[test]
    fn test_overdue_multiplier() {
        assert_eq!(effective_rank(1, -5, false), Rank::Active(500));
        assert_eq!(effective_rank(5, -5, false), Rank::Active(100));
        assert_eq!(effective_rank(3, 50, false), Rank::Active(60));
        assert_eq!(effective_rank(5, 10, false), Rank::Active(50));
    }

    #[test]
    fn test_levels_are_clamped() {
        assert_eq!(clamp_level(0), 1);
        assert_eq!(clamp_level(-40), 1);
        assert_eq!(clamp_level(9), 5);
        assert_eq!(clamp_level(3), 3);

        for minutes in [-10, 0, 45, 120, 600] {
            assert_eq!(
                effective_rank(0, minutes, false),
                effective_rank(1, minutes, false)
            );
            assert_eq!(
                effective_rank(9, minutes, false),
                effective_rank(5, minutes, false)
            );
        }
    }

    #[test]
    fn test_consumed_is_weakest() {
        let weakest_active = effective_rank(5, 10_000, false);
        assert_eq!(weakest_active, Rank::Active(1));

        for level in 1..=5 {
            for minutes in [-60, 0, 30, 60, 240] {
                assert_eq!(effective_rank(level, minutes, true), Rank::Consumed);
            }
        }
        assert!(Rank::Consumed < weakest_active);
        assert!(Rank::Consumed < Rank::Active(0));
    }

    #[test]
    fn test_consumed_reports_sentinel_value() {
        assert_eq!(Rank::Consumed.value(), u32::MAX);
        assert_eq!(Rank::Active(60).value(), 60);
        assert_eq!(Rank::Consumed.to_string(), "consumed");
        assert_eq!(Rank::Active(60).to_string(), "60");
    }

    #[test]
    fn test_monotonic_in_time() {
        let samples = [-500, -1, 0, 15, 29, 30, 59, 60, 200, 239, 240, 10_000];
        for level in 1..=5 {
            for pair in samples.windows(2) {
                // pair[0] is closer to (or past) due, so it never ranks lower
                assert!(effective_rank(level, pair[0], false) >= effective_rank(level, pair[1], false));
            }
        }
    }

    #[test]
    fn test_monotonic_in_weight() {
        // With the inversion, lower base levels carry more weight
        for minutes in [-5, 10, 45, 90, 300] {
            for level in 1..5 {
                assert!(
                    effective_rank(level, minutes, false) >= effective_rank(level + 1, minutes, false)
                );
            }
        }
    }
}
