//! Initial-delay computation — places the next fire inside the contact's
//! daily delivery window, a full cadence period out if today's window start
//! has already passed, plus a random sub-hour jitter.

use chrono::{DateTime, Duration as TimeDelta, TimeZone, Timelike};
use rand::Rng;
use std::time::Duration;

use rekindle_core::ScheduleSpec;

/// Jitter spread: a uniform 0..=59 whole minutes added to the window start.
const JITTER_SPREAD_MINUTES: u32 = 60;

/// Duration from `now` until the next delivery attempt should fire.
///
/// Both the clock and the jitter source are injected, so the computation is
/// pure and deterministic under a seeded rng. Assumes `spec` has already been
/// validated.
///
/// Jitter may push the fire time past `window_end_hour` — the window end
/// sizes the jitter conceptually but is never enforced here. Likewise a fire
/// can land past a full cadence period when the jitter overshoots; both are
/// tolerated by design.
pub fn initial_delay<Tz: TimeZone>(
    spec: &ScheduleSpec,
    now: &DateTime<Tz>,
    rng: &mut impl Rng,
) -> Duration {
    // Today's window start: same calendar day, window_start_hour:00:00.000,
    // in `now`'s timezone. The fallback only triggers inside a DST gap, in
    // which case we fire as soon as possible.
    let mut fire_at = now
        .clone()
        .with_hour(spec.window_start_hour)
        .and_then(|t| t.with_minute(0))
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or_else(|| now.clone());

    // Once today's window start has been reached the contact counts as
    // handled for this cycle: the next occurrence is a full cadence period
    // out — never later today, and never "tomorrow" unless cadence is 1.
    if *now >= fire_at {
        fire_at = fire_at + TimeDelta::days(i64::from(spec.cadence_days));
    }

    let jitter = rng.gen_range(0..JITTER_SPREAD_MINUTES);
    fire_at = fire_at + TimeDelta::minutes(i64::from(jitter));

    (fire_at - now.clone()).to_std().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use rekindle_core::{Language, MessageIntent};

    const HOUR: u64 = 3_600;
    const DAY: u64 = 86_400;
    const MAX_JITTER: u64 = 59 * 60;

    fn spec(cadence_days: u32) -> ScheduleSpec {
        ScheduleSpec::new(
            "15551234567",
            None,
            Language::English,
            cadence_days,
            8,
            9,
            MessageIntent::Morning,
        )
        .unwrap()
    }

    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[test]
    fn before_window_fires_same_day() {
        // 07:00, window 8-9 → fire today between 08:00 and 08:59.
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 7, 0, 0).unwrap();
        let d = initial_delay(&spec(1), &now, &mut rng());
        assert!(d >= Duration::from_secs(HOUR));
        assert!(d <= Duration::from_secs(HOUR + MAX_JITTER));
    }

    #[test]
    fn past_window_start_waits_full_cadence() {
        // 08:30, cadence 1 → today's window already counts as handled;
        // next fire tomorrow 08:00-08:59, delay ≈ 23h30m + jitter.
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 8, 30, 0).unwrap();
        let d = initial_delay(&spec(1), &now, &mut rng());
        assert!(d >= Duration::from_secs(DAY - HOUR / 2));
        assert!(d <= Duration::from_secs(DAY - HOUR / 2 + MAX_JITTER));
    }

    #[test]
    fn exactly_at_window_start_counts_as_passed() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 8, 0, 0).unwrap();
        let d = initial_delay(&spec(1), &now, &mut rng());
        assert!(d >= Duration::from_secs(DAY));
        assert!(d <= Duration::from_secs(DAY + MAX_JITTER));
    }

    #[test]
    fn longer_cadence_never_means_tomorrow() {
        // 09:00, cadence 7 → one week after today's window start, not tomorrow.
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let d = initial_delay(&spec(7), &now, &mut rng());
        assert!(d >= Duration::from_secs(7 * DAY - HOUR));
        assert!(d <= Duration::from_secs(7 * DAY - HOUR + MAX_JITTER));
    }

    #[test]
    fn late_night_before_midnight_window() {
        // Window at midnight, now 23:59 → midnight already passed today, so
        // the next occurrence is tomorrow at 00:00 + jitter.
        let s = ScheduleSpec::new(
            "15551234567",
            None,
            Language::English,
            1,
            0,
            1,
            MessageIntent::Night,
        )
        .unwrap();
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 23, 59, 0).unwrap();
        let d = initial_delay(&s, &now, &mut rng());
        assert!(d >= Duration::from_secs(60));
        assert!(d <= Duration::from_secs(60 + MAX_JITTER));
    }

    #[test]
    fn never_negative() {
        let s = spec(1);
        for hour in 0..24 {
            let now = Utc.with_ymd_and_hms(2026, 3, 10, hour, 17, 3).unwrap();
            let _ = initial_delay(&s, &now, &mut rng());
            // to_std() on a negative delta would have clamped to zero; the
            // real assertion is that nothing panics and results stay sane.
            assert!(initial_delay(&s, &now, &mut rng()) <= Duration::from_secs(2 * DAY));
        }
    }

    #[test]
    fn seeded_rng_is_deterministic() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 7, 0, 0).unwrap();
        let a = initial_delay(&spec(1), &now, &mut StdRng::seed_from_u64(7));
        let b = initial_delay(&spec(1), &now, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn jitter_stays_sub_hour() {
        // Across many draws the fire minute must stay within 0..=59 past the
        // window start.
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 7, 0, 0).unwrap();
        let mut r = rng();
        for _ in 0..64 {
            let d = initial_delay(&spec(1), &now, &mut r);
            let past_start = d.as_secs() - HOUR;
            assert!(past_start < 3_600);
            assert_eq!(past_start % 60, 0);
        }
    }
}
