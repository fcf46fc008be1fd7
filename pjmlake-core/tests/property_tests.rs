//! Property tests for window planner invariants.
//!
//! Uses proptest to verify, for every valid range and span:
//! 1. Coverage — first window starts at `start`, last ends at `end`
//! 2. Contiguity — each window starts exactly one step after the previous ends
//! 3. Span limit — no window is wider than `max_span_days`
//! 4. Ordering — windows are non-degenerate except possibly the last

use chrono::{Duration, NaiveDate, NaiveDateTime};
use pjmlake_core::data::{
    plan_windows, plan_windows_with_step, BoundaryStep, DateRange, FetchError,
};
use proptest::prelude::*;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_timestamp() -> impl Strategy<Value = NaiveDateTime> {
    // Minutes from 2020-01-01 00:00 across roughly six years
    (0i64..3_200_000).prop_map(|m| {
        NaiveDate::from_ymd_opt(2020, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
            + Duration::minutes(m)
    })
}

fn arb_range() -> impl Strategy<Value = DateRange> {
    // Up to ~120 days long, so window counts stay small
    (arb_timestamp(), 0i64..172_800).prop_map(|(start, len)| {
        DateRange::new(start, start + Duration::minutes(len)).unwrap()
    })
}

fn arb_step() -> impl Strategy<Value = BoundaryStep> {
    prop_oneof![Just(BoundaryStep::Day), Just(BoundaryStep::Minute)]
}

// ── Planner invariants ───────────────────────────────────────────────

proptest! {
    #[test]
    fn windows_cover_range_contiguously(
        range in arb_range(),
        span in 1u32..8,
        step in arb_step(),
    ) {
        let windows = plan_windows_with_step(&range, span, step).unwrap();
        prop_assert!(!windows.is_empty());

        prop_assert_eq!(windows[0].start(), range.start());
        prop_assert_eq!(windows[windows.len() - 1].end(), range.end());

        for pair in windows.windows(2) {
            prop_assert_eq!(pair[0].end() + step.duration(), pair[1].start());
        }
    }

    #[test]
    fn windows_respect_span_limit(
        range in arb_range(),
        span in 1u32..8,
        step in arb_step(),
    ) {
        let limit = Duration::days(i64::from(span));
        for w in plan_windows_with_step(&range, span, step).unwrap() {
            prop_assert!(w.start() <= w.end());
            prop_assert!(w.span() <= limit);
        }
    }

    #[test]
    fn only_the_last_window_may_be_degenerate(
        range in arb_range(),
        span in 1u32..8,
        step in arb_step(),
    ) {
        let windows = plan_windows_with_step(&range, span, step).unwrap();
        for w in &windows[..windows.len() - 1] {
            prop_assert!(w.start() < w.end());
        }
    }

    #[test]
    fn narrow_ranges_are_a_single_window(start in arb_timestamp(), span in 1u32..8, extra in 0i64..1440) {
        let len = (Duration::days(i64::from(span)) - Duration::minutes(extra)).max(Duration::zero());
        let range = DateRange::new(start, start + len).unwrap();
        let windows = plan_windows(&range, span).unwrap();
        prop_assert_eq!(windows.len(), 1);
        prop_assert_eq!(windows[0].range(), range);
    }

    #[test]
    fn degenerate_range_is_one_degenerate_window(start in arb_timestamp(), span in 1u32..8) {
        let range = DateRange::new(start, start).unwrap();
        let windows = plan_windows(&range, span).unwrap();
        prop_assert_eq!(windows.len(), 1);
        prop_assert_eq!(windows[0].start(), start);
        prop_assert_eq!(windows[0].end(), start);
    }

    #[test]
    fn inverted_range_is_rejected(start in arb_timestamp(), back in 1i64..100_000) {
        let result = DateRange::new(start, start - Duration::minutes(back));
        let is_invalid_range = matches!(result, Err(FetchError::InvalidRange { .. }));
        prop_assert!(is_invalid_range);
    }

    #[test]
    fn planning_is_deterministic(range in arb_range(), span in 1u32..8) {
        prop_assert_eq!(plan_windows(&range, span).unwrap(), plan_windows(&range, span).unwrap());
    }
}
