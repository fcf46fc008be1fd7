//! Window planner — splits a long range into API-sized request windows.
//!
//! The remote service truncates or errors on wide ranges for high-cardinality
//! feeds, so every request is scoped to at most `max_span_days`. Windows are
//! inclusive on both ends and adjacent windows are separated by exactly one
//! [`BoundaryStep`]:
//!
//! - `W[0].start == range.start`, `W[n-1].end == range.end`
//! - `W[i].end + step == W[i+1].start`
//! - `W[i].end - W[i].start <= max_span_days`

use super::provider::FetchError;
use super::range::{BoundaryStep, DateRange, Window};
use chrono::Duration;

/// Plan windows with the default one-day boundary step.
pub fn plan_windows(range: &DateRange, max_span_days: u32) -> Result<Vec<Window>, FetchError> {
    plan_windows_with_step(range, max_span_days, BoundaryStep::Day)
}

/// Plan windows covering `range`, each no wider than `max_span_days`.
///
/// Windows are taken greedily from the start. When a full-width window would
/// stop less than one step short of `range.end`, it is shortened so the last
/// window is the degenerate `[end, end]` instead of overshooting.
pub fn plan_windows_with_step(
    range: &DateRange,
    max_span_days: u32,
    step: BoundaryStep,
) -> Result<Vec<Window>, FetchError> {
    if max_span_days == 0 {
        return Err(FetchError::InvalidSpan);
    }

    let span = Duration::days(i64::from(max_span_days));
    let step = step.duration();
    let end = range.end();

    let mut windows = Vec::new();
    let mut cursor = range.start();

    loop {
        let mut window_end = match cursor.checked_add_signed(span) {
            Some(t) if t < end => t,
            _ => end,
        };

        if window_end < end && end - window_end < step {
            // span >= one day >= step, so this stays strictly after cursor
            window_end = end - step;
        }

        windows.push(Window::from_bounds(cursor, window_end));

        if window_end == end {
            break;
        }
        cursor = window_end + step;
    }

    Ok(windows)
}
