//! Trailing-window selection.
//!
//! Chamber series often start with a transient that predates the
//! measurement of interest; fitting only a trailing window suppresses it.
//! The window is anchored at the last sample: `max_window_s` caps how far
//! back the window reaches, `min_window_s` guarantees a minimum reach.
//!
//! The two bounds interact in a deliberate, as-observed order: the start
//! is first pushed forward for `max_window_s`, then clamped backward so it
//! is never later than `last_time - min_window_s`. For some configurations
//! the min-clamp partially undoes the max-cap; this mirrors the behavior
//! downstream consumers already calibrate against, so it is preserved
//! rather than "fixed". Flagged for product review before any change.

use crate::domain::WindowConfig;

/// Slice both series to the configured trailing window.
///
/// Returns the input unchanged when no bound is set. The time axis must be
/// non-decreasing (the fit engine validates this); the start index is
/// located by binary search.
pub fn select_window<'a>(
    time_s: &'a [f64],
    concentration_ppm: &'a [f64],
    window: &WindowConfig,
) -> (&'a [f64], &'a [f64]) {
    if window.is_empty() || time_s.is_empty() {
        return (time_s, concentration_ppm);
    }

    let last_time = time_s[time_s.len() - 1];
    let mut start_time = time_s[0];
    if let Some(max_window) = window.max_window_s {
        start_time = start_time.max(last_time - max_window);
    }
    if let Some(min_window) = window.min_window_s {
        start_time = start_time.min(last_time - min_window);
    }

    // First index with time >= start_time.
    let start_idx = time_s.partition_point(|&t| t < start_time);
    (&time_s[start_idx..], &concentration_ppm[start_idx..])
}
