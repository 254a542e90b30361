//! The four stat totals shown above the chart.

use crate::dashboard::summary::MonthlySummary;

/// Straight reductions over the fully-filtered summaries.
///
/// These are independent of the selected chart metric; switching the metric
/// never changes the stat boxes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActivityTotals {
    /// Total number of activities.
    pub activities: i64,
    /// Total distance in kilometers.
    pub distance_km: f64,
    /// Total moving time in hours.
    pub duration_hours: f64,
    /// Total work in kilojoules.
    pub total_kj: f64,
}

/// Sum the four metric totals over `fully_filtered`.
pub fn activity_totals(fully_filtered: &[MonthlySummary]) -> ActivityTotals {
    fully_filtered
        .iter()
        .fold(ActivityTotals::default(), |totals, summary| ActivityTotals {
            activities: totals.activities + summary.activities,
            distance_km: totals.distance_km + summary.distance_km,
            duration_hours: totals.duration_hours + summary.duration_hours,
            total_kj: totals.total_kj + summary.total_kj,
        })
}

/// Split fractional hours into whole hours and rounded minutes.
///
/// Minutes round rather than truncate, with a carry into hours when the
/// rounding reaches 60: 1.996 h is "2h 0m", never "1h 60m".
pub fn split_hours_minutes(hours: f64) -> (i64, u8) {
    let whole_hours = hours.trunc() as i64;
    let minutes = (hours.fract() * 60.0).round() as i64;

    if minutes == 60 {
        (whole_hours + 1, 0)
    } else {
        (whole_hours, minutes as u8)
    }
}
