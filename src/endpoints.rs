//! The application's endpoint URIs.
//!
//! For endpoints that take a month parameter, e.g. '/dashboard/months/{month_id}',
//! use [format_month_endpoint].

use crate::month::MonthKey;

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The all-important coffee route.
pub const COFFEE: &str = "/coffee";
/// The dashboard page. Also serves the dashboard content fragment for htmx
/// filter updates.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The dialog fragment listing one month's activities.
pub const MONTH_DETAIL_VIEW: &str = "/dashboard/months/{month_id}";

/// The route returning one month's activities as JSON.
pub const MONTH_ACTIVITIES_API: &str = "/api/activities/by-month/{month_id}";
/// The route for downloading the currently filtered summaries as CSV.
pub const EXPORT_VIEW_CSV: &str = "/api/export/view.csv";
/// The route for downloading every summary row as CSV.
pub const EXPORT_HISTORY_CSV: &str = "/api/export/history.csv";
/// The route for downloading one month's activities as CSV.
///
/// The path parameter must be a whole segment, so the CSV file name comes
/// from the Content-Disposition header rather than the URI.
pub const EXPORT_MONTH_CSV: &str = "/api/export/months/{month_id}/csv";

/// Replace the month parameter in `endpoint_path` with `month`.
///
/// A parameter is the literal `{month_id}`. If `endpoint_path` does not
/// contain it, the original path is returned unchanged.
pub fn format_month_endpoint(endpoint_path: &str, month: MonthKey) -> String {
    endpoint_path.replace("{month_id}", &month.to_string())
}
