//! CSV export of summaries and activities.
//!
//! Three routes export data as CSV downloads: the currently filtered view,
//! the unfiltered history and one month's individual activities. Field
//! quoting and escaping is left entirely to the `csv` crate.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use maud::html;
use serde::Serialize;

use crate::{
    Error,
    dashboard::{
        DashboardQuery, DashboardState, MonthlySummary, Selection, filter_by_sports,
        filter_by_time, load_monthly_summaries, sports_by_count,
    },
    html::{PAGE_CONTAINER_STYLE, base},
    month::MonthKey,
    month_detail::get_month_activities,
    sport::Sport,
    timezone::current_local_date,
};

/// One monthly summary row as it appears in the exported CSV.
#[derive(Debug, Serialize)]
struct SummaryExportRow {
    /// The month as `YYYY-MM`.
    month_id: String,
    /// The month's display label, e.g. "Mar 2024".
    month_label: String,
    /// The kind of sport.
    #[serde(rename = "type")]
    sport: Sport,
    /// The number of activities.
    activities: i64,
    /// Total distance in kilometres.
    distance_km: f64,
    /// Total moving time in fractional hours.
    duration_hours: f64,
    /// Total energy output in kilojoules.
    total_kj: f64,
}

impl From<&MonthlySummary> for SummaryExportRow {
    fn from(summary: &MonthlySummary) -> Self {
        Self {
            month_id: summary.month.to_string(),
            month_label: summary.month.label(),
            sport: summary.sport.clone(),
            activities: summary.activities,
            distance_km: summary.distance_km,
            duration_hours: summary.duration_hours,
            total_kj: summary.total_kj,
        }
    }
}

/// Serializes rows to CSV text with a header row.
fn to_csv<S: Serialize>(rows: &[S]) -> Result<String, Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for row in rows {
        writer.serialize(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::ExportError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::ExportError(error.to_string()))
}

/// Wraps CSV text in a download response.
fn csv_download(file_name: &str, csv_text: String) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_owned()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        csv_text,
    )
        .into_response()
}

/// The page shown when an export matches no rows.
fn nothing_to_export_view() -> Response {
    let content = html!(
        div class=(PAGE_CONTAINER_STYLE) {
            h2 class="text-xl font-bold" { "Nothing to export" }

            p { "No rows matched this export. Widen the filters and try again." }
        }
    );

    base("Export", &[], &content).into_response()
}

/// Export the monthly summaries matching the current dashboard filters.
pub async fn get_export_view_csv(
    State(state): State<DashboardState>,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let summaries = load_monthly_summaries(&connection)?;
    let all_sports: Vec<Sport> = sports_by_count(&connection)?
        .into_iter()
        .map(|count| count.sport)
        .collect();

    let selection = Selection::from_query(query, &all_sports);
    let today = current_local_date(&state.local_timezone)?;

    let time_filtered = filter_by_time(&summaries, selection.range, today);
    let fully_filtered = filter_by_sports(&time_filtered, &selection.sports);

    if fully_filtered.is_empty() {
        return Ok(nothing_to_export_view());
    }

    let rows: Vec<SummaryExportRow> = fully_filtered.iter().map(SummaryExportRow::from).collect();
    let file_name = format!("Dashboard_View_{today}.csv");

    Ok(csv_download(&file_name, to_csv(&rows)?))
}

/// Export every monthly summary on record, ignoring the dashboard filters.
pub async fn get_export_history_csv(
    State(state): State<DashboardState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let summaries = load_monthly_summaries(&connection)?;

    if summaries.is_empty() {
        return Ok(nothing_to_export_view());
    }

    let rows: Vec<SummaryExportRow> = summaries.iter().map(SummaryExportRow::from).collect();
    let today = current_local_date(&state.local_timezone)?;
    let file_name = format!("Full_History_{today}.csv");

    Ok(csv_download(&file_name, to_csv(&rows)?))
}

/// Export one month's individual activities.
pub async fn get_export_month_csv(
    Path(month_id): Path<String>,
    State(state): State<DashboardState>,
) -> Result<Response, Error> {
    let month = month_id.parse::<MonthKey>()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let activities = get_month_activities(month, &connection)
        .inspect_err(|error| tracing::error!("could not load activities for {month}: {error}"))?;

    if activities.is_empty() {
        return Ok(nothing_to_export_view());
    }

    let file_name = format!("Activities_{}.csv", month.label().replace(' ', "_"));

    Ok(csv_download(&file_name, to_csv(&activities)?))
}
