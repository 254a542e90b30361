//! The month detail dialog and its JSON API.
//!
//! Clicking a chart bar or table row opens a dialog listing the individual
//! activities of that month. The same per-day rows back two routes: an HTML
//! fragment for the dialog body and a JSON endpoint for programmatic use.

use axum::{
    Json,
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Serialize;

use crate::{
    Error,
    dashboard::DashboardState,
    endpoints,
    html::{
        SPORT_BADGE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        format_metric, format_metric_rounded, link,
    },
    month::MonthKey,
    sport::Sport,
};

/// One activity within a month, as shown in the detail dialog.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayActivity {
    /// The day of the month the activity started on.
    pub day_of_month: u8,
    /// The activity's name.
    pub name: String,
    /// The activity's sport.
    #[serde(rename = "type")]
    pub sport: Sport,
    /// Distance in kilometres, if the activity recorded one.
    pub distance_km: Option<f64>,
    /// Moving time in fractional hours.
    pub duration_hours: f64,
    /// Energy output in kilojoules, if the activity recorded one.
    pub total_kj: Option<f64>,
}

/// The activities of one month, earliest first.
pub fn get_month_activities(
    month: MonthKey,
    connection: &Connection,
) -> Result<Vec<DayActivity>, Error> {
    connection
        .prepare(
            "SELECT start_date, name, sport, distance_meters, moving_time_seconds, kilojoules
            FROM activity
            WHERE substr(start_date, 1, 7) = ?1
            ORDER BY start_date ASC, id ASC",
        )?
        .query_map([month.to_string()], |row| {
            let start_date: time::Date = row.get(0)?;
            let distance_meters: Option<f64> = row.get(3)?;
            let moving_time_seconds: i64 = row.get(4)?;

            Ok(DayActivity {
                day_of_month: start_date.day(),
                name: row.get(1)?,
                sport: Sport::from(row.get::<_, String>(2)?),
                distance_km: distance_meters.map(|meters| meters / 1000.0),
                duration_hours: moving_time_seconds as f64 / 3600.0,
                total_kj: row.get(5)?,
            })
        })?
        .map(|row| row.map_err(Error::from))
        .collect()
}

/// Display the activities of one month as a dialog fragment.
///
/// The fragment is fetched into the already-open dialog, so it carries no
/// page shell.
pub async fn get_month_detail_fragment(
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

    Ok(month_detail_view(month, &activities).into_response())
}

/// Return the activities of one month as JSON.
pub async fn get_month_activities_json(
    Path(month_id): Path<String>,
    State(state): State<DashboardState>,
) -> Result<Json<Vec<DayActivity>>, Error> {
    let month = month_id.parse::<MonthKey>()?;

    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let activities = get_month_activities(month, &connection)
        .inspect_err(|error| tracing::error!("could not load activities for {month}: {error}"))?;

    Ok(Json(activities))
}

/// Formats fractional hours as `h:mm`, carrying rounded-up minutes.
fn format_duration(duration_hours: f64) -> String {
    let (hours, minutes) = crate::dashboard::split_hours_minutes(duration_hours);
    format!("{hours}:{minutes:02}")
}

fn format_optional_metric(value: Option<f64>) -> String {
    value.map_or_else(|| "0".to_owned(), format_metric)
}

fn format_optional_rounded(value: Option<f64>) -> String {
    value.map_or_else(|| "0".to_owned(), format_metric_rounded)
}

/// Renders the dialog body for one month's activities.
fn month_detail_view(month: MonthKey, activities: &[DayActivity]) -> Markup {
    let export_url = endpoints::format_month_endpoint(endpoints::EXPORT_MONTH_CSV, month);

    html!(
        div class="p-4" {
            h3 class="text-xl font-semibold mb-4" { "Activities for " (month.label()) }

            div class="overflow-x-auto rounded-lg shadow mb-4" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Day" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Name" }
                            th scope="col" class=(TABLE_CELL_STYLE) { "Sport" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "km" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Time" }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "kJ" }
                        }
                    }
                    tbody {
                        @if activities.is_empty() {
                            tr class=(TABLE_ROW_STYLE) {
                                td colspan="6" class={(TABLE_CELL_STYLE) " text-center"} {
                                    "No activities found."
                                }
                            }
                        }

                        @for activity in activities {
                            tr class=(TABLE_ROW_STYLE) {
                                td class=(TABLE_CELL_STYLE) { (activity.day_of_month) }
                                td class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"} {
                                    (activity.name)
                                }
                                td class=(TABLE_CELL_STYLE) {
                                    span class=(SPORT_BADGE_STYLE) { (activity.sport) }
                                }
                                td class={(TABLE_CELL_STYLE) " text-right"} {
                                    (format_optional_metric(activity.distance_km))
                                }
                                td class={(TABLE_CELL_STYLE) " text-right"} {
                                    (format_duration(activity.duration_hours))
                                }
                                td class={(TABLE_CELL_STYLE) " text-right"} {
                                    (format_optional_rounded(activity.total_kj))
                                }
                            }
                        }
                    }
                }
            }

            (link(&export_url, "Export this month (CSV)"))
        }
    )
}

#[cfg(test)]
mod month_detail_tests {
    use axum::extract::{Path, State};
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use std::sync::{Arc, Mutex};
    use time::macros::date;

    use crate::{
        Error,
        activity::{Activity, create_activity},
        dashboard::DashboardState,
        db::initialize,
        month::MonthKey,
        sport::Sport,
    };

    use super::{
        format_duration, get_month_activities, get_month_activities_json,
        get_month_detail_fragment,
    };

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn get_test_state(connection: Connection) -> DashboardState {
        DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    #[test]
    fn activities_come_back_earliest_first_within_the_month() {
        let connection = get_test_connection();
        create_activity(
            Activity::build("Later", Sport::Ride, date!(2024 - 03 - 20)).moving_time_seconds(60),
            &connection,
        )
        .unwrap();
        create_activity(
            Activity::build("Earlier", Sport::Ride, date!(2024 - 03 - 02)).moving_time_seconds(60),
            &connection,
        )
        .unwrap();
        create_activity(
            Activity::build("Other month", Sport::Ride, date!(2024 - 04 - 01))
                .moving_time_seconds(60),
            &connection,
        )
        .unwrap();

        let month = "2024-03".parse::<MonthKey>().unwrap();
        let activities = get_month_activities(month, &connection).unwrap();

        let names: Vec<&str> = activities
            .iter()
            .map(|activity| activity.name.as_str())
            .collect();
        assert_eq!(names, vec!["Earlier", "Later"]);
        assert_eq!(activities[0].day_of_month, 2);
    }

    #[test]
    fn missing_metrics_stay_absent() {
        let connection = get_test_connection();
        create_activity(
            Activity::build("Pool swim", Sport::Other("Swim".to_owned()), date!(2024 - 03 - 02))
                .moving_time_seconds(1800),
            &connection,
        )
        .unwrap();

        let month = "2024-03".parse::<MonthKey>().unwrap();
        let activities = get_month_activities(month, &connection).unwrap();

        assert_eq!(activities[0].distance_km, None);
        assert_eq!(activities[0].total_kj, None);
        assert_eq!(activities[0].duration_hours, 0.5);
    }

    #[test]
    fn durations_format_as_hours_and_padded_minutes() {
        assert_eq!(format_duration(1.5), "1:30");
        assert_eq!(format_duration(0.05), "0:03");
        assert_eq!(format_duration(1.9999), "2:00");
    }

    #[tokio::test]
    async fn fragment_lists_activities_with_dash_free_formatting() {
        let connection = get_test_connection();
        create_activity(
            Activity::build("Morning Ride", Sport::Ride, date!(2024 - 03 - 02))
                .moving_time_seconds(5400)
                .distance_meters(30_500.0)
                .kilojoules(720.4),
            &connection,
        )
        .unwrap();
        let state = get_test_state(connection);

        let response = get_month_detail_fragment(Path("2024-03".to_owned()), State(state))
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = Html::parse_fragment(&String::from_utf8_lossy(&body));

        let text = html.html();
        assert!(text.contains("Activities for Mar 2024"));
        assert!(text.contains("Morning Ride"));
        assert!(text.contains("30.5"));
        assert!(text.contains("1:30"));
        assert!(text.contains("720"));

        let export_selector = Selector::parse("a[href='/api/export/months/2024-03/csv']").unwrap();
        assert!(html.select(&export_selector).next().is_some());
    }

    #[tokio::test]
    async fn fragment_shows_placeholder_for_an_empty_month() {
        let connection = get_test_connection();
        let state = get_test_state(connection);

        let response = get_month_detail_fragment(Path("2024-03".to_owned()), State(state))
            .await
            .unwrap();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        assert!(text.contains("No activities found."));
    }

    #[tokio::test]
    async fn invalid_month_is_rejected() {
        let connection = get_test_connection();
        let state = get_test_state(connection);

        let error = get_month_activities_json(Path("03-2024".to_owned()), State(state))
            .await
            .unwrap_err();

        assert!(matches!(error, Error::InvalidMonth(_)));
    }

    #[tokio::test]
    async fn json_api_uses_the_wire_field_names() {
        let connection = get_test_connection();
        create_activity(
            Activity::build("Morning Ride", Sport::Ride, date!(2024 - 03 - 02))
                .moving_time_seconds(3600)
                .distance_meters(10_000.0),
            &connection,
        )
        .unwrap();
        let state = get_test_state(connection);

        let axum::Json(activities) =
            get_month_activities_json(Path("2024-03".to_owned()), State(state))
                .await
                .unwrap();

        let json = serde_json::to_value(&activities).unwrap();
        assert_eq!(json[0]["type"], "Ride");
        assert_eq!(json[0]["day_of_month"], 2);
        assert_eq!(json[0]["distance_km"], 10.0);
        assert_eq!(json[0]["total_kj"], serde_json::Value::Null);
    }
}
