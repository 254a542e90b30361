//! Dashboard HTTP handlers and view rendering.
//!
//! This module contains:
//! - The route handler for displaying and filtering the dashboard
//! - HTML view functions for rendering the dashboard UI
//! - The state type used by the handlers
//!
//! Filter changes are htmx requests to the same route. The handler renders
//! the full page for a regular request and only the `#dashboard-content`
//! fragment when the `HX-Request` header is present.

use axum::{
    extract::{FromRef, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::Query;
use axum_htmx::HxRequest;
use maud::{Markup, PreEscaped, html};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};

use crate::{
    AppState, Error,
    dashboard::{
        aggregation::{month_axis, row_totals, sport_series},
        cards::stat_cards_view,
        charts::{DashboardChart, activity_chart, chart_script, chart_view},
        filter::{DashboardQuery, Metric, Selection, TimeRange, filter_by_sports, filter_by_time},
        stats::{ActivityTotals, activity_totals},
        summary::{load_monthly_summaries, sports_by_count},
        tables::{SummaryTable, monthly_summary_table, summary_table_model},
    },
    endpoints,
    html::{
        FORM_CHECKBOX_STYLE, FORM_LABEL_STYLE, FORM_SELECT_STYLE, HeadElement,
        PAGE_CONTAINER_STYLE, base, link, loading_spinner,
    },
    sport::Sport,
    timezone::current_local_date,
};

/// The pinned ECharts build loaded on the dashboard page.
const ECHARTS_CDN: &str = "https://cdn.jsdelivr.net/npm/echarts@5.6.0/dist/echarts.min.js";

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The database connection for reading activities.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The local timezone as a canonical timezone name, e.g. "Pacific/Auckland".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// Holds all the data needed to render the dashboard.
struct DashboardData {
    selection: Selection,
    all_sports: Vec<Sport>,
    totals: ActivityTotals,
    chart: DashboardChart,
    table: SummaryTable,
}

/// Display a page with an overview of the user's activities.
///
/// With no query parameters the dashboard shows the default view (last twelve
/// months, every sport, distance). htmx requests get back only the dashboard
/// content fragment so filter changes never reload the page.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    HxRequest(is_htmx): HxRequest,
    Query(query): Query<DashboardQuery>,
) -> Response {
    match render_dashboard(&state, query, is_htmx) {
        Ok(response) => response,
        // htmx swaps error responses into the alert container, so a full
        // error page would end up inside the dashboard layout.
        Err(error) if is_htmx => error.into_alert_response(),
        Err(error) => error.into_response(),
    }
}

fn render_dashboard(
    state: &DashboardState,
    query: DashboardQuery,
    is_htmx: bool,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let data = build_dashboard_data(query, &state.local_timezone, &connection)?;

    let response = match data {
        Some(data) => {
            let content = dashboard_content(&data);

            if is_htmx {
                content.into_response()
            } else {
                dashboard_view(&content).into_response()
            }
        }
        None if is_htmx => no_data_prompt().into_response(),
        None => dashboard_no_data_view().into_response(),
    };

    Ok(response)
}

/// Fetches and builds all data needed for the dashboard display.
///
/// Returns `None` when no activities exist at all. A selection that merely
/// matches nothing still returns data: the form must stay on screen so the
/// user can widen the filter again.
fn build_dashboard_data(
    query: DashboardQuery,
    local_timezone_name: &str,
    connection: &Connection,
) -> Result<Option<DashboardData>, Error> {
    let summaries = load_monthly_summaries(connection)
        .inspect_err(|error| tracing::error!("could not load monthly summaries: {error}"))?;

    if summaries.is_empty() {
        return Ok(None);
    }

    let all_sports: Vec<Sport> = sports_by_count(connection)
        .inspect_err(|error| tracing::error!("could not load sports: {error}"))?
        .into_iter()
        .map(|count| count.sport)
        .collect();

    let selection = Selection::from_query(query, &all_sports);
    let today = current_local_date(local_timezone_name)?;

    let time_filtered = filter_by_time(&summaries, selection.range, today);
    let fully_filtered = filter_by_sports(&time_filtered, &selection.sports);

    let axis = month_axis(&time_filtered);
    let series = sport_series(&time_filtered, &axis, &selection.sports, selection.metric);
    let totals_per_month = row_totals(&series, axis.len());

    let totals = activity_totals(&fully_filtered);
    let chart = activity_chart(&axis, &series, selection.metric);
    let table = summary_table_model(&axis, &series, &totals_per_month, selection.metric);

    Ok(Some(DashboardData {
        selection,
        all_sports,
        totals,
        chart,
        table,
    }))
}

/// Renders the filter form: time range, metric and sport checkboxes.
///
/// Any change re-requests the dashboard route; htmx swaps the result into
/// `#dashboard-content`, which includes this form, so the controls always
/// reflect the selection that produced the current view.
fn filter_form(selection: &Selection, all_sports: &[Sport]) -> Markup {
    html!(
        form
            hx-get=(endpoints::DASHBOARD_VIEW)
            hx-target="#dashboard-content"
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
            hx-trigger="change"
            class="bg-gray-50 dark:bg-gray-800 p-4 rounded-lg mb-4 w-full
                flex flex-col lg:flex-row lg:items-end gap-4"
        {
            div {
                label for="range" class=(FORM_LABEL_STYLE) { "Time range" }
                select id="range" name="range" class=(FORM_SELECT_STYLE) {
                    @for range in TimeRange::PRESETS {
                        option
                            value=(range.as_query_value())
                            selected[range == selection.range]
                        {
                            (range.label())
                        }
                    }
                }
            }

            fieldset {
                legend class=(FORM_LABEL_STYLE) { "Metric" }
                div class="flex gap-4" {
                    @for metric in Metric::ALL {
                        label class="flex items-center space-x-1 text-sm" {
                            input
                                type="radio"
                                name="metric"
                                value=(metric.as_query_value())
                                checked[metric == selection.metric]
                                class=(FORM_CHECKBOX_STYLE);
                            span { (metric.label()) }
                        }
                    }
                }
            }

            fieldset {
                legend class=(FORM_LABEL_STYLE) { "Sports" }
                div class="flex flex-wrap gap-3" {
                    @for sport in all_sports {
                        label class="flex items-center space-x-1 text-sm" {
                            input
                                type="checkbox"
                                name="types"
                                value=(sport.as_str())
                                checked[selection.sports.contains(sport)]
                                class=(FORM_CHECKBOX_STYLE);
                            span { (sport) }
                        }
                    }
                }
            }
        }
    )
}

/// Renders the export links for the current selection and for full history.
fn export_links(selection: &Selection) -> Markup {
    let view_url = format!(
        "{}?{}",
        endpoints::EXPORT_VIEW_CSV,
        selection.to_query_string()
    );

    html!(
        div class="flex gap-4 mb-8 text-sm" {
            (link(&view_url, "Export current view (CSV)"))
            (link(endpoints::EXPORT_HISTORY_CSV, "Export full history (CSV)"))
        }
    )
}

/// Renders the swappable dashboard content: form, cards, chart and table.
fn dashboard_content(data: &DashboardData) -> Markup {
    html!(
        (filter_form(&data.selection, &data.all_sports))
        (stat_cards_view(&data.totals))
        (chart_view())
        (monthly_summary_table(&data.table))
        (export_links(&data.selection))
        (chart_script(&data.chart))
    )
}

/// The script that opens the month detail dialog and loads its content.
///
/// Rapid repeated clicks each bump the request token; a response is only
/// rendered when its token is still the latest, so a slow earlier response
/// can never overwrite a newer month's details.
fn month_dialog_script() -> HeadElement {
    let month_detail_prefix = endpoints::MONTH_DETAIL_VIEW.replace("{month_id}", "");
    let spinner = loading_spinner().into_string();

    let script = format!(
        r#"let monthRequestToken = 0;
function showMonthDetail(monthId) {{
    const dialog = document.getElementById('month-detail-dialog');
    const content = document.getElementById('month-detail-content');
    const token = ++monthRequestToken;

    content.innerHTML = '<p class="p-4 text-gray-500">{spinner} Loading...</p>';
    if (!dialog.open) {{
        dialog.showModal();
    }}

    fetch('{month_detail_prefix}' + monthId)
        .then((response) => {{
            if (!response.ok) {{
                throw new Error('HTTP ' + response.status);
            }}
            return response.text();
        }})
        .then((text) => {{
            if (token === monthRequestToken) {{
                content.innerHTML = text;
            }}
        }})
        .catch(() => {{
            if (token === monthRequestToken) {{
                content.innerHTML =
                    '<p class="p-4 text-red-600">Could not load activities for this month.</p>';
            }}
        }});
}}"#
    );

    HeadElement::ScriptSource(PreEscaped(script))
}

/// Renders the month detail dialog shell.
///
/// The shell lives outside `#dashboard-content` so a filter change cannot
/// replace an open dialog. Its content is fetched on demand by
/// [month_dialog_script].
fn month_dialog() -> Markup {
    html!(
        dialog
            id="month-detail-dialog"
            class="rounded-lg shadow-xl p-0 w-full max-w-2xl
                backdrop:bg-gray-900/50 dark:bg-gray-800 dark:text-white"
        {
            div class="flex justify-end p-2" {
                button
                    type="button"
                    onclick="document.getElementById('month-detail-dialog').close()"
                    class="px-2 text-gray-500 hover:text-gray-900 dark:hover:text-white"
                    aria-label="Close"
                {
                    "✕"
                }
            }
            div id="month-detail-content" {}
        }
    )
}

/// Renders the main dashboard page.
fn dashboard_view(content: &Markup) -> Markup {
    let page = html!(
        div
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            h1 class="text-2xl font-bold mb-4 w-full" { "Activity Dashboard" }

            div id="dashboard-content" class="w-full flex flex-col items-center" {
                (content)
            }

            (month_dialog())
        }
    );

    let scripts = [
        HeadElement::ScriptLink(ECHARTS_CDN.to_owned()),
        month_dialog_script(),
    ];

    base("Dashboard", &scripts, &page)
}

/// The prompt shown when the database holds no activities at all.
fn no_data_prompt() -> Markup {
    html!(
        div class=(PAGE_CONTAINER_STYLE) {
            h2 class="text-xl font-bold" { "Nothing here yet..." }

            p {
                "Charts will show up here once some activities are recorded
                in the database."
            }
        }
    )
}

/// Renders the dashboard page when no activity data exists.
fn dashboard_no_data_view() -> Markup {
    base("Dashboard", &[], &no_data_prompt())
}

#[cfg(test)]
mod handlers_tests {
    use axum::{
        body::Body,
        extract::State,
        http::{Response, StatusCode},
    };
    use axum_extra::extract::Query;
    use axum_htmx::HxRequest;
    use rusqlite::Connection;
    use scraper::{Html, Selector};
    use std::sync::{Arc, Mutex};
    use time::macros::date;

    use crate::{
        activity::{Activity, create_activity},
        dashboard::filter::DashboardQuery,
        db::initialize,
        sport::Sport,
    };

    use super::{DashboardState, get_dashboard_page};

    fn get_test_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        connection
    }

    fn seed_activities(connection: &Connection) {
        create_activity(
            Activity::build("Morning Ride", Sport::Ride, date!(2024 - 01 - 05))
                .moving_time_seconds(3600)
                .distance_meters(20_000.0)
                .kilojoules(500.0),
            connection,
        )
        .unwrap();
        create_activity(
            Activity::build("Evening Run", Sport::Run, date!(2024 - 02 - 10))
                .moving_time_seconds(1800)
                .distance_meters(5_000.0),
            connection,
        )
        .unwrap();
    }

    fn get_test_state(connection: Connection) -> DashboardState {
        DashboardState {
            db_connection: Arc::new(Mutex::new(connection)),
            local_timezone: "Etc/UTC".to_owned(),
        }
    }

    async fn parse_html(response: Response<Body>) -> Html {
        let body = response.into_body();
        let body = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        let text = String::from_utf8_lossy(&body).to_string();

        Html::parse_document(&text)
    }

    #[track_caller]
    fn assert_element_exists(html: &Html, css_selector: &str) {
        let selector = Selector::parse(css_selector).unwrap();
        assert!(
            html.select(&selector).next().is_some(),
            "Element '{}' not found in {}",
            css_selector,
            html.html()
        );
    }

    #[tokio::test]
    async fn dashboard_page_loads_successfully() {
        let connection = get_test_connection();
        seed_activities(&connection);
        let state = get_test_state(connection);

        let response = get_dashboard_page(
            State(state),
            HxRequest(false),
            Query(DashboardQuery::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;
        assert_element_exists(&html, "#dashboard-content");
        assert_element_exists(&html, "#activity-chart");
        assert_element_exists(&html, "#month-detail-dialog");
        assert_element_exists(&html, "table");
        assert_element_exists(&html, "form[hx-get='/dashboard']");
    }

    #[tokio::test]
    async fn htmx_request_gets_fragment_without_page_shell() {
        let connection = get_test_connection();
        seed_activities(&connection);
        let state = get_test_state(connection);

        let response = get_dashboard_page(
            State(state),
            HxRequest(true),
            Query(DashboardQuery::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);

        let html = parse_html(response).await;
        assert_element_exists(&html, "#activity-chart");

        let head_title = Selector::parse("head > title").unwrap();
        assert!(
            html.select(&head_title).next().is_none(),
            "Fragment should not carry the page shell"
        );
    }

    #[tokio::test]
    async fn sport_checkboxes_come_from_the_database() {
        let connection = get_test_connection();
        seed_activities(&connection);
        let state = get_test_state(connection);

        let response = get_dashboard_page(
            State(state),
            HxRequest(false),
            Query(DashboardQuery::default()),
        )
        .await;

        let html = parse_html(response).await;
        let checkbox_selector = Selector::parse("input[type='checkbox'][name='types']").unwrap();
        let values: Vec<String> = html
            .select(&checkbox_selector)
            .filter_map(|element| element.value().attr("value").map(str::to_owned))
            .collect();

        assert_eq!(values, vec!["Ride", "Run"]);
    }

    #[tokio::test]
    async fn explicit_empty_sport_selection_clears_the_table_columns() {
        let connection = get_test_connection();
        seed_activities(&connection);
        let state = get_test_state(connection);

        let query = DashboardQuery {
            range: Some(0),
            types: vec![],
            metric: None,
        };

        let response = get_dashboard_page(State(state), HxRequest(true), Query(query)).await;

        let html = parse_html(response).await;
        let checked = Selector::parse("input[name='types'][checked]").unwrap();
        assert!(
            html.select(&checked).next().is_none(),
            "No sport should be checked for an explicit empty selection"
        );
    }

    #[tokio::test]
    async fn displays_prompt_text_on_no_data() {
        let connection = get_test_connection();
        let state = get_test_state(connection);

        let response = get_dashboard_page(
            State(state),
            HxRequest(false),
            Query(DashboardQuery::default()),
        )
        .await;

        assert_eq!(response.status(), StatusCode::OK);

        let body = parse_html(response).await;
        let text = body.html();
        assert!(text.contains("Nothing here yet"));
    }
}
