//! Application router configuration.

use axum::{
    Router,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
};

use crate::{
    AppState,
    dashboard::get_dashboard_page,
    endpoints,
    export::{get_export_history_csv, get_export_month_csv, get_export_view_csv},
    month_detail::{get_month_activities_json, get_month_detail_fragment},
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(endpoints::COFFEE, get(get_coffee))
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::DASHBOARD_VIEW, get(get_dashboard_page))
        .route(endpoints::MONTH_DETAIL_VIEW, get(get_month_detail_fragment))
        .route(
            endpoints::MONTH_ACTIVITIES_API,
            get(get_month_activities_json),
        )
        .route(endpoints::EXPORT_VIEW_CSV, get(get_export_view_csv))
        .route(endpoints::EXPORT_HISTORY_CSV, get(get_export_history_csv))
        .route(endpoints::EXPORT_MONTH_CSV, get(get_export_month_csv))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// Attempt to get a cup of coffee from the server.
async fn get_coffee() -> Response {
    (StatusCode::IM_A_TEAPOT, Html("I'm a teapot")).into_response()
}

/// The root path '/' redirects to the dashboard page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::DASHBOARD_VIEW)
}

#[cfg(test)]
mod routing_tests {
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        AppState,
        activity::{Activity, create_activity},
        endpoints,
        sport::Sport,
    };

    use super::build_router;

    fn get_test_server() -> TestServer {
        let state = AppState::new(Connection::open_in_memory().unwrap(), "Etc/UTC").unwrap();

        let connection = state.db_connection.lock().unwrap();
        create_activity(
            Activity::build("Morning Ride", Sport::Ride, date!(2024 - 01 - 05))
                .moving_time_seconds(3600)
                .distance_meters(20_000.0),
            &connection,
        )
        .unwrap();
        drop(connection);

        TestServer::new(build_router(state))
    }

    #[tokio::test]
    async fn root_redirects_to_dashboard() {
        let server = get_test_server();

        let response = server.get(endpoints::ROOT).await;

        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(
            response.header("location"),
            endpoints::DASHBOARD_VIEW
        );
    }

    #[tokio::test]
    async fn dashboard_route_responds() {
        let server = get_test_server();

        let response = server.get(endpoints::DASHBOARD_VIEW).await;

        response.assert_status_ok();
        response.assert_text_contains("Activity Dashboard");
    }

    #[tokio::test]
    async fn month_api_returns_json() {
        let server = get_test_server();

        let response = server.get("/api/activities/by-month/2024-01").await;

        response.assert_status_ok();
        let activities: Vec<serde_json::Value> = response.json();
        assert_eq!(activities[0]["name"], "Morning Ride");
    }

    #[tokio::test]
    async fn export_history_route_serves_csv() {
        let server = get_test_server();

        let response = server.get(endpoints::EXPORT_HISTORY_CSV).await;

        response.assert_status_ok();
        assert!(
            response
                .header("content-type")
                .to_str()
                .unwrap()
                .starts_with("text/csv")
        );
    }

    #[tokio::test]
    async fn month_export_route_serves_csv() {
        let server = get_test_server();

        let response = server.get("/api/export/months/2024-01/csv").await;

        response.assert_status_ok();
        assert!(
            response
                .header("content-type")
                .to_str()
                .unwrap()
                .starts_with("text/csv")
        );
        assert!(
            response
                .header("content-disposition")
                .to_str()
                .unwrap()
                .contains("Activities_Jan_2024.csv")
        );
    }

    #[tokio::test]
    async fn unknown_routes_get_404() {
        let server = get_test_server();

        let response = server.get("/does-not-exist").await;

        response.assert_status(StatusCode::NOT_FOUND);
    }
}
