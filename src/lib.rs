//! Veloboard is a web app for exploring your recorded sport activities.
//!
//! It serves a dashboard of monthly activity summaries as charts and tables,
//! with filtering by time range, sport and metric, a per-month detail view
//! and CSV exports. This library provides a REST API that directly serves
//! HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod activity;
mod alert;
mod app_state;
mod dashboard;
mod db;
mod endpoints;
mod error;
mod export;
mod html;
mod internal_server_error;
mod month;
mod month_detail;
mod not_found;
mod routing;
mod sport;
mod timezone;

pub use activity::{Activity, ActivityBuilder, create_activity};
pub use app_state::AppState;
pub use db::initialize as initialize_db;
pub use error::Error;
pub use month::MonthKey;
pub use routing::build_router;
pub use sport::Sport;
pub use timezone::get_local_offset;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}
