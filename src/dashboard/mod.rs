//! Dashboard module
//!
//! Provides an overview page showing monthly activity summaries and charts.
//! Includes functionality for filtering by time range, sport and metric.

mod aggregation;
mod cards;
mod charts;
mod filter;
mod handlers;
mod stats;
mod summary;
mod tables;

pub use filter::{DashboardQuery, Selection, filter_by_sports, filter_by_time};
pub use handlers::{DashboardState, get_dashboard_page};
pub use stats::split_hours_minutes;
pub use summary::{MonthlySummary, load_monthly_summaries, sports_by_count};
