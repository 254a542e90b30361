//! The dashboard's selection state and filter engine.
//!
//! Every dashboard request carries its whole selection (time range, sport
//! set, metric) in query parameters; nothing is stored between requests. The
//! filters here derive the two record subsets the rest of the pipeline runs
//! on: the *time-filtered* set (drives the month axis) and the
//! *fully-filtered* set (time filter plus sport filter; drives series, table
//! cells and stat totals).

use serde::Deserialize;
use time::Date;

use crate::{
    dashboard::summary::MonthlySummary,
    month::MonthKey,
    sport::Sport,
};

/// How far back the dashboard looks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    /// Every month on record.
    AllHistory,
    /// The current month and the N months before it.
    LastMonths(u32),
}

impl TimeRange {
    /// The ranges offered by the range selector.
    pub const PRESETS: [TimeRange; 5] = [
        TimeRange::LastMonths(6),
        TimeRange::LastMonths(12),
        TimeRange::LastMonths(24),
        TimeRange::LastMonths(36),
        TimeRange::AllHistory,
    ];

    /// Build a range from the query parameter's months-back count.
    ///
    /// `0` is the all-history sentinel.
    pub fn from_months_back(months: u32) -> Self {
        match months {
            0 => Self::AllHistory,
            n => Self::LastMonths(n),
        }
    }

    /// The value used in query strings, the inverse of [Self::from_months_back].
    pub fn as_query_value(self) -> u32 {
        match self {
            Self::AllHistory => 0,
            Self::LastMonths(n) => n,
        }
    }

    /// The label shown in the range selector.
    pub fn label(self) -> String {
        match self {
            Self::AllHistory => "All history".to_owned(),
            Self::LastMonths(12) => "Last 12 months".to_owned(),
            Self::LastMonths(n) => format!("Last {n} months"),
        }
    }

    /// The earliest month this range keeps, or `None` when unbounded.
    ///
    /// The cutoff works at month granularity: the month N months before
    /// `today`'s month, kept inclusively. The day of month never shifts the
    /// window.
    pub fn cutoff(self, today: Date) -> Option<MonthKey> {
        match self {
            Self::AllHistory => None,
            Self::LastMonths(n) => Some(MonthKey::from_date(today).months_back(n)),
        }
    }
}

impl Default for TimeRange {
    fn default() -> Self {
        Self::LastMonths(12)
    }
}

/// The numeric field driving the chart and table values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Metric {
    /// Number of activities.
    Count,
    /// Distance in kilometers.
    #[default]
    Distance,
    /// Moving time in hours.
    Duration,
    /// Work in kilojoules.
    Energy,
}

impl Metric {
    /// Every metric, in display order.
    pub const ALL: [Metric; 4] = [
        Metric::Count,
        Metric::Distance,
        Metric::Duration,
        Metric::Energy,
    ];

    /// The value used in query strings.
    pub fn as_query_value(self) -> &'static str {
        match self {
            Self::Count => "count",
            Self::Distance => "distance",
            Self::Duration => "duration",
            Self::Energy => "energy",
        }
    }

    /// The label shown on the metric buttons and above the chart.
    pub fn label(self) -> &'static str {
        match self {
            Self::Count => "Activities",
            Self::Distance => "Distance (km)",
            Self::Duration => "Time (hrs)",
            Self::Energy => "Energy (kJ)",
        }
    }

    /// This metric's value for one summary row.
    ///
    /// Count participates as `f64` so chart series, table cells and row
    /// totals all sum the same way.
    pub fn value(self, summary: &MonthlySummary) -> f64 {
        match self {
            Self::Count => summary.activities as f64,
            Self::Distance => summary.distance_km,
            Self::Duration => summary.duration_hours,
            Self::Energy => summary.total_kj,
        }
    }
}

/// The raw dashboard query parameters.
///
/// `types` repeats once per checked checkbox, so it needs the multi-value
/// handling of `axum_extra`'s `Query`.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    /// Months back to display; `0` means all history.
    pub range: Option<u32>,
    /// The checked sports.
    #[serde(default)]
    pub types: Vec<Sport>,
    /// The metric to chart.
    pub metric: Option<Metric>,
}

impl DashboardQuery {
    /// True when the request carried no filter parameters at all.
    fn is_empty(&self) -> bool {
        self.range.is_none() && self.types.is_empty() && self.metric.is_none()
    }
}

/// The normalized selection a dashboard request resolves to.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// The time range to display.
    pub range: TimeRange,
    /// The sports to include.
    pub sports: Vec<Sport>,
    /// The metric to chart.
    pub metric: Metric,
}

impl Selection {
    /// Resolve raw query parameters against the sports on record.
    ///
    /// A request with no filter parameters at all (the first page load) gets
    /// the defaults: last 12 months, every sport, distance. A request that
    /// carries any parameter is explicit, so an absent `types` list means
    /// "no sports checked", not "all sports".
    pub fn from_query(query: DashboardQuery, all_sports: &[Sport]) -> Self {
        if query.is_empty() {
            return Self {
                range: TimeRange::default(),
                sports: all_sports.to_vec(),
                metric: Metric::default(),
            };
        }

        Self {
            range: query
                .range
                .map(TimeRange::from_months_back)
                .unwrap_or_default(),
            sports: query.types,
            metric: query.metric.unwrap_or_default(),
        }
    }

    /// The query string that reproduces this selection, without a leading `?`.
    ///
    /// Used to bake the current selection into export links. Sport names are
    /// an open set and may contain reserved characters, so the pairs are
    /// percent-encoded rather than concatenated.
    pub fn to_query_string(&self) -> String {
        let mut pairs: Vec<(&str, String)> = vec![
            ("range", self.range.as_query_value().to_string()),
            ("metric", self.metric.as_query_value().to_string()),
        ];

        for sport in &self.sports {
            pairs.push(("types", sport.as_str().to_string()));
        }

        match serde_urlencoded::to_string(&pairs) {
            Ok(query) => query,
            Err(error) => {
                tracing::error!("Could not encode the selection query string: {error}");
                String::new()
            }
        }
    }
}

/// The summaries on or after the range's cutoff month, in input order.
pub fn filter_by_time(
    summaries: &[MonthlySummary],
    range: TimeRange,
    today: Date,
) -> Vec<MonthlySummary> {
    match range.cutoff(today) {
        None => summaries.to_vec(),
        Some(cutoff) => summaries
            .iter()
            .filter(|summary| summary.month >= cutoff)
            .cloned()
            .collect(),
    }
}

/// The summaries whose sport is in the selected set, in input order.
///
/// An empty selection yields an empty result, not an error.
pub fn filter_by_sports(summaries: &[MonthlySummary], sports: &[Sport]) -> Vec<MonthlySummary> {
    summaries
        .iter()
        .filter(|summary| sports.contains(&summary.sport))
        .cloned()
        .collect()
}
