//! Pure aggregation of filtered summaries into chart and table shapes.
//!
//! Everything here is a function of its inputs. The month axis comes from the
//! *time-filtered* set so the x-axis stays stable while sports are toggled;
//! the per-sport series and row totals only see months on that axis.

use crate::{
    dashboard::{filter::Metric, summary::MonthlySummary},
    month::MonthKey,
    sport::Sport,
};

/// The chart and table x-axis: distinct months with their display labels.
///
/// `months` and `labels` are parallel. The months stay machine-readable
/// because a chart click must resolve back to a month key, not to a label.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthAxis {
    /// The distinct months, in first-seen order.
    pub months: Vec<MonthKey>,
    /// The matching display labels, e.g. "Jan 2024".
    pub labels: Vec<String>,
}

impl MonthAxis {
    /// The number of months on the axis.
    pub fn len(&self) -> usize {
        self.months.len()
    }

    /// True when no months survived the time filter.
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// One sport's values, aligned to a [MonthAxis].
#[derive(Debug, Clone, PartialEq)]
pub struct SportSeries {
    /// The sport this series belongs to.
    pub sport: Sport,
    /// One value per axis month; months without a matching summary hold 0.
    pub values: Vec<f64>,
}

/// The distinct months present in `time_filtered`, in first-seen order.
///
/// The rollup loads in chronological order, so first-seen order is
/// chronological in practice; de-duplication is still needed because each
/// month appears once per sport.
pub fn month_axis(time_filtered: &[MonthlySummary]) -> MonthAxis {
    let mut months: Vec<MonthKey> = Vec::new();

    for summary in time_filtered {
        if !months.contains(&summary.month) {
            months.push(summary.month);
        }
    }

    let labels = months.iter().map(|month| month.label()).collect();

    MonthAxis { months, labels }
}

/// One value series per selected sport, aligned to the axis.
///
/// A missing (month, sport) pair contributes `0.0`, never a gap; the rollup
/// guarantees at most one summary per pair, so the first match is the only
/// match.
pub fn sport_series(
    time_filtered: &[MonthlySummary],
    axis: &MonthAxis,
    sports: &[Sport],
    metric: Metric,
) -> Vec<SportSeries> {
    sports
        .iter()
        .map(|sport| {
            let values = axis
                .months
                .iter()
                .map(|&month| {
                    time_filtered
                        .iter()
                        .find(|summary| summary.month == month && &summary.sport == sport)
                        .map(|summary| metric.value(summary))
                        .unwrap_or(0.0)
                })
                .collect();

            SportSeries {
                sport: sport.clone(),
                values,
            }
        })
        .collect()
}

/// Per-month totals across every series: the stacked bar height and the
/// table's trailing column.
pub fn row_totals(series: &[SportSeries], axis_len: usize) -> Vec<f64> {
    (0..axis_len)
        .map(|index| series.iter().map(|series| series.values[index]).sum())
        .collect()
}
