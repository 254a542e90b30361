//! The monthly summary table.
//!
//! The table is built as a typed view model first and rendered to markup
//! second, so the row/cell logic stays testable without parsing HTML.

use maud::{Markup, html};

use crate::{
    dashboard::{
        aggregation::{MonthAxis, SportSeries},
        filter::Metric,
    },
    html::{TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, format_count, format_metric},
    sport::Sport,
};

/// A zero in a sport cell renders as this sentinel for readability.
const EMPTY_CELL: &str = "-";

/// One table row: a month, its per-sport cells and the row total.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTableRow {
    /// The month's display label.
    pub label: String,
    /// One formatted cell per selected sport, in header order.
    pub cells: Vec<String>,
    /// The formatted row total. Always a number, never the dash sentinel.
    pub total: String,
}

/// The monthly summary table's view model.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryTable {
    /// The selected sports, one column each, in selection order.
    pub sports: Vec<Sport>,
    /// One row per distinct month, most recent first.
    pub rows: Vec<SummaryTableRow>,
}

/// Build the table view model from the aggregated series.
///
/// Months come out most recent first (the axis is chronological, so rows are
/// built in reverse). The header set regenerates from the selection on every
/// call: columns appear and disappear with the sport filter.
pub fn summary_table_model(
    axis: &MonthAxis,
    series: &[SportSeries],
    totals: &[f64],
    metric: Metric,
) -> SummaryTable {
    let rows = (0..axis.len())
        .rev()
        .map(|index| SummaryTableRow {
            label: axis.labels[index].clone(),
            cells: series
                .iter()
                .map(|series| format_cell(series.values[index], metric))
                .collect(),
            total: format_value(totals[index], metric),
        })
        .collect();

    SummaryTable {
        sports: series.iter().map(|series| series.sport.clone()).collect(),
        rows,
    }
}

fn format_cell(value: f64, metric: Metric) -> String {
    if value == 0.0 {
        EMPTY_CELL.to_owned()
    } else {
        format_value(value, metric)
    }
}

fn format_value(value: f64, metric: Metric) -> String {
    match metric {
        Metric::Count => format_count(value.round() as i64),
        _ => format_metric(value),
    }
}

/// Renders the monthly summary table.
pub(super) fn monthly_summary_table(table: &SummaryTable) -> Markup {
    html! {
        div class="w-full" {
            h3 class="text-xl font-semibold mb-4" { "Monthly Summary" }

            div class="overflow-x-auto rounded-lg shadow" {
                table class="w-full text-sm text-left text-gray-500 dark:text-gray-400" {
                    thead class=(TABLE_HEADER_STYLE) {
                        tr {
                            th scope="col" class=(TABLE_CELL_STYLE) { "Month" }
                            @for sport in &table.sports {
                                th scope="col" class={(TABLE_CELL_STYLE) " text-right"} {
                                    (sport)
                                }
                            }
                            th scope="col" class={(TABLE_CELL_STYLE) " text-right"} { "Total" }
                        }
                    }
                    tbody {
                        @for row in &table.rows {
                            tr class=(TABLE_ROW_STYLE) {
                                th
                                    scope="row"
                                    class={(TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white"}
                                {
                                    (row.label)
                                }
                                @for cell in &row.cells {
                                    td class={(TABLE_CELL_STYLE) " text-right"} { (cell) }
                                }
                                td class={(TABLE_CELL_STYLE) " text-right font-bold"} {
                                    (row.total)
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
