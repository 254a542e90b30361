//! Chart generation and rendering for the dashboard.
//!
//! The activity chart is a stacked bar chart with one series per selected
//! sport. Its ECharts configuration is generated as JSON and initialized by
//! an inline script that ships inside the swapped fragment, so the chart is
//! rebuilt whenever htmx replaces the dashboard content.

use charming::{
    Chart,
    component::{Axis, Grid, Legend, Title},
    element::{AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus, ItemStyle, Tooltip, Trigger},
    series::bar::Bar,
};
use maud::{Markup, PreEscaped, html};

use crate::dashboard::{
    aggregation::{MonthAxis, SportSeries},
    filter::Metric,
};

/// The HTML element ID the chart renders into.
const CHART_CONTAINER_ID: &str = "activity-chart";

/// A dashboard chart plus the month keys behind each bar.
///
/// `month_ids` runs parallel to the chart's x-axis so a click on bar
/// `dataIndex` can be mapped back to a month without parsing its label.
pub(super) struct DashboardChart {
    /// The ECharts configuration as a JSON string.
    pub options: String,
    /// The month key for each x-axis position, as `YYYY-MM` strings.
    pub month_ids: Vec<String>,
}

/// Builds the stacked activity chart for the current selection.
pub(super) fn activity_chart(
    axis: &MonthAxis,
    series: &[SportSeries],
    metric: Metric,
) -> DashboardChart {
    let mut chart = Chart::new()
        .title(Title::new().text(metric.label()).left(20).top("1%"))
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .legend(Legend::new().top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .top(60)
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(axis.labels.clone()))
        .y_axis(Axis::new().type_(AxisType::Value));

    for sport_series in series {
        chart = chart.series(
            Bar::new()
                .name(sport_series.sport.to_string())
                .stack("activities")
                .item_style(ItemStyle::new().color(sport_series.sport.chart_color()))
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(sport_series.values.clone()),
        );
    }

    DashboardChart {
        options: chart.to_string(),
        month_ids: axis.months.iter().map(|month| month.to_string()).collect(),
    }
}

/// Renders the chart container.
pub(super) fn chart_view() -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div
                id=(CHART_CONTAINER_ID)
                class="min-h-[380px] rounded dark:bg-gray-100"
            {}
        }
    )
}

/// Generates the JavaScript that (re)initializes the activity chart.
///
/// The previous instance and its resize listener are torn down first because
/// this script runs again after every htmx swap. Clicking a bar opens the
/// month detail dialog for the month at that x-axis position.
pub(super) fn chart_script(chart: &DashboardChart) -> Markup {
    // serde_json on a Vec<String> cannot fail.
    let month_ids =
        serde_json::to_string(&chart.month_ids).unwrap_or_else(|_| "[]".to_owned());

    let script = format!(
        r#"(function() {{
    const chartDom = document.getElementById("{id}");
    const existing = echarts.getInstanceByDom(chartDom);
    if (existing) {{
        existing.dispose();
    }}
    if (window.activityChartResize) {{
        window.removeEventListener('resize', window.activityChartResize);
    }}
    const chart = echarts.init(chartDom);
    chart.setOption({options});

    const monthIds = {month_ids};
    chart.on('click', (params) => showMonthDetail(monthIds[params.dataIndex]));

    window.activityChartResize = () => chart.resize();
    window.addEventListener('resize', window.activityChartResize);
}})();"#,
        id = CHART_CONTAINER_ID,
        options = chart.options,
        month_ids = month_ids,
    );

    html!(script { (PreEscaped(script)) })
}

#[cfg(test)]
mod charts_tests {
    use crate::{
        dashboard::{
            aggregation::{month_axis, sport_series},
            filter::Metric,
            summary::MonthlySummary,
        },
        month::MonthKey,
        sport::Sport,
    };

    use super::{activity_chart, chart_script};

    fn summaries() -> Vec<MonthlySummary> {
        vec![
            MonthlySummary {
                month: "2024-01".parse::<MonthKey>().unwrap(),
                sport: Sport::Ride,
                activities: 2,
                distance_km: 10.0,
                duration_hours: 1.0,
                total_kj: 100.0,
            },
            MonthlySummary {
                month: "2024-02".parse::<MonthKey>().unwrap(),
                sport: Sport::Run,
                activities: 1,
                distance_km: 5.0,
                duration_hours: 0.5,
                total_kj: 50.0,
            },
        ]
    }

    #[test]
    fn chart_has_one_stacked_series_per_sport() {
        let summaries = summaries();
        let axis = month_axis(&summaries);
        let series = sport_series(&summaries, &axis, &[Sport::Ride, Sport::Run], Metric::Distance);

        let chart = activity_chart(&axis, &series, Metric::Distance);

        assert!(chart.options.contains("\"Ride\""));
        assert!(chart.options.contains("\"Run\""));
        assert!(chart.options.contains("\"activities\""));
        assert!(chart.options.contains(Sport::Ride.chart_color()));
        assert!(chart.options.contains("Jan 2024"));
    }

    #[test]
    fn month_ids_run_parallel_to_the_axis() {
        let summaries = summaries();
        let axis = month_axis(&summaries);
        let series = sport_series(&summaries, &axis, &[Sport::Ride], Metric::Count);

        let chart = activity_chart(&axis, &series, Metric::Count);

        assert_eq!(chart.month_ids, vec!["2024-01", "2024-02"]);
    }

    #[test]
    fn script_embeds_month_ids_and_click_handler() {
        let summaries = summaries();
        let axis = month_axis(&summaries);
        let series = sport_series(&summaries, &axis, &[Sport::Ride], Metric::Distance);
        let chart = activity_chart(&axis, &series, Metric::Distance);

        let script = chart_script(&chart).into_string();

        assert!(script.contains("[\"2024-01\",\"2024-02\"]"));
        assert!(script.contains("showMonthDetail(monthIds[params.dataIndex])"));
        assert!(script.contains("echarts.init"));
    }

    // The script runs once per htmx swap, so it must unhook the previous
    // resize listener before registering a new one.
    #[test]
    fn script_replaces_the_resize_listener_on_rerun() {
        let summaries = summaries();
        let axis = month_axis(&summaries);
        let series = sport_series(&summaries, &axis, &[Sport::Ride], Metric::Distance);
        let chart = activity_chart(&axis, &series, Metric::Distance);

        let script = chart_script(&chart).into_string();

        assert!(script.contains("removeEventListener('resize', window.activityChartResize)"));
        assert!(script.contains("addEventListener('resize', window.activityChartResize)"));
    }
}
