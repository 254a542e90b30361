//! The stat cards above the chart.

use maud::{Markup, html};

use crate::{
    dashboard::stats::{ActivityTotals, split_hours_minutes},
    html::{format_count, format_metric, format_metric_rounded},
};

const CARD_STYLE: &str = "bg-white dark:bg-gray-800 border border-gray-200 \
    dark:border-gray-700 rounded-lg p-4 shadow-md text-center";
const CARD_LABEL_STYLE: &str = "text-sm text-gray-600 dark:text-gray-400";
const CARD_VALUE_STYLE: &str = "text-2xl font-bold mt-1";

/// Renders the four stat cards for the current totals.
pub(super) fn stat_cards_view(totals: &ActivityTotals) -> Markup {
    let (hours, minutes) = split_hours_minutes(totals.duration_hours);

    html! {
        section class="w-full mx-auto mb-4" {
            div class="grid grid-cols-2 lg:grid-cols-4 gap-4" {
                (stat_card("Activities", &format_count(totals.activities)))
                (stat_card("Distance", &format!("{} km", format_metric(totals.distance_km))))
                (stat_card("Time", &format!("{hours}h {minutes}m")))
                (stat_card("Energy", &format!("{} kJ", format_metric_rounded(totals.total_kj))))
            }
        }
    }
}

fn stat_card(label: &str, value: &str) -> Markup {
    html! {
        div class=(CARD_STYLE) {
            p class=(CARD_LABEL_STYLE) { (label) }
            p class=(CARD_VALUE_STYLE) { (value) }
        }
    }
}
