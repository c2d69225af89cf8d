//! Category aggregation and chart series.
//!
//! Turns a category → events mapping into a summary: totals for the
//! `attended` baseline, each category's share of it, and pie chart slices.
//! Everything here is pure; the same input always gives the same output.

use crate::models::{
    CategoryStat, ChartSeriesEntry, EventDuration, Palette, RawSummaryInput, Summary,
    BASELINE_CATEGORY,
};

/// Total hours over a list of events.
fn total_hours<E: EventDuration>(events: &[E]) -> f64 {
    events.iter().map(EventDuration::duration_hours).sum()
}

/// Compute the `attended` baseline.
///
/// Missing input or a missing `attended` category gives the all-zero baseline.
pub fn compute_baseline<E: EventDuration>(input: Option<&RawSummaryInput<E>>) -> CategoryStat {
    match input.and_then(|i| i.get(BASELINE_CATEGORY)) {
        Some(events) => CategoryStat {
            title: BASELINE_CATEGORY.to_string(),
            count: events.len(),
            total_hours: total_hours(events),
            percent_of_total: None,
        },
        None => CategoryStat::empty_baseline(),
    }
}

/// Compute stats for every non-baseline category, in input order.
///
/// `percent_of_total` is `100 * hours / baseline hours` with no guard for a
/// zero baseline: the result is then `NaN` or infinite, and renderers must go
/// through [`CategoryStat::displayable_percent`].
pub fn compute_categories<E: EventDuration>(
    input: Option<&RawSummaryInput<E>>,
    baseline: &CategoryStat,
) -> Vec<CategoryStat> {
    let Some(input) = input else {
        return Vec::new();
    };

    input
        .iter()
        .filter(|(category, _)| *category != BASELINE_CATEGORY)
        .map(|(category, events)| {
            let hours = total_hours(events);
            CategoryStat {
                title: category.to_string(),
                count: events.len(),
                total_hours: hours,
                percent_of_total: Some(100.0 * hours / baseline.total_hours),
            }
        })
        .collect()
}

/// One chart slice per category, colored by position.
pub fn build_chart_series(categories: &[CategoryStat], palette: &Palette) -> Vec<ChartSeriesEntry> {
    categories
        .iter()
        .enumerate()
        .map(|(index, category)| ChartSeriesEntry {
            title: category.title.clone(),
            value: category.total_hours,
            color: palette.color_at(index).to_string(),
        })
        .collect()
}

/// Baseline, then categories, then chart series.
pub fn summarize<E: EventDuration>(
    input: Option<&RawSummaryInput<E>>,
    palette: &Palette,
) -> (Summary, Vec<ChartSeriesEntry>) {
    let baseline = compute_baseline(input);
    let categories = compute_categories(input, &baseline);
    let chart = build_chart_series(&categories, palette);

    (
        Summary {
            baseline,
            categories,
        },
        chart,
    )
}
