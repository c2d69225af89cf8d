//! Summary report generation.
//!
//! Renders the summary cards, chart series and period tables as Markdown,
//! or the whole report as JSON.

use crate::models::{
    CategoryStat, ChartSeriesEntry, PeriodBreakdown, PeriodStat, ReportMetadata, Summary,
    SummaryReport,
};
use anyhow::Result;

/// Shown in place of a percentage that cannot be computed.
const NO_PERCENT: &str = "n/a";

/// Width of the text bars in the chart table.
const BAR_WIDTH: usize = 20;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &SummaryReport) -> String {
    let mut output = String::new();

    output.push_str("# Meeting Summary\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_table_of_contents(report));
    output.push_str(&generate_baseline_section(&report.summary.baseline));
    output.push_str(&generate_categories_section(&report.summary, &report.chart));
    output.push_str(&generate_chart_section(&report.chart));

    if let Some(ref periods) = report.periods {
        output.push_str(&generate_periods_section(periods));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate a JSON report. Non-finite percentages become `null`.
pub fn generate_json_report(report: &SummaryReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

/// `totalHours` → `Total Hours`, `oneOnOnes` → `One On Ones`.
pub fn title_case(text: &str) -> String {
    let mut result = String::with_capacity(text.len() + 4);

    for (i, c) in text.chars().enumerate() {
        if i == 0 {
            result.extend(c.to_uppercase());
        } else {
            if c.is_uppercase() {
                result.push(' ');
            }
            result.push(c);
        }
    }

    result
}

/// Percentage with two decimals, or `n/a` when it has no finite value.
pub fn format_percent(stat: &CategoryStat) -> String {
    match stat.displayable_percent() {
        Some(percent) => format!("{:.2}", percent),
        None => NO_PERCENT.to_string(),
    }
}

fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    if metadata.calendars.is_empty() {
        section.push_str("- **Calendars:** none selected\n");
    } else {
        section.push_str(&format!(
            "- **Calendars:** {}\n",
            metadata.calendars.join(", ")
        ));
    }
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push('\n');

    section
}

fn generate_table_of_contents(report: &SummaryReport) -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    toc.push_str("- [Metadata](#metadata)\n");
    toc.push_str("- [Attended](#attended)\n");
    toc.push_str("- [Categories](#categories)\n");
    toc.push_str("- [Chart](#chart)\n");

    if report.periods.is_some() {
        toc.push_str("- [Attended by Week](#attended-by-week)\n");
        toc.push_str("- [Attended by Month](#attended-by-month)\n");
    }

    toc.push('\n');

    toc
}

/// The baseline card: count and total hours, no percentage.
fn generate_baseline_section(baseline: &CategoryStat) -> String {
    let mut section = String::new();

    section.push_str(&format!("## {}\n\n", title_case(&baseline.title)));
    section.push_str("| Count | Total Hours |\n");
    section.push_str("|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {:.2} |\n\n",
        baseline.count, baseline.total_hours
    ));

    section
}

fn generate_categories_section(summary: &Summary, chart: &[ChartSeriesEntry]) -> String {
    let mut section = String::new();

    section.push_str("## Categories\n\n");

    if summary.categories.is_empty() {
        section.push_str("No categories to show.\n\n");
        return section;
    }

    for (category, entry) in summary.categories.iter().zip(chart) {
        section.push_str(&generate_category_card(category, &entry.color));
    }

    section
}

/// A single category card.
fn generate_category_card(category: &CategoryStat, color: &str) -> String {
    let mut card = String::new();

    card.push_str(&format!("### {}\n\n", title_case(&category.title)));
    card.push_str(&format!("*Color: `{}`*\n\n", color));
    card.push_str("| Count | Total Hours | Percent Of Total |\n");
    card.push_str("|:---:|:---:|:---:|\n");
    card.push_str(&format!(
        "| {} | {:.2} | {} |\n\n",
        category.count,
        category.total_hours,
        format_percent(category)
    ));

    card
}

/// Pie chart data as a table, with each slice's share of the chart total.
fn generate_chart_section(chart: &[ChartSeriesEntry]) -> String {
    let mut section = String::new();

    section.push_str("## Chart\n\n");

    let total: f64 = chart.iter().map(|e| e.value).sum();
    if chart.is_empty() || total <= 0.0 {
        section.push_str("No recorded time to chart.\n\n");
        return section;
    }

    section.push_str("| Category | Hours | Share | | Color |\n");
    section.push_str("|:---|:---:|:---:|:---|:---:|\n");

    for entry in chart {
        let share = entry.value / total;
        let filled = (share * BAR_WIDTH as f64).round() as usize;
        section.push_str(&format!(
            "| {} | {:.2} | {:.1}% | `{}{}` | `{}` |\n",
            title_case(&entry.title),
            entry.value,
            share * 100.0,
            "█".repeat(filled),
            "░".repeat(BAR_WIDTH.saturating_sub(filled)),
            entry.color
        ));
    }
    section.push('\n');

    section
}

fn generate_periods_section(periods: &PeriodBreakdown) -> String {
    let mut section = String::new();

    section.push_str("## Attended by Week\n\n");
    section.push_str(&generate_period_table("Week", &periods.weekly));
    if let Some(average) = periods.average_hours_per_week {
        section.push_str(&format!("**Average per week:** {:.2} hours\n\n", average));
    }

    section.push_str("## Attended by Month\n\n");
    section.push_str(&generate_period_table("Month", &periods.monthly));

    if periods.unscheduled > 0 {
        section.push_str(&format!(
            "*{} attended event(s) had no start time and are not shown above.*\n\n",
            periods.unscheduled
        ));
    }

    section
}

fn generate_period_table(label: &str, stats: &[PeriodStat]) -> String {
    if stats.is_empty() {
        return "No attended events.\n\n".to_string();
    }

    let mut table = String::new();
    table.push_str(&format!(
        "| {} | Count | Total Hours | Average Hours |\n",
        label
    ));
    table.push_str("|:---|:---:|:---:|:---:|\n");

    for stat in stats {
        table.push_str(&format!(
            "| {} | {} | {:.2} | {:.2} |\n",
            stat.label, stat.count, stat.total_hours, stat.average_hours
        ));
    }
    table.push('\n');

    table
}

fn generate_footer() -> String {
    "---\n\n*Report generated by meeting-summary*\n".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Palette;
    use chrono::Utc;

    fn metadata() -> ReportMetadata {
        ReportMetadata {
            source: "http://127.0.0.1:37555".to_string(),
            calendars: vec!["me@example.com".to_string()],
            generated_at: Utc::now(),
            palette: Palette::default(),
        }
    }

    fn stat(title: &str, count: usize, hours: f64, percent: Option<f64>) -> CategoryStat {
        CategoryStat {
            title: title.to_string(),
            count,
            total_hours: hours,
            percent_of_total: percent,
        }
    }

    fn create_test_report() -> SummaryReport {
        SummaryReport {
            metadata: metadata(),
            summary: Summary {
                baseline: stat("attended", 2, 4.0, None),
                categories: vec![stat("oneOnOnes", 1, 1.0, Some(25.0))],
            },
            chart: vec![ChartSeriesEntry {
                title: "oneOnOnes".to_string(),
                value: 1.0,
                color: "#c19160".to_string(),
            }],
            periods: None,
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("totalHours"), "Total Hours");
        assert_eq!(title_case("oneOnOnes"), "One On Ones");
        assert_eq!(title_case("attended"), "Attended");
        assert_eq!(title_case("percentOfTotal"), "Percent Of Total");
        assert_eq!(title_case("1on1"), "1on1");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_format_percent() {
        assert_eq!(format_percent(&stat("a", 1, 1.0, Some(25.0))), "25.00");
        assert_eq!(format_percent(&stat("a", 1, 1.0, Some(f64::INFINITY))), "n/a");
        assert_eq!(format_percent(&stat("a", 1, 0.0, Some(f64::NAN))), "n/a");
        assert_eq!(format_percent(&stat("attended", 1, 1.0, None)), "n/a");
    }

    #[test]
    fn test_generate_markdown_report() {
        let markdown = generate_markdown_report(&create_test_report());

        assert!(markdown.contains("# Meeting Summary"));
        assert!(markdown.contains("## Attended"));
        assert!(markdown.contains("| 2 | 4.00 |"));
        assert!(markdown.contains("### One On Ones"));
        assert!(markdown.contains("| 1 | 1.00 | 25.00 |"));
        assert!(markdown.contains("`#c19160`"));
        assert!(markdown.contains("100.0%"));
        assert!(!markdown.contains("Attended by Week"));
    }

    #[test]
    fn test_zero_baseline_never_prints_sentinel() {
        let mut report = create_test_report();
        report.summary.baseline = stat("attended", 0, 0.0, None);
        report.summary.categories = vec![stat("workMeetings", 1, 2.0, Some(f64::INFINITY))];

        let markdown = generate_markdown_report(&report);
        assert!(markdown.contains("| 1 | 2.00 | n/a |"));
        assert!(!markdown.contains("inf"));
        assert!(!markdown.contains("NaN"));
    }

    #[test]
    fn test_empty_summary() {
        let report = SummaryReport {
            metadata: ReportMetadata {
                calendars: vec![],
                ..metadata()
            },
            summary: Summary {
                baseline: CategoryStat::empty_baseline(),
                categories: vec![],
            },
            chart: vec![],
            periods: None,
        };

        let markdown = generate_markdown_report(&report);
        assert!(markdown.contains("none selected"));
        assert!(markdown.contains("| 0 | 0.00 |"));
        assert!(markdown.contains("No categories to show."));
        assert!(markdown.contains("No recorded time to chart."));
    }

    #[test]
    fn test_chart_bars() {
        let chart = vec![
            ChartSeriesEntry {
                title: "short".to_string(),
                value: 1.0,
                color: "#c19160".to_string(),
            },
            ChartSeriesEntry {
                title: "long".to_string(),
                value: 3.0,
                color: "#37a24f".to_string(),
            },
        ];

        let section = generate_chart_section(&chart);
        assert!(section.contains("| Short | 1.00 | 25.0% |"));
        assert!(section.contains("| Long | 3.00 | 75.0% |"));
        assert!(section.contains(&format!("`{}{}`", "█".repeat(5), "░".repeat(15))));
    }

    #[test]
    fn test_periods_section() {
        let mut report = create_test_report();
        report.periods = Some(PeriodBreakdown {
            weekly: vec![PeriodStat {
                label: "2026-W10".to_string(),
                count: 2,
                total_hours: 4.0,
                average_hours: 2.0,
            }],
            monthly: vec![PeriodStat {
                label: "March 2026".to_string(),
                count: 2,
                total_hours: 4.0,
                average_hours: 2.0,
            }],
            average_hours_per_week: Some(4.0),
            unscheduled: 1,
        });

        let markdown = generate_markdown_report(&report);
        assert!(markdown.contains("## Attended by Week"));
        assert!(markdown.contains("| 2026-W10 | 2 | 4.00 | 2.00 |"));
        assert!(markdown.contains("| March 2026 | 2 | 4.00 | 2.00 |"));
        assert!(markdown.contains("**Average per week:** 4.00 hours"));
        assert!(markdown.contains("1 attended event(s) had no start time"));
    }

    #[test]
    fn test_generate_json_report() {
        let mut report = create_test_report();
        report.summary.categories[0].percent_of_total = Some(f64::NAN);

        let json = generate_json_report(&report).unwrap();
        assert!(json.contains("\"totalHours\""));
        assert!(json.contains("\"percentOfTotal\": null"));
        assert!(json.contains("\"chart\""));
        assert!(!json.contains("\"periods\""));
    }

    #[test]
    fn test_json_report_uses_camel_case_keys() {
        let mut report = create_test_report();
        report.periods = Some(PeriodBreakdown {
            weekly: vec![PeriodStat {
                label: "2026-W10".to_string(),
                count: 1,
                total_hours: 1.5,
                average_hours: 1.5,
            }],
            monthly: Vec::new(),
            average_hours_per_week: Some(1.5),
            unscheduled: 0,
        });

        let json = generate_json_report(&report).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value["metadata"]["generatedAt"].is_string());
        assert_eq!(value["periods"]["averageHoursPerWeek"], 1.5);
        assert_eq!(value["periods"]["weekly"][0]["totalHours"], 1.5);
        assert_eq!(value["periods"]["weekly"][0]["averageHours"], 1.5);
        for key in ["generated_at", "total_hours", "average_hours", "average_hours_per_week"] {
            assert!(!json.contains(&format!("\"{}\"", key)), "snake_case key {}", key);
        }
    }
}
