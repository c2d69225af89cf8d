//! Data models for the meeting summary.
//!
//! This module contains the core data structures shared by the aggregator,
//! the service client and the report generator: calendar events, the ordered
//! category input, computed statistics and chart series.

use chrono::{DateTime, FixedOffset, Utc};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;

/// Reserved category holding every event the user attended.
pub const BASELINE_CATEGORY: &str = "attended";

/// Default chart palette, applied by position and cycled when exhausted.
pub const DEFAULT_PALETTE: [&str; 5] = ["#c19160", "#37a24f", "#6697c3", "#ffd00d", "#fb8b00"];

/// Anything the aggregator can total up.
///
/// Implementations must return a non-negative number of hours.
pub trait EventDuration {
    fn duration_hours(&self) -> f64;
}

/// Start or end of a calendar event.
///
/// Timed events carry `dateTime`; all-day events only carry `date`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventTime {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

impl EventTime {
    /// Parse the RFC 3339 `dateTime`, if there is one.
    pub fn parse(&self) -> Option<DateTime<FixedOffset>> {
        self.date_time
            .as_deref()
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
    }
}

/// An invitee on a calendar event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Attendee {
    #[serde(default)]
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_status: Option<String>,
}

/// A calendar event as returned by the summary service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub start: EventTime,
    #[serde(default)]
    pub end: EventTime,
    #[serde(default)]
    pub attendees: Vec<Attendee>,
}

impl Event {
    /// Find the attendee entry for the given email.
    pub fn attendee(&self, email: &str) -> Option<&Attendee> {
        self.attendees.iter().find(|a| a.email == email)
    }
}

impl EventDuration for Event {
    /// Hours between start and end. Zero when either side has no parsable
    /// `dateTime` (all-day events) or when the span is negative.
    fn duration_hours(&self) -> f64 {
        match (self.start.parse(), self.end.parse()) {
            (Some(start), Some(end)) => {
                let millis = (end - start).num_milliseconds() as f64;
                (millis / 3_600_000.0).max(0.0)
            }
            _ => 0.0,
        }
    }
}

/// Category name to event list, in the order the categories were given.
///
/// Deserializes from a JSON object without losing key order.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSummaryInput<E> {
    entries: Vec<(String, Vec<E>)>,
}

impl<E> Default for RawSummaryInput<E> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<E> RawSummaryInput<E> {
    /// Creates an empty input.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a category. An existing category keeps its position and has
    /// its events replaced.
    pub fn insert(&mut self, category: impl Into<String>, events: Vec<E>) {
        let category = category.into();
        match self.entries.iter_mut().find(|(name, _)| *name == category) {
            Some((_, existing)) => *existing = events,
            None => self.entries.push((category, events)),
        }
    }

    /// Events for a category, if present.
    pub fn get(&self, category: &str) -> Option<&[E]> {
        self.entries
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, events)| events.as_slice())
    }

    /// Categories and their events in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[E])> {
        self.entries
            .iter()
            .map(|(name, events)| (name.as_str(), events.as_slice()))
    }

    /// Category names in insertion order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E, K: Into<String>> FromIterator<(K, Vec<E>)> for RawSummaryInput<E> {
    fn from_iter<I: IntoIterator<Item = (K, Vec<E>)>>(iter: I) -> Self {
        let mut input = Self::new();
        for (category, events) in iter {
            input.insert(category, events);
        }
        input
    }
}

impl<'de, E: Deserialize<'de>> Deserialize<'de> for RawSummaryInput<E> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct InputVisitor<E>(PhantomData<E>);

        impl<'de, E: Deserialize<'de>> Visitor<'de> for InputVisitor<E> {
            type Value = RawSummaryInput<E>;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object mapping category names to event lists")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut input = RawSummaryInput::new();
                while let Some((category, events)) = map.next_entry::<String, Vec<E>>()? {
                    input.insert(category, events);
                }
                Ok(input)
            }
        }

        deserializer.deserialize_map(InputVisitor(PhantomData))
    }
}

/// Totals for one category (or the baseline).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    /// Category name as given in the input.
    pub title: String,
    /// Number of events in the category.
    pub count: usize,
    /// Sum of event durations, in hours.
    pub total_hours: f64,
    /// Share of the baseline hours, in percent. `None` for the baseline
    /// itself; non-finite when the baseline has zero hours.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_of_total: Option<f64>,
}

impl CategoryStat {
    /// The all-zero baseline used when there is nothing to summarize.
    pub fn empty_baseline() -> Self {
        Self {
            title: BASELINE_CATEGORY.to_string(),
            count: 0,
            total_hours: 0.0,
            percent_of_total: None,
        }
    }

    /// The percentage if it can be shown. A zero baseline yields a
    /// non-finite ratio, which callers must render as "no percentage".
    pub fn displayable_percent(&self) -> Option<f64> {
        self.percent_of_total.filter(|p| p.is_finite())
    }
}

/// Baseline plus per-category stats.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub baseline: CategoryStat,
    /// Non-baseline categories, in input order.
    pub categories: Vec<CategoryStat>,
}

/// One slice of the pie chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeriesEntry {
    pub title: String,
    /// Category total hours.
    pub value: f64,
    pub color: String,
}

/// Ordered, non-empty list of chart colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Palette(Vec<String>);

impl Palette {
    /// Build a palette. Returns `None` for an empty color list.
    pub fn new(colors: Vec<String>) -> Option<Self> {
        if colors.is_empty() {
            None
        } else {
            Some(Self(colors))
        }
    }

    /// Color for the category at `index`, cycling through the palette.
    pub fn color_at(&self, index: usize) -> &str {
        &self.0[index % self.0.len()]
    }

    pub fn colors(&self) -> &[String] {
        &self.0
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self(DEFAULT_PALETTE.iter().map(|c| c.to_string()).collect())
    }
}

/// Attended time within a single week or month.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodStat {
    /// `2026-W07` for weeks, `February 2026` for months.
    pub label: String,
    pub count: usize,
    pub total_hours: f64,
    pub average_hours: f64,
}

/// Weekly and monthly view of the attended events.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodBreakdown {
    pub weekly: Vec<PeriodStat>,
    pub monthly: Vec<PeriodStat>,
    /// Mean of the weekly totals. `None` when no week has events.
    pub average_hours_per_week: Option<f64>,
    /// Attended events without a usable start time.
    pub unscheduled: usize,
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportMetadata {
    /// Where the events came from (service URL or input file).
    pub source: String,
    /// Calendars that were summarized.
    pub calendars: Vec<String>,
    pub generated_at: DateTime<Utc>,
    pub palette: Palette,
}

/// Everything the report generator renders.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryReport {
    pub metadata: ReportMetadata,
    pub summary: Summary,
    pub chart: Vec<ChartSeriesEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periods: Option<PeriodBreakdown>,
}
