//! Weekly and monthly breakdown of attended time.

use crate::models::{Event, EventDuration, PeriodBreakdown, PeriodStat};
use chrono::Datelike;
use std::collections::BTreeMap;

#[derive(Default)]
struct Accumulator {
    label: String,
    count: usize,
    total_hours: f64,
}

impl Accumulator {
    fn add(&mut self, hours: f64) {
        self.count += 1;
        self.total_hours += hours;
    }

    fn into_stat(self) -> PeriodStat {
        PeriodStat {
            label: self.label,
            count: self.count,
            total_hours: self.total_hours,
            average_hours: self.total_hours / self.count as f64,
        }
    }
}

/// Group events by ISO week and calendar month of their start time.
///
/// Times are read in the event's own offset. Events without a parsable start
/// are only counted in `unscheduled`.
pub fn breakdown(events: &[Event]) -> PeriodBreakdown {
    let mut weekly: BTreeMap<(i32, u32), Accumulator> = BTreeMap::new();
    let mut monthly: BTreeMap<(i32, u32), Accumulator> = BTreeMap::new();
    let mut unscheduled = 0;

    for event in events {
        let Some(start) = event.start.parse() else {
            unscheduled += 1;
            continue;
        };
        let hours = event.duration_hours();

        let week = start.iso_week();
        weekly
            .entry((week.year(), week.week()))
            .or_insert_with(|| Accumulator {
                label: format!("{}-W{:02}", week.year(), week.week()),
                ..Accumulator::default()
            })
            .add(hours);

        monthly
            .entry((start.year(), start.month()))
            .or_insert_with(|| Accumulator {
                label: start.format("%B %Y").to_string(),
                ..Accumulator::default()
            })
            .add(hours);
    }

    let weekly: Vec<PeriodStat> = weekly.into_values().map(Accumulator::into_stat).collect();
    let monthly: Vec<PeriodStat> = monthly.into_values().map(Accumulator::into_stat).collect();

    let average_hours_per_week = if weekly.is_empty() {
        None
    } else {
        let total: f64 = weekly.iter().map(|w| w.total_hours).sum();
        Some(total / weekly.len() as f64)
    };

    PeriodBreakdown {
        weekly,
        monthly,
        average_hours_per_week,
        unscheduled,
    }
}
